use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::error::{BikeshareError, BikeshareResult};
use crate::filter::City;

/// Maps each city to the trip log the loader reads for it.
///
/// Can be loaded from a plain JSON object on disk:
/// ```json
/// {
///   "chicago": "chicago.csv",
///   "new york": "/data/nyc/new_york_city.csv.gz"
/// }
/// ```
/// Relative paths are resolved against the data directory. Cities left out of
/// the file have no source.
#[derive(Debug, Clone)]
pub struct SourceConfig {
    entries: HashMap<City, PathBuf>,
}

impl SourceConfig {
    /// The standard layout: one CSV per city inside `data_dir`.
    pub fn in_dir(data_dir: impl AsRef<Path>) -> Self {
        let data_dir = data_dir.as_ref();
        let entries = City::ALL
            .into_iter()
            .map(|city| (city, data_dir.join(city.default_file())))
            .collect();
        Self { entries }
    }

    /// Loads the city mapping from a JSON file at `path`.
    pub fn load(path: impl AsRef<Path>, data_dir: impl AsRef<Path>) -> BikeshareResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content, data_dir)
    }

    pub fn from_json(content: &str, data_dir: impl AsRef<Path>) -> BikeshareResult<Self> {
        let raw: HashMap<String, PathBuf> =
            serde_json::from_str(content).map_err(|e| BikeshareError::Config(e.to_string()))?;

        let mut entries = HashMap::new();
        for (name, path) in raw {
            let city = name.parse::<City>().map_err(BikeshareError::Config)?;
            let path = if path.is_relative() {
                data_dir.as_ref().join(path)
            } else {
                path
            };
            entries.insert(city, path);
        }

        Ok(Self { entries })
    }

    /// Returns the source path for `city`, if one is configured.
    pub fn path_for(&self, city: City) -> Option<&Path> {
        self.entries.get(&city).map(PathBuf::as_path)
    }

    pub fn with_source(mut self, city: City, path: impl Into<PathBuf>) -> Self {
        self.entries.insert(city, path.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_layout() {
        let config = SourceConfig::in_dir("/data");
        assert_eq!(
            config.path_for(City::NewYork),
            Some(Path::new("/data/new_york_city.csv"))
        );
        assert_eq!(
            config.path_for(City::Washington),
            Some(Path::new("/data/washington.csv"))
        );
    }

    #[test]
    fn test_from_json_resolves_relative_paths() {
        let json = r#"{ "chicago": "chi.csv", "new york": "/abs/nyc.csv.gz" }"#;
        let config = SourceConfig::from_json(json, "/data").unwrap();

        assert_eq!(config.path_for(City::Chicago), Some(Path::new("/data/chi.csv")));
        assert_eq!(config.path_for(City::NewYork), Some(Path::new("/abs/nyc.csv.gz")));
        assert_eq!(config.path_for(City::Washington), None);
    }

    #[test]
    fn test_from_json_rejects_unknown_city() {
        let json = r#"{ "boston": "boston.csv" }"#;
        let err = SourceConfig::from_json(json, ".").unwrap_err();
        assert!(matches!(err, BikeshareError::Config(_)));
    }

    #[test]
    fn test_from_json_rejects_malformed() {
        assert!(SourceConfig::from_json("[1, 2]", ".").is_err());
    }
}
