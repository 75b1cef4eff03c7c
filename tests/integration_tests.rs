use bikeshare_explorer::config::SourceConfig;
use bikeshare_explorer::error::Unavailable;
use bikeshare_explorer::filter::{City, FilterSpec, TimeMode, resolve};
use bikeshare_explorer::loader::DatasetLoader;
use bikeshare_explorer::pager::Pager;
use bikeshare_explorer::record::{FilteredDataset, GENDER};
use bikeshare_explorer::stats::utility::mode;
use bikeshare_explorer::stats::{
    BlockReport, duration_stats, run_suite, station_stats, time_stats, user_stats,
};
use chrono::{Month, Weekday};
use std::path::PathBuf;

fn fixtures() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

fn load(spec: FilterSpec) -> FilteredDataset {
    DatasetLoader::new(SourceConfig::in_dir(fixtures()))
        .load(&spec)
        .expect("fixture should load")
}

#[test]
fn test_chicago_unfiltered_end_to_end() {
    let spec = resolve(City::Chicago, TimeMode::None, None, None);
    let dataset = load(spec);

    // one malformed date and one missing end station are dropped
    assert_eq!(dataset.len(), 10);

    let time = time_stats(&dataset);
    assert_eq!(time.popular_month, Ok(1));
    assert_eq!(time.popular_day, Ok(Weekday::Mon));
    // 14h and 9h both occur twice; 14h is seen first
    assert_eq!(time.popular_hour, Ok(14));

    let records = &dataset.records;
    assert_eq!(time.popular_month.ok(), mode(records.iter().map(|r| r.month)));
    assert_eq!(time.popular_hour.ok(), mode(records.iter().map(|r| r.hour)));

    let durations = duration_stats(&dataset);
    let expected_total: f64 = records.iter().map(|r| r.trip_duration).sum();
    assert_eq!(durations.total_seconds, expected_total);
    assert_eq!(durations.total_seconds, 6310.0);
    assert_eq!(durations.mean_seconds, Ok(631.0));
}

#[test]
fn test_chicago_stations_and_users() {
    let dataset = load(FilterSpec::unfiltered(City::Chicago));

    let stations = station_stats(&dataset);
    assert_eq!(stations.popular_start_station.as_deref(), Ok("Wood St & Hubbard St"));
    assert_eq!(stations.popular_end_station.as_deref(), Ok("Damen Ave & Chicago Ave"));
    let trip = stations.popular_trip.unwrap();
    assert_eq!(trip.start_station, "Wood St & Hubbard St");
    assert_eq!(trip.end_station, "Damen Ave & Chicago Ave");
    assert_eq!(trip.count, 3);

    let users = user_stats(&dataset);
    let types = users.user_types.unwrap();
    assert_eq!((types[0].value.as_str(), types[0].count), ("Subscriber", 9));
    assert_eq!((types[1].value.as_str(), types[1].count), ("Customer", 1));
    let genders = users.genders.unwrap();
    assert_eq!((genders[0].value.as_str(), genders[0].count), ("Male", 6));
    let years = users.birth_years.unwrap();
    assert_eq!(years.earliest, 1975);
    assert_eq!(years.most_recent, 1992);
    assert_eq!(years.most_common, 1992);
}

#[test]
fn test_month_filter_only_yields_that_month() {
    let spec = resolve(City::Chicago, TimeMode::Month, Some(Month::January), None);
    let dataset = load(spec);

    assert_eq!(dataset.len(), 3);
    assert!(dataset.records.iter().all(|r| r.month == 1));
}

#[test]
fn test_day_filter_only_yields_that_day() {
    let spec = resolve(City::Chicago, TimeMode::Day, None, Some(Weekday::Mon));
    let dataset = load(spec);

    assert_eq!(dataset.len(), 3);
    assert!(dataset.records.iter().all(|r| r.day_of_week == Weekday::Mon));
}

#[test]
fn test_filter_with_no_matches_still_reports() {
    let spec = resolve(City::Washington, TimeMode::Month, Some(Month::January), None);
    let dataset = load(spec);
    assert!(dataset.is_empty());

    let reports = run_suite(&dataset);
    assert_eq!(reports.len(), 4);
    match &reports[2] {
        BlockReport::Duration(d) => {
            assert_eq!(d.total_seconds, 0.0);
            assert_eq!(d.mean_seconds, Err(Unavailable::NoData));
        }
        other => panic!("expected duration block, got {other:?}"),
    }
}

#[test]
fn test_washington_user_stats_are_isolated() {
    let dataset = load(FilterSpec::unfiltered(City::Washington));
    assert_eq!(dataset.len(), 4);

    let users = user_stats(&dataset);
    assert_eq!(users.user_types.unwrap().len(), 2);
    assert_eq!(users.genders, Err(Unavailable::MissingColumn(GENDER)));
    assert!(matches!(users.birth_years, Err(Unavailable::MissingColumn(_))));

    // fractional durations survive loading
    let durations = duration_stats(&dataset);
    assert!((durations.total_seconds - 4228.866).abs() < 1e-9);
}

#[test]
fn test_pager_over_loaded_dataset() {
    let dataset = load(FilterSpec::unfiltered(City::NewYork));
    assert_eq!(dataset.len(), 7);

    let mut pager = Pager::new(&dataset.records);
    assert_eq!(pager.first_page().len(), 5);
    assert_eq!(pager.next_page().map(<[_]>::len), Some(2));
    assert!(pager.is_exhausted());
}

#[test]
fn test_gzip_source() {
    use flate2::Compression;
    use flate2::write::GzEncoder;
    use std::io::Write;

    let raw = std::fs::read(fixtures().join("washington.csv")).unwrap();
    let path = std::env::temp_dir().join("bikeshare_washington_test.csv.gz");
    let mut encoder = GzEncoder::new(std::fs::File::create(&path).unwrap(), Compression::default());
    encoder.write_all(&raw).unwrap();
    encoder.finish().unwrap();

    let config = SourceConfig::in_dir(fixtures()).with_source(City::Washington, &path);
    let dataset = DatasetLoader::new(config)
        .load(&FilterSpec::unfiltered(City::Washington))
        .unwrap();
    assert_eq!(dataset.len(), 4);

    std::fs::remove_file(path).unwrap();
}

#[test]
fn test_source_mapping_file() {
    let path = std::env::temp_dir().join("bikeshare_sources_test.json");
    std::fs::write(&path, r#"{ "chicago": "new_york_city.csv" }"#).unwrap();

    let config = SourceConfig::load(&path, fixtures()).unwrap();
    let dataset = DatasetLoader::new(config)
        .load(&FilterSpec::unfiltered(City::Chicago))
        .unwrap();
    assert_eq!(dataset.len(), 7);

    std::fs::remove_file(path).unwrap();
}
