//! CLI entry point for the bikeshare explorer.
//!
//! `explore` runs the interactive question/answer session; `report` prints the
//! statistics for one filter selection and exits.

use anyhow::{Context, Result};
use bikeshare_explorer::{
    config::SourceConfig,
    filter::{City, TimeMode, parse_day, parse_month, resolve},
    loader::DatasetLoader,
    output::{ConsoleReporter, Format},
    prompt::ConsoleOperator,
    session::{ReportSink, Session},
    stats::run_suite,
};
use chrono::{Month, Weekday};
use clap::{Parser, Subcommand};
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::{
    EnvFilter, Layer,
    filter::Directive,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "bikeshare")]
#[command(about = "Explore US bikeshare trip data", long_about = None)]
struct Cli {
    /// Directory holding the city trip logs
    #[arg(short, long, global = true, env = "BIKESHARE_DATA_DIR", default_value = ".")]
    data_dir: PathBuf,

    /// JSON file mapping city names to trip log paths
    #[arg(short, long, global = true)]
    sources: Option<PathBuf>,

    /// Print reports as JSON
    #[arg(long, global = true, default_value_t = false)]
    json: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactively pick a city and filters, view statistics and raw trips
    Explore,
    /// Print the statistics for one city and filter, then exit
    Report {
        /// chicago, "new york" or washington
        #[arg(short, long)]
        city: City,

        /// Only trips starting in this month (january through june)
        #[arg(short, long, value_parser = month_arg, conflicts_with = "day")]
        month: Option<Month>,

        /// Only trips starting on this weekday
        #[arg(short = 'w', long, value_parser = day_arg)]
        day: Option<Weekday>,
    },
}

fn month_arg(s: &str) -> Result<Month, String> {
    parse_month(s).ok_or_else(|| format!("expected a month from january to june, got {s:?}"))
}

fn day_arg(s: &str) -> Result<Weekday, String> {
    parse_day(s).ok_or_else(|| format!("expected a full weekday name, got {s:?}"))
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/bikeshare.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("bikeshare.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(
            EnvFilter::from_env("RUST_LOG").add_directive("info".parse::<Directive>()?),
        );

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(
            EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse::<Directive>()?),
        );

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();

    let config = match &cli.sources {
        Some(path) => SourceConfig::load(path, &cli.data_dir)
            .with_context(|| format!("loading source mapping from {}", path.display()))?,
        None => SourceConfig::in_dir(&cli.data_dir),
    };
    let loader = DatasetLoader::new(config);
    let format = if cli.json { Format::Json } else { Format::Text };

    match cli.command.unwrap_or(Commands::Explore) {
        Commands::Explore => {
            let operator = ConsoleOperator::new(std::io::stdin().lock(), std::io::stdout());
            let reporter = ConsoleReporter::new(std::io::stdout(), format);
            let (summary, _, _) = Session::new(loader, operator, reporter).run()?;
            info!(cycles = summary.cycles, pages = summary.pages_shown, "Goodbye");
        }
        Commands::Report { city, month, day } => {
            let mode = match (month, day) {
                (Some(_), _) => TimeMode::Month,
                (_, Some(_)) => TimeMode::Day,
                _ => TimeMode::None,
            };
            let spec = resolve(city, mode, month, day);
            let mut reporter = ConsoleReporter::new(std::io::stdout(), format);
            reporter.filters(&spec)?;

            let dataset = match loader.load(&spec) {
                Ok(dataset) => dataset,
                Err(e) => {
                    reporter.cycle_failed(&e)?;
                    return Err(e.into());
                }
            };

            for report in run_suite(&dataset) {
                reporter.block(&report)?;
            }
        }
    }

    Ok(())
}
