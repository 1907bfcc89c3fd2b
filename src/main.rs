//! CLI entry point for the park wait analyzer.
//!
//! Provides subcommands for a full live analysis run, seeding the static
//! ride tables, and offline predictions from the pattern store.

use anyhow::{Context, Result};
use chrono::{Local, NaiveDateTime, Timelike};
use clap::{Args, Parser, Subcommand};
use park_wait_analyzer::{
    analyzers::{best_times, predictor::predict},
    calendar::CalendarDocument,
    config::{self, Settings},
    error::AnalyzerError,
    fetch::BasicClient,
    hours::{OperatingHours, resolve_hours},
    infra::queue_times::QueueTimesClient,
    output::{self, COMPARISON_CSV_FILE},
    patterns::PatternStore,
    report::{self, ReportInputs},
    services::ParkDataApi,
    summary::render_summary,
    tables,
};
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info, warn};
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "park_wait_analyzer")]
#[command(about = "Real-time theme park wait analysis against historical patterns", long_about = None)]
struct Cli {
    #[command(flatten)]
    settings: SettingsArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct SettingsArgs {
    /// Directory holding the pattern store and ride tables
    #[arg(long, env = "DATA_DIR", default_value = config::DEFAULT_DATA_DIR, global = true)]
    data_dir: PathBuf,

    /// Directory the JSON reports are written to
    #[arg(long, env = "OUTPUT_DIR", default_value = config::DEFAULT_OUTPUT_DIR, global = true)]
    output_dir: PathBuf,

    /// queue-times.com park id
    #[arg(long, env = "PARK_ID", default_value_t = config::DEFAULT_PARK_ID, global = true)]
    park_id: u32,

    #[arg(long, env = "PARK_NAME", default_value = config::DEFAULT_PARK_NAME, global = true)]
    park_name: String,

    #[arg(long, env = "QUEUE_TIMES_BASE_URL", default_value = config::DEFAULT_BASE_URL, global = true)]
    base_url: String,

    /// Pause between requests to queue-times.com
    #[arg(long, env = "REQUEST_DELAY_MS", default_value_t = config::DEFAULT_REQUEST_DELAY_MS, global = true)]
    request_delay_ms: u64,

    #[arg(long, env = "HTTP_TIMEOUT_SECS", default_value_t = config::DEFAULT_HTTP_TIMEOUT_SECS, global = true)]
    http_timeout_secs: u64,
}

impl From<SettingsArgs> for Settings {
    fn from(args: SettingsArgs) -> Self {
        Settings {
            data_dir: args.data_dir,
            output_dir: args.output_dir,
            park_id: args.park_id,
            park_name: args.park_name,
            base_url: args.base_url,
            request_delay: Duration::from_millis(args.request_delay_ms),
            http_timeout: Duration::from_secs(args.http_timeout_secs),
            ..Default::default()
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch live waits, compare with history and write the reports
    Run {
        /// Also write the comparison table as CSV
        #[arg(long, default_value_t = false)]
        csv: bool,
    },
    /// Write the built-in ride duration and height tables
    Seed {
        /// Overwrite tables that already exist
        #[arg(short, long, default_value_t = false)]
        force: bool,
    },
    /// Predict waits from history alone
    Predict {
        /// Only this ride (exact name)
        #[arg(short, long)]
        ride: Option<String>,

        /// Moment to predict for, "YYYY-MM-DD HH:MM" local time (default: now)
        #[arg(long, value_parser = parse_at)]
        at: Option<NaiveDateTime>,
    },
}

fn parse_at(s: &str) -> Result<NaiveDateTime, chrono::ParseError> {
    NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M")
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path = std::env::var("LOG_FILE_PATH")
        .unwrap_or_else(|_| "logs/park_wait_analyzer.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("park_wait_analyzer.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse().unwrap()));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse().unwrap()));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();
    let settings = Settings::from(cli.settings);

    match cli.command {
        Commands::Run { csv } => run(&settings, csv).await?,
        Commands::Seed { force } => {
            seed_tables(&settings, force)?;
        }
        Commands::Predict { ride, at } => {
            let at = at.unwrap_or_else(|| Local::now().naive_local());
            predict_offline(&settings, ride.as_deref(), at)?;
        }
    }

    Ok(())
}

/// Writes the built-in tables into the data directory. Returns how many were written.
#[tracing::instrument(skip(settings), fields(data_dir = %settings.data_dir.display()))]
fn seed_tables(settings: &Settings, force: bool) -> Result<usize> {
    let mut written = 0;
    for (path, table) in [
        (settings.durations_path(), tables::builtin_durations()),
        (settings.heights_path(), tables::builtin_height_requirements()),
    ] {
        if tables::write_table(&path, &table, force)
            .with_context(|| format!("seeding {}", path.display()))?
        {
            written += 1;
        } else {
            info!(path = %path.display(), "Table exists, leaving it in place");
        }
    }
    Ok(written)
}

/// One full analysis: inputs, live data, hours, reports, console summary.
#[tracing::instrument(skip_all, fields(park = %settings.park_name, park_id = settings.park_id))]
async fn run(settings: &Settings, csv: bool) -> Result<()> {
    let now = Local::now().naive_local();

    // Old reports must not survive a failed run
    std::fs::create_dir_all(&settings.output_dir)
        .with_context(|| format!("creating {}", settings.output_dir.display()))?;
    let removed = output::clear_reports(&settings.output_dir);
    debug!(removed, "Cleared previous reports");

    settings.check_inputs()?;
    let store = PatternStore::load(settings.patterns_path())?;
    info!(rides = store.len(), "Pattern store loaded");

    let missing = settings.missing_tables();
    if !missing.is_empty() {
        for path in &missing {
            warn!(path = %path.display(), "Ride table missing, seeding built-in data");
        }
        let seeded = seed_tables(settings, false)?;
        info!(seeded, "Seeded missing ride tables");
    }
    let durations = tables::load_table_or_empty(settings.durations_path());
    let heights = tables::load_table_or_empty(settings.heights_path());

    let calendar = match CalendarDocument::load(settings.calendar_path()) {
        Ok(doc) => doc,
        Err(e) => {
            warn!(error = %e, "Calendar document unusable, continuing without it");
            None
        }
    };

    let http = BasicClient::with_timeout(settings.http_timeout)?;
    let api = QueueTimesClient::new(http, settings);

    let samples = api
        .current_waits()
        .await
        .map_err(|e| AnalyzerError::live_fetch("current waits", e))?;
    let open = samples.iter().filter(|s| s.is_open()).count();
    info!(rides = samples.len(), open, "Live waits fetched");

    tokio::time::sleep(settings.request_delay).await;

    let hours = resolve_hours(&api, &settings.park_name, now.date(), calendar.as_ref()).await;
    if hours.is_fallback() {
        warn!(
            open = %hours.open_label(),
            close = %hours.close_label(),
            "Park hours unavailable, using default window"
        );
    }

    let reports = report::assemble(&ReportInputs {
        now,
        samples: &samples,
        store: &store,
        hours: &hours,
        durations: &durations,
        heights: &heights,
        calendar: calendar.as_ref(),
        popular_rides: &settings.popular_rides,
    });

    let written = output::write_reports(&settings.output_dir, &reports)?;
    if csv {
        let path = settings.output_dir.join(COMPARISON_CSV_FILE);
        output::write_comparison_csv(&path, &reports.comparison)?;
    }
    info!(
        files = written.len(),
        crowd_level = ?reports.park_status.crowd_level,
        "Reports written"
    );

    println!("{}", render_summary(&reports));
    Ok(())
}

/// Prints history-only predictions for `at`, with best and worst hours under
/// the default operating window.
#[tracing::instrument(skip(settings))]
fn predict_offline(settings: &Settings, ride: Option<&str>, at: NaiveDateTime) -> Result<()> {
    let store = PatternStore::load(settings.patterns_path())?;
    let hours = OperatingHours::default_for(settings.park_name.as_str());

    let selected: Vec<_> = match ride {
        Some(name) => vec![
            store
                .get(name)
                .ok_or_else(|| AnalyzerError::NoHistoricalData {
                    ride: name.to_string(),
                })?,
        ],
        None => store.iter().collect(),
    };

    println!("Predictions for {}", report::format_timestamp(at));
    for patterns in selected {
        let prediction = match predict(patterns, at) {
            Ok(p) => p,
            Err(e) if ride.is_some() => return Err(AnalyzerError::from(e).into()),
            Err(e) => {
                debug!(error = %e, "Skipping ride");
                continue;
            }
        };

        let analysis = best_times::analyze(patterns, &hours);
        let extremes = match (analysis.best, analysis.worst) {
            (Some(best), Some(worst)) => format!(
                "best {:02}:00 ({:.0} min), worst {:02}:00 ({:.0} min)",
                best.hour, best.avg_wait, worst.hour, worst.avg_wait
            ),
            _ => "no hourly history in operating hours".to_string(),
        };

        println!(
            "  {:<45} {:>5.1} min at {:02}:00  {}",
            prediction.ride_name,
            prediction.predicted_minutes,
            at.hour(),
            extremes
        );
    }

    Ok(())
}
