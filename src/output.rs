//! Report persistence.
//!
//! Each run replaces the previous output set: prior documents are removed
//! first, then every report is written in full. Nothing is merged or
//! appended.

use anyhow::{Context, Result};
use csv::WriterBuilder;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::report::{ComparisonReport, ReportSet};

pub const CURRENT_WAITS_FILE: &str = "current_waits.json";
pub const COMPARISON_FILE: &str = "ride_comparison.json";
pub const BEST_TIMES_FILE: &str = "best_times.json";
pub const BEST_OPTIONS_FILE: &str = "best_options_now.json";
pub const PARK_STATUS_FILE: &str = "park_status.json";
pub const CALENDAR_FILE: &str = "park_calendar.json";
pub const COMPARISON_CSV_FILE: &str = "ride_comparison.csv";

/// Every file a run may produce.
pub const REPORT_FILES: &[&str] = &[
    CURRENT_WAITS_FILE,
    COMPARISON_FILE,
    BEST_TIMES_FILE,
    BEST_OPTIONS_FILE,
    PARK_STATUS_FILE,
    CALENDAR_FILE,
    COMPARISON_CSV_FILE,
];

/// Removes the previous run's reports from `dir`.
///
/// A file that cannot be removed is logged and skipped; it will be
/// overwritten by the write that follows.
pub fn clear_reports(dir: &Path) -> usize {
    let mut removed = 0;
    for name in REPORT_FILES {
        let path = dir.join(name);
        if !path.exists() {
            continue;
        }
        match fs::remove_file(&path) {
            Ok(()) => {
                debug!(path = %path.display(), "Removed previous report");
                removed += 1;
            }
            Err(e) => warn!(path = %path.display(), error = %e, "Could not delete previous report"),
        }
    }
    removed
}

/// Writes `value` as pretty-printed JSON to `path`, replacing any existing file.
pub fn write_json(path: &Path, value: &impl Serialize) -> Result<()> {
    let body = serde_json::to_string_pretty(value)?;
    fs::write(path, body).with_context(|| format!("writing {}", path.display()))?;
    Ok(())
}

/// Clears `dir` and writes the run's JSON documents. Returns the written paths.
pub fn write_reports(dir: &Path, reports: &ReportSet) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;
    clear_reports(dir);

    let mut written = vec![
        dir.join(CURRENT_WAITS_FILE),
        dir.join(COMPARISON_FILE),
        dir.join(BEST_TIMES_FILE),
        dir.join(BEST_OPTIONS_FILE),
        dir.join(PARK_STATUS_FILE),
    ];
    write_json(&written[0], &reports.current_waits)?;
    write_json(&written[1], &reports.comparison)?;
    write_json(&written[2], &reports.best_times)?;
    write_json(&written[3], &reports.best_options)?;
    write_json(&written[4], &reports.park_status)?;

    if let Some(calendar) = &reports.calendar {
        let path = dir.join(CALENDAR_FILE);
        write_json(&path, calendar)?;
        written.push(path);
    }

    for path in &written {
        info!(path = %path.display(), "Report written");
    }
    Ok(written)
}

#[derive(Serialize)]
struct ComparisonCsvRow<'a> {
    timestamp: &'a str,
    name: &'a str,
    actual_wait_minutes: u32,
    predicted_wait_minutes: f64,
    difference_minutes: f64,
    crowd_status: crate::analyzers::types::CrowdStatus,
    ride_duration_minutes: Option<u32>,
    height_requirement_inches: Option<u32>,
}

/// Writes the comparison table as CSV, replacing any existing file.
pub fn write_comparison_csv(path: &Path, report: &ComparisonReport) -> Result<()> {
    let mut writer = WriterBuilder::new()
        .has_headers(true)
        .from_path(path)
        .with_context(|| format!("creating {}", path.display()))?;

    for ride in &report.rides {
        writer.serialize(ComparisonCsvRow {
            timestamp: &report.timestamp,
            name: &ride.name,
            actual_wait_minutes: ride.actual_wait_minutes,
            predicted_wait_minutes: ride.predicted_wait_minutes,
            difference_minutes: ride.difference_minutes,
            crowd_status: ride.crowd_status,
            ride_duration_minutes: ride.ride_duration_minutes,
            height_requirement_inches: ride.height.height_requirement_inches,
        })?;
    }
    writer.flush()?;

    debug!(path = %path.display(), rows = report.rides.len(), "Comparison CSV written");
    Ok(())
}
