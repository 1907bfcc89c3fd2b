//! Report assembly.
//!
//! Joins live samples with predictions and the best/worst-hours analysis and
//! shapes the six records written per run. A ride missing from history still
//! shows up in the current-waits and shortest-waits lists; it is left out of
//! anything that needs a prediction.

use chrono::{NaiveDateTime, Timelike};
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use tracing::debug;

use crate::analyzers::best_times;
use crate::analyzers::classify::classify;
use crate::analyzers::predictor::predict;
use crate::analyzers::types::{
    CrowdComparison, CrowdStatus, HourlyWait, PredictionResult,
};
use crate::analyzers::utility::{hour_label, round1};
use crate::calendar::{CalendarDocument, CalendarHours};
use crate::hours::OperatingHours;
use crate::live::{LiveWaitSample, RideStatus};
use crate::patterns::PatternStore;
use crate::stats::ParkStatus;
use crate::tables::RideTable;

pub const SHORTEST_WAITS_LIMIT: usize = 10;
pub const BEST_TIMES_LIMIT: usize = 3;

/// Formats report timestamps as `YYYY-MM-DD HH:MM:SS`.
pub fn format_timestamp(at: NaiveDateTime) -> String {
    at.format("%Y-%m-%d %H:%M:%S").to_string()
}

/// Renders a height in inches as `"{feet} ft {inches} in"`.
pub fn format_height(inches: u32) -> String {
    format!("{} ft {} in", inches / 12, inches % 12)
}

/// One live ride joined with whatever history says about it.
#[derive(Debug, Clone)]
pub struct RideRow {
    pub sample: LiveWaitSample,
    pub prediction: Option<PredictionResult>,
    pub comparison: Option<CrowdComparison>,
}

impl RideRow {
    pub fn name(&self) -> &str {
        &self.sample.ride_name
    }
}

/// Compares a posted wait with its prediction. A posted 0 means the feed
/// has no standby wait for the ride, so it is reported as normal with no
/// difference.
pub fn compare_posted_wait(ride_name: &str, posted: u32, predicted: f64) -> CrowdComparison {
    if posted == 0 {
        return CrowdComparison {
            ride_name: ride_name.to_string(),
            actual_minutes: 0.0,
            predicted_minutes: predicted,
            difference: 0.0,
            status: CrowdStatus::Normal,
        };
    }
    classify(ride_name, f64::from(posted), predicted)
}

/// Predicts and classifies every live ride.
pub fn analyze_rides(
    samples: &[LiveWaitSample],
    store: &PatternStore,
    now: NaiveDateTime,
) -> Vec<RideRow> {
    let rows: Vec<RideRow> = samples
        .iter()
        .map(|sample| {
            let prediction = match store.get(&sample.ride_name) {
                Some(patterns) => match predict(patterns, now) {
                    Ok(p) => Some(p),
                    Err(e) => {
                        debug!(ride = %sample.ride_name, error = %e, "Ride excluded from comparison");
                        None
                    }
                },
                None => {
                    debug!(ride = %sample.ride_name, "Live ride has no pattern data");
                    None
                }
            };

            let comparison = match (sample.open_wait(), &prediction) {
                (Some(wait), Some(p)) => Some(compare_posted_wait(
                    &sample.ride_name,
                    wait,
                    p.predicted_minutes,
                )),
                _ => None,
            };

            RideRow {
                sample: sample.clone(),
                prediction,
                comparison,
            }
        })
        .collect();

    for patterns in store.iter() {
        if !samples.iter().any(|s| s.ride_name == patterns.ride_name) {
            debug!(ride = %patterns.ride_name, "Pattern ride missing from live feed");
        }
    }

    rows
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeightFields {
    pub height_requirement_inches: Option<u32>,
    pub height_requirement: String,
}

impl HeightFields {
    pub fn for_ride(ride_name: &str, heights: &RideTable) -> Self {
        match heights.get(ride_name) {
            Some(&inches) => Self {
                height_requirement_inches: Some(inches),
                height_requirement: format_height(inches),
            },
            None => Self {
                height_requirement_inches: None,
                height_requirement: "Any Height".to_string(),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CurrentWaitEntry {
    pub name: String,
    pub wait_time_minutes: u32,
    pub status: RideStatus,
    /// When the feed last refreshed this ride, `YYYY-MM-DD HH:MM:SS` UTC.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ride_duration_minutes: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_time_minutes: Option<u32>,
    #[serde(flatten)]
    pub height: HeightFields,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CurrentWaitsReport {
    pub timestamp: String,
    pub day_of_week: String,
    pub rides: Vec<CurrentWaitEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonEntry {
    pub name: String,
    pub actual_wait_minutes: u32,
    pub predicted_wait_minutes: f64,
    pub difference_minutes: f64,
    pub crowd_status: CrowdStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ride_duration_minutes: Option<u32>,
    #[serde(flatten)]
    pub height: HeightFields,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonReport {
    pub timestamp: String,
    pub hour: u32,
    pub rides: Vec<ComparisonEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimeSlot {
    pub time: String,
    pub average_wait_minutes: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub peak_wait_minutes: Option<f64>,
}

impl From<HourlyWait> for TimeSlot {
    fn from(h: HourlyWait) -> Self {
        Self {
            time: hour_label(h.hour),
            average_wait_minutes: round1(h.avg_wait),
            peak_wait_minutes: h.max_wait.map(round1),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BestTimesEntry {
    pub name: String,
    pub current_wait_minutes: Option<u32>,
    pub historical_average_this_hour: Option<f64>,
    pub best_time: Option<TimeSlot>,
    pub worst_time: Option<TimeSlot>,
    pub best_times: Vec<TimeSlot>,
    pub worst_times: Vec<TimeSlot>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BestTimesReport {
    pub generated_at: String,
    pub rides: Vec<BestTimesEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BestOptionEntry {
    pub name: String,
    pub wait_time_minutes: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub predicted_wait_minutes: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ride_duration_minutes: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_time_minutes: Option<u32>,
    #[serde(flatten)]
    pub height: HeightFields,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BestOptionsReport {
    pub timestamp: String,
    pub rides: Vec<BestOptionEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParkCalendarRecord {
    pub hours: Option<CalendarHours>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parades: Option<Vec<Value>>,
    pub nighttime_entertainment: Vec<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub special_events: Option<Vec<Value>>,
    pub closed_attractions: Vec<Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CalendarReport {
    pub date: String,
    pub generated_at: String,
    pub parks: BTreeMap<String, ParkCalendarRecord>,
    pub character_meet_and_greets: Vec<Value>,
}

/// Everything one run produces.
#[derive(Debug, Clone)]
pub struct ReportSet {
    pub now: NaiveDateTime,
    pub hours: OperatingHours,
    pub rows: Vec<RideRow>,
    pub current_waits: CurrentWaitsReport,
    pub comparison: ComparisonReport,
    pub best_times: BestTimesReport,
    pub best_options: BestOptionsReport,
    pub park_status: ParkStatus,
    pub calendar: Option<CalendarReport>,
}

pub struct ReportInputs<'a> {
    pub now: NaiveDateTime,
    pub samples: &'a [LiveWaitSample],
    pub store: &'a PatternStore,
    pub hours: &'a OperatingHours,
    pub durations: &'a RideTable,
    pub heights: &'a RideTable,
    pub calendar: Option<&'a CalendarDocument>,
    pub popular_rides: &'a [String],
}

/// Builds the full report set for one run.
pub fn assemble(inputs: &ReportInputs<'_>) -> ReportSet {
    let rows = analyze_rides(inputs.samples, inputs.store, inputs.now);

    ReportSet {
        now: inputs.now,
        hours: inputs.hours.clone(),
        current_waits: current_waits(&rows, inputs),
        comparison: comparison(&rows, inputs),
        best_times: popular_best_times(&rows, inputs),
        best_options: best_options(&rows, inputs),
        park_status: ParkStatus::from_rides(&rows, inputs.hours, inputs.now),
        calendar: inputs.calendar.map(|c| calendar_report(c, inputs.now)),
        rows,
    }
}

fn current_waits(rows: &[RideRow], inputs: &ReportInputs<'_>) -> CurrentWaitsReport {
    let mut rides: Vec<CurrentWaitEntry> = rows
        .iter()
        .filter_map(|row| {
            let wait = row.sample.open_wait()?;
            let duration = inputs.durations.get(row.name()).copied();
            Some(CurrentWaitEntry {
                name: row.name().to_string(),
                wait_time_minutes: wait,
                status: RideStatus::Open,
                last_updated: row
                    .sample
                    .last_updated
                    .map(|t| format_timestamp(t.naive_utc())),
                ride_duration_minutes: duration,
                total_time_minutes: duration.map(|d| wait.saturating_add(d)),
                height: HeightFields::for_ride(row.name(), inputs.heights),
            })
        })
        .collect();

    rides.sort_by(|a, b| b.wait_time_minutes.cmp(&a.wait_time_minutes));

    CurrentWaitsReport {
        timestamp: format_timestamp(inputs.now),
        day_of_week: inputs.now.format("%A").to_string(),
        rides,
    }
}

fn comparison(rows: &[RideRow], inputs: &ReportInputs<'_>) -> ComparisonReport {
    let mut rides: Vec<ComparisonEntry> = rows
        .iter()
        .filter_map(|row| {
            let wait = row.sample.open_wait()?;
            let c = row.comparison.as_ref()?;
            Some(ComparisonEntry {
                name: row.name().to_string(),
                actual_wait_minutes: wait,
                predicted_wait_minutes: round1(c.predicted_minutes),
                difference_minutes: round1(c.difference),
                crowd_status: c.status,
                ride_duration_minutes: inputs.durations.get(row.name()).copied(),
                height: HeightFields::for_ride(row.name(), inputs.heights),
            })
        })
        .collect();

    rides.sort_by(|a, b| b.actual_wait_minutes.cmp(&a.actual_wait_minutes));

    ComparisonReport {
        timestamp: format_timestamp(inputs.now),
        hour: inputs.now.hour(),
        rides,
    }
}

fn popular_best_times(rows: &[RideRow], inputs: &ReportInputs<'_>) -> BestTimesReport {
    let rides = inputs
        .popular_rides
        .iter()
        .filter_map(|name| {
            let row = rows
                .iter()
                .find(|r| r.name() == name && r.sample.is_open())?;
            let patterns = inputs.store.get(name)?;

            let analysis = best_times::analyze(patterns, inputs.hours);
            if analysis.is_empty() {
                debug!(ride = %name, "No historical hours inside operating hours");
                return None;
            }

            Some(BestTimesEntry {
                name: name.clone(),
                current_wait_minutes: row.sample.open_wait(),
                historical_average_this_hour: row
                    .prediction
                    .as_ref()
                    .map(|p| round1(p.predicted_minutes)),
                best_time: analysis.best.map(TimeSlot::from),
                worst_time: analysis.worst.map(TimeSlot::from),
                best_times: analysis
                    .best_hours(BEST_TIMES_LIMIT)
                    .into_iter()
                    .map(TimeSlot::from)
                    .collect(),
                worst_times: analysis
                    .worst_hours(BEST_TIMES_LIMIT)
                    .into_iter()
                    .map(TimeSlot::from)
                    .collect(),
            })
        })
        .collect();

    BestTimesReport {
        generated_at: format_timestamp(inputs.now),
        rides,
    }
}

fn best_options(rows: &[RideRow], inputs: &ReportInputs<'_>) -> BestOptionsReport {
    let mut open: Vec<(&RideRow, u32)> = rows
        .iter()
        .filter_map(|row| row.sample.open_wait().map(|w| (row, w)))
        .collect();

    // rides without a posted wait sort after every posted one
    open.sort_by_key(|(_, wait)| if *wait == 0 { u32::MAX } else { *wait });

    let rides = open
        .into_iter()
        .take(SHORTEST_WAITS_LIMIT)
        .map(|(row, wait)| {
            let duration = inputs.durations.get(row.name()).copied();
            BestOptionEntry {
                name: row.name().to_string(),
                wait_time_minutes: wait,
                predicted_wait_minutes: row.prediction.as_ref().map(|p| round1(p.predicted_minutes)),
                ride_duration_minutes: duration,
                total_time_minutes: duration.map(|d| wait.saturating_add(d)),
                height: HeightFields::for_ride(row.name(), inputs.heights),
            }
        })
        .collect();

    BestOptionsReport {
        timestamp: format_timestamp(inputs.now),
        rides,
    }
}

fn calendar_report(doc: &CalendarDocument, now: NaiveDateTime) -> CalendarReport {
    let parks = doc
        .parks
        .iter()
        .map(|(name, park)| {
            (
                name.clone(),
                ParkCalendarRecord {
                    hours: park.hours.clone(),
                    parades: park.parades.clone(),
                    nighttime_entertainment: park.nighttime.clone(),
                    special_events: park.events.clone(),
                    closed_attractions: park.closed_attractions.clone(),
                },
            )
        })
        .collect();

    CalendarReport {
        date: doc
            .date
            .clone()
            .unwrap_or_else(|| now.format("%Y-%m-%d").to_string()),
        generated_at: format_timestamp(now),
        parks,
        character_meet_and_greets: doc.character_meet_and_greets.clone(),
    }
}
