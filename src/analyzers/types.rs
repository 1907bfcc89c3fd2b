//! Data types produced by the analysis pipeline.

use chrono::{NaiveDateTime, Weekday};
use serde::Serialize;
use thiserror::Error;

/// Predicted wait for one ride at one moment.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictionResult {
    pub ride_name: String,
    pub predicted_minutes: f64,
    pub at: NaiveDateTime,
    pub hour: u32,
    pub day_of_week: Weekday,
    pub month: u32,
    /// Number of values that went into the blend (at most four).
    pub samples: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PredictError {
    #[error("no historical data for ride '{ride}'")]
    NoHistoricalData { ride: String },
}

/// Label for how a live wait compares with its prediction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CrowdStatus {
    BusierThanUsual,
    LighterThanUsual,
    Normal,
}

impl CrowdStatus {
    /// Short tag used in the console table.
    pub fn indicator(self) -> &'static str {
        match self {
            CrowdStatus::BusierThanUsual => "BUSY",
            CrowdStatus::LighterThanUsual => "LIGHT",
            CrowdStatus::Normal => "NORMAL",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CrowdComparison {
    pub ride_name: String,
    pub actual_minutes: f64,
    pub predicted_minutes: f64,
    pub difference: f64,
    pub status: CrowdStatus,
}

/// Park-wide verdict from mean actual vs mean historical waits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ParkCrowdLevel {
    BusierThanTypical,
    LighterThanTypical,
    Normal,
}

impl ParkCrowdLevel {
    pub fn recommendation(self) -> &'static str {
        match self {
            ParkCrowdLevel::BusierThanTypical => {
                "Consider visiting later or focus on low-wait attractions"
            }
            ParkCrowdLevel::LighterThanTypical => {
                "Great time to visit! Take advantage of lower waits"
            }
            ParkCrowdLevel::Normal => "Normal crowds for this time of day",
        }
    }
}

/// Historical average for one hour of the day.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HourlyWait {
    pub hour: u32,
    pub avg_wait: f64,
    /// Historical peak for the hour, when the source recorded one.
    pub max_wait: Option<f64>,
}

/// Hour-of-day averages inside operating hours, with the extremes picked out.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BestWorstResult {
    pub ride_name: String,
    /// Ascending by hour.
    pub hours: Vec<HourlyWait>,
    pub best: Option<HourlyWait>,
    pub worst: Option<HourlyWait>,
}

impl BestWorstResult {
    pub fn is_empty(&self) -> bool {
        self.hours.is_empty()
    }

    /// The `n` quietest hours, lowest wait first, earliest hour on ties.
    pub fn best_hours(&self, n: usize) -> Vec<HourlyWait> {
        let mut sorted = self.hours.clone();
        sorted.sort_by(|a, b| a.avg_wait.total_cmp(&b.avg_wait).then(a.hour.cmp(&b.hour)));
        sorted.truncate(n);
        sorted
    }

    /// The `n` busiest hours, highest wait first, earliest hour on ties.
    pub fn worst_hours(&self, n: usize) -> Vec<HourlyWait> {
        let mut sorted = self.hours.clone();
        sorted.sort_by(|a, b| b.avg_wait.total_cmp(&a.avg_wait).then(a.hour.cmp(&b.hour)));
        sorted.truncate(n);
        sorted
    }
}
