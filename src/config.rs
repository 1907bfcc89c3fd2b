//! Run settings and the file layout derived from them.

use std::path::PathBuf;
use std::time::Duration;

use crate::error::AnalyzerError;

pub const DEFAULT_DATA_DIR: &str = "data";
pub const DEFAULT_OUTPUT_DIR: &str = "output";
pub const DEFAULT_PARK_ID: u32 = 16;
pub const DEFAULT_PARK_NAME: &str = "Disneyland Park";
pub const DEFAULT_BASE_URL: &str = "https://queue-times.com";
pub const DEFAULT_REQUEST_DELAY_MS: u64 = 1000;
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 10;

pub const PATTERNS_FILE: &str = "disneyland_ride_patterns.json";
pub const DURATIONS_FILE: &str = "ride_durations.json";
pub const HEIGHTS_FILE: &str = "ride_height_requirements.json";
pub const CALENDAR_FILE: &str = "park_calendar.json";

/// Rides that get a best/worst-hours breakdown.
pub const POPULAR_RIDES: &[&str] = &[
    "Star Wars: Rise of the Resistance",
    "Indiana Jones™ Adventure",
    "Space Mountain",
    "Matterhorn Bobsleds",
    "Haunted Mansion Holiday",
];

#[derive(Debug, Clone)]
pub struct Settings {
    pub data_dir: PathBuf,
    pub output_dir: PathBuf,
    pub park_id: u32,
    pub park_name: String,
    pub base_url: String,
    pub request_delay: Duration,
    pub http_timeout: Duration,
    pub popular_rides: Vec<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            park_id: DEFAULT_PARK_ID,
            park_name: DEFAULT_PARK_NAME.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            request_delay: Duration::from_millis(DEFAULT_REQUEST_DELAY_MS),
            http_timeout: Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
            popular_rides: POPULAR_RIDES.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl Settings {
    pub fn patterns_path(&self) -> PathBuf {
        self.data_dir.join(PATTERNS_FILE)
    }

    pub fn durations_path(&self) -> PathBuf {
        self.data_dir.join(DURATIONS_FILE)
    }

    pub fn heights_path(&self) -> PathBuf {
        self.data_dir.join(HEIGHTS_FILE)
    }

    pub fn calendar_path(&self) -> PathBuf {
        self.data_dir.join(CALENDAR_FILE)
    }

    /// Input documents a run cannot do without.
    pub fn required_inputs(&self) -> Vec<PathBuf> {
        vec![self.patterns_path()]
    }

    /// Ride tables a run seeds from built-in data when absent.
    pub fn seedable_inputs(&self) -> Vec<PathBuf> {
        vec![self.durations_path(), self.heights_path()]
    }

    pub fn missing_tables(&self) -> Vec<PathBuf> {
        self.seedable_inputs()
            .into_iter()
            .filter(|p| !p.exists())
            .collect()
    }

    /// Fails with [`AnalyzerError::MissingInputFile`] naming the first
    /// required document that does not exist.
    pub fn check_inputs(&self) -> Result<(), AnalyzerError> {
        match self.required_inputs().into_iter().find(|p| !p.exists()) {
            Some(path) => Err(AnalyzerError::MissingInputFile { path }),
            None => Ok(()),
        }
    }

    pub fn queue_times_url(&self) -> String {
        format!(
            "{}/parks/{}/queue_times.json",
            self.base_url.trim_end_matches('/'),
            self.park_id
        )
    }

    pub fn calendar_day_url(&self, date: chrono::NaiveDate) -> String {
        format!(
            "{}/en-US/parks/{}/calendar/{}",
            self.base_url.trim_end_matches('/'),
            self.park_id,
            date.format("%Y/%m/%d")
        )
    }
}
