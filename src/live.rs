//! Live wait samples as reported by the queue-times feed.

use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RideStatus {
    Open,
    Closed,
}

/// One ride's current posted wait. Fetched fresh every run, never stored as
/// history.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LiveWaitSample {
    pub ride_id: Option<u64>,
    pub ride_name: String,
    pub wait_minutes: Option<u32>,
    pub status: RideStatus,
    pub last_updated: Option<DateTime<Utc>>,
}

impl LiveWaitSample {
    pub fn open(ride_name: impl Into<String>, wait_minutes: u32) -> Self {
        Self {
            ride_id: None,
            ride_name: ride_name.into(),
            wait_minutes: Some(wait_minutes),
            status: RideStatus::Open,
            last_updated: None,
        }
    }

    pub fn closed(ride_name: impl Into<String>) -> Self {
        Self {
            ride_id: None,
            ride_name: ride_name.into(),
            wait_minutes: None,
            status: RideStatus::Closed,
            last_updated: None,
        }
    }

    pub fn is_open(&self) -> bool {
        self.status == RideStatus::Open
    }

    /// The posted wait, only while the ride is open.
    pub fn open_wait(&self) -> Option<u32> {
        if self.is_open() { self.wait_minutes } else { None }
    }
}
