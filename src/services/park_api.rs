//! Trait for the live park data source.

use anyhow::Result;
use chrono::{NaiveDate, NaiveTime};

use crate::live::LiveWaitSample;

/// Abstraction over a live park data provider (e.g., queue-times.com).
#[async_trait::async_trait]
pub trait ParkDataApi: Send + Sync {
    /// Returns the current posted wait of every tracked ride.
    async fn current_waits(&self) -> Result<Vec<LiveWaitSample>>;

    /// Returns the park's published open and close time for `date`.
    ///
    /// An error means no hours could be found; callers fall back to defaults.
    async fn operating_hours(&self, date: NaiveDate) -> Result<(NaiveTime, NaiveTime)>;
}
