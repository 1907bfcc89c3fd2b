//! Operating-hours resolution.
//!
//! Hours come from the live calendar page when it answers, then from the
//! collector's calendar document, and otherwise from a static 08:00–23:00
//! default. Resolution never fails.

use chrono::{NaiveDate, NaiveTime, Timelike};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::calendar::CalendarDocument;
use crate::services::ParkDataApi;

pub const DEFAULT_OPEN_HOUR: u32 = 8;
pub const DEFAULT_CLOSE_HOUR: u32 = 23;

/// Where a set of operating hours came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HoursSource {
    Live,
    Calendar,
    Default,
}

/// A park's open and close time for one day, local time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperatingHours {
    pub park_name: String,
    pub open: NaiveTime,
    pub close: NaiveTime,
    pub source: HoursSource,
}

impl OperatingHours {
    /// The static fallback window.
    pub fn default_for(park_name: impl Into<String>) -> Self {
        Self {
            park_name: park_name.into(),
            open: NaiveTime::from_hms_opt(DEFAULT_OPEN_HOUR, 0, 0).unwrap_or(NaiveTime::MIN),
            close: NaiveTime::from_hms_opt(DEFAULT_CLOSE_HOUR, 0, 0).unwrap_or(NaiveTime::MIN),
            source: HoursSource::Default,
        }
    }

    pub fn with_times(mut self, open: NaiveTime, close: NaiveTime) -> Self {
        self.open = open;
        self.close = close;
        self
    }

    pub fn with_source(mut self, source: HoursSource) -> Self {
        self.source = source;
        self
    }

    pub fn is_fallback(&self) -> bool {
        self.source == HoursSource::Default
    }

    pub fn open_hour(&self) -> u32 {
        self.open.hour()
    }

    /// Close hour in `1..=24`; a close of exactly midnight means end of day.
    pub fn close_hour(&self) -> u32 {
        if self.close == NaiveTime::MIN {
            24
        } else {
            self.close.hour()
        }
    }

    /// Whether the hour starting at `hour` lies in `[open, close)`. A close
    /// earlier than the open wraps past midnight.
    pub fn contains_hour(&self, hour: u32) -> bool {
        let (open, close) = (self.open_hour(), self.close_hour());
        if open <= close {
            open <= hour && hour < close
        } else {
            hour >= open || hour < close
        }
    }

    /// `"HH:MM"` of the close time, keeping `00:00` for a midnight close.
    pub fn close_label(&self) -> String {
        self.close.format("%H:%M").to_string()
    }

    pub fn open_label(&self) -> String {
        self.open.format("%H:%M").to_string()
    }
}

/// Resolves today's hours for `park_name`, degrading to the default window
/// on any failure.
#[tracing::instrument(skip_all, fields(park = park_name, date = %date))]
pub async fn resolve_hours<A: ParkDataApi + ?Sized>(
    api: &A,
    park_name: &str,
    date: NaiveDate,
    calendar: Option<&CalendarDocument>,
) -> OperatingHours {
    let base = OperatingHours::default_for(park_name);

    match api.operating_hours(date).await {
        Ok((open, close)) => {
            info!(open = %open, close = %close, "Operating hours from live calendar");
            return base.with_times(open, close).with_source(HoursSource::Live);
        }
        Err(e) => warn!(error = %e, "Live operating hours unavailable"),
    }

    if let Some((open, close)) = calendar.and_then(|c| c.hours_for(park_name, date)) {
        info!(open = %open, close = %close, "Operating hours from calendar document");
        return base.with_times(open, close).with_source(HoursSource::Calendar);
    }

    debug!("Using default operating hours");
    base
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::live::LiveWaitSample;
    use anyhow::{Result, anyhow};

    fn t(hour: u32, minute: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(hour, minute, 0).unwrap()
    }

    fn friday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 10, 17).unwrap()
    }

    struct FixedHours(Option<(NaiveTime, NaiveTime)>);

    #[async_trait::async_trait]
    impl ParkDataApi for FixedHours {
        async fn current_waits(&self) -> Result<Vec<LiveWaitSample>> {
            Ok(vec![])
        }

        async fn operating_hours(&self, _date: NaiveDate) -> Result<(NaiveTime, NaiveTime)> {
            self.0.ok_or_else(|| anyhow!("connection refused"))
        }
    }

    #[test]
    fn test_default_window() {
        let hours = OperatingHours::default_for("Disneyland Park");

        assert!(hours.is_fallback());
        assert_eq!(hours.open_hour(), 8);
        assert_eq!(hours.close_hour(), 23);
        assert!(hours.contains_hour(8));
        assert!(hours.contains_hour(22));
        assert!(!hours.contains_hour(23));
        assert!(!hours.contains_hour(7));
    }

    #[test]
    fn test_midnight_close_is_end_of_day() {
        let hours = OperatingHours::default_for("Disneyland Park").with_times(t(8, 0), t(0, 0));

        assert_eq!(hours.close_hour(), 24);
        assert!(hours.contains_hour(23));
        assert!(!hours.contains_hour(0));
        assert_eq!(hours.close_label(), "00:00");
    }

    #[test]
    fn test_wrapping_window() {
        let hours = OperatingHours::default_for("Night Park").with_times(t(18, 0), t(2, 0));

        assert!(hours.contains_hour(18));
        assert!(hours.contains_hour(23));
        assert!(hours.contains_hour(1));
        assert!(!hours.contains_hour(2));
        assert!(!hours.contains_hour(12));
        assert!(hours.contains_hour(0));
    }

    #[tokio::test]
    async fn test_resolve_prefers_live() {
        let api = FixedHours(Some((t(9, 0), t(22, 0))));
        let hours = resolve_hours(&api, "Disneyland Park", friday(), None).await;

        assert_eq!(hours.source, HoursSource::Live);
        assert_eq!(hours.open_hour(), 9);
        assert_eq!(hours.close_hour(), 22);
    }

    #[tokio::test]
    async fn test_resolve_falls_back_to_calendar_document() {
        let doc = CalendarDocument::from_json(
            r#"{"date": "2025-10-17",
                "parks": {"Disneyland Park": {"hours": {"open": "07:30", "close": "23:00"}}}}"#,
        )
        .unwrap();

        let hours = resolve_hours(&FixedHours(None), "Disneyland Park", friday(), Some(&doc)).await;

        assert_eq!(hours.source, HoursSource::Calendar);
        assert_eq!(hours.open, t(7, 30));
    }

    #[tokio::test]
    async fn test_resolve_falls_back_to_default() {
        let hours = resolve_hours(&FixedHours(None), "Disneyland Park", friday(), None).await;

        assert_eq!(hours, OperatingHours::default_for("Disneyland Park"));
        assert!(hours.is_fallback());
    }
}
