use chrono::{NaiveDateTime, Timelike};
use serde::Serialize;

use crate::analyzers::classify::park_crowd_level;
use crate::analyzers::types::ParkCrowdLevel;
use crate::analyzers::utility::{mean, round1};
use crate::hours::{HoursSource, OperatingHours};
use crate::report::{RideRow, format_timestamp};

/// Today's hours as they appear in the status document.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParkHoursRecord {
    pub opening: u32,
    pub closing: u32,
    pub open: String,
    pub close: String,
    pub source: HoursSource,
    pub is_open_now: bool,
}

impl ParkHoursRecord {
    pub fn new(hours: &OperatingHours, now: NaiveDateTime) -> Self {
        Self {
            opening: hours.open_hour(),
            closing: hours.close_hour(),
            open: hours.open_label(),
            close: hours.close_label(),
            source: hours.source,
            is_open_now: hours.contains_hour(now.hour()),
        }
    }
}

/// Park-wide snapshot over the rides that have a prediction: ride counts,
/// mean actual vs historical waits and the overall crowd verdict.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParkStatus {
    pub timestamp: String,
    pub day_of_week: String,
    pub park_name: String,
    pub park_hours: ParkHoursRecord,
    pub total_rides_open: usize,
    pub total_rides_closed: usize,
    pub average_wait_time_minutes: f64,
    pub average_historical_wait_minutes: f64,
    pub crowd_level: ParkCrowdLevel,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub crowd_difference_minutes: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recommendation: Option<&'static str>,
}

impl ParkStatus {
    pub fn from_rides(rows: &[RideRow], hours: &OperatingHours, now: NaiveDateTime) -> Self {
        let mut s = ParkStatus {
            timestamp: format_timestamp(now),
            day_of_week: now.format("%A").to_string(),
            park_name: hours.park_name.clone(),
            park_hours: ParkHoursRecord::new(hours, now),
            total_rides_open: 0,
            total_rides_closed: 0,
            average_wait_time_minutes: 0.0,
            average_historical_wait_minutes: 0.0,
            crowd_level: ParkCrowdLevel::Normal,
            crowd_difference_minutes: None,
            recommendation: None,
        };

        let mut actual = Vec::new();
        let mut historical = Vec::new();

        // rides without history count nowhere: not in the totals, not in either mean
        for row in rows {
            let Some(prediction) = &row.prediction else {
                continue;
            };

            if !row.sample.is_open() {
                s.total_rides_closed += 1;
                continue;
            }

            let Some(wait) = row.sample.wait_minutes else {
                continue;
            };
            s.total_rides_open += 1;
            historical.push(prediction.predicted_minutes);

            // 0 means no posted standby wait
            if wait > 0 {
                actual.push(f64::from(wait));
            }
        }

        let avg_actual = mean(&actual).map(round1);
        let avg_historical = mean(&historical).map(round1);

        s.average_wait_time_minutes = avg_actual.unwrap_or(0.0);
        s.average_historical_wait_minutes = avg_historical.unwrap_or(0.0);

        if let (Some(a), Some(h)) = (avg_actual, avg_historical) {
            let difference = round1(a - h);
            s.crowd_level = park_crowd_level(difference);
            s.crowd_difference_minutes = Some(difference);
            s.recommendation = Some(s.crowd_level.recommendation());
        }

        s
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzers::types::PredictionResult;
    use crate::live::LiveWaitSample;
    use chrono::{NaiveDate, NaiveTime, Weekday};

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 10, 17)
            .unwrap()
            .and_hms_opt(14, 5, 0)
            .unwrap()
    }

    fn row(sample: LiveWaitSample, predicted: Option<f64>) -> RideRow {
        let prediction = predicted.map(|p| PredictionResult {
            ride_name: sample.ride_name.clone(),
            predicted_minutes: p,
            at: now(),
            hour: 14,
            day_of_week: Weekday::Fri,
            month: 10,
            samples: 4,
        });
        RideRow {
            sample,
            prediction,
            comparison: None,
        }
    }

    #[test]
    fn test_counts_and_means() {
        let rows = vec![
            row(LiveWaitSample::open("Space Mountain", 70), Some(50.0)),
            row(LiveWaitSample::open("Autopia", 30), Some(30.0)),
            row(LiveWaitSample::open("Mark Twain Riverboat", 0), None),
            row(LiveWaitSample::closed("Astro Orbitor"), Some(10.0)),
        ];
        let hours = OperatingHours::default_for("Disneyland Park");

        let status = ParkStatus::from_rides(&rows, &hours, now());

        // Mark Twain Riverboat has no history
        assert_eq!(status.total_rides_open, 2);
        assert_eq!(status.total_rides_closed, 1);
        assert_eq!(status.average_wait_time_minutes, 50.0);
        assert_eq!(status.average_historical_wait_minutes, 40.0);
        assert_eq!(status.crowd_difference_minutes, Some(10.0));
        assert_eq!(status.crowd_level, ParkCrowdLevel::BusierThanTypical);
        assert_eq!(status.day_of_week, "Friday");
        assert!(status.park_hours.is_open_now);
    }

    #[test]
    fn test_rides_without_history_do_not_skew_verdict() {
        let rows = vec![
            row(LiveWaitSample::open("Space Mountain", 70), Some(70.0)),
            row(LiveWaitSample::open("Jungle Cruise", 10), None),
            row(LiveWaitSample::closed("Astro Orbitor"), None),
        ];
        let hours = OperatingHours::default_for("Disneyland Park");

        let status = ParkStatus::from_rides(&rows, &hours, now());

        assert_eq!(status.total_rides_open, 1);
        assert_eq!(status.total_rides_closed, 0);
        assert_eq!(status.average_wait_time_minutes, 70.0);
        assert_eq!(status.average_historical_wait_minutes, 70.0);
        assert_eq!(status.crowd_difference_minutes, Some(0.0));
        assert_eq!(status.crowd_level, ParkCrowdLevel::Normal);
    }

    #[test]
    fn test_no_open_rides_is_normal_without_difference() {
        let rows = vec![row(LiveWaitSample::closed("Astro Orbitor"), Some(10.0))];
        let hours = OperatingHours::default_for("Disneyland Park");

        let status = ParkStatus::from_rides(&rows, &hours, now());

        assert_eq!(status.crowd_level, ParkCrowdLevel::Normal);
        assert_eq!(status.crowd_difference_minutes, None);
        assert_eq!(status.recommendation, None);
        assert_eq!(status.average_wait_time_minutes, 0.0);
    }

    #[test]
    fn test_hours_record_midnight_close() {
        let hours = OperatingHours::default_for("Disneyland Park").with_times(
            NaiveTime::from_hms_opt(8, 0, 0).unwrap(),
            NaiveTime::from_hms_opt(0, 0, 0).unwrap(),
        );

        let record = ParkHoursRecord::new(&hours, now());

        assert_eq!(record.opening, 8);
        assert_eq!(record.closing, 24);
        assert_eq!(record.close, "00:00");
        assert_eq!(record.source, HoursSource::Default);
    }
}
