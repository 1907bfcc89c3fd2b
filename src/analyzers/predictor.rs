use chrono::{Datelike, NaiveDateTime, Timelike};

use crate::analyzers::types::{PredictError, PredictionResult};
use crate::analyzers::utility::{mean, round1};
use crate::patterns::RidePatternSet;

/// Predicts the wait for `now` from a ride's historical patterns.
///
/// The blend is a plain mean over the values that exist for this moment:
/// the hour-of-day average twice, the month value once and the day-of-week
/// average once, so time of day carries half the weight when every slot is
/// present. Missing slots are skipped rather than counted as zero. The
/// yearly table does not take part.
///
/// # Errors
///
/// Returns [`PredictError::NoHistoricalData`] when none of the three slots
/// has a value.
pub fn predict(
    patterns: &RidePatternSet,
    now: NaiveDateTime,
) -> Result<PredictionResult, PredictError> {
    let hour = now.hour();
    let day_of_week = now.weekday();
    let month = now.month();

    let mut samples = Vec::with_capacity(4);

    if let Some(avg) = patterns.hourly_avg(hour) {
        samples.push(avg);
        samples.push(avg);
    }

    if let Some(value) = patterns.monthly_value(month) {
        samples.push(value);
    }

    if let Some(avg) = patterns.daily_avg(day_of_week) {
        samples.push(avg);
    }

    let predicted = mean(&samples).ok_or_else(|| PredictError::NoHistoricalData {
        ride: patterns.ride_name.clone(),
    })?;

    Ok(PredictionResult {
        ride_name: patterns.ride_name.clone(),
        predicted_minutes: round1(predicted),
        at: now,
        hour,
        day_of_week,
        month,
        samples: samples.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Weekday};

    // 2025-10-17 is a Friday
    fn friday_at(hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 10, 17)
            .unwrap()
            .and_hms_opt(hour, 30, 0)
            .unwrap()
    }

    fn full_set() -> RidePatternSet {
        RidePatternSet::new("Space Mountain")
            .with_hour(14, 60.0)
            .with_month(10, 50.0)
            .with_day(Weekday::Fri, 55.0)
    }

    #[test]
    fn test_blend_with_all_components() {
        let result = predict(&full_set(), friday_at(14)).unwrap();

        assert_eq!(result.predicted_minutes, 56.2);
        assert_eq!(result.samples, 4);
        assert_eq!(result.hour, 14);
        assert_eq!(result.month, 10);
        assert_eq!(result.day_of_week, Weekday::Fri);
    }

    #[test]
    fn test_blend_rounds_mean_just_above_half_step() {
        let set = RidePatternSet::new("Jungle Cruise")
            .with_hour(14, 10.1)
            .with_month(10, 10.0)
            .with_day(Weekday::Fri, 10.0);

        // mean of [10.1, 10.1, 10.0, 10.0] is stored as 10.0500000000000007
        let result = predict(&set, friday_at(14)).unwrap();
        assert_eq!(result.predicted_minutes, 10.1);
    }

    #[test]
    fn test_missing_month_uses_remaining_values() {
        let set = RidePatternSet::new("Autopia")
            .with_hour(14, 30.0)
            .with_day(Weekday::Fri, 45.0);

        let result = predict(&set, friday_at(14)).unwrap();

        // mean([30, 30, 45])
        assert_eq!(result.predicted_minutes, 35.0);
        assert_eq!(result.samples, 3);
    }

    #[test]
    fn test_missing_hour_uses_month_and_day() {
        let set = full_set();
        let result = predict(&set, friday_at(9)).unwrap();

        // mean([50, 55])
        assert_eq!(result.predicted_minutes, 52.5);
        assert_eq!(result.samples, 2);
    }

    #[test]
    fn test_missing_day_of_week() {
        let set = RidePatternSet::new("Dumbo the Flying Elephant")
            .with_hour(14, 20.0)
            .with_month(10, 35.0)
            .with_day(Weekday::Sat, 90.0);

        let result = predict(&set, friday_at(14)).unwrap();

        // mean([20, 20, 35])
        assert_eq!(result.predicted_minutes, 25.0);
    }

    #[test]
    fn test_no_components_is_no_historical_data() {
        let set = RidePatternSet::new("Mark Twain Riverboat")
            .with_hour(10, 5.0)
            .with_year(2024, 8.0);

        let err = predict(&set, friday_at(14)).unwrap_err();
        assert_eq!(
            err,
            PredictError::NoHistoricalData {
                ride: "Mark Twain Riverboat".to_string()
            }
        );
    }

    #[test]
    fn test_prediction_is_deterministic() {
        let set = full_set();
        let a = predict(&set, friday_at(14)).unwrap();
        let b = predict(&set, friday_at(14)).unwrap();
        assert_eq!(a, b);
    }
}
