use crate::analyzers::types::{CrowdComparison, CrowdStatus, ParkCrowdLevel};

/// Minutes a ride may drift from its prediction and still count as normal.
pub const RIDE_THRESHOLD_MINUTES: f64 = 10.0;

/// Same idea for the park-wide means.
pub const PARK_THRESHOLD_MINUTES: f64 = 5.0;

/// Labels a deviation from the prediction.
///
/// | Difference  | Status               |
/// |-------------|----------------------|
/// | > 10        | BUSIER_THAN_USUAL    |
/// | < -10       | LIGHTER_THAN_USUAL   |
/// | otherwise   | NORMAL               |
pub fn crowd_status(difference: f64) -> CrowdStatus {
    match difference {
        d if d > RIDE_THRESHOLD_MINUTES => CrowdStatus::BusierThanUsual,
        d if d < -RIDE_THRESHOLD_MINUTES => CrowdStatus::LighterThanUsual,
        _ => CrowdStatus::Normal,
    }
}

/// Compares a live wait with its prediction.
pub fn classify(ride_name: &str, actual_minutes: f64, predicted_minutes: f64) -> CrowdComparison {
    let difference = actual_minutes - predicted_minutes;

    CrowdComparison {
        ride_name: ride_name.to_string(),
        actual_minutes,
        predicted_minutes,
        difference,
        status: crowd_status(difference),
    }
}

/// Park-wide verdict from the difference between mean actual and mean
/// historical waits.
pub fn park_crowd_level(difference: f64) -> ParkCrowdLevel {
    match difference {
        d if d > PARK_THRESHOLD_MINUTES => ParkCrowdLevel::BusierThanTypical,
        d if d < -PARK_THRESHOLD_MINUTES => ParkCrowdLevel::LighterThanTypical,
        _ => ParkCrowdLevel::Normal,
    }
}
