use crate::analyzers::types::{BestWorstResult, HourlyWait};
use crate::hours::OperatingHours;
use crate::patterns::RidePatternSet;

/// Scans a ride's hour-of-day averages that fall inside operating hours and
/// picks the quietest and busiest hour.
///
/// Ties go to the earliest hour. A ride with no data inside the window gets
/// an empty result.
pub fn analyze(patterns: &RidePatternSet, hours: &OperatingHours) -> BestWorstResult {
    let in_window: Vec<HourlyWait> = patterns
        .hourly
        .iter()
        .filter(|(hour, _)| hours.contains_hour(**hour))
        .map(|(&hour, stat)| HourlyWait {
            hour,
            avg_wait: stat.avg,
            max_wait: stat.max,
        })
        .collect();

    let mut best: Option<HourlyWait> = None;
    let mut worst: Option<HourlyWait> = None;

    // BTreeMap order, so the first hour seen wins a tie
    for entry in &in_window {
        if best.is_none_or(|b| entry.avg_wait < b.avg_wait) {
            best = Some(*entry);
        }
        if worst.is_none_or(|w| entry.avg_wait > w.avg_wait) {
            worst = Some(*entry);
        }
    }

    BestWorstResult {
        ride_name: patterns.ride_name.clone(),
        hours: in_window,
        best,
        worst,
    }
}
