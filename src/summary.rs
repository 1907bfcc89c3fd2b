//! Console report for a finished run.

use chrono::Timelike;
use std::fmt;

use crate::analyzers::types::ParkCrowdLevel;
use crate::analyzers::utility::hour_label;
use crate::report::{ReportSet, TimeSlot};

const WIDTH: usize = 90;
const COMPARISON_ROWS: usize = 20;

/// Renders the human-readable summary of `reports`.
pub fn render_summary(reports: &ReportSet) -> String {
    Summary(reports).to_string()
}

/// Display adapter over a [`ReportSet`].
pub struct Summary<'a>(pub &'a ReportSet);

fn truncate(name: &str, max: usize) -> String {
    name.chars().take(max).collect()
}

fn rule(f: &mut fmt::Formatter<'_>, c: char) -> fmt::Result {
    writeln!(f, "{}", c.to_string().repeat(WIDTH))
}

fn heading(f: &mut fmt::Formatter<'_>, title: &str) -> fmt::Result {
    writeln!(f)?;
    rule(f, '=')?;
    writeln!(f, "{title}")?;
    rule(f, '=')
}

fn slots(f: &mut fmt::Formatter<'_>, slots: &[TimeSlot], now_label: &str) -> fmt::Result {
    for slot in slots {
        let marker = if slot.time == now_label { " <-- NOW!" } else { "" };
        writeln!(
            f,
            "    {} - Average {:.0} min{marker}",
            slot.time, slot.average_wait_minutes
        )?;
    }
    Ok(())
}

impl fmt::Display for Summary<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let r = self.0;
        let now_label = hour_label(r.now.hour());

        rule(f, '=')?;
        writeln!(f, "{} REAL-TIME WAIT TIME ANALYSIS", r.hours.park_name.to_uppercase())?;
        writeln!(f, "Live data from Queue-Times.com")?;
        rule(f, '=')?;
        writeln!(f, "Current Time: {}", r.now.format("%A, %B %d, %Y at %I:%M %p"))?;
        writeln!(f, "Analysis Hour: {now_label}")?;

        heading(
            f,
            &format!(
                "ACTUAL vs PREDICTED WAIT TIMES ({} rides currently open)",
                r.park_status.total_rides_open
            ),
        )?;
        writeln!(
            f,
            "{:<6} {:<38} {:<10} {:<12} {:<10} Status",
            "Rank", "Ride", "Actual", "Predicted", "Diff"
        )?;
        rule(f, '-')?;
        for (i, ride) in r.comparison.rides.iter().take(COMPARISON_ROWS).enumerate() {
            writeln!(
                f,
                "{:<6} {:<38} {:>4} min   {:>4.0} min    {:<10} {}",
                i + 1,
                truncate(&ride.name, 36),
                ride.actual_wait_minutes,
                ride.predicted_wait_minutes,
                format!("{:+.0} min", ride.difference_minutes),
                ride.crowd_status.indicator()
            )?;
        }

        heading(f, "BEST OPTIONS RIGHT NOW (Shortest Actual Waits)")?;
        for (i, ride) in r.best_options.rides.iter().enumerate() {
            let predicted = ride
                .predicted_wait_minutes
                .map(|p| format!("{p:.0}"))
                .unwrap_or_else(|| "N/A".to_string());
            writeln!(
                f,
                "{:<3}. {:<50} {:>4} min (Predicted: {predicted})",
                i + 1,
                truncate(&ride.name, 50),
                ride.wait_time_minutes
            )?;
        }

        let park_hours = &r.park_status.park_hours;
        heading(f, "PARK HOURS TODAY")?;
        writeln!(
            f,
            "Operating Hours: {} - {} ({:?})",
            park_hours.open, park_hours.close, park_hours.source
        )?;
        writeln!(
            f,
            "Park Currently: {}",
            if park_hours.is_open_now { "OPEN" } else { "CLOSED" }
        )?;

        heading(f, "POPULAR RIDES - BEST TIME TO VISIT ANALYSIS")?;
        for ride in &r.best_times.rides {
            writeln!(f)?;
            writeln!(f, "{}", ride.name)?;
            rule(f, '-')?;
            if let Some(wait) = ride.current_wait_minutes {
                writeln!(f, "  Current Actual Wait: {wait} minutes")?;
            }
            if let Some(avg) = ride.historical_average_this_hour {
                writeln!(f, "  Historical Average (this hour): {avg:.0} minutes")?;
            }
            writeln!(f, "\n  Best Times to Visit (historically):")?;
            slots(f, &ride.best_times, &now_label)?;
            writeln!(f, "\n  Worst Times to Avoid:")?;
            slots(f, &ride.worst_times, &now_label)?;
        }

        let status = &r.park_status;
        heading(f, "OVERALL PARK ANALYSIS")?;
        if let Some(diff) = status.crowd_difference_minutes {
            writeln!(f, "Average Actual Wait Time: {:.1} minutes", status.average_wait_time_minutes)?;
            writeln!(
                f,
                "Average Historical Wait (this hour): {:.1} minutes",
                status.average_historical_wait_minutes
            )?;
            writeln!(f, "Difference: {diff:+.1} minutes")?;
            match status.crowd_level {
                ParkCrowdLevel::BusierThanTypical => writeln!(
                    f,
                    "\n[!] BUSIER than typical for this time ({:.0} min above average)",
                    diff
                )?,
                ParkCrowdLevel::LighterThanTypical => writeln!(
                    f,
                    "\n[+] LIGHTER than typical for this time ({:.0} min below average)",
                    diff.abs()
                )?,
                ParkCrowdLevel::Normal => writeln!(f, "\n[=] NORMAL crowds")?,
            }
            writeln!(f, "    {}", status.crowd_level.recommendation())?;
        } else {
            writeln!(f, "Not enough data to compare with history")?;
        }

        if status.total_rides_closed > 0 {
            writeln!(f, "\nCurrently Closed: {} attractions", status.total_rides_closed)?;
        }
        rule(f, '=')
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hours::OperatingHours;
    use crate::live::LiveWaitSample;
    use crate::patterns::{PatternStore, RidePatternSet};
    use crate::report::{ReportInputs, assemble};
    use crate::tables::RideTable;
    use chrono::{NaiveDate, Weekday};

    fn reports() -> ReportSet {
        let store = PatternStore::new(vec![
            RidePatternSet::new("Space Mountain")
                .with_hour(9, 20.0)
                .with_hour(14, 60.0)
                .with_hour(22, 15.0)
                .with_month(10, 50.0)
                .with_day(Weekday::Fri, 55.0),
            RidePatternSet::new("Astro Orbitor").with_hour(14, 10.0),
        ]);
        let samples = vec![
            LiveWaitSample::open("Space Mountain", 70),
            LiveWaitSample::open("Jungle Cruise", 35),
            LiveWaitSample::closed("Astro Orbitor"),
        ];
        let hours = OperatingHours::default_for("Disneyland Park");
        let popular = vec!["Space Mountain".to_string()];
        let now = NaiveDate::from_ymd_opt(2025, 10, 17)
            .unwrap()
            .and_hms_opt(14, 20, 0)
            .unwrap();

        assemble(&ReportInputs {
            now,
            samples: &samples,
            store: &store,
            hours: &hours,
            durations: &RideTable::new(),
            heights: &RideTable::new(),
            calendar: None,
            popular_rides: &popular,
        })
    }

    #[test]
    fn test_summary_sections() {
        let text = render_summary(&reports());

        assert!(text.contains("DISNEYLAND PARK REAL-TIME WAIT TIME ANALYSIS"));
        assert!(text.contains("Friday, October 17, 2025 at 02:20 PM"));
        // Jungle Cruise has no history and is not counted
        assert!(text.contains("ACTUAL vs PREDICTED WAIT TIMES (1 rides currently open)"));
        assert!(text.contains("+14 min"));
        assert!(text.contains("BUSY"));
        assert!(text.contains("Operating Hours: 08:00 - 23:00 (Default)"));
        assert!(text.contains("Park Currently: OPEN"));
        assert!(text.contains("Currently Closed: 1 attractions"));
    }

    #[test]
    fn test_now_marker_on_current_hour() {
        let text = render_summary(&reports());

        assert!(text.contains("14:00 - Average 60 min <-- NOW!"));
        assert!(text.contains("22:00 - Average 15 min\n"));
    }

    #[test]
    fn test_rides_without_prediction_show_na() {
        let text = render_summary(&reports());
        let line = text
            .lines()
            .find(|l| l.contains("Jungle Cruise") && l.contains("Predicted:"))
            .unwrap();

        assert!(line.ends_with("(Predicted: N/A)"));
    }
}
