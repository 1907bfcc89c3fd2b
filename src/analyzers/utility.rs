/// Computes the arithmetic mean of a slice of values. Returns `None` for empty input.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Rounds to one decimal place on the exact binary value, ties to even
/// (`56.25` becomes `56.2`, `10.05` becomes `10.1`).
pub fn round1(value: f64) -> f64 {
    format!("{value:.1}").parse().unwrap_or(value)
}

/// Formats an hour of day as `"HH:00"`.
pub fn hour_label(hour: u32) -> String {
    format!("{:02}:00", hour % 24)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mean_empty() {
        assert_eq!(mean(&[]), None);
    }

    #[test]
    fn test_mean_values() {
        assert_eq!(mean(&[60.0, 60.0, 50.0, 55.0]), Some(56.25));
    }

    #[test]
    fn test_round1_ties_to_even() {
        assert_eq!(round1(56.25), 56.2);
        assert_eq!(round1(13.799999999999997), 13.8);
        assert_eq!(round1(-3.25), -3.2);
    }

    #[test]
    fn test_round1_near_ties_follow_stored_value() {
        // 10.05 and 41.45 are stored slightly above the half step, 0.35 and 1.15 below
        assert_eq!(round1(10.05), 10.1);
        assert_eq!(round1(41.45), 41.5);
        assert_eq!(round1(0.35), 0.3);
        assert_eq!(round1(1.15), 1.1);
    }

    #[test]
    fn test_hour_label() {
        assert_eq!(hour_label(9), "09:00");
        assert_eq!(hour_label(24), "00:00");
    }
}
