//! Parsers for the live queue-times documents.

use anyhow::Result;
use chrono::{DateTime, NaiveTime, Utc};
use serde::Deserialize;

use crate::live::{LiveWaitSample, RideStatus};

#[derive(Deserialize)]
struct QueueTimesResponse {
    #[serde(default)]
    lands: Vec<Land>,
    #[serde(default)]
    rides: Vec<RawRide>,
}

#[derive(Deserialize)]
struct Land {
    #[serde(default)]
    rides: Vec<RawRide>,
}

#[derive(Deserialize)]
struct RawRide {
    #[serde(default)]
    id: Option<u64>,
    name: String,
    #[serde(default)]
    is_open: bool,
    #[serde(default)]
    wait_time: Option<u32>,
    #[serde(default)]
    last_updated: Option<String>,
}

impl From<RawRide> for LiveWaitSample {
    fn from(ride: RawRide) -> Self {
        LiveWaitSample {
            ride_id: ride.id,
            ride_name: ride.name,
            wait_minutes: ride.wait_time,
            status: if ride.is_open {
                RideStatus::Open
            } else {
                RideStatus::Closed
            },
            last_updated: ride
                .last_updated
                .as_deref()
                .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
                .map(|t| t.with_timezone(&Utc)),
        }
    }
}

/// Decodes a `queue_times.json` body into one sample per ride.
///
/// Rides grouped under lands come first, followed by any top-level rides.
///
/// # Errors
///
/// Returns an error if the body is not a valid queue-times document.
pub fn parse_queue_times(bytes: &[u8]) -> Result<Vec<LiveWaitSample>> {
    let response: QueueTimesResponse = serde_json::from_slice(bytes)?;

    let samples = response
        .lands
        .into_iter()
        .flat_map(|land| land.rides)
        .chain(response.rides)
        .map(LiveWaitSample::from)
        .collect();

    Ok(samples)
}

/// Finds the first `HH:MM-HH:MM` pair in a calendar page and returns it as
/// open and close times. `24:00` is read as midnight.
pub fn parse_hours_text(text: &str) -> Option<(NaiveTime, NaiveTime)> {
    let bytes = text.as_bytes();
    const LEN: usize = "00:00-00:00".len();

    if bytes.len() < LEN {
        return None;
    }

    (0..=bytes.len() - LEN).find_map(|start| {
        let window = &bytes[start..start + LEN];
        if window[5] != b'-' {
            return None;
        }
        let open = parse_clock(&window[..5])?;
        let close = parse_clock(&window[6..])?;
        Some((open, close))
    })
}

fn parse_clock(bytes: &[u8]) -> Option<NaiveTime> {
    let digits = [bytes[0], bytes[1], bytes[3], bytes[4]];
    if bytes[2] != b':' || !digits.iter().all(u8::is_ascii_digit) {
        return None;
    }
    let hour = u32::from((digits[0] - b'0') * 10 + (digits[1] - b'0'));
    let minute = u32::from((digits[2] - b'0') * 10 + (digits[3] - b'0'));

    match hour {
        24 if minute == 0 => NaiveTime::from_hms_opt(0, 0, 0),
        _ => NaiveTime::from_hms_opt(hour, minute, 0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_lands_and_top_level_rides() {
        let body = br#"{
          "lands": [
            {"id": 1, "name": "Tomorrowland", "rides": [
              {"id": 284, "name": "Space Mountain", "is_open": true, "wait_time": 70,
               "last_updated": "2025-10-17T21:04:15.000Z"},
              {"id": 285, "name": "Astro Orbitor", "is_open": false, "wait_time": 0,
               "last_updated": "2025-10-17T21:04:15.000Z"}
            ]}
          ],
          "rides": [
            {"id": 400, "name": "Disneyland Railroad", "is_open": true, "wait_time": 5}
          ]
        }"#;

        let samples = parse_queue_times(body).unwrap();

        assert_eq!(samples.len(), 3);
        assert_eq!(samples[0].ride_name, "Space Mountain");
        assert_eq!(samples[0].open_wait(), Some(70));
        assert!(samples[0].last_updated.is_some());
        assert_eq!(samples[1].status, RideStatus::Closed);
        assert_eq!(samples[1].open_wait(), None);
        assert_eq!(samples[2].ride_id, Some(400));
        assert!(samples[2].last_updated.is_none());
    }

    #[test]
    fn test_parse_missing_fields_default() {
        let body = br#"{"lands": [{"rides": [{"name": "Fantasmic!", "wait_time": null}]}]}"#;
        let samples = parse_queue_times(body).unwrap();

        assert_eq!(samples[0].status, RideStatus::Closed);
        assert_eq!(samples[0].wait_minutes, None);
    }

    #[test]
    fn test_parse_invalid_body() {
        assert!(parse_queue_times(b"<html>Service Unavailable</html>").is_err());
    }

    #[test]
    fn test_parse_hours_text() {
        let page = "<td>Opening hours</td><td>08:00-00:00</td><td>Extra 07:30-08:00</td>";
        let (open, close) = parse_hours_text(page).unwrap();

        assert_eq!(open, NaiveTime::from_hms_opt(8, 0, 0).unwrap());
        assert_eq!(close, NaiveTime::from_hms_opt(0, 0, 0).unwrap());
    }

    #[test]
    fn test_parse_hours_text_twenty_four() {
        let (_, close) = parse_hours_text("09:00-24:00").unwrap();
        assert_eq!(close, NaiveTime::from_hms_opt(0, 0, 0).unwrap());
    }

    #[test]
    fn test_parse_hours_text_absent() {
        assert!(parse_hours_text("Park closed for a private event").is_none());
        assert!(parse_hours_text("").is_none());
        assert!(parse_hours_text("99:00-10:00 then 10:00-21:00").is_some());
    }
}
