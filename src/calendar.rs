//! Park calendar document written by the collector: per-park hours,
//! entertainment times, special events and closures for one day.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::Path;

use crate::error::AnalyzerError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarHours {
    pub open: String,
    pub close: String,
}

impl CalendarHours {
    pub fn times(&self) -> Option<(NaiveTime, NaiveTime)> {
        let open = NaiveTime::parse_from_str(self.open.trim(), "%H:%M").ok()?;
        let close = NaiveTime::parse_from_str(self.close.trim(), "%H:%M").ok()?;
        Some((open, close))
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ParkCalendar {
    #[serde(default)]
    pub hours: Option<CalendarHours>,
    #[serde(default)]
    pub parades: Option<Vec<Value>>,
    #[serde(default)]
    pub nighttime: Vec<Value>,
    #[serde(default)]
    pub events: Option<Vec<Value>>,
    #[serde(default)]
    pub closed_attractions: Vec<Value>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CalendarDocument {
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub parks: BTreeMap<String, ParkCalendar>,
    #[serde(default)]
    pub character_meet_and_greets: Vec<Value>,
    /// Set by the collector when it fell back to placeholder values.
    #[serde(default)]
    pub error: Option<String>,
}

impl CalendarDocument {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Loads the document if present. `Ok(None)` when the file does not exist.
    pub fn load(path: impl AsRef<Path>) -> Result<Option<Self>, AnalyzerError> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(path).map_err(|source| AnalyzerError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        Self::from_json(&content)
            .map(Some)
            .map_err(|source| AnalyzerError::InvalidDocument {
                path: path.to_path_buf(),
                source,
            })
    }

    pub fn is_for(&self, date: NaiveDate) -> bool {
        self.date
            .as_deref()
            .and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok())
            == Some(date)
    }

    /// Published hours for `park_name` on `date`. Placeholder documents and
    /// documents for another day yield nothing.
    pub fn hours_for(&self, park_name: &str, date: NaiveDate) -> Option<(NaiveTime, NaiveTime)> {
        if self.error.is_some() || !self.is_for(date) {
            return None;
        }
        self.parks.get(park_name)?.hours.as_ref()?.times()
    }
}
