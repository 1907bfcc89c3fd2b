//! Historical pattern store.
//!
//! The collector writes one document per ride with string-keyed tables
//! (`"14:00"`, `"Friday"`, `"Oct"`, `"2024"`). They are converted here into
//! typed tables once so the analyzers never deal with key formats. A slot
//! that is missing or carries no usable number stays absent.

use chrono::{Month, Weekday};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use tracing::debug;

use crate::error::AnalyzerError;

/// Average (and, when the source had one, peak) wait for one slot.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SlotStat {
    pub avg: f64,
    pub max: Option<f64>,
}

/// Historical aggregates for a single ride.
#[derive(Debug, Clone, Default)]
pub struct RidePatternSet {
    pub ride_id: Option<u64>,
    pub ride_name: String,
    pub hourly: BTreeMap<u32, SlotStat>,
    pub daily: HashMap<Weekday, SlotStat>,
    pub monthly: BTreeMap<u32, f64>,
    pub yearly: BTreeMap<i32, f64>,
}

impl RidePatternSet {
    pub fn new(ride_name: impl Into<String>) -> Self {
        Self {
            ride_name: ride_name.into(),
            ..Default::default()
        }
    }

    pub fn with_hour(mut self, hour: u32, avg: f64) -> Self {
        self.hourly.insert(hour, SlotStat { avg, max: None });
        self
    }

    pub fn with_day(mut self, day: Weekday, avg: f64) -> Self {
        self.daily.insert(day, SlotStat { avg, max: None });
        self
    }

    pub fn with_month(mut self, month: u32, value: f64) -> Self {
        self.monthly.insert(month, value);
        self
    }

    pub fn with_year(mut self, year: i32, value: f64) -> Self {
        self.yearly.insert(year, value);
        self
    }

    pub fn hourly_avg(&self, hour: u32) -> Option<f64> {
        self.hourly.get(&hour).map(|s| s.avg)
    }

    pub fn daily_avg(&self, day: Weekday) -> Option<f64> {
        self.daily.get(&day).map(|s| s.avg)
    }

    pub fn monthly_value(&self, month: u32) -> Option<f64> {
        self.monthly.get(&month).copied()
    }
}

/// All rides' patterns, in document order.
#[derive(Debug, Default)]
pub struct PatternStore {
    rides: Vec<RidePatternSet>,
    index: HashMap<String, usize>,
}

impl PatternStore {
    pub fn new(rides: Vec<RidePatternSet>) -> Self {
        let mut store = PatternStore::default();
        for ride in rides {
            store.insert(ride);
        }
        store
    }

    fn insert(&mut self, ride: RidePatternSet) {
        match self.index.get(&ride.ride_name) {
            Some(&i) => self.rides[i] = ride,
            None => {
                self.index.insert(ride.ride_name.clone(), self.rides.len());
                self.rides.push(ride);
            }
        }
    }

    /// Parses a store document: either an array of ride documents or an
    /// object keyed by ride name.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let raw: RawStore = serde_json::from_str(json)?;
        let docs: Vec<RawRideDocument> = match raw {
            RawStore::List(docs) => docs.into_iter().flatten().collect(),
            RawStore::ByName(map) => map
                .into_iter()
                .map(|(name, mut doc)| {
                    if doc.ride_name.is_empty() {
                        doc.ride_name = name;
                    }
                    doc
                })
                .collect(),
        };

        let rides = docs
            .into_iter()
            .filter(|d| !d.ride_name.is_empty())
            .map(RidePatternSet::from)
            .collect();

        Ok(Self::new(rides))
    }

    /// Loads the store from disk. A missing file is reported as
    /// [`AnalyzerError::MissingInputFile`].
    pub fn load(path: impl AsRef<Path>) -> Result<Self, AnalyzerError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(AnalyzerError::MissingInputFile {
                path: path.to_path_buf(),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|source| AnalyzerError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let store = Self::from_json(&content).map_err(|source| AnalyzerError::InvalidDocument {
            path: path.to_path_buf(),
            source,
        })?;

        debug!(path = %path.display(), rides = store.len(), "Pattern store loaded");
        Ok(store)
    }

    pub fn get(&self, ride_name: &str) -> Option<&RidePatternSet> {
        self.index.get(ride_name).map(|&i| &self.rides[i])
    }

    pub fn iter(&self) -> impl Iterator<Item = &RidePatternSet> {
        self.rides.iter()
    }

    pub fn len(&self) -> usize {
        self.rides.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rides.is_empty()
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawStore {
    List(Vec<Option<RawRideDocument>>),
    ByName(BTreeMap<String, RawRideDocument>),
}

#[derive(Deserialize)]
struct RawRideDocument {
    #[serde(default)]
    ride_id: Option<u64>,
    #[serde(default)]
    ride_name: String,
    #[serde(default)]
    by_time_of_day: HashMap<String, Value>,
    #[serde(default)]
    by_day_of_week: HashMap<String, Value>,
    #[serde(default)]
    by_month: HashMap<String, Value>,
    #[serde(default)]
    by_year: HashMap<String, Value>,
}

impl From<RawRideDocument> for RidePatternSet {
    fn from(doc: RawRideDocument) -> Self {
        let mut set = RidePatternSet::new(doc.ride_name);
        set.ride_id = doc.ride_id;

        for (key, value) in &doc.by_time_of_day {
            if let (Some(hour), Some(stat)) = (parse_hour_key(key), slot_stat(value)) {
                set.hourly.insert(hour, stat);
            }
        }

        for (key, value) in &doc.by_day_of_week {
            if let (Ok(day), Some(stat)) = (key.trim().parse::<Weekday>(), slot_stat(value)) {
                set.daily.insert(day, stat);
            }
        }

        for (key, value) in &doc.by_month {
            if let (Ok(month), Some(v)) = (key.trim().parse::<Month>(), primary_value(value)) {
                set.monthly.insert(month.number_from_month(), v);
            }
        }

        for (key, value) in &doc.by_year {
            if let (Ok(year), Some(v)) = (key.trim().parse::<i32>(), primary_value(value)) {
                set.yearly.insert(year, v);
            }
        }

        set
    }
}

/// `"14:00"` or `"14"` to `14`; anything outside 0..=23 is rejected.
fn parse_hour_key(key: &str) -> Option<u32> {
    let hour = key.trim().split(':').next()?.parse::<u32>().ok()?;
    (hour < 24).then_some(hour)
}

fn slot_stat(value: &Value) -> Option<SlotStat> {
    let avg = value.get("avg")?.as_f64()?;
    let max = value.get("max").and_then(Value::as_f64);
    Some(SlotStat { avg, max })
}

/// Monthly and yearly rows are either a bare number or `{ "value_1": .. }`.
fn primary_value(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::Object(map) => map.get("value_1").and_then(Value::as_f64),
        _ => None,
    }
}
