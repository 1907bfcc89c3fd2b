//! Historical pattern analysis.
//!
//! Predicts a ride's wait for the current moment from its hour, weekday and
//! month aggregates, labels how a live wait compares with that prediction,
//! and finds the quietest and busiest hours inside operating hours. Nothing
//! in here performs I/O.

pub mod best_times;
pub mod classify;
pub mod predictor;
pub mod types;
pub mod utility;
