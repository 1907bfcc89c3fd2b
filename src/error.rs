//! Error types shared by the analyzer pipeline.

use std::path::PathBuf;
use thiserror::Error;

use crate::analyzers::types::PredictError;

/// Failures the orchestration layer has to decide about.
///
/// Pure analysis code never produces I/O variants; those come from loading
/// documents and fetching live data.
#[derive(Debug, Error)]
pub enum AnalyzerError {
    #[error("no historical data for ride '{ride}'")]
    NoHistoricalData { ride: String },

    #[error("required input file not found: {}", path.display())]
    MissingInputFile { path: PathBuf },

    #[error("failed to fetch {what}: {source}")]
    LiveFetch {
        what: &'static str,
        #[source]
        source: anyhow::Error,
    },

    #[error("invalid document {}: {source}", path.display())]
    InvalidDocument {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl AnalyzerError {
    pub fn live_fetch(what: &'static str, source: impl Into<anyhow::Error>) -> Self {
        Self::LiveFetch {
            what,
            source: source.into(),
        }
    }
}

impl From<PredictError> for AnalyzerError {
    fn from(e: PredictError) -> Self {
        match e {
            PredictError::NoHistoricalData { ride } => AnalyzerError::NoHistoricalData { ride },
        }
    }
}
