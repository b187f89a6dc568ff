// The StatsFetcher seam shared by the HTTP client and the snapshot reader.

use async_trait::async_trait;
use hoopscore_core::config::{DateRange, Season};
use hoopscore_core::dataset::{Dataset, DatasetError};
use std::fmt;

/// Normalization mode of a stats dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PerMode {
    PerGame,
    Per36,
}

impl PerMode {
    /// Value of the service's `PerMode` query parameter.
    pub fn as_str(&self) -> &'static str {
        match self {
            PerMode::PerGame => "PerGame",
            PerMode::Per36 => "Per36",
        }
    }
}

impl fmt::Display for PerMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One dataset request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchRequest {
    pub mode: PerMode,
    pub season: Season,
    pub date_range: DateRange,
}

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("failed to build HTTP client: {0}")]
    Client(reqwest::Error),

    #[error("request for {mode} stats failed: {source}")]
    Http {
        mode: PerMode,
        source: reqwest::Error,
    },

    #[error("stats service returned {status} for {mode} stats")]
    Status {
        mode: PerMode,
        status: reqwest::StatusCode,
    },

    #[error("malformed {mode} response: {source}")]
    Decode {
        mode: PerMode,
        source: serde_json::Error,
    },

    #[error("{mode} response contains no result set")]
    MissingResultSet { mode: PerMode },

    #[error("{mode} dataset is malformed: {source}")]
    Shape {
        mode: PerMode,
        source: DatasetError,
    },

    #[error("failed to read snapshot {path}: {source}")]
    SnapshotIo {
        path: String,
        source: std::io::Error,
    },

    #[error("CSV error in snapshot {path}: {source}")]
    SnapshotCsv { path: String, source: csv::Error },
}

/// Source of per-mode player datasets.
#[async_trait]
pub trait StatsFetcher: Send + Sync {
    async fn fetch(&self, request: &FetchRequest) -> Result<Dataset, FetchError>;
}
