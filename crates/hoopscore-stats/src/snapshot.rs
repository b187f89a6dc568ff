// Offline source: raw per-mode CSV snapshots written by `--save-raw`.

use async_trait::async_trait;
use hoopscore_core::dataset::{parse_cell, Dataset};
use hoopscore_core::output::{PER_36_SNAPSHOT, PER_GAME_SNAPSHOT};
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::fetcher::{FetchError, FetchRequest, PerMode, StatsFetcher};

/// Reads `pergame.csv` / `per36.csv` from a directory. The season and date
/// range of the request are not checked against the snapshot contents.
pub struct SnapshotFetcher {
    dir: PathBuf,
}

impl SnapshotFetcher {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path_for(&self, mode: PerMode) -> PathBuf {
        let file = match mode {
            PerMode::PerGame => PER_GAME_SNAPSHOT,
            PerMode::Per36 => PER_36_SNAPSHOT,
        };
        self.dir.join(file)
    }
}

fn load_dataset_from_reader<R: Read>(rdr: R) -> Result<(Vec<String>, Vec<Vec<serde_json::Value>>), csv::Error> {
    let mut reader = csv::Reader::from_reader(rdr);
    let headers = reader.headers()?.iter().map(|h| h.trim().to_string()).collect();
    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        rows.push(record.iter().map(parse_cell).collect());
    }
    Ok((headers, rows))
}

fn snapshot_error(path: &Path, source: csv::Error) -> FetchError {
    FetchError::SnapshotCsv {
        path: path.display().to_string(),
        source,
    }
}

#[async_trait]
impl StatsFetcher for SnapshotFetcher {
    async fn fetch(&self, request: &FetchRequest) -> Result<Dataset, FetchError> {
        let mode = request.mode;
        let path = self.path_for(mode);
        debug!("reading {mode} snapshot from {}", path.display());

        let bytes = tokio::fs::read(&path)
            .await
            .map_err(|e| FetchError::SnapshotIo {
                path: path.display().to_string(),
                source: e,
            })?;
        let (headers, rows) =
            load_dataset_from_reader(bytes.as_slice()).map_err(|e| snapshot_error(&path, e))?;
        let dataset =
            Dataset::new(headers, rows).map_err(|e| FetchError::Shape { mode, source: e })?;
        info!("Loaded {} {mode} rows from {}", dataset.len(), path.display());
        Ok(dataset)
    }
}
