// CSV output: the ranking file and raw dataset snapshots.

use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};

use crate::config::RankingConfig;
use crate::dataset::{cell_text, Dataset};
use crate::valuation::merge::MergedRow;

/// File names used for raw per-mode snapshots.
pub const PER_GAME_SNAPSHOT: &str = "pergame.csv";
pub const PER_36_SNAPSHOT: &str = "per36.csv";

#[derive(Debug, Error)]
pub enum OutputError {
    #[error("failed to write file {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("CSV error in {path}: {source}")]
    Csv { path: String, source: csv::Error },
}

/// `overall_{season}_{COL1-COL2-...}[_{from}][_{to}].csv`
pub fn output_file_name(config: &RankingConfig) -> String {
    let mut name = format!(
        "overall_{}_{}",
        config.season.id(),
        config.column_names().join("-")
    );
    if let Some(from) = config.date_range.from {
        name.push('_');
        name.push_str(&from.format("%Y-%m-%d").to_string());
    }
    if let Some(to) = config.date_range.to {
        name.push('_');
        name.push_str(&to.format("%Y-%m-%d").to_string());
    }
    name.push_str(".csv");
    name
}

/// Full output path inside `dir`.
pub fn output_path(dir: &Path, config: &RankingConfig) -> PathBuf {
    dir.join(output_file_name(config))
}

// ---------------------------------------------------------------------------
// Writer-based serializers (private, testable without files)
// ---------------------------------------------------------------------------

fn write_ranking_to<W: std::io::Write>(wtr: W, rows: &[MergedRow]) -> Result<(), csv::Error> {
    let mut writer = csv::Writer::from_writer(wtr);
    if rows.is_empty() {
        // serialize() emits the header with the first record only
        writer.write_record([
            "PLAYER_ID",
            "PLAYER_NAME",
            "AGE",
            "GP",
            "MIN",
            "ZSCORE_PERGAME",
            "ZSCORE_PER36",
            "ZSCORE_DIFF",
        ])?;
    }
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}

fn write_dataset_to<W: std::io::Write>(wtr: W, dataset: &Dataset) -> Result<(), csv::Error> {
    let mut writer = csv::Writer::from_writer(wtr);
    writer.write_record(dataset.columns())?;
    for row in dataset.rows() {
        writer.write_record(row.iter().map(cell_text))?;
    }
    writer.flush()?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Public path-based writers
// ---------------------------------------------------------------------------

/// Write the ranked rows to `path`, replacing any existing file.
///
/// On failure the partially written file is removed.
pub fn write_ranking(path: &Path, rows: &[MergedRow]) -> Result<(), OutputError> {
    write_file(path, |file| write_ranking_to(file, rows))?;
    info!("Wrote {} ranked players to {}", rows.len(), path.display());
    Ok(())
}

/// Write a raw dataset snapshot (header row, then cells as text).
pub fn write_dataset(path: &Path, dataset: &Dataset) -> Result<(), OutputError> {
    write_file(path, |file| write_dataset_to(file, dataset))?;
    info!("Saved {} raw rows to {}", dataset.len(), path.display());
    Ok(())
}

fn write_file<F>(path: &Path, write: F) -> Result<(), OutputError>
where
    F: FnOnce(std::fs::File) -> Result<(), csv::Error>,
{
    let file = std::fs::File::create(path).map_err(|e| OutputError::Io {
        path: path.display().to_string(),
        source: e,
    })?;
    if let Err(e) = write(file) {
        if let Err(rm) = std::fs::remove_file(path) {
            warn!("failed to remove partial file {}: {}", path.display(), rm);
        }
        return Err(OutputError::Csv {
            path: path.display().to_string(),
            source: e,
        });
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
