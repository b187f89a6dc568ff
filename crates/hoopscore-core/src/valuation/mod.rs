// Ranking pipeline: z-scores, composite, merge, sort.

pub mod composite;
pub mod merge;
pub mod rank;
pub mod zscore;

use tracing::info;

use crate::config::StatColumn;
use crate::dataset::{Dataset, DatasetError};
use merge::MergedRow;

/// Normalize and aggregate one per-mode dataset.
pub fn score_dataset(dataset: &Dataset, columns: &[StatColumn]) -> Result<Dataset, DatasetError> {
    let normalized = zscore::normalize(dataset, columns)?;
    composite::with_composite(&normalized, columns)
}

/// Score both modes, merge them per player and rank the result.
pub fn rank_players(
    per_game: &Dataset,
    per_36: &Dataset,
    columns: &[StatColumn],
) -> Result<Vec<MergedRow>, DatasetError> {
    let per_game = score_dataset(per_game, columns)?;
    let per_36 = score_dataset(per_36, columns)?;
    info!(
        "Scored {} per-game and {} per-36 rows on {} columns",
        per_game.len(),
        per_36.len(),
        columns.len()
    );

    let merged = merge::merge(&per_game, &per_36)?;
    Ok(rank::rank(merged))
}
