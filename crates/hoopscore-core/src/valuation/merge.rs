// Join per-game and per-36 composite scores on player id.

use serde::Serialize;
use std::collections::HashMap;
use tracing::{debug, warn};

use crate::dataset::{
    Dataset, DatasetError, AGE, COMPOSITE, GAMES_PLAYED, MINUTES, PLAYER_NAME,
};

/// One output row: per-game identity columns plus both composite scores.
///
/// `zscore_per_36` and `zscore_diff` are `None` when the player is missing
/// from the per-36 dataset.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MergedRow {
    #[serde(rename = "PLAYER_ID")]
    pub player_id: i64,
    #[serde(rename = "PLAYER_NAME")]
    pub player_name: String,
    #[serde(rename = "AGE")]
    pub age: f64,
    #[serde(rename = "GP")]
    pub games_played: f64,
    #[serde(rename = "MIN")]
    pub minutes: f64,
    #[serde(rename = "ZSCORE_PERGAME")]
    pub zscore_per_game: f64,
    #[serde(rename = "ZSCORE_PER36")]
    pub zscore_per_36: Option<f64>,
    #[serde(rename = "ZSCORE_DIFF")]
    pub zscore_diff: Option<f64>,
}

/// Left join anchored on the per-game dataset, keyed by `PLAYER_ID`.
///
/// Output follows per-game row order. Per-36 players without a per-game row
/// are dropped. Both datasets must already carry the `ZSCORE` column.
pub fn merge(per_game: &Dataset, per_36: &Dataset) -> Result<Vec<MergedRow>, DatasetError> {
    let ids = per_game.player_ids()?;
    let names = per_game.text_column(PLAYER_NAME)?;
    let ages = per_game.numeric_column(AGE)?;
    let games = per_game.numeric_column(GAMES_PLAYED)?;
    let minutes = per_game.numeric_column(MINUTES)?;
    let per_game_scores = per_game.numeric_column(COMPOSITE)?;

    let per_36_scores: HashMap<i64, f64> = per_36
        .player_ids()?
        .into_iter()
        .zip(per_36.numeric_column(COMPOSITE)?)
        .collect();

    let mut missing = 0usize;
    let mut rows = Vec::with_capacity(ids.len());
    for (i, id) in ids.iter().enumerate() {
        let pergame = per_game_scores[i];
        let per36 = per_36_scores.get(id).copied();
        if per36.is_none() {
            missing += 1;
        }
        rows.push(MergedRow {
            player_id: *id,
            player_name: names[i].clone(),
            age: ages[i],
            games_played: games[i],
            minutes: minutes[i],
            zscore_per_game: pergame,
            zscore_per_36: per36,
            zscore_diff: per36.map(|s| s - pergame),
        });
    }

    if missing > 0 {
        warn!("{missing} per-game players have no per-36 row");
    }
    let unmatched = per_36_scores.len() - (ids.len() - missing);
    if unmatched > 0 {
        debug!("{unmatched} per-36 players have no per-game row and were dropped");
    }

    Ok(rows)
}
