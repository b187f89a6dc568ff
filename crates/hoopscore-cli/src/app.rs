// One ranking run: fetch both modes, rank, write.

use anyhow::Context;
use hoopscore_core::config::RankingConfig;
use hoopscore_core::output::{self, PER_36_SNAPSHOT, PER_GAME_SNAPSHOT};
use hoopscore_core::valuation;
use hoopscore_stats::{FetchRequest, PerMode, StatsFetcher};
use std::path::PathBuf;
use tracing::info;

/// Where and what to write besides the ranking itself.
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub output_dir: PathBuf,
    pub save_raw: bool,
}

/// Run the pipeline and return the path of the ranking file.
///
/// Both fetches must succeed before any scoring starts; nothing is written
/// unless the whole ranking was computed.
pub async fn run(
    config: &RankingConfig,
    fetcher: &dyn StatsFetcher,
    options: &RunOptions,
) -> anyhow::Result<PathBuf> {
    let request = |mode| FetchRequest {
        mode,
        season: config.season,
        date_range: config.date_range,
    };
    let per_game_request = request(PerMode::PerGame);
    let per_36_request = request(PerMode::Per36);

    info!(
        "Fetching {} stats for columns {}",
        config.season,
        config.column_names().join(",")
    );
    let (per_game, per_36) = tokio::try_join!(
        fetcher.fetch(&per_game_request),
        fetcher.fetch(&per_36_request),
    )
    .context("failed to fetch player stats")?;

    let ranked = valuation::rank_players(&per_game, &per_36, &config.columns)
        .context("failed to rank players")?;

    if options.save_raw {
        output::write_dataset(&options.output_dir.join(PER_GAME_SNAPSHOT), &per_game)
            .context("failed to save per-game snapshot")?;
        output::write_dataset(&options.output_dir.join(PER_36_SNAPSHOT), &per_36)
            .context("failed to save per-36 snapshot")?;
    }

    let path = output::output_path(&options.output_dir, config);
    output::write_ranking(&path, &ranked)
        .with_context(|| format!("failed to write {}", path.display()))?;
    Ok(path)
}
