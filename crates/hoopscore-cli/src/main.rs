// hoopscore entry point.
//
// 1. Initialize tracing (stderr)
// 2. Parse arguments; check the year, then load settings
// 3. Validate dates/columns; input errors end the run cleanly
// 4. Pick the stats source (network or offline snapshots)
// 5. Run the pipeline and report the output file

use anyhow::Context;
use clap::Parser;
use hoopscore_cli::app::{self, RunOptions};
use hoopscore_cli::args::{Cli, Startup};
use hoopscore_stats::{NbaStatsClient, SnapshotFetcher, StatsFetcher};
use tracing::{error, info};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing()?;

    let cli = Cli::parse();
    let (settings, ranking) = match cli.startup().context("failed to load settings")? {
        Startup::Ready { settings, ranking } => (settings, ranking),
        Startup::Rejected(e) => {
            eprintln!("{e}");
            return Ok(());
        }
    };

    let fetcher: Box<dyn StatsFetcher> = match &cli.offline {
        Some(dir) => {
            info!("Using offline snapshots in {}", dir.display());
            Box::new(SnapshotFetcher::new(dir))
        }
        None => Box::new(NbaStatsClient::new(&settings.fetch).context("failed to create stats client")?),
    };

    let options = RunOptions {
        output_dir: cli.output_dir(&settings),
        save_raw: cli.save_raw,
    };

    match app::run(&ranking, fetcher.as_ref(), &options).await {
        Ok(path) => {
            info!("Ranking complete");
            println!("{}", path.display());
            Ok(())
        }
        Err(e) => {
            error!("Run failed: {:#}", e);
            Err(e)
        }
    }
}

/// Log to stderr so stdout only carries the output path.
fn init_tracing() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("hoopscore=info,warn")),
        )
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_line_number(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    Ok(())
}
