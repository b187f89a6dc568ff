// Command-line surface.

use clap::Parser;
use hoopscore_core::config::{
    load_settings, parse_column_list, ConfigError, DateRange, RankingConfig, Season, Settings,
};
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Parser)]
#[command(name = "hoopscore")]
#[command(about = "Rank a season's players by per-game and per-36 z-score composites", long_about = None)]
pub struct Cli {
    /// Season start year, e.g. 2020 for 2020-21
    pub year: String,

    /// Start of the date window (YYYY-MM-DD or MM/DD/YYYY, empty for open)
    #[arg(requires = "date_to")]
    pub date_from: Option<String>,

    /// End of the date window (YYYY-MM-DD or MM/DD/YYYY, empty for open)
    pub date_to: Option<String>,

    /// Comma-separated stat columns, e.g. PTS,REB,AST,TOV
    pub columns: Option<String>,

    /// Directory containing hoopscore.toml
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Directory for the ranking file (overrides the settings file)
    #[arg(long)]
    pub output_dir: Option<PathBuf>,

    /// Also write the raw per-game and per-36 datasets
    #[arg(long, default_value = "false")]
    pub save_raw: bool,

    /// Read pergame.csv / per36.csv from this directory instead of the network
    #[arg(long)]
    pub offline: Option<PathBuf>,
}

/// A problem with the user's arguments. Reported without touching the network.
#[derive(Debug, Error)]
pub enum InputError {
    #[error("Invalid year")]
    Year,

    #[error("Invalid date: {0}")]
    Date(ConfigError),

    #[error("Invalid columns: {0}")]
    Columns(ConfigError),
}

/// Result of checking the arguments and loading settings.
#[derive(Debug)]
pub enum Startup {
    Ready {
        settings: Settings,
        ranking: RankingConfig,
    },
    /// The arguments are unusable; the message is shown and the run ends.
    Rejected(InputError),
}

impl Cli {
    /// Check the year before anything else, then load settings and build the
    /// run configuration. Only settings problems are returned as errors.
    pub fn startup(&self) -> Result<Startup, ConfigError> {
        if Season::parse(&self.year).is_err() {
            return Ok(Startup::Rejected(InputError::Year));
        }
        let settings = load_settings(self.config.as_deref())?;
        Ok(match self.ranking_config(&settings) {
            Ok(ranking) => Startup::Ready { settings, ranking },
            Err(e) => Startup::Rejected(e),
        })
    }

    /// Validate the positional arguments into a run configuration.
    pub fn ranking_config(&self, settings: &Settings) -> Result<RankingConfig, InputError> {
        let season = Season::parse(&self.year).map_err(|_| InputError::Year)?;

        let date_range = match (&self.date_from, &self.date_to) {
            (Some(from), Some(to)) => DateRange::parse(from, to).map_err(InputError::Date)?,
            _ => DateRange::unbounded(),
        };

        let columns = self
            .columns
            .as_deref()
            .map(parse_column_list)
            .transpose()
            .map_err(InputError::Columns)?;

        RankingConfig::new(season, date_range, columns, settings).map_err(InputError::Columns)
    }

    /// Output directory: flag first, then settings.
    pub fn output_dir(&self, settings: &Settings) -> PathBuf {
        self.output_dir
            .clone()
            .unwrap_or_else(|| settings.output.dir.clone())
    }
}
