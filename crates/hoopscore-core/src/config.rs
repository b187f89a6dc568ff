// Run configuration (season, date window, selected columns) and the optional
// hoopscore.toml settings file.

use chrono::NaiveDate;
use serde::Deserialize;
use std::collections::HashSet;
use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("failed to parse config file {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("validation error for field `{field}`: {message}")]
    ValidationError { field: String, message: String },
}

impl ConfigError {
    fn invalid(field: &str, message: impl Into<String>) -> Self {
        ConfigError::ValidationError {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// Season
// ---------------------------------------------------------------------------

/// A season identified by the calendar year it starts in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Season {
    pub start_year: i32,
}

impl Season {
    pub fn new(start_year: i32) -> Self {
        Self { start_year }
    }

    /// Parse the command-line year argument.
    pub fn parse(year: &str) -> Result<Self, ConfigError> {
        year.trim()
            .parse::<i32>()
            .map(Self::new)
            .map_err(|_| ConfigError::invalid("year", format!("not an integer: {year:?}")))
    }

    /// Season id as used by the stats service, e.g. `2020-21`.
    pub fn id(&self) -> String {
        format!(
            "{}-{:02}",
            self.start_year,
            (i64::from(self.start_year) + 1).rem_euclid(100)
        )
    }
}

impl fmt::Display for Season {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.id())
    }
}

// ---------------------------------------------------------------------------
// Date range
// ---------------------------------------------------------------------------

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%m/%d/%Y"];

/// Optional date bounds on the stats window. Either end may be open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DateRange {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

impl DateRange {
    pub fn unbounded() -> Self {
        Self::default()
    }

    /// Parse both bounds; empty strings leave that side open.
    pub fn parse(from: &str, to: &str) -> Result<Self, ConfigError> {
        let range = Self {
            from: parse_date("date_from", from)?,
            to: parse_date("date_to", to)?,
        };
        if let (Some(from), Some(to)) = (range.from, range.to) {
            if from > to {
                return Err(ConfigError::invalid(
                    "date_from",
                    format!("{from} is after date_to {to}"),
                ));
            }
        }
        Ok(range)
    }

    pub fn is_unbounded(&self) -> bool {
        self.from.is_none() && self.to.is_none()
    }
}

fn parse_date(field: &str, raw: &str) -> Result<Option<NaiveDate>, ConfigError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
        .map(Some)
        .ok_or_else(|| {
            ConfigError::invalid(field, format!("expected YYYY-MM-DD or MM/DD/YYYY, got {raw:?}"))
        })
}

// ---------------------------------------------------------------------------
// Selected statistical columns
// ---------------------------------------------------------------------------

/// A statistical column taking part in the composite score.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatColumn {
    pub name: String,
    /// Lower raw values are better (e.g. turnovers); the z-score is negated.
    pub invert: bool,
}

impl StatColumn {
    pub fn new(name: impl Into<String>, invert: bool) -> Self {
        Self {
            name: name.into(),
            invert,
        }
    }
}

/// Split a comma-separated column list. Blank entries are dropped, names keep
/// the user's spelling, duplicates rejected.
pub fn parse_column_list(raw: &str) -> Result<Vec<String>, ConfigError> {
    let names: Vec<String> = raw
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect();
    check_columns("columns", &names)?;
    Ok(names)
}

fn check_columns(field: &str, names: &[String]) -> Result<(), ConfigError> {
    if names.is_empty() {
        return Err(ConfigError::invalid(field, "at least one column is required"));
    }
    let mut seen = HashSet::new();
    for name in names {
        if !seen.insert(name.as_str()) {
            return Err(ConfigError::invalid(field, format!("duplicate column {name}")));
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// RankingConfig
// ---------------------------------------------------------------------------

/// Everything one ranking run depends on. Built once, never mutated.
#[derive(Debug, Clone, PartialEq)]
pub struct RankingConfig {
    pub season: Season,
    pub date_range: DateRange,
    pub columns: Vec<StatColumn>,
}

impl RankingConfig {
    /// Build from column names, taking invert flags from `settings`.
    /// `None` selects the settings' default columns.
    pub fn new(
        season: Season,
        date_range: DateRange,
        columns: Option<Vec<String>>,
        settings: &Settings,
    ) -> Result<Self, ConfigError> {
        let names = columns.unwrap_or_else(|| settings.stats.default_columns.clone());
        check_columns("columns", &names)?;
        let columns = names
            .into_iter()
            .map(|name| {
                let invert = settings.stats.is_inverted(&name);
                StatColumn::new(name, invert)
            })
            .collect();
        Ok(Self {
            season,
            date_range,
            columns,
        })
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }
}

// ---------------------------------------------------------------------------
// hoopscore.toml
// ---------------------------------------------------------------------------

pub const SETTINGS_FILE: &str = "hoopscore.toml";

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct Settings {
    pub stats: StatsSettings,
    pub fetch: FetchSettings,
    pub output: OutputSettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StatsSettings {
    pub default_columns: Vec<String>,
    pub inverted: Vec<String>,
}

impl StatsSettings {
    pub fn is_inverted(&self, column: &str) -> bool {
        self.inverted.iter().any(|c| c.eq_ignore_ascii_case(column))
    }
}

impl Default for StatsSettings {
    fn default() -> Self {
        Self {
            default_columns: ["FG_PCT", "FG3M", "FT_PCT", "REB", "AST", "TOV", "STL", "BLK", "PTS"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            inverted: vec!["TOV".to_string()],
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FetchSettings {
    pub base_url: String,
    pub user_agent: String,
    pub timeout_secs: u64,
    pub season_type: String,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            base_url: "https://stats.nba.com/stats".to_string(),
            user_agent: "Mozilla/5.0 (Windows NT 6.1; Win64; x64)".to_string(),
            timeout_secs: 30,
            season_type: "Regular Season".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputSettings {
    pub dir: PathBuf,
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("."),
        }
    }
}

// ---------------------------------------------------------------------------
// Loading logic
// ---------------------------------------------------------------------------

/// Parse and validate settings from an explicit file.
pub fn load_settings_from(path: &Path) -> Result<Settings, ConfigError> {
    let text = std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
        path: path.to_path_buf(),
    })?;
    let settings: Settings = toml::from_str(&text).map_err(|e| ConfigError::ParseError {
        path: path.to_path_buf(),
        source: e,
    })?;
    validate(&settings)?;
    Ok(settings)
}

/// Locate and load settings.
///
/// With `config_dir` set the file must exist there. Otherwise
/// `./config/hoopscore.toml` is tried, then the platform config directory,
/// and finally built-in defaults are used.
pub fn load_settings(config_dir: Option<&Path>) -> Result<Settings, ConfigError> {
    if let Some(dir) = config_dir {
        return load_settings_from(&dir.join(SETTINGS_FILE));
    }
    match find_settings_file() {
        Some(path) => {
            tracing::debug!("loading settings from {}", path.display());
            load_settings_from(&path)
        }
        None => Ok(Settings::default()),
    }
}

fn find_settings_file() -> Option<PathBuf> {
    let local = PathBuf::from("config").join(SETTINGS_FILE);
    if local.is_file() {
        return Some(local);
    }
    directories::ProjectDirs::from("", "", "hoopscore")
        .map(|dirs| dirs.config_dir().join(SETTINGS_FILE))
        .filter(|p| p.is_file())
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate(settings: &Settings) -> Result<(), ConfigError> {
    check_columns("stats.default_columns", &settings.stats.default_columns)?;

    if settings.fetch.base_url.trim().is_empty() {
        return Err(ConfigError::invalid("fetch.base_url", "must not be empty"));
    }

    if settings.fetch.timeout_secs == 0 {
        return Err(ConfigError::invalid("fetch.timeout_secs", "must be > 0"));
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
