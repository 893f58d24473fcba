use crate::error::AppError;
use clap::{Parser, ValueEnum};
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use log::LevelFilter;
use nbr_core::window::{MATCH_T_TOLERANCE_DFL, MATCH_X_TOLERANCE_DFL, MATCH_Y_TOLERANCE_DFL};
use nbr_core::{DatabaseConfig, MatchTolerance, NeighborOffset};
use serde::Serialize;
use std::path::PathBuf;

/// Prefix of environment variables that override database settings, e.g. `NBR_MAX_X`.
pub const ENV_PREFIX: &str = "NBR_";

/// Output formats for the lookup report.
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Plain lines: group counts, `NumGroups`, `GroupIndex`.
    #[default]
    Text,
    /// A single JSON object.
    Json,
    /// A CSV header and one record.
    Csv,
}

/// Log levels accepted on the command line.
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum GlobalLogLevel {
    Off,
    Error,
    #[default]
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<GlobalLogLevel> for LevelFilter {
    fn from(level: GlobalLogLevel) -> Self {
        match level {
            GlobalLogLevel::Off => Self::Off,
            GlobalLogLevel::Error => Self::Error,
            GlobalLogLevel::Warn => Self::Warn,
            GlobalLogLevel::Info => Self::Info,
            GlobalLogLevel::Debug => Self::Debug,
            GlobalLogLevel::Trace => Self::Trace,
        }
    }
}

/// Configuration for the neighbor-index application.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None, allow_negative_numbers = true)]
pub struct AppConfig {
    /// Relative X offset of the neighbor.
    #[arg(long)]
    pub x: i64,

    /// Relative Y offset of the neighbor.
    #[arg(long)]
    pub y: i64,

    /// Relative angle of the neighbor, in degrees.
    #[arg(long)]
    pub t: i64,

    /// Optional TOML file with database settings.
    #[arg(short, long, value_name = "FILE", env = "NBR_CONFIG")]
    pub config: Option<PathBuf>,

    /// Largest X offset of the database grid (env `NBR_MAX_X`).
    #[arg(long)]
    pub max_x: Option<i64>,

    /// Largest Y offset of the database grid (env `NBR_MAX_Y`).
    #[arg(long)]
    pub max_y: Option<i64>,

    /// Largest relative angle of the database grid (env `NBR_MAX_T`).
    #[arg(long)]
    pub max_t: Option<i64>,

    /// Pixels per group along X and Y (env `NBR_PIXELS_PER_GROUP`, file key `pixels_per_group`).
    #[arg(long)]
    pub ppg: Option<i64>,

    /// Degrees per group along T (env `NBR_DEGREES_PER_GROUP`, file key `degrees_per_group`).
    #[arg(long)]
    pub dpg: Option<i64>,

    /// Also list every group index within the match tolerances.
    #[arg(long, default_value_t = false)]
    pub window: bool,

    /// X tolerance for --window.
    #[arg(long, default_value_t = MATCH_X_TOLERANCE_DFL)]
    pub x_tolerance: i64,

    /// Y tolerance for --window.
    #[arg(long, default_value_t = MATCH_Y_TOLERANCE_DFL)]
    pub y_tolerance: i64,

    /// Angle tolerance for --window.
    #[arg(long, default_value_t = MATCH_T_TOLERANCE_DFL)]
    pub t_tolerance: i64,

    /// Report format written to stdout.
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Log level used when RUST_LOG does not say otherwise.
    #[arg(long, value_enum, default_value_t = GlobalLogLevel::Warn)]
    pub log_level: GlobalLogLevel,
}

/// Database flags given on the command line. Unset flags are skipped so they
/// do not shadow lower configuration layers.
#[derive(Serialize, Debug, Default)]
struct DatabaseOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    max_x: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_y: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_t: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pixels_per_group: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    degrees_per_group: Option<i64>,
}

impl From<&AppConfig> for DatabaseOverrides {
    fn from(config: &AppConfig) -> Self {
        Self {
            max_x: config.max_x,
            max_y: config.max_y,
            max_t: config.max_t,
            pixels_per_group: config.ppg,
            degrees_per_group: config.dpg,
        }
    }
}

impl AppConfig {
    /// The queried neighbor offset.
    pub const fn offset(&self) -> NeighborOffset {
        NeighborOffset::new(self.x, self.y, self.t)
    }

    /// Tolerances used by `--window`.
    pub const fn tolerance(&self) -> MatchTolerance {
        MatchTolerance::new(self.x_tolerance, self.y_tolerance, self.t_tolerance)
    }

    /// Builds the layered configuration: reference defaults, then the TOML
    /// file, then `NBR_*` environment variables, then command-line flags.
    pub fn figment(&self) -> Result<Figment, AppError> {
        let mut figment = Figment::from(Serialized::defaults(DatabaseConfig::reference()));

        if let Some(path) = &self.config {
            if !path.is_file() {
                return Err(AppError::Config(format!(
                    "Config file not found: {}",
                    path.display()
                )));
            }
            figment = figment.merge(Toml::file(path));
        }

        Ok(figment
            .merge(Env::prefixed(ENV_PREFIX))
            .merge(Serialized::defaults(DatabaseOverrides::from(self))))
    }

    /// Resolves the database configuration from every layer.
    ///
    /// The result is not validated here; `IndexMapper::new` does that and
    /// reports the offending field.
    pub fn database_config(&self) -> Result<DatabaseConfig, AppError> {
        let database = self.figment()?.extract::<DatabaseConfig>()?;
        log::debug!("Resolved database config: {:?}", database);
        Ok(database)
    }
}
