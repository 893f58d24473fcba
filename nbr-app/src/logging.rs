//! Logging setup for the application.

use crate::config::AppConfig;
use crate::error::AppError;
use env_logger::{Builder, Target};
use log::LevelFilter;

/// Initializes the logger based on the application settings.
///
/// The level from `config.log_level` is applied first. If `RUST_LOG` is set,
/// its directives are parsed on top, so per-module filters such as
/// `RUST_LOG=nbr_core=trace` still work. Logs always go to stderr, which keeps
/// stdout free for the report.
///
/// # Errors
///
/// Returns `AppError::Config` if a global logger was already installed.
pub fn init_logger(config: &AppConfig) -> Result<(), AppError> {
    let level: LevelFilter = config.log_level.into();

    let mut builder = Builder::new();
    builder
        .filter_level(level)
        .parse_default_env()
        .target(Target::Stderr)
        .format_timestamp(None);

    builder
        .try_init()
        .map_err(|e| AppError::Config(format!("Failed to initialize logger: {e}")))?;

    log::debug!("Logger initialized with log level: {:?}", config.log_level);
    Ok(())
}
