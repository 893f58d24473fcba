//! Neighbor Index Application Library
//!
//! This crate contains the configuration, logging, execution and output
//! handling for the `neighbor-index` command.

pub mod config;
pub mod error;
pub mod logging;
pub mod output;
pub mod setup;

pub use config::AppConfig;
pub use error::AppError;

use clap::Parser;

/// Parses the command line, initializes logging and runs a single lookup.
///
/// # Errors
///
/// Returns any error raised while configuring or executing the lookup.
pub fn main() -> anyhow::Result<()> {
    let config = AppConfig::parse();
    logging::init_logger(&config)?;
    log::debug!("Loaded Config: {:?}", config);

    setup::execution::execute(&config)?;
    Ok(())
}
