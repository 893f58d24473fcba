//! Handles the core execution logic: resolve config, map the offset, write the report.

use crate::{
    config::AppConfig,
    error::AppError,
    output::{report_writer, Report},
};
use log::{debug, info};
use nbr_core::{compatible_group_indices, IndexMapper};
use std::io::{self, Write};

/// Resolves the database configuration and computes the report for `config`.
///
/// Either the whole report is computed or an error is returned; there are no
/// partial results.
///
/// # Errors
///
/// Returns `AppError::Config`/`AppError::Figment` if the configuration layers
/// cannot be read, and `AppError::Index` if the configuration is invalid or the
/// offset lies outside the grid.
pub fn run_lookup(config: &AppConfig) -> Result<Report, AppError> {
    let database = config.database_config()?;
    let mapper = IndexMapper::new(database)?;
    let counts = mapper.counts();
    info!(
        "Database grid: max ({}, {}, {}), {} pixels/group, {} degrees/group",
        database.max_x,
        database.max_y,
        database.max_t,
        database.pixels_per_group,
        database.degrees_per_group
    );

    let offset = config.offset();
    let group_index = mapper.group_index(offset)?;
    debug!(
        "Offset {:?} -> buckets {:?} -> group {}",
        offset,
        mapper.bucket_triple(offset)?,
        group_index
    );

    let compatible_groups = if config.window {
        let tolerance = config.tolerance();
        let groups = compatible_group_indices(&mapper, offset, tolerance)?;
        info!(
            "{} compatible groups within tolerance {:?}",
            groups.len(),
            tolerance
        );
        Some(groups)
    } else {
        None
    };

    Ok(Report {
        counts,
        num_groups: mapper.total_groups(),
        group_index,
        compatible_groups,
    })
}

/// Runs a lookup and writes the report to `out` in the configured format.
///
/// # Errors
///
/// Propagates errors from [`run_lookup`] and from writing the report.
pub fn execute_with_writer<W: Write>(config: &AppConfig, out: W) -> Result<(), AppError> {
    let report = run_lookup(config)?;
    report_writer(config.format, out).write_report(&report)
}

/// Runs a lookup and writes the report to stdout.
///
/// # Errors
///
/// See [`execute_with_writer`].
pub fn execute(config: &AppConfig) -> Result<(), AppError> {
    let stdout = io::stdout();
    execute_with_writer(config, stdout.lock())
}
