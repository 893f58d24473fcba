//! Core library for mapping neighbor offsets onto flat lookup-table slots.
//! Defines the axis quantization rules and the platform-agnostic index arithmetic.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Per-axis bounds and quantization.
pub mod axis;
/// Database (grid) configuration and its validation.
pub mod config;
/// Group counts and the row-major group index.
pub mod mapper;
/// Tolerance windows around a neighbor, expressed as group indices.
pub mod window;

// Re-export core public items

/// One of the three quantized axes.
pub use crate::axis::Axis;
/// Bounds and group size of a single axis.
pub use crate::axis::AxisConfig;
/// Grid configuration shared by every mapping operation.
pub use crate::config::DatabaseConfig;
/// Computes the per-axis group counts for a configuration.
pub use crate::mapper::compute_group_counts;
/// Computes the flat group index of a neighbor offset.
pub use crate::mapper::compute_group_index;
/// Multiplies the per-axis group counts together.
pub use crate::mapper::total_groups;
/// Number of groups along each axis.
pub use crate::mapper::GroupCounts;
/// Validated configuration with cached group counts.
pub use crate::mapper::IndexMapper;
/// Lists every group index inside a tolerance window.
pub use crate::window::compatible_group_indices;
/// Per-axis match tolerances.
pub use crate::window::MatchTolerance;

/// Errors raised while validating a configuration or mapping a coordinate.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IndexError {
    /// A configuration value violates its precondition.
    /// Carries the field name, the offending value and the violated rule.
    #[error("Invalid configuration: {field} = {value} ({reason})")]
    InvalidConfig {
        field: &'static str,
        value: i64,
        reason: &'static str,
    },
    /// A coordinate lies outside the bounds declared for its axis.
    #[error("Value out of range: {axis} = {value}, expected [{min}, {max}]")]
    OutOfRange {
        axis: Axis,
        value: i64,
        min: i64,
        max: i64,
    },
    /// A derived quantity does not fit the integer width used for it.
    #[error("Arithmetic overflow: {0}")]
    Overflow(String),
}

/// Relative position and orientation of a neighbor minutia.
///
/// `x` and `y` are signed offsets, `t` is the relative angle in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct NeighborOffset {
    /// Relative X offset.
    pub x: i64,
    /// Relative Y offset.
    pub y: i64,
    /// Relative angle.
    pub t: i64,
}

impl NeighborOffset {
    /// Creates a new offset.
    pub const fn new(x: i64, y: i64, t: i64) -> Self {
        Self { x, y, t }
    }

    /// Returns the component of this offset along `axis`.
    pub const fn component(&self, axis: Axis) -> i64 {
        match axis {
            Axis::X => self.x,
            Axis::Y => self.y,
            Axis::T => self.t,
        }
    }
}
