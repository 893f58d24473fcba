use crate::IndexError;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifies one of the three quantized axes of a neighbor offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Axis {
    /// Relative X offset, symmetric around zero.
    X,
    /// Relative Y offset, symmetric around zero.
    Y,
    /// Relative angle, starting at zero.
    T,
}

impl Axis {
    /// Whether the axis covers `[-max, max]` rather than `[0, max]`.
    pub const fn is_symmetric(self) -> bool {
        matches!(self, Self::X | Self::Y)
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::X => "x",
            Self::Y => "y",
            Self::T => "t",
        };
        f.write_str(name)
    }
}

/// Bounds and bucket width of a single axis.
///
/// Constructed through [`AxisConfig::new`], which guarantees `max >= 0`,
/// `group_size > 0` and a range size that fits in an `i64`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AxisConfig {
    axis: Axis,
    max: i64,
    group_size: i64,
    range_size: i64,
}

impl AxisConfig {
    /// Creates a validated axis configuration.
    ///
    /// # Arguments
    ///
    /// * `axis` - Which axis this configuration describes.
    /// * `max` - Largest allowed value (and, for X/Y, the magnitude of the smallest).
    /// * `group_size` - Width of one bucket along this axis.
    ///
    /// # Errors
    ///
    /// Returns `IndexError::InvalidConfig` if `max` is negative or `group_size` is not positive.
    /// Returns `IndexError::Overflow` if the range size does not fit in an `i64`.
    pub fn new(axis: Axis, max: i64, group_size: i64) -> Result<Self, IndexError> {
        if max < 0 {
            return Err(IndexError::InvalidConfig {
                field: max_field(axis),
                value: max,
                reason: "must not be negative",
            });
        }
        if group_size <= 0 {
            return Err(IndexError::InvalidConfig {
                field: group_field(axis),
                value: group_size,
                reason: "must be greater than zero",
            });
        }

        let range_size = if axis.is_symmetric() {
            max.checked_mul(2).and_then(|v| v.checked_add(1))
        } else {
            max.checked_add(1)
        }
        .ok_or_else(|| IndexError::Overflow(format!("range size of axis {axis} (max = {max})")))?;

        Ok(Self {
            axis,
            max,
            group_size,
            range_size,
        })
    }

    /// The axis described by this configuration.
    pub const fn axis(&self) -> Axis {
        self.axis
    }

    /// Largest allowed value along the axis.
    pub const fn max(&self) -> i64 {
        self.max
    }

    /// Width of one bucket.
    pub const fn group_size(&self) -> i64 {
        self.group_size
    }

    /// Smallest allowed value along the axis.
    pub const fn min_value(&self) -> i64 {
        if self.axis.is_symmetric() {
            -self.max
        } else {
            0
        }
    }

    /// Number of distinct values in `[min_value, max]`.
    pub const fn range_size(&self) -> i64 {
        self.range_size
    }

    /// Number of buckets along the axis: `ceil(range_size / group_size)`.
    ///
    /// Always at least 1, since the range size is at least 1.
    pub const fn group_count(&self) -> u64 {
        let mut groups = self.range_size / self.group_size;
        if self.range_size % self.group_size > 0 {
            groups += 1;
        }
        // Both operands are positive after validation.
        groups as u64
    }

    /// Whether `value` lies inside `[min_value, max]`.
    pub const fn contains(&self, value: i64) -> bool {
        value >= self.min_value() && value <= self.max
    }

    /// Returns the bucket holding `value`.
    ///
    /// The value is first shifted so the axis starts at zero, then divided by the
    /// group size. The shifted value is never negative, so truncating division
    /// and floor division agree.
    ///
    /// # Errors
    ///
    /// Returns `IndexError::OutOfRange` if `value` is outside the axis bounds.
    pub fn bucket(&self, value: i64) -> Result<u64, IndexError> {
        if !self.contains(value) {
            return Err(IndexError::OutOfRange {
                axis: self.axis,
                value,
                min: self.min_value(),
                max: self.max,
            });
        }
        // `value - min_value` is in [0, range_size - 1], which fits by construction.
        let shifted = value - self.min_value();
        Ok((shifted / self.group_size) as u64)
    }
}

const fn max_field(axis: Axis) -> &'static str {
    match axis {
        Axis::X => "max_x",
        Axis::Y => "max_y",
        Axis::T => "max_t",
    }
}

const fn group_field(axis: Axis) -> &'static str {
    match axis {
        Axis::X | Axis::Y => "pixels_per_group",
        Axis::T => "degrees_per_group",
    }
}
