use crate::axis::{Axis, AxisConfig};
use crate::IndexError;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Default largest X offset of the library database.
pub const DB_MAX_X_DFL: i64 = 353;
/// Default largest Y offset of the library database.
pub const DB_MAX_Y_DFL: i64 = 390;
/// Default largest relative angle, in degrees.
pub const DB_MAX_T_DFL: i64 = 359;
/// Default bucket width along X and Y.
pub const DB_PIXELS_PER_GROUP_DFL: i64 = 1;
/// Default bucket width along T.
pub const DB_DEGREES_PER_GROUP_DFL: i64 = 2;

/// Configuration of the bounded, quantized grid a lookup table is built on.
///
/// Values are signed so that a negative bound read from user input can be
/// reported as such instead of wrapping. Use [`DatabaseConfig::validate`] or
/// build an [`IndexMapper`](crate::IndexMapper) to check them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DatabaseConfig {
    /// Largest X offset. X covers `[-max_x, max_x]`.
    pub max_x: i64,
    /// Largest Y offset. Y covers `[-max_y, max_y]`.
    pub max_y: i64,
    /// Largest relative angle. T covers `[0, max_t]`.
    pub max_t: i64,
    /// Bucket width along X and Y.
    pub pixels_per_group: i64,
    /// Bucket width along T.
    pub degrees_per_group: i64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            max_x: DB_MAX_X_DFL,
            max_y: DB_MAX_Y_DFL,
            max_t: DB_MAX_T_DFL,
            pixels_per_group: DB_PIXELS_PER_GROUP_DFL,
            degrees_per_group: DB_DEGREES_PER_GROUP_DFL,
        }
    }
}

impl DatabaseConfig {
    /// Creates a configuration from explicit values. No validation is performed here.
    pub const fn new(
        max_x: i64,
        max_y: i64,
        max_t: i64,
        pixels_per_group: i64,
        degrees_per_group: i64,
    ) -> Self {
        Self {
            max_x,
            max_y,
            max_t,
            pixels_per_group,
            degrees_per_group,
        }
    }

    /// The small worked configuration: a 9x9 pixel window and four 90 degree sectors.
    pub const fn reference() -> Self {
        Self::new(4, 4, 359, 1, 90)
    }

    /// Returns the configuration of a single axis.
    ///
    /// # Errors
    ///
    /// Fails with the same errors as [`AxisConfig::new`].
    pub fn axis(&self, axis: Axis) -> Result<AxisConfig, IndexError> {
        match axis {
            Axis::X => AxisConfig::new(Axis::X, self.max_x, self.pixels_per_group),
            Axis::Y => AxisConfig::new(Axis::Y, self.max_y, self.pixels_per_group),
            Axis::T => AxisConfig::new(Axis::T, self.max_t, self.degrees_per_group),
        }
    }

    /// Validates every field and returns the three axis configurations.
    ///
    /// Group sizes are checked before bounds, so a zero divisor is always the
    /// error reported first.
    ///
    /// # Errors
    ///
    /// Returns `IndexError::InvalidConfig` for the first violated precondition,
    /// or `IndexError::Overflow` if a range size does not fit in an `i64`.
    pub fn validate(&self) -> Result<[AxisConfig; 3], IndexError> {
        if self.pixels_per_group <= 0 {
            return Err(IndexError::InvalidConfig {
                field: "pixels_per_group",
                value: self.pixels_per_group,
                reason: "must be greater than zero",
            });
        }
        if self.degrees_per_group <= 0 {
            return Err(IndexError::InvalidConfig {
                field: "degrees_per_group",
                value: self.degrees_per_group,
                reason: "must be greater than zero",
            });
        }
        Ok([
            self.axis(Axis::X)?,
            self.axis(Axis::Y)?,
            self.axis(Axis::T)?,
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = DatabaseConfig::default();
        assert_eq!(config.max_x, 353);
        assert_eq!(config.max_y, 390);
        assert_eq!(config.max_t, 359);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_reference_config_axes() {
        let [x, y, t] = DatabaseConfig::reference().validate().unwrap();
        assert_eq!((x.axis(), y.axis(), t.axis()), (Axis::X, Axis::Y, Axis::T));
        assert_eq!(x.group_count(), 9);
        assert_eq!(y.group_count(), 9);
        assert_eq!(t.group_count(), 4);
    }

    #[test]
    fn test_divisor_reported_before_bounds() {
        let config = DatabaseConfig::new(-1, 4, 359, 0, 90);
        assert!(matches!(
            config.validate(),
            Err(IndexError::InvalidConfig {
                field: "pixels_per_group",
                value: 0,
                ..
            })
        ));
    }

    #[test]
    fn test_negative_bounds_rejected() {
        let config = DatabaseConfig::new(4, 4, -1, 1, 90);
        assert!(matches!(
            config.validate(),
            Err(IndexError::InvalidConfig {
                field: "max_t",
                value: -1,
                ..
            })
        ));
    }
}
