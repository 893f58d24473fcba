use crate::axis::AxisConfig;
use crate::mapper::IndexMapper;
use crate::{IndexError, NeighborOffset};
use log::trace;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::ops::RangeInclusive;

/// Default X tolerance when comparing neighbors.
pub const MATCH_X_TOLERANCE_DFL: i64 = 5;
/// Default Y tolerance when comparing neighbors.
pub const MATCH_Y_TOLERANCE_DFL: i64 = 5;
/// Default angle tolerance when comparing neighbors.
pub const MATCH_T_TOLERANCE_DFL: i64 = 7;

/// How far a stored neighbor may deviate from a query neighbor and still match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MatchTolerance {
    /// Allowed deviation along X.
    pub x: i64,
    /// Allowed deviation along Y.
    pub y: i64,
    /// Allowed angular deviation, in degrees.
    pub t: i64,
}

impl Default for MatchTolerance {
    fn default() -> Self {
        Self {
            x: MATCH_X_TOLERANCE_DFL,
            y: MATCH_Y_TOLERANCE_DFL,
            t: MATCH_T_TOLERANCE_DFL,
        }
    }
}

impl MatchTolerance {
    /// Creates a tolerance from explicit values.
    pub const fn new(x: i64, y: i64, t: i64) -> Self {
        Self { x, y, t }
    }

    fn validate(&self) -> Result<(), IndexError> {
        for (field, value) in [
            ("x_tolerance", self.x),
            ("y_tolerance", self.y),
            ("t_tolerance", self.t),
        ] {
            if value < 0 {
                return Err(IndexError::InvalidConfig {
                    field,
                    value,
                    reason: "must not be negative",
                });
            }
        }
        Ok(())
    }
}

/// Lists every group index a neighbor at `offset` could share with a stored
/// neighbor, given the match `tolerance`.
///
/// X and Y windows are clamped to the axis bounds. The angle window wraps
/// around, so a query at 2 degrees with a tolerance of 7 also covers the
/// buckets near `max_t`. Every bucket touched by the window is included once,
/// and the result is sorted in ascending order.
///
/// # Errors
///
/// Returns `IndexError::OutOfRange` if `offset` itself is outside the grid, or
/// `IndexError::InvalidConfig` if a tolerance is negative.
pub fn compatible_group_indices(
    mapper: &IndexMapper,
    offset: NeighborOffset,
    tolerance: MatchTolerance,
) -> Result<Vec<u64>, IndexError> {
    tolerance.validate()?;
    // Reject out-of-range queries before widening them into a window.
    mapper.bucket_triple(offset)?;

    let [x_axis, y_axis, t_axis] = mapper.axes();
    let x_buckets = clamped_buckets(x_axis, offset.x, tolerance.x)?;
    let y_buckets = clamped_buckets(y_axis, offset.y, tolerance.y)?;
    let t_buckets = wrapped_buckets(t_axis, offset.t, tolerance.t)?;
    trace!(
        "Window for {:?}: x buckets {:?}, y buckets {:?}, t buckets {:?}",
        offset,
        x_buckets,
        y_buckets,
        t_buckets
    );

    let mut indices = Vec::new();
    for bx in x_buckets {
        for by in y_buckets.clone() {
            for &bt in &t_buckets {
                indices.push(mapper.index_of_buckets((bx, by, bt))?);
            }
        }
    }
    // Row-major order over ascending bucket ranges is already sorted.
    debug_assert!(indices.windows(2).all(|w| w[0] < w[1]));
    Ok(indices)
}

fn clamped_buckets(
    axis: &AxisConfig,
    value: i64,
    tolerance: i64,
) -> Result<RangeInclusive<u64>, IndexError> {
    let begin = value.saturating_sub(tolerance).max(axis.min_value());
    let end = value.saturating_add(tolerance).min(axis.max());
    Ok(axis.bucket(begin)?..=axis.bucket(end)?)
}

fn wrapped_buckets(
    axis: &AxisConfig,
    value: i64,
    tolerance: i64,
) -> Result<BTreeSet<u64>, IndexError> {
    let range = axis.range_size();
    let last = axis.max();

    // A window covering the whole circle touches every bucket.
    if tolerance >= range / 2 {
        return Ok((0..axis.group_count()).collect());
    }

    // Both `value` and `tolerance` are non-negative, so only the upper end can
    // overflow. Compare against the headroom instead of forming `value + tolerance`.
    let begin = value - tolerance;
    let headroom = last - value;
    let segments = if tolerance > headroom {
        vec![(begin, last), (0, tolerance - headroom - 1)]
    } else if begin < 0 {
        vec![(begin + range, last), (0, value + tolerance)]
    } else {
        vec![(begin, value + tolerance)]
    };

    let mut buckets = BTreeSet::new();
    for (lo, hi) in segments {
        buckets.extend(axis.bucket(lo)?..=axis.bucket(hi)?);
    }
    Ok(buckets)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::axis::Axis;

    #[test]
    fn test_wrapped_buckets_near_zero() {
        let t = AxisConfig::new(Axis::T, 359, 90).unwrap();
        let buckets = wrapped_buckets(&t, 2, 7).unwrap();
        assert_eq!(buckets.into_iter().collect::<Vec<_>>(), vec![0, 3]);
    }

    #[test]
    fn test_wrapped_buckets_near_max() {
        let t = AxisConfig::new(Axis::T, 359, 90).unwrap();
        let buckets = wrapped_buckets(&t, 355, 7).unwrap();
        assert_eq!(buckets.into_iter().collect::<Vec<_>>(), vec![0, 3]);
    }

    #[test]
    fn test_wrapped_buckets_near_max_of_huge_axis() {
        // `value + tolerance` would exceed i64::MAX here.
        let t = AxisConfig::new(Axis::T, i64::MAX - 1, i64::MAX / 4).unwrap();
        assert_eq!(t.group_count(), 5);
        let buckets = wrapped_buckets(&t, i64::MAX - 1, 1_000_000_000_000_000_000).unwrap();
        assert_eq!(buckets.into_iter().collect::<Vec<_>>(), vec![0, 3, 4]);
    }

    #[test]
    fn test_wrapped_buckets_full_circle() {
        let t = AxisConfig::new(Axis::T, 359, 90).unwrap();
        let buckets = wrapped_buckets(&t, 100, 180).unwrap();
        assert_eq!(buckets.len(), 4);
    }

    #[test]
    fn test_clamped_buckets() {
        let x = AxisConfig::new(Axis::X, 4, 1).unwrap();
        assert_eq!(clamped_buckets(&x, 4, 2).unwrap(), 6..=8);
        assert_eq!(clamped_buckets(&x, -4, 2).unwrap(), 0..=2);
        assert_eq!(clamped_buckets(&x, 0, 0).unwrap(), 4..=4);
    }

    #[test]
    fn test_negative_tolerance_rejected() {
        assert!(matches!(
            MatchTolerance::new(1, -1, 1).validate(),
            Err(IndexError::InvalidConfig {
                field: "y_tolerance",
                value: -1,
                ..
            })
        ));
    }
}
