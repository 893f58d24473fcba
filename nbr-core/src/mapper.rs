//! Group counts and row-major linearization of neighbor offsets.
//!
//! The flat index is `x_block * bucket_x + y_block * bucket_y + bucket_t`, where
//! `x_block = y_groups * t_groups` and `y_block = t_groups`. X varies slowest and
//! T fastest, like indexing a `[x][y][t]` array.

use crate::axis::AxisConfig;
use crate::config::DatabaseConfig;
use crate::{IndexError, NeighborOffset};
use log::debug;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Number of buckets along each axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GroupCounts {
    /// Buckets along X.
    pub x_groups: u64,
    /// Buckets along Y.
    pub y_groups: u64,
    /// Buckets along T.
    pub t_groups: u64,
}

impl GroupCounts {
    /// Total number of slots, `x_groups * y_groups * t_groups`.
    ///
    /// # Errors
    ///
    /// Returns `IndexError::Overflow` if the product does not fit in a `u64`.
    pub fn total(&self) -> Result<u64, IndexError> {
        self.x_groups
            .checked_mul(self.y_groups)
            .and_then(|xy| xy.checked_mul(self.t_groups))
            .ok_or_else(|| {
                IndexError::Overflow(format!(
                    "total groups {} x {} x {}",
                    self.x_groups, self.y_groups, self.t_groups
                ))
            })
    }

    /// Positional weights `(x_block, y_block, t_block)` of the three bucket coordinates.
    ///
    /// # Errors
    ///
    /// Returns `IndexError::Overflow` if `y_groups * t_groups` does not fit in a `u64`.
    pub fn block_sizes(&self) -> Result<(u64, u64, u64), IndexError> {
        let x_block = self.y_groups.checked_mul(self.t_groups).ok_or_else(|| {
            IndexError::Overflow(format!(
                "x block size {} x {}",
                self.y_groups, self.t_groups
            ))
        })?;
        Ok((x_block, self.t_groups, 1))
    }
}

/// Computes the number of buckets along each axis.
///
/// # Errors
///
/// Returns `IndexError::InvalidConfig` if a group size is not positive or a bound is negative,
/// or `IndexError::Overflow` if a range size does not fit in an `i64`.
pub fn compute_group_counts(config: &DatabaseConfig) -> Result<GroupCounts, IndexError> {
    let [x, y, t] = config.validate()?;
    Ok(counts_of(&x, &y, &t))
}

/// Multiplies the per-axis group counts together.
///
/// # Errors
///
/// Returns `IndexError::Overflow` if the product does not fit in a `u64`.
pub fn total_groups(counts: &GroupCounts) -> Result<u64, IndexError> {
    counts.total()
}

/// Computes the flat group index of `offset`.
///
/// `counts` must be the result of [`compute_group_counts`] for the same `config`.
/// A mismatching `counts` still produces a number, but not a meaningful one.
///
/// # Errors
///
/// Returns `IndexError::InvalidConfig` for an invalid configuration,
/// `IndexError::OutOfRange` if any component of `offset` is outside its axis bounds,
/// or `IndexError::Overflow` if the weighted sum does not fit in a `u64`.
pub fn compute_group_index(
    config: &DatabaseConfig,
    counts: &GroupCounts,
    offset: NeighborOffset,
) -> Result<u64, IndexError> {
    let axes = config.validate()?;
    let buckets = bucket_triple_of(&axes, offset)?;
    linearize(counts, buckets)
}

/// A validated [`DatabaseConfig`] with its group counts computed once.
///
/// Prefer this over the free functions when mapping many offsets against the
/// same configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexMapper {
    config: DatabaseConfig,
    axes: [AxisConfig; 3],
    counts: GroupCounts,
    total: u64,
}

impl IndexMapper {
    /// Validates `config` and precomputes its group counts and total.
    ///
    /// # Errors
    ///
    /// Returns `IndexError::InvalidConfig` or `IndexError::Overflow` if the
    /// configuration cannot describe an addressable grid.
    pub fn new(config: DatabaseConfig) -> Result<Self, IndexError> {
        let axes = config.validate()?;
        let [x, y, t] = &axes;
        let counts = counts_of(x, y, t);
        let total = counts.total()?;
        debug!(
            "IndexMapper created: groups ({}, {}, {}), total {}",
            counts.x_groups, counts.y_groups, counts.t_groups, total
        );
        Ok(Self {
            config,
            axes,
            counts,
            total,
        })
    }

    /// The configuration this mapper was built from.
    pub const fn config(&self) -> &DatabaseConfig {
        &self.config
    }

    /// Per-axis configurations, in X, Y, T order.
    pub const fn axes(&self) -> &[AxisConfig; 3] {
        &self.axes
    }

    /// Number of buckets along each axis.
    pub const fn counts(&self) -> GroupCounts {
        self.counts
    }

    /// Total number of slots.
    pub const fn total_groups(&self) -> u64 {
        self.total
    }

    /// Bucket coordinates of `offset` along X, Y and T.
    ///
    /// # Errors
    ///
    /// Returns `IndexError::OutOfRange` if any component is outside its axis bounds.
    pub fn bucket_triple(&self, offset: NeighborOffset) -> Result<(u64, u64, u64), IndexError> {
        bucket_triple_of(&self.axes, offset)
    }

    /// Flat group index of `offset`, always `< total_groups()`.
    ///
    /// # Errors
    ///
    /// Returns `IndexError::OutOfRange` if any component is outside its axis bounds.
    pub fn group_index(&self, offset: NeighborOffset) -> Result<u64, IndexError> {
        let buckets = self.bucket_triple(offset)?;
        self.index_of_buckets(buckets)
    }

    /// Flat index of an already quantized bucket triple.
    ///
    /// # Errors
    ///
    /// Returns `IndexError::Overflow` if the weighted sum does not fit in a `u64`,
    /// which cannot happen for buckets produced by this mapper.
    pub(crate) fn index_of_buckets(&self, buckets: (u64, u64, u64)) -> Result<u64, IndexError> {
        let index = linearize(&self.counts, buckets)?;
        debug_assert!(index < self.total);
        Ok(index)
    }
}

fn counts_of(x: &AxisConfig, y: &AxisConfig, t: &AxisConfig) -> GroupCounts {
    GroupCounts {
        x_groups: x.group_count(),
        y_groups: y.group_count(),
        t_groups: t.group_count(),
    }
}

fn bucket_triple_of(
    axes: &[AxisConfig; 3],
    offset: NeighborOffset,
) -> Result<(u64, u64, u64), IndexError> {
    let [x, y, t] = axes;
    Ok((x.bucket(offset.x)?, y.bucket(offset.y)?, t.bucket(offset.t)?))
}

fn linearize(counts: &GroupCounts, (bx, by, bt): (u64, u64, u64)) -> Result<u64, IndexError> {
    let (x_block, y_block, t_block) = counts.block_sizes()?;
    x_block
        .checked_mul(bx)
        .and_then(|v| y_block.checked_mul(by).and_then(|w| v.checked_add(w)))
        .and_then(|v| t_block.checked_mul(bt).and_then(|w| v.checked_add(w)))
        .ok_or_else(|| IndexError::Overflow(format!("group index of buckets ({bx}, {by}, {bt})")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_block_sizes() {
        let counts = GroupCounts {
            x_groups: 9,
            y_groups: 9,
            t_groups: 4,
        };
        assert_eq!(counts.block_sizes().unwrap(), (36, 4, 1));
        assert_eq!(counts.total().unwrap(), 324);
    }

    #[test]
    fn test_total_overflow() {
        let counts = GroupCounts {
            x_groups: u64::MAX,
            y_groups: 2,
            t_groups: 1,
        };
        assert!(matches!(counts.total(), Err(IndexError::Overflow(_))));
    }

    #[test]
    fn test_mapper_matches_free_functions() {
        let config = DatabaseConfig::new(10, 7, 359, 3, 45);
        let mapper = IndexMapper::new(config).unwrap();
        let counts = compute_group_counts(&config).unwrap();
        assert_eq!(mapper.counts(), counts);
        assert_eq!(mapper.total_groups(), total_groups(&counts).unwrap());

        for x in -10..=10 {
            for y in -7..=7 {
                for t in (0..=359).step_by(13) {
                    let offset = NeighborOffset::new(x, y, t);
                    assert_eq!(
                        mapper.group_index(offset).unwrap(),
                        compute_group_index(&config, &counts, offset).unwrap()
                    );
                }
            }
        }
    }
}
