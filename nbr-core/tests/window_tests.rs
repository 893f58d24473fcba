use nbr_core::{
    compatible_group_indices, Axis, DatabaseConfig, IndexError, IndexMapper, MatchTolerance,
    NeighborOffset,
};
use std::collections::BTreeSet;

fn reference_mapper() -> IndexMapper {
    IndexMapper::new(DatabaseConfig::reference()).expect("reference config must be valid")
}

#[test]
fn test_zero_tolerance_is_the_own_group() {
    let mapper = reference_mapper();
    let offset = NeighborOffset::new(4, -4, 180);
    let indices =
        compatible_group_indices(&mapper, offset, MatchTolerance::new(0, 0, 0)).unwrap();
    assert_eq!(indices, vec![290]);
}

#[test]
fn test_window_clamped_at_grid_corner() {
    let mapper = reference_mapper();
    // x in [2, 4] -> buckets 6..=8, y in [-4, -3] -> buckets 0..=1, t bucket 2 only
    let indices = compatible_group_indices(
        &mapper,
        NeighborOffset::new(4, -4, 180),
        MatchTolerance::new(2, 1, 0),
    )
    .unwrap();

    let mut expected = Vec::new();
    for bx in 6..=8u64 {
        for by in 0..=1u64 {
            expected.push(36 * bx + 4 * by + 2);
        }
    }
    assert_eq!(indices, expected);
}

#[test]
fn test_angle_window_wraps_around() {
    let mapper = reference_mapper();
    let indices = compatible_group_indices(
        &mapper,
        NeighborOffset::new(-4, -4, 3),
        MatchTolerance::new(0, 0, 7),
    )
    .unwrap();
    // t window [356, 359] + [0, 10] -> T buckets 3 and 0
    assert_eq!(indices, vec![0, 3]);
}

#[test]
fn test_window_contains_every_match_within_tolerance() {
    let mapper = IndexMapper::new(DatabaseConfig::new(12, 9, 359, 2, 15)).unwrap();
    let tolerance = MatchTolerance::new(3, 2, 20);
    let query = NeighborOffset::new(-11, 8, 350);

    let window: BTreeSet<u64> = compatible_group_indices(&mapper, query, tolerance)
        .unwrap()
        .into_iter()
        .collect();

    // Every stored neighbor within tolerance must land in one of the window's groups.
    for dx in -tolerance.x..=tolerance.x {
        for dy in -tolerance.y..=tolerance.y {
            for dt in -tolerance.t..=tolerance.t {
                let x = query.x + dx;
                let y = query.y + dy;
                let t = (query.t + dt).rem_euclid(360);
                let Ok(index) = mapper.group_index(NeighborOffset::new(x, y, t)) else {
                    continue;
                };
                assert!(window.contains(&index), "missing group {index} for ({x}, {y}, {t})");
            }
        }
    }
}

#[test]
fn test_window_rejects_out_of_range_query() {
    let mapper = reference_mapper();
    let err = compatible_group_indices(
        &mapper,
        NeighborOffset::new(0, 0, 400),
        MatchTolerance::default(),
    )
    .unwrap_err();
    assert!(matches!(err, IndexError::OutOfRange { axis: Axis::T, value: 400, .. }));
}

#[test]
fn test_window_rejects_negative_tolerance() {
    let mapper = reference_mapper();
    assert!(matches!(
        compatible_group_indices(
            &mapper,
            NeighborOffset::default(),
            MatchTolerance::new(0, 0, -1)
        ),
        Err(IndexError::InvalidConfig {
            field: "t_tolerance",
            ..
        })
    ));
}

#[test]
fn test_angle_window_near_max_of_huge_angle_axis() {
    let mapper =
        IndexMapper::new(DatabaseConfig::new(0, 0, i64::MAX - 1, 1, i64::MAX / 4)).unwrap();
    let indices = compatible_group_indices(
        &mapper,
        NeighborOffset::new(0, 0, i64::MAX - 1),
        MatchTolerance::new(0, 0, 1_000_000_000_000_000_000),
    )
    .unwrap();
    // One X and one Y bucket, so indices are the T buckets: the last two plus the wrapped first.
    assert_eq!(indices, vec![0, 3, 4]);
}
