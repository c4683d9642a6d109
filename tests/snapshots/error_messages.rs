use insta::assert_snapshot;

use histopack::core::{Capacity, HeuristicKind, PackError, Shape};
use histopack::error::HpError;

#[test]
fn test_error_item_exceeds_capacity() {
    let err = HpError::from(PackError::InvalidCapacity {
        shape: Shape::new(5, 1),
        capacity: Capacity::new(4, 6),
    });
    assert_snapshot!(err.to_string(), @"item (5, 1) exceeds pack capacity (4, 6)");
    assert_snapshot!(err.to_structured().to_string(), @"[E101] item (5, 1) exceeds pack capacity (4, 6)");
}

#[test]
fn test_error_zero_capacity() {
    let err = HpError::from(PackError::ZeroCapacity {
        capacity: Capacity::new(0, 6),
    });
    assert_snapshot!(err.to_string(), @"pack capacity (0, 6) must be positive in both dimensions");
}

#[test]
fn test_error_item_limit() {
    let err = HpError::from(PackError::NonPositiveMaxItemsPerPack);
    assert_snapshot!(err.to_string(), @r#"max items per pack must be a positive integer or "max""#);
}

#[test]
fn test_error_unknown_heuristic() {
    let err = HpError::from("area".parse::<HeuristicKind>().unwrap_err());
    assert_snapshot!(err.to_string(), @"unknown heuristic 'area' (expected one of: product, sum, max, min, dim1, dim2)");
}

#[test]
fn test_error_missing_config() {
    let err = HpError::MissingConfig("packing.capacity_dim1".to_string());
    assert_snapshot!(err.to_string(), @"Missing required config: packing.capacity_dim1");
}
