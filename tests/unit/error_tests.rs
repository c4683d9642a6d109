use histopack::core::{Capacity, HeuristicKind, PackError, Shape};
use histopack::error::{ErrorCode, HpError, StructuredError};

#[test]
fn test_every_pack_error_has_a_packing_code() {
    let errors = [
        PackError::InvalidCapacity {
            shape: Shape::new(9, 9),
            capacity: Capacity::new(4, 6),
        },
        PackError::ZeroCapacity {
            capacity: Capacity::new(0, 6),
        },
        PackError::NonPositiveMaxItemsPerPack,
    ];
    for err in errors {
        let structured: StructuredError = HpError::from(err).into();
        assert_eq!(structured.category, "packing");
        assert!(structured.recoverable);
    }
}

#[test]
fn test_unknown_heuristic_converts() {
    let err: HpError = "area".parse::<HeuristicKind>().unwrap_err().into();
    assert_eq!(err.code(), ErrorCode::HeuristicUnknown);
    let structured = err.to_structured();
    assert_eq!(structured.numeric_code, 104);
    assert_eq!(structured.context.unwrap()["heuristic"], "area");
}

#[test]
fn test_json_error_is_serialization() {
    let err: HpError = serde_json::from_str::<serde_json::Value>("{").unwrap_err().into();
    assert_eq!(err.code(), ErrorCode::SerializationError);
    assert!(!err.code().is_recoverable());
}

#[test]
fn test_structured_error_json_shape() {
    let err = HpError::MissingConfig("packing.capacity_dim2".into());
    let json = serde_json::to_value(err.to_structured()).unwrap();
    assert_eq!(json["code"], "CONFIG_MISSING_REQUIRED");
    assert_eq!(json["numeric_code"], 304);
    assert!(
        json["suggestion"]
            .as_str()
            .unwrap()
            .contains("HISTOPACK_CAPACITY_DIM2")
    );
}
