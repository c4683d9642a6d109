//! Packing behaviour through the public API.

use histopack::core::{
    Capacity, FnHeuristic, HeuristicKind, HistogramPacker, ItemLimit, PackError, Shape,
    SizeHistogram, Strategy, pack,
};

fn histogram(entries: &[((u32, u32), u64)]) -> SizeHistogram {
    entries
        .iter()
        .map(|(shape, count)| (Shape::from(*shape), *count))
        .collect()
}

#[test]
fn test_one_item_per_pack() {
    let input = histogram(&[((2, 3), 5)]);
    let result = pack(
        &input,
        Capacity::new(4, 6),
        ItemLimit::Bounded(1),
        &HeuristicKind::Product,
    )
    .unwrap();

    assert_eq!(result.stats.total_packs, 5);
    assert!(result.strategies.iter().all(|s| s.items == vec![Shape::new(2, 3)]));
    assert!((result.efficiency.dim1 - 50.0).abs() < 1e-9);
    assert!((result.efficiency.dim2 - 50.0).abs() < 1e-9);
}

#[test]
fn test_pairs_fill_capacity_exactly() {
    let input = SizeHistogram::from_json_str(
        r#"[{"dim1": 2, "dim2": 3, "count": 3}, {"dim1": 2, "dim2": 3, "count": 1}]"#,
    )
    .unwrap();
    assert_eq!(input.count(Shape::new(2, 3)), 4);

    let result = pack(
        &input,
        Capacity::new(4, 6),
        ItemLimit::Bounded(2),
        &HeuristicKind::Product,
    )
    .unwrap();
    assert_eq!(
        result.strategies,
        vec![Strategy {
            items: vec![Shape::new(2, 3), Shape::new(2, 3)],
            repeat_count: 2,
        }]
    );
    assert!((result.efficiency.dim1 - 100.0).abs() < 1e-9);
    assert!((result.efficiency.dim2 - 100.0).abs() < 1e-9);
    assert!(result.degraded.is_none());
}

#[test]
fn test_oversized_item_in_either_dimension() {
    for shape in [(5, 1), (1, 7)] {
        let input = histogram(&[((1, 1), 10), (shape, 1)]);
        let err = pack(
            &input,
            Capacity::new(4, 6),
            ItemLimit::Unbounded,
            &HeuristicKind::Sum,
        )
        .unwrap_err();
        assert_eq!(
            err,
            PackError::InvalidCapacity {
                shape: Shape::from(shape),
                capacity: Capacity::new(4, 6),
            }
        );
    }
}

#[test]
fn test_empty_histogram() {
    let result = pack(
        &SizeHistogram::new(),
        Capacity::new(4, 6),
        ItemLimit::Unbounded,
        &HeuristicKind::Product,
    )
    .unwrap();
    assert!(result.is_empty());
    assert_eq!(result.efficiency.dim1, 0.0);
    assert_eq!(result.efficiency.dim2, 0.0);
    assert_eq!(result.stats.total_packs, 0);
    assert!(result.degraded.is_none());
}

#[test]
fn test_mixed_shapes_share_packs() {
    // Large items leave room that the small ones take.
    let input = histogram(&[((3, 5), 2), ((1, 1), 2)]);
    let result = pack(
        &input,
        Capacity::new(4, 6),
        ItemLimit::Unbounded,
        &HeuristicKind::Product,
    )
    .unwrap();
    assert_eq!(
        result.strategies,
        vec![Strategy {
            items: vec![Shape::new(3, 5), Shape::new(1, 1)],
            repeat_count: 2,
        }]
    );
    assert!((result.efficiency.dim1 - 100.0).abs() < 1e-9);
}

#[test]
fn test_custom_heuristic() {
    let by_area = FnHeuristic::new("area", |x, y| u64::from(x) * u64::from(y));
    let input = histogram(&[((2, 3), 4)]);
    let packer = HistogramPacker::new(Capacity::new(4, 6), ItemLimit::Bounded(2));

    let custom = packer.pack(&input, &by_area).unwrap();
    let builtin = packer.pack(&input, &HeuristicKind::Product).unwrap();
    assert_eq!(custom.heuristic, "area");
    assert_eq!(custom.strategies, builtin.strategies);
}

#[test]
fn test_heuristic_as_trait_object() {
    let heuristics: Vec<Box<dyn histopack::core::Heuristic>> = vec![
        Box::new(HeuristicKind::Max),
        Box::new(FnHeuristic::new("dim1-only", |x, _| u64::from(x))),
    ];
    let input = histogram(&[((2, 2), 3), ((1, 4), 2)]);
    for heuristic in &heuristics {
        let result = pack(
            &input,
            Capacity::new(4, 6),
            ItemLimit::Unbounded,
            heuristic.as_ref(),
        )
        .unwrap();
        assert_eq!(result.placed(Shape::new(2, 2)), 3);
        assert_eq!(result.placed(Shape::new(1, 4)), 2);
    }
}

#[test]
fn test_large_counts_scale_with_shapes() {
    let input = histogram(&[((1, 1), 1_000_000_000), ((3, 2), 7)]);
    let result = pack(
        &input,
        Capacity::new(4, 4),
        ItemLimit::Unbounded,
        &HeuristicKind::Product,
    )
    .unwrap();
    assert_eq!(result.stats.total_items, 1_000_000_007);
    assert!(result.strategies.len() <= 4);
    assert_eq!(result.placed(Shape::new(1, 1)), 1_000_000_000);
}

#[test]
fn test_result_is_serializable() {
    let input = histogram(&[((2, 3), 4)]);
    let result = pack(
        &input,
        Capacity::new(4, 6),
        ItemLimit::Bounded(2),
        &HeuristicKind::Product,
    )
    .unwrap();
    let json = serde_json::to_value(&result).unwrap();
    assert_eq!(json["heuristic"], "product");
    assert_eq!(json["max_items_per_pack"], 2);
    assert_eq!(json["strategies"][0]["items"][0]["dim1"], 2);
}

/// Raising the item limit lets the single (1, 1) pack take a (5, 0) early,
/// which strands two (0, 3) items in a pack of their own.
#[test]
fn test_larger_limit_can_lower_efficiency() {
    let input = histogram(&[((5, 0), 3), ((1, 1), 5), ((0, 3), 4)]);
    let run = |limit| {
        pack(
            &input,
            Capacity::new(6, 5),
            ItemLimit::Bounded(limit),
            &HeuristicKind::Product,
        )
        .unwrap()
    };

    let three = run(3);
    assert_eq!(three.stats.total_packs, 5);
    assert!((three.efficiency.dim1 - 200.0 / 3.0).abs() < 1e-9);
    assert!((three.efficiency.dim2 - 68.0).abs() < 1e-9);

    let four = run(4);
    assert_eq!(four.stats.total_packs, 6);
    assert!(four.strategies.contains(&Strategy {
        items: vec![Shape::new(0, 3)],
        repeat_count: 2,
    }));
    assert!((four.efficiency.dim1 - 500.0 / 9.0).abs() < 1e-9);
    assert!((four.efficiency.dim2 - 170.0 / 3.0).abs() < 1e-9);
    assert!(four.efficiency.dim1 < three.efficiency.dim1);
    assert!(four.efficiency.dim2 < three.efficiency.dim2);
}
