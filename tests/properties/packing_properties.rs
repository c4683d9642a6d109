use proptest::prelude::*;

use histopack::core::{
    Capacity, HeuristicKind, ItemLimit, PackingResult, Shape, SizeHistogram, pack,
};

fn arb_heuristic() -> impl Strategy<Value = HeuristicKind> {
    prop::sample::select(HeuristicKind::ALL.to_vec())
}

fn arb_limit() -> impl Strategy<Value = ItemLimit> {
    prop_oneof![
        (1u32..6).prop_map(ItemLimit::Bounded),
        Just(ItemLimit::Unbounded),
    ]
}

/// Capacity plus a histogram whose shapes all fit in it.
fn arb_case() -> impl Strategy<Value = (Capacity, SizeHistogram)> {
    (1u32..24, 1u32..24).prop_flat_map(|(cap1, cap2)| {
        let entry = (0..=cap1, 0..=cap2, 1u64..40);
        prop::collection::vec(entry, 0..12).prop_map(move |entries| {
            let histogram = entries
                .into_iter()
                .map(|(d1, d2, count)| (Shape::new(d1, d2), count))
                .collect();
            (Capacity::new(cap1, cap2), histogram)
        })
    })
}

fn run(
    capacity: Capacity,
    histogram: &SizeHistogram,
    limit: ItemLimit,
    heuristic: HeuristicKind,
) -> PackingResult {
    pack(histogram, capacity, limit, &heuristic).unwrap()
}

proptest! {
    #[test]
    fn every_item_is_placed_exactly_once(
        (capacity, histogram) in arb_case(),
        limit in arb_limit(),
        heuristic in arb_heuristic(),
    ) {
        let result = run(capacity, &histogram, limit, heuristic);
        for (shape, count) in histogram.iter() {
            prop_assert_eq!(result.placed(shape), count);
        }
        prop_assert_eq!(result.stats.total_items, histogram.total_items());
    }

    #[test]
    fn packs_respect_capacity_and_limit(
        (capacity, histogram) in arb_case(),
        limit in arb_limit(),
        heuristic in arb_heuristic(),
    ) {
        let result = run(capacity, &histogram, limit, heuristic);
        let resolved = limit.resolve(capacity).unwrap() as usize;
        for strategy in &result.strategies {
            prop_assert!(strategy.repeat_count > 0);
            prop_assert!(!strategy.items.is_empty());
            prop_assert!(strategy.items.len() <= resolved);
            prop_assert!(strategy.dim1_sum() <= u64::from(capacity.dim1));
            prop_assert!(strategy.dim2_sum() <= u64::from(capacity.dim2));
        }
    }

    #[test]
    fn compositions_are_distinct(
        (capacity, histogram) in arb_case(),
        limit in arb_limit(),
        heuristic in arb_heuristic(),
    ) {
        let result = run(capacity, &histogram, limit, heuristic);
        let mut seen = std::collections::HashSet::new();
        for strategy in &result.strategies {
            prop_assert!(seen.insert(strategy.items.clone()));
        }
    }

    #[test]
    fn packing_is_deterministic(
        (capacity, histogram) in arb_case(),
        limit in arb_limit(),
        heuristic in arb_heuristic(),
    ) {
        let first = run(capacity, &histogram, limit, heuristic);
        let second = run(capacity, &histogram, limit, heuristic);
        prop_assert_eq!(first, second);
    }

    #[test]
    fn efficiency_is_a_percentage(
        (capacity, histogram) in arb_case(),
        limit in arb_limit(),
        heuristic in arb_heuristic(),
    ) {
        let result = run(capacity, &histogram, limit, heuristic);
        for value in [result.efficiency.dim1, result.efficiency.dim2] {
            prop_assert!((0.0..=100.0 + 1e-9).contains(&value));
        }
        if let Some(degraded) = result.degraded {
            prop_assert!(degraded.effective.dim1 <= capacity.dim1);
            prop_assert!(degraded.effective.dim2 <= capacity.dim2);
            prop_assert_ne!(degraded.effective, capacity);
        }
    }

    #[test]
    fn pack_count_is_bounded(
        (capacity, histogram) in arb_case(),
        limit in arb_limit(),
        heuristic in arb_heuristic(),
    ) {
        let result = run(capacity, &histogram, limit, heuristic);
        let total = histogram.total_items();
        let resolved = u64::from(limit.resolve(capacity).unwrap());
        prop_assert!(result.stats.total_packs <= total);
        prop_assert!(result.stats.total_packs >= total.div_ceil(resolved));
    }

    #[test]
    fn single_item_limit_uses_one_pack_per_item(
        (capacity, histogram) in arb_case(),
        heuristic in arb_heuristic(),
    ) {
        let result = run(capacity, &histogram, ItemLimit::Bounded(1), heuristic);
        prop_assert_eq!(result.stats.total_packs, histogram.total_items());
        prop_assert_eq!(result.strategies.len(), histogram.len());
    }

    #[test]
    fn combining_never_loses_to_one_item_packs(
        (capacity, histogram) in arb_case(),
        limit in arb_limit(),
        heuristic in arb_heuristic(),
    ) {
        let single = run(capacity, &histogram, ItemLimit::Bounded(1), heuristic);
        let combined = run(capacity, &histogram, limit, heuristic);
        prop_assert!(combined.stats.total_packs <= single.stats.total_packs);
        prop_assert!(combined.efficiency.dim1 >= single.efficiency.dim1 - 1e-9);
        prop_assert!(combined.efficiency.dim2 >= single.efficiency.dim2 - 1e-9);
    }

    #[test]
    fn item_limit_parses_integers(value in 0u32..100_000) {
        prop_assert_eq!(value.to_string().parse::<ItemLimit>(), Ok(ItemLimit::Bounded(value)));
    }
}
