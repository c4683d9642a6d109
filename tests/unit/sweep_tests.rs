use histopack::core::{
    Capacity, HeuristicKind, ItemLimit, Shape, SizeHistogram, Sweep, sweep::compare_rows,
};

fn sample() -> SizeHistogram {
    [
        (Shape::new(5, 2), 3),
        (Shape::new(1, 6), 4),
        (Shape::new(2, 2), 9),
        (Shape::new(7, 1), 2),
    ]
    .into_iter()
    .collect()
}

#[test]
fn test_sweep_covers_grid() {
    let histogram = sample();
    let report = Sweep::new(&histogram, Capacity::new(8, 8))
        .limits(vec![ItemLimit::Bounded(2), ItemLimit::Unbounded])
        .run()
        .unwrap();
    assert_eq!(report.rows.len(), HeuristicKind::ALL.len() * 2);
    for kind in HeuristicKind::ALL {
        assert_eq!(report.rows.iter().filter(|r| r.heuristic == kind).count(), 2);
    }
}

#[test]
fn test_sweep_is_sorted_and_deterministic() {
    let histogram = sample();
    let sweep = Sweep::new(&histogram, Capacity::new(8, 8)).limits(vec![
        ItemLimit::Bounded(1),
        ItemLimit::Bounded(3),
        ItemLimit::Unbounded,
    ]);
    let first = sweep.run().unwrap();
    let second = sweep.run().unwrap();
    assert_eq!(first, second);
    for pair in first.rows.windows(2) {
        assert_ne!(compare_rows(&pair[0], &pair[1]), std::cmp::Ordering::Greater);
    }
}

#[test]
fn test_sweep_rows_match_single_runs() {
    let histogram = sample();
    let capacity = Capacity::new(8, 8);
    let report = Sweep::new(&histogram, capacity)
        .heuristics(vec![HeuristicKind::Sum])
        .limits(vec![ItemLimit::Bounded(4)])
        .run()
        .unwrap();
    let row = report.best().unwrap();
    let single = histopack::core::pack(
        &histogram,
        capacity,
        ItemLimit::Bounded(4),
        &HeuristicKind::Sum,
    )
    .unwrap();
    assert_eq!(row.efficiency, single.efficiency);
    assert_eq!(row.stats, single.stats);
    assert_eq!(row.resolved_limit, 4);
}
