//! Dual longest-pack-first histogram packing.
//!
//! Items are ranked by heuristic score (largest first) and each one is placed
//! into the open composition with the smallest remaining-capacity score that
//! is at least the item's own score and still respects both capacity limits.
//! Work is proportional to the number of distinct shapes, not the number of
//! items: every composition carries a repeat count.

use std::collections::HashMap;
use std::time::Instant;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, info_span, warn};

use super::efficiency::{
    DegradedCapacity, PackingStats, TokenEfficiency, detect_degradation, token_efficiency,
};
use super::heuristic::Heuristic;
use super::histogram::SizeHistogram;
use super::open_set::{OpenStrategies, OpenStrategy};
use super::shape::{Capacity, ItemLimit, Score, Shape};

/// One pack composition and how many packs use it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Strategy {
    pub items: Vec<Shape>,
    pub repeat_count: u64,
}

impl Strategy {
    #[must_use]
    pub fn dim1_sum(&self) -> u64 {
        self.items.iter().map(|item| u64::from(item.dim1)).sum()
    }

    #[must_use]
    pub fn dim2_sum(&self) -> u64 {
        self.items.iter().map(|item| u64::from(item.dim2)).sum()
    }

    /// Occurrences of `shape` in a single pack of this composition.
    #[must_use]
    pub fn occurrences(&self, shape: Shape) -> u64 {
        self.items.iter().filter(|item| **item == shape).count() as u64
    }
}

/// Output of a packing pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PackingResult {
    pub heuristic: String,
    pub capacity: Capacity,
    pub max_items_per_pack: u32,
    pub strategies: Vec<Strategy>,
    pub efficiency: TokenEfficiency,
    pub stats: PackingStats,
    /// Present when no pack reaches the requested capacity in some dimension.
    pub degraded: Option<DegradedCapacity>,
}

impl PackingResult {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.strategies.is_empty()
    }

    /// Packs of `shape` across all strategies, weighted by repeat count.
    #[must_use]
    pub fn placed(&self, shape: Shape) -> u64 {
        self.strategies
            .iter()
            .map(|s| s.repeat_count * s.occurrences(shape))
            .sum()
    }
}

/// Precondition violations; checked before any packing work.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PackError {
    #[error("item {shape} exceeds pack capacity {capacity}")]
    InvalidCapacity { shape: Shape, capacity: Capacity },

    #[error("pack capacity {capacity} must be positive in both dimensions")]
    ZeroCapacity { capacity: Capacity },

    #[error("max items per pack must be a positive integer or \"max\"")]
    NonPositiveMaxItemsPerPack,
}

/// Packs size histograms under a fixed capacity and item limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HistogramPacker {
    pub capacity: Capacity,
    pub max_items_per_pack: ItemLimit,
}

impl HistogramPacker {
    #[must_use]
    pub const fn new(capacity: Capacity, max_items_per_pack: ItemLimit) -> Self {
        Self {
            capacity,
            max_items_per_pack,
        }
    }

    /// Validates inputs and returns the resolved item limit.
    pub fn validate(&self, histogram: &SizeHistogram) -> Result<u32, PackError> {
        let capacity = self.capacity;
        if !capacity.is_positive() {
            return Err(PackError::ZeroCapacity { capacity });
        }
        let limit = self
            .max_items_per_pack
            .resolve(capacity)
            .ok_or(PackError::NonPositiveMaxItemsPerPack)?;
        if let Some((shape, _)) = histogram.iter().find(|(shape, _)| !capacity.fits(*shape)) {
            return Err(PackError::InvalidCapacity { shape, capacity });
        }
        Ok(limit)
    }

    pub fn pack<H>(&self, histogram: &SizeHistogram, heuristic: &H) -> Result<PackingResult, PackError>
    where
        H: Heuristic + ?Sized,
    {
        let limit = self.validate(histogram)?;
        let capacity = self.capacity;
        let span = info_span!(
            "pack",
            heuristic = heuristic.name(),
            capacity = %capacity,
            limit,
            shapes = histogram.len()
        );
        let _guard = span.enter();
        let started = Instant::now();

        let ranked = rank(histogram, heuristic);
        let max_score = heuristic.score(capacity.dim1, capacity.dim2);
        debug!(items = ranked.len(), max_score, "ranked histogram");

        let mut book = StrategyBook::new(capacity, limit);
        for item in &ranked {
            let mut remaining = item.count;
            while remaining > 0 {
                let found = book.open.pop_best_fit(item.priority, max_score, remaining, |open| {
                    capacity.fits_after(open.used, item.shape)
                });
                let Some(open) = found else {
                    book.open_fresh(item.shape, remaining, heuristic);
                    break;
                };
                remaining -= open.pending;
                let mut items = open.items;
                items.push(item.shape);
                book.place(items, open.pending, heuristic);
            }
        }
        debug!(
            open = book.open.len(),
            closed = book.closed.len(),
            "placement finished"
        );

        let strategies = book.finish();
        let efficiency = token_efficiency(&strategies, capacity);
        let stats = PackingStats::from_strategies(&strategies);
        let degraded = detect_degradation(&strategies, capacity);
        if let Some(degraded) = &degraded {
            warn!(
                requested = %degraded.requested,
                effective = %degraded.effective,
                "no pack reaches the requested capacity; capacity tightened"
            );
        }
        info!(
            strategies = strategies.len(),
            packs = stats.total_packs,
            items = stats.total_items,
            efficiency_dim1 = efficiency.dim1,
            efficiency_dim2 = efficiency.dim2,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "packing complete"
        );

        Ok(PackingResult {
            heuristic: heuristic.name().to_string(),
            capacity,
            max_items_per_pack: limit,
            strategies,
            efficiency,
            stats,
            degraded,
        })
    }
}

/// Convenience wrapper around [`HistogramPacker::pack`].
pub fn pack<H>(
    histogram: &SizeHistogram,
    capacity: Capacity,
    max_items_per_pack: ItemLimit,
    heuristic: &H,
) -> Result<PackingResult, PackError>
where
    H: Heuristic + ?Sized,
{
    HistogramPacker::new(capacity, max_items_per_pack).pack(histogram, heuristic)
}

#[derive(Debug, Clone, Copy)]
struct RankedItem {
    priority: Score,
    shape: Shape,
    count: u64,
    order: usize,
}

/// Descending priority, then descending dim1, dim2, then histogram order.
fn rank<H: Heuristic + ?Sized>(histogram: &SizeHistogram, heuristic: &H) -> Vec<RankedItem> {
    let mut ranked: Vec<RankedItem> = histogram
        .iter()
        .enumerate()
        .map(|(order, (shape, count))| RankedItem {
            priority: heuristic.score_shape(shape),
            shape,
            count,
            order,
        })
        .collect();
    ranked.sort_by(|a, b| {
        b.priority
            .cmp(&a.priority)
            .then_with(|| b.shape.dim1.cmp(&a.shape.dim1))
            .then_with(|| b.shape.dim2.cmp(&a.shape.dim2))
            .then_with(|| a.order.cmp(&b.order))
    });
    ranked
}

/// Open and closed compositions of one pass.
struct StrategyBook {
    capacity: Capacity,
    limit: u32,
    open: OpenStrategies,
    closed: Vec<Strategy>,
}

impl StrategyBook {
    fn new(capacity: Capacity, limit: u32) -> Self {
        Self {
            capacity,
            limit,
            open: OpenStrategies::new(),
            closed: Vec::new(),
        }
    }

    /// Files `count` packs of `items` as open or closed.
    ///
    /// A composition closes once it fills either dimension, its remaining
    /// score is zero, or it holds `limit` items.
    fn place<H: Heuristic + ?Sized>(&mut self, items: Vec<Shape>, count: u64, heuristic: &H) {
        let strategy = OpenStrategy::new(items, count);
        let remaining = self.capacity.remaining(strategy.used);
        let score = heuristic.score_shape(remaining);
        let filled = remaining.dim1 == 0 || remaining.dim2 == 0;
        if filled || score == 0 || strategy.items.len() >= self.limit as usize {
            self.closed.push(Strategy {
                items: strategy.items,
                repeat_count: strategy.pending,
            });
        } else {
            self.open.insert(score, strategy);
        }
    }

    /// Opens new packs for `count` copies of `shape` that fit nowhere else.
    ///
    /// Copies of the same shape are stacked into each new pack as far as
    /// capacity and the item limit allow, which is what placing them one at a
    /// time would produce: no other open pack accepted the shape, so each
    /// copy lands in the pack opened by the previous ones until it is full.
    ///
    /// At most two compositions are created, each holding `min(count, limit)`
    /// items, so a large count costs repeat count rather than memory. Zero-size
    /// shapes stack up to the item limit, which for `Unbounded` is the smaller
    /// capacity dimension.
    fn open_fresh<H: Heuristic + ?Sized>(&mut self, shape: Shape, count: u64, heuristic: &H) {
        let depth = stack_depth(shape, self.capacity, self.limit);
        let full = count / depth;
        let rest = count % depth;
        if full > 0 {
            self.place(vec![shape; depth as usize], full, heuristic);
        }
        if rest > 0 {
            self.place(vec![shape; rest as usize], 1, heuristic);
        }
    }

    /// Closed compositions first, then open ones by ascending score, with
    /// identical compositions merged.
    fn finish(mut self) -> Vec<Strategy> {
        let open = self.open.drain().map(|(_, strategy)| Strategy {
            items: strategy.items,
            repeat_count: strategy.pending,
        });
        let mut merged: Vec<Strategy> = Vec::with_capacity(self.closed.len());
        let mut index: HashMap<Vec<Shape>, usize> = HashMap::new();
        for strategy in self.closed.into_iter().chain(open) {
            if let Some(&pos) = index.get(&strategy.items) {
                merged[pos].repeat_count += strategy.repeat_count;
            } else {
                index.insert(strategy.items.clone(), merged.len());
                merged.push(strategy);
            }
        }
        merged
    }
}

/// How many copies of `shape` fit in one pack.
fn stack_depth(shape: Shape, capacity: Capacity, limit: u32) -> u64 {
    let per_dim = |size: u32, cap: u32| if size == 0 { u32::MAX } else { cap / size };
    u64::from(
        per_dim(shape.dim1, capacity.dim1)
            .min(per_dim(shape.dim2, capacity.dim2))
            .min(limit)
            .max(1),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::heuristic::{FnHeuristic, HeuristicKind};

    fn histogram(entries: &[((u32, u32), u64)]) -> SizeHistogram {
        entries
            .iter()
            .map(|(shape, count)| (Shape::from(*shape), *count))
            .collect()
    }

    fn assert_conserved(input: &SizeHistogram, result: &PackingResult) {
        for (shape, count) in input.iter() {
            assert_eq!(result.placed(shape), count, "shape {shape} not conserved");
        }
        assert_eq!(result.stats.total_items, input.total_items());
    }

    #[test]
    fn single_item_packs_when_limit_is_one() {
        let input = histogram(&[((2, 3), 5)]);
        let result = pack(
            &input,
            Capacity::new(4, 6),
            ItemLimit::Bounded(1),
            &HeuristicKind::Product,
        )
        .unwrap();
        assert_eq!(
            result.strategies,
            vec![Strategy {
                items: vec![Shape::new(2, 3)],
                repeat_count: 5
            }]
        );
        assert!((result.efficiency.dim1 - 50.0).abs() < 1e-9);
        assert!((result.efficiency.dim2 - 50.0).abs() < 1e-9);
    }

    #[test]
    fn identical_items_pair_up() {
        let input = histogram(&[((2, 3), 3), ((2, 3), 1)]);
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
                repeat_count: 2
            }]
        );
        assert!((result.efficiency.dim1 - 100.0).abs() < 1e-9);
        assert!((result.efficiency.dim2 - 100.0).abs() < 1e-9);
        assert!(result.degraded.is_none());
    }

    #[test]
    fn odd_count_leaves_one_partial_pack() {
        let input = histogram(&[((2, 3), 5)]);
        let result = pack(
            &input,
            Capacity::new(4, 6),
            ItemLimit::Unbounded,
            &HeuristicKind::Product,
        )
        .unwrap();
        assert_eq!(result.stats.total_packs, 3);
        assert_eq!(result.strategies.len(), 2);
        assert_eq!(result.strategies[0].items.len(), 2);
        assert_eq!(result.strategies[0].repeat_count, 2);
        assert_eq!(result.strategies[1].items, vec![Shape::new(2, 3)]);
        assert_conserved(&input, &result);
    }

    #[test]
    fn small_items_fill_large_packs() {
        // (6, 6) leaves (4, 4) -> score 16; (2, 2) scores 4 and fits twice.
        let input = histogram(&[((6, 6), 2), ((2, 2), 4)]);
        let result = pack(
            &input,
            Capacity::new(10, 10),
            ItemLimit::Unbounded,
            &HeuristicKind::Product,
        )
        .unwrap();
        assert_eq!(
            result.strategies,
            vec![Strategy {
                items: vec![Shape::new(6, 6), Shape::new(2, 2), Shape::new(2, 2)],
                repeat_count: 2
            }]
        );
        assert_conserved(&input, &result);
    }

    #[test]
    fn best_fit_prefers_tightest_pack() {
        // Open packs after the large items: (7, 7) -> remaining (3, 3) = 9,
        // (5, 5) -> remaining (5, 5) = 25. A (3, 3) item (score 9) must pick
        // the tighter pack.
        let input = histogram(&[((7, 7), 1), ((5, 5), 1), ((3, 3), 1)]);
        let result = pack(
            &input,
            Capacity::new(10, 10),
            ItemLimit::Unbounded,
            &HeuristicKind::Product,
        )
        .unwrap();
        assert!(result.strategies.contains(&Strategy {
            items: vec![Shape::new(7, 7), Shape::new(3, 3)],
            repeat_count: 1
        }));
        assert!(result.strategies.contains(&Strategy {
            items: vec![Shape::new(5, 5)],
            repeat_count: 1
        }));
    }

    #[test]
    fn infeasible_key_match_is_skipped() {
        // (9, 1) leaves (1, 9) = 9; (3, 3) scores 9 but needs 3 in dim1.
        let input = histogram(&[((9, 1), 1), ((3, 3), 1)]);
        let result = pack(
            &input,
            Capacity::new(10, 10),
            ItemLimit::Unbounded,
            &HeuristicKind::Product,
        )
        .unwrap();
        assert_eq!(result.stats.total_packs, 2);
        for strategy in &result.strategies {
            assert!(strategy.dim1_sum() <= 10 && strategy.dim2_sum() <= 10);
        }
    }

    #[test]
    fn partial_overlap_splits_counts() {
        // 3 open packs of (6, 6); 5 items of (4, 4): 3 join, 2 start fresh.
        let input = histogram(&[((6, 6), 3), ((4, 4), 5)]);
        let result = pack(
            &input,
            Capacity::new(10, 10),
            ItemLimit::Unbounded,
            &HeuristicKind::Product,
        )
        .unwrap();
        assert!(result.strategies.contains(&Strategy {
            items: vec![Shape::new(6, 6), Shape::new(4, 4)],
            repeat_count: 3
        }));
        assert!(result.strategies.contains(&Strategy {
            items: vec![Shape::new(4, 4), Shape::new(4, 4)],
            repeat_count: 1
        }));
        assert_conserved(&input, &result);
    }

    #[test]
    fn item_limit_closes_compositions() {
        let input = histogram(&[((1, 1), 9)]);
        let result = pack(
            &input,
            Capacity::new(100, 100),
            ItemLimit::Bounded(3),
            &HeuristicKind::Sum,
        )
        .unwrap();
        assert_eq!(
            result.strategies,
            vec![Strategy {
                items: vec![Shape::new(1, 1); 3],
                repeat_count: 3
            }]
        );
        assert_eq!(result.max_items_per_pack, 3);
    }

    #[test]
    fn full_dimension_closes_under_sum() {
        let input = histogram(&[((4, 2), 1), ((0, 1), 3)]);
        let result = pack(
            &input,
            Capacity::new(4, 6),
            ItemLimit::Unbounded,
            &HeuristicKind::Sum,
        )
        .unwrap();
        assert_eq!(
            result.strategies,
            vec![
                Strategy {
                    items: vec![Shape::new(4, 2)],
                    repeat_count: 1
                },
                Strategy {
                    items: vec![Shape::new(0, 1); 3],
                    repeat_count: 1
                },
            ]
        );
        assert_conserved(&input, &result);
    }

    #[test]
    fn zero_size_items_stack_to_the_limit() {
        let input = histogram(&[((0, 0), 1_000_000)]);
        let result = pack(
            &input,
            Capacity::new(4, 6),
            ItemLimit::Bounded(3),
            &HeuristicKind::Product,
        )
        .unwrap();
        assert_eq!(
            result.strategies,
            vec![
                Strategy {
                    items: vec![Shape::new(0, 0); 3],
                    repeat_count: 333_333
                },
                Strategy {
                    items: vec![Shape::new(0, 0)],
                    repeat_count: 1
                },
            ]
        );
    }

    #[test]
    fn unbounded_limit_caps_at_smaller_capacity() {
        let input = histogram(&[((0, 1), 10)]);
        let result = pack(
            &input,
            Capacity::new(4, 100),
            ItemLimit::Unbounded,
            &HeuristicKind::Dim2,
        )
        .unwrap();
        assert_eq!(result.max_items_per_pack, 4);
        assert!(result.strategies.iter().all(|s| s.items.len() <= 4));
        assert_conserved(&input, &result);
    }

    #[test]
    fn oversized_item_is_rejected() {
        let input = histogram(&[((1, 1), 3), ((5, 1), 1)]);
        let err = pack(
            &input,
            Capacity::new(4, 6),
            ItemLimit::Unbounded,
            &HeuristicKind::Product,
        )
        .unwrap_err();
        assert_eq!(
            err,
            PackError::InvalidCapacity {
                shape: Shape::new(5, 1),
                capacity: Capacity::new(4, 6)
            }
        );
    }

    #[test]
    fn zero_limit_is_rejected() {
        let input = histogram(&[((1, 1), 3)]);
        let err = pack(
            &input,
            Capacity::new(4, 6),
            ItemLimit::Bounded(0),
            &HeuristicKind::Product,
        )
        .unwrap_err();
        assert_eq!(err, PackError::NonPositiveMaxItemsPerPack);
    }

    #[test]
    fn zero_capacity_is_rejected() {
        let err = pack(
            &SizeHistogram::new(),
            Capacity::new(0, 6),
            ItemLimit::Unbounded,
            &HeuristicKind::Product,
        )
        .unwrap_err();
        assert!(matches!(err, PackError::ZeroCapacity { .. }));
    }

    #[test]
    fn empty_histogram_yields_empty_result() {
        let result = pack(
            &SizeHistogram::new(),
            Capacity::new(4, 6),
            ItemLimit::Unbounded,
            &HeuristicKind::Product,
        )
        .unwrap();
        assert!(result.is_empty());
        assert_eq!(result.efficiency, TokenEfficiency::default());
        assert!(result.degraded.is_none());
    }

    #[test]
    fn non_monotonic_heuristic_still_places_everything() {
        let odd = FnHeuristic::new("odd", |x, y| u64::from((x * 7 + y * 3) % 5));
        let input = histogram(&[((3, 2), 4), ((1, 5), 2), ((2, 2), 7)]);
        let result = pack(&input, Capacity::new(8, 8), ItemLimit::Unbounded, &odd).unwrap();
        assert_conserved(&input, &result);
        assert_eq!(result.heuristic, "odd");
        for strategy in &result.strategies {
            assert!(strategy.dim1_sum() <= 8 && strategy.dim2_sum() <= 8);
        }
    }

    #[test]
    fn ranking_breaks_ties_by_dimensions() {
        let input = histogram(&[((2, 6), 1), ((3, 4), 1), ((6, 2), 1)]);
        let ranked = rank(&input, &HeuristicKind::Product);
        let shapes: Vec<Shape> = ranked.iter().map(|item| item.shape).collect();
        assert_eq!(
            shapes,
            vec![Shape::new(6, 2), Shape::new(3, 4), Shape::new(2, 6)]
        );
    }

    #[test]
    fn stack_depth_respects_every_bound() {
        let capacity = Capacity::new(10, 9);
        assert_eq!(stack_depth(Shape::new(3, 2), capacity, 100), 3);
        assert_eq!(stack_depth(Shape::new(1, 4), capacity, 100), 2);
        assert_eq!(stack_depth(Shape::new(1, 1), capacity, 5), 5);
        assert_eq!(stack_depth(Shape::new(0, 0), capacity, 7), 7);
        assert_eq!(stack_depth(Shape::new(10, 9), capacity, 7), 1);
    }
}
