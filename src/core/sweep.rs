//! Parameter sweeps over heuristics and item limits.

use std::cmp::Ordering;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::efficiency::{PackingStats, TokenEfficiency};
use super::heuristic::HeuristicKind;
use super::histogram::SizeHistogram;
use super::packing::{HistogramPacker, PackError};
use super::shape::{Capacity, ItemLimit};

/// Outcome of one grid point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SweepRow {
    pub heuristic: HeuristicKind,
    pub max_items_per_pack: ItemLimit,
    pub resolved_limit: u32,
    pub efficiency: TokenEfficiency,
    pub harmonic_mean: f64,
    pub stats: PackingStats,
    pub degraded: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SweepReport {
    pub capacity: Capacity,
    /// Best first.
    pub rows: Vec<SweepRow>,
}

impl SweepReport {
    #[must_use]
    pub fn best(&self) -> Option<&SweepRow> {
        self.rows.first()
    }
}

/// Grid of packing runs over one histogram and capacity.
#[derive(Debug, Clone)]
pub struct Sweep<'a> {
    histogram: &'a SizeHistogram,
    capacity: Capacity,
    heuristics: Vec<HeuristicKind>,
    limits: Vec<ItemLimit>,
    parallel: bool,
}

impl<'a> Sweep<'a> {
    #[must_use]
    pub fn new(histogram: &'a SizeHistogram, capacity: Capacity) -> Self {
        Self {
            histogram,
            capacity,
            heuristics: HeuristicKind::ALL.to_vec(),
            limits: vec![ItemLimit::Unbounded],
            parallel: true,
        }
    }

    #[must_use]
    pub fn heuristics(mut self, heuristics: impl Into<Vec<HeuristicKind>>) -> Self {
        self.heuristics = heuristics.into();
        self
    }

    #[must_use]
    pub fn limits(mut self, limits: impl Into<Vec<ItemLimit>>) -> Self {
        self.limits = limits.into();
        self
    }

    #[must_use]
    pub const fn parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    #[must_use]
    pub fn grid_len(&self) -> usize {
        self.heuristics.len() * self.limits.len()
    }

    pub fn run(&self) -> Result<SweepReport, PackError> {
        self.run_with(|_| {})
    }

    /// Runs the grid, calling `on_row` as each point completes.
    ///
    /// Row order is independent of `parallel`: harmonic mean descending, then
    /// fewer packs, then grid order (heuristics outer, limits inner).
    pub fn run_with<F>(&self, on_row: F) -> Result<SweepReport, PackError>
    where
        F: Fn(&SweepRow) + Sync,
    {
        let grid: Vec<(usize, HeuristicKind, ItemLimit)> = self
            .heuristics
            .iter()
            .flat_map(|h| self.limits.iter().map(move |l| (*h, *l)))
            .enumerate()
            .map(|(idx, (h, l))| (idx, h, l))
            .collect();
        debug!(points = grid.len(), parallel = self.parallel, "starting sweep");

        let evaluate = |&(idx, heuristic, limit): &(usize, HeuristicKind, ItemLimit)| {
            let row = self.evaluate(heuristic, limit)?;
            on_row(&row);
            Ok::<_, PackError>((idx, row))
        };
        let mut rows: Vec<(usize, SweepRow)> = if self.parallel {
            grid.par_iter().map(evaluate).collect::<Result<_, _>>()?
        } else {
            grid.iter().map(evaluate).collect::<Result<_, _>>()?
        };

        rows.sort_by(|(ia, a), (ib, b)| compare_rows(a, b).then_with(|| ia.cmp(ib)));
        Ok(SweepReport {
            capacity: self.capacity,
            rows: rows.into_iter().map(|(_, row)| row).collect(),
        })
    }

    fn evaluate(&self, heuristic: HeuristicKind, limit: ItemLimit) -> Result<SweepRow, PackError> {
        let result = HistogramPacker::new(self.capacity, limit).pack(self.histogram, &heuristic)?;
        Ok(SweepRow {
            heuristic,
            max_items_per_pack: limit,
            resolved_limit: result.max_items_per_pack,
            harmonic_mean: result.efficiency.harmonic_mean(),
            efficiency: result.efficiency,
            stats: result.stats,
            degraded: result.degraded.is_some(),
        })
    }
}

/// Orders rows by ranking quality; exposed for callers merging reports.
#[must_use]
pub fn compare_rows(a: &SweepRow, b: &SweepRow) -> Ordering {
    b.harmonic_mean
        .total_cmp(&a.harmonic_mean)
        .then_with(|| a.stats.total_packs.cmp(&b.stats.total_packs))
}
