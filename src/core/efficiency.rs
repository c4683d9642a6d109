//! Token efficiency, capacity degradation and summary statistics.

use serde::{Deserialize, Serialize};

use super::packing::Strategy;
use super::shape::Capacity;

/// Share of declared capacity holding real data, per dimension, in percent.
///
/// An empty result has no packs to average over; both values are reported as
/// `0.0` in that case.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct TokenEfficiency {
    pub dim1: f64,
    pub dim2: f64,
}

impl TokenEfficiency {
    /// Harmonic mean of both dimensions, for ranking parameter choices.
    #[must_use]
    pub fn harmonic_mean(&self) -> f64 {
        let total = self.dim1 + self.dim2;
        if total <= 0.0 {
            return 0.0;
        }
        2.0 * self.dim1 * self.dim2 / total
    }
}

/// `100 * (1 - padding / (packs * capacity))` for each dimension.
#[must_use]
pub fn token_efficiency(strategies: &[Strategy], capacity: Capacity) -> TokenEfficiency {
    let packs: u128 = strategies.iter().map(|s| u128::from(s.repeat_count)).sum();
    let padding = |cap: u32, used: fn(&Strategy) -> u64| -> u128 {
        strategies
            .iter()
            .map(|s| u128::from(s.repeat_count) * u128::from(u64::from(cap).saturating_sub(used(s))))
            .sum()
    };
    let efficiency = |cap: u32, padding: u128| -> f64 {
        if packs == 0 || cap == 0 {
            return 0.0;
        }
        let slots = packs * u128::from(cap);
        100.0 * (1.0 - padding as f64 / slots as f64)
    };

    TokenEfficiency {
        dim1: efficiency(capacity.dim1, padding(capacity.dim1, Strategy::dim1_sum)),
        dim2: efficiency(capacity.dim2, padding(capacity.dim2, Strategy::dim2_sum)),
    }
}

/// Raised when no pack reaches the declared capacity in some dimension.
///
/// The result is still valid; `effective` is the tightened capacity the packs
/// actually need and `effective_efficiency` is measured against it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DegradedCapacity {
    pub requested: Capacity,
    pub effective: Capacity,
    pub effective_efficiency: TokenEfficiency,
}

#[must_use]
pub fn detect_degradation(strategies: &[Strategy], requested: Capacity) -> Option<DegradedCapacity> {
    let max1 = strategies.iter().map(Strategy::dim1_sum).max()?;
    let max2 = strategies.iter().map(Strategy::dim2_sum).max()?;
    let effective = Capacity {
        dim1: u32::try_from(max1).unwrap_or(u32::MAX).min(requested.dim1),
        dim2: u32::try_from(max2).unwrap_or(u32::MAX).min(requested.dim2),
    };
    if effective == requested {
        return None;
    }
    Some(DegradedCapacity {
        requested,
        effective,
        effective_efficiency: token_efficiency(strategies, effective),
    })
}

/// Summary counts for one packing pass.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PackingStats {
    pub total_items: u64,
    pub total_packs: u64,
    pub distinct_strategies: usize,
    pub average_items_per_pack: f64,
    /// Items per pack row, i.e. how many fewer rows than unpacked processing.
    pub speedup: f64,
    pub max_items_in_pack: usize,
}

impl PackingStats {
    #[must_use]
    pub fn from_strategies(strategies: &[Strategy]) -> Self {
        let total_packs: u64 = strategies.iter().map(|s| s.repeat_count).sum();
        let total_items: u64 = strategies
            .iter()
            .map(|s| s.repeat_count * s.items.len() as u64)
            .sum();
        let ratio = if total_packs == 0 {
            0.0
        } else {
            total_items as f64 / total_packs as f64
        };
        Self {
            total_items,
            total_packs,
            distinct_strategies: strategies.len(),
            average_items_per_pack: ratio,
            speedup: ratio,
            max_items_in_pack: strategies.iter().map(|s| s.items.len()).max().unwrap_or(0),
        }
    }
}
