//! In-progress pack compositions keyed by remaining-capacity score.

use std::collections::BTreeMap;

use super::shape::{Score, Shape};

/// A partially filled composition shared by `pending` packs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenStrategy {
    pub items: Vec<Shape>,
    /// Summed size of `items`.
    pub used: Shape,
    pub pending: u64,
}

impl OpenStrategy {
    #[must_use]
    pub fn new(items: Vec<Shape>, pending: u64) -> Self {
        let used = items.iter().fold(Shape::new(0, 0), |acc, item| Shape {
            dim1: acc.dim1 + item.dim1,
            dim2: acc.dim2 + item.dim2,
        });
        Self {
            items,
            used,
            pending,
        }
    }
}

/// Ordered container of open strategies.
///
/// Within one score, entries are kept in insertion order and searched from the
/// most recently inserted one.
#[derive(Debug, Default)]
pub struct OpenStrategies {
    by_score: BTreeMap<Score, Vec<OpenStrategy>>,
    len: usize,
}

impl OpenStrategies {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, score: Score, strategy: OpenStrategy) {
        self.by_score.entry(score).or_default().push(strategy);
        self.len += 1;
    }

    /// Takes up to `max_count` packs of the best-fitting composition.
    ///
    /// Scores are scanned upward from `min_score` to `max_score` inclusive and
    /// the first entry accepted by `fits` wins. If that entry holds more than
    /// `max_count` packs, the surplus stays in place under the same score.
    pub fn pop_best_fit<F>(
        &mut self,
        min_score: Score,
        max_score: Score,
        max_count: u64,
        mut fits: F,
    ) -> Option<OpenStrategy>
    where
        F: FnMut(&OpenStrategy) -> bool,
    {
        if min_score > max_score || max_count == 0 {
            return None;
        }
        let (score, pos) = self
            .by_score
            .range(min_score..=max_score)
            .find_map(|(score, list)| list.iter().rposition(&mut fits).map(|pos| (*score, pos)))?;

        let list = self.by_score.get_mut(&score)?;
        let entry = &mut list[pos];
        if entry.pending > max_count {
            entry.pending -= max_count;
            return Some(OpenStrategy {
                items: entry.items.clone(),
                used: entry.used,
                pending: max_count,
            });
        }

        let taken = list.remove(pos);
        if list.is_empty() {
            self.by_score.remove(&score);
        }
        self.len -= 1;
        Some(taken)
    }

    /// Number of distinct open compositions.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Drains everything in ascending score order.
    pub fn drain(&mut self) -> impl Iterator<Item = (Score, OpenStrategy)> + use<> {
        self.len = 0;
        std::mem::take(&mut self.by_score)
            .into_iter()
            .flat_map(|(score, list)| list.into_iter().map(move |strategy| (score, strategy)))
    }
}
