//! Two-dimensional size histograms.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::shape::Shape;

/// Shape -> occurrence count, in first-insertion order.
///
/// Inserting an existing shape adds to its count. Zero counts are never stored.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SizeHistogram {
    entries: Vec<(Shape, u64)>,
    index: HashMap<Shape, usize>,
}

impl SizeHistogram {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, shape: Shape, count: u64) {
        if count == 0 {
            return;
        }
        if let Some(&pos) = self.index.get(&shape) {
            self.entries[pos].1 = self.entries[pos].1.saturating_add(count);
        } else {
            self.index.insert(shape, self.entries.len());
            self.entries.push((shape, count));
        }
    }

    #[must_use]
    pub fn count(&self, shape: Shape) -> u64 {
        self.index
            .get(&shape)
            .map_or(0, |&pos| self.entries[pos].1)
    }

    /// Number of distinct shapes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Shape, u64)> + '_ {
        self.entries.iter().copied()
    }

    #[must_use]
    pub fn total_items(&self) -> u64 {
        self.entries.iter().map(|(_, count)| count).sum()
    }

    /// Largest size seen in each dimension, independently.
    #[must_use]
    pub fn max_dims(&self) -> Option<Shape> {
        self.entries.iter().map(|(shape, _)| *shape).reduce(|a, b| Shape {
            dim1: a.dim1.max(b.dim1),
            dim2: a.dim2.max(b.dim2),
        })
    }

    pub fn from_json_str(raw: &str) -> serde_json::Result<Self> {
        let document: HistogramDocument = serde_json::from_str(raw)?;
        Ok(document.into_entries().into_iter().collect())
    }

    #[must_use]
    pub fn to_entries(&self) -> Vec<HistogramEntry> {
        self.entries
            .iter()
            .map(|(shape, count)| HistogramEntry {
                dim1: shape.dim1,
                dim2: shape.dim2,
                count: *count,
            })
            .collect()
    }
}

impl FromIterator<(Shape, u64)> for SizeHistogram {
    fn from_iter<I: IntoIterator<Item = (Shape, u64)>>(iter: I) -> Self {
        let mut histogram = Self::new();
        for (shape, count) in iter {
            histogram.insert(shape, count);
        }
        histogram
    }
}

impl FromIterator<HistogramEntry> for SizeHistogram {
    fn from_iter<I: IntoIterator<Item = HistogramEntry>>(iter: I) -> Self {
        iter.into_iter()
            .map(|entry| (Shape::new(entry.dim1, entry.dim2), entry.count))
            .collect()
    }
}

/// One row of a histogram document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistogramEntry {
    pub dim1: u32,
    pub dim2: u32,
    pub count: u64,
}

/// Accepted document layouts: `{"entries": [...]}` or a bare array.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum HistogramDocument {
    Wrapped { entries: Vec<HistogramEntry> },
    Bare(Vec<HistogramEntry>),
}

impl HistogramDocument {
    fn into_entries(self) -> Vec<HistogramEntry> {
        match self {
            Self::Wrapped { entries } | Self::Bare(entries) => entries,
        }
    }
}
