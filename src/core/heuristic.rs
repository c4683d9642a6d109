//! Scoring heuristics used to rank items and key open packs.
//!
//! A heuristic maps a two-dimensional size to a comparable integer score. It
//! must be pure and deterministic, and should be monotonic in both arguments:
//! the best-fit search only looks at packs whose remaining-space score is at
//! least the item's own score.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::shape::{Score, Shape};

/// Pluggable scoring function.
pub trait Heuristic: Send + Sync {
    fn score(&self, dim1: u32, dim2: u32) -> Score;

    /// Name used in logs and reports.
    fn name(&self) -> &str {
        "custom"
    }

    fn score_shape(&self, shape: Shape) -> Score {
        self.score(shape.dim1, shape.dim2)
    }
}

/// Built-in heuristic catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HeuristicKind {
    Product,
    Sum,
    Max,
    Min,
    Dim1,
    Dim2,
}

impl HeuristicKind {
    pub const ALL: [Self; 6] = [
        Self::Product,
        Self::Sum,
        Self::Max,
        Self::Min,
        Self::Dim1,
        Self::Dim2,
    ];

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Product => "product",
            Self::Sum => "sum",
            Self::Max => "max",
            Self::Min => "min",
            Self::Dim1 => "dim1",
            Self::Dim2 => "dim2",
        }
    }

    #[must_use]
    pub const fn formula(&self) -> &'static str {
        match self {
            Self::Product => "x * y",
            Self::Sum => "x + y",
            Self::Max => "max(x, y)",
            Self::Min => "min(x, y)",
            Self::Dim1 => "x",
            Self::Dim2 => "y",
        }
    }

    /// Caveats worth surfacing next to the catalog entry.
    #[must_use]
    pub const fn note(&self) -> Option<&'static str> {
        match self {
            Self::Min => Some(
                "older catalogs defined `min` as max(x, y); this entry is the true minimum, \
                 so results differ from runs made with that alias",
            ),
            Self::Dim1 | Self::Dim2 => {
                Some("ignores the other dimension when ranking; feasibility is still checked")
            }
            _ => None,
        }
    }
}

impl Heuristic for HeuristicKind {
    fn score(&self, dim1: u32, dim2: u32) -> Score {
        let (x, y) = (Score::from(dim1), Score::from(dim2));
        match self {
            Self::Product => x * y,
            Self::Sum => x + y,
            Self::Max => x.max(y),
            Self::Min => x.min(y),
            Self::Dim1 => x,
            Self::Dim2 => y,
        }
    }

    fn name(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for HeuristicKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown heuristic '{0}' (expected one of: product, sum, max, min, dim1, dim2)")]
pub struct UnknownHeuristic(pub String);

impl FromStr for HeuristicKind {
    type Err = UnknownHeuristic;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "product" | "prod" => Ok(Self::Product),
            "sum" => Ok(Self::Sum),
            "max" => Ok(Self::Max),
            "min" => Ok(Self::Min),
            "dim1" | "first" => Ok(Self::Dim1),
            "dim2" | "second" => Ok(Self::Dim2),
            _ => Err(UnknownHeuristic(raw.to_string())),
        }
    }
}

/// Adapter for caller-supplied closures.
pub struct FnHeuristic<F> {
    name: String,
    func: F,
}

impl<F> FnHeuristic<F>
where
    F: Fn(u32, u32) -> Score + Send + Sync,
{
    pub fn new(name: impl Into<String>, func: F) -> Self {
        Self {
            name: name.into(),
            func,
        }
    }
}

impl<F> Heuristic for FnHeuristic<F>
where
    F: Fn(u32, u32) -> Score + Send + Sync,
{
    fn score(&self, dim1: u32, dim2: u32) -> Score {
        (self.func)(dim1, dim2)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl<F> fmt::Debug for FnHeuristic<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnHeuristic").field("name", &self.name).finish()
    }
}
