//! Item shapes, pack capacity and the per-pack item limit.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Heuristic score. Products of two `u32` dimensions always fit.
pub type Score = u64;

/// Size of one item along both packing dimensions (e.g. nodes and edges).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Shape {
    pub dim1: u32,
    pub dim2: u32,
}

impl Shape {
    #[must_use]
    pub const fn new(dim1: u32, dim2: u32) -> Self {
        Self { dim1, dim2 }
    }
}

impl From<(u32, u32)> for Shape {
    fn from((dim1, dim2): (u32, u32)) -> Self {
        Self { dim1, dim2 }
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.dim1, self.dim2)
    }
}

/// Maximum summed size per pack along each dimension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Capacity {
    pub dim1: u32,
    pub dim2: u32,
}

impl Capacity {
    #[must_use]
    pub const fn new(dim1: u32, dim2: u32) -> Self {
        Self { dim1, dim2 }
    }

    /// Both components must be positive.
    #[must_use]
    pub const fn is_positive(&self) -> bool {
        self.dim1 > 0 && self.dim2 > 0
    }

    /// Whether a single item fits into an empty pack.
    #[must_use]
    pub const fn fits(&self, shape: Shape) -> bool {
        shape.dim1 <= self.dim1 && shape.dim2 <= self.dim2
    }

    /// Whether `shape` still fits into a pack that already holds `used`.
    #[must_use]
    pub fn fits_after(&self, used: Shape, shape: Shape) -> bool {
        u64::from(used.dim1) + u64::from(shape.dim1) <= u64::from(self.dim1)
            && u64::from(used.dim2) + u64::from(shape.dim2) <= u64::from(self.dim2)
    }

    /// Unused space of a pack holding `used`.
    #[must_use]
    pub const fn remaining(&self, used: Shape) -> Shape {
        Shape {
            dim1: self.dim1.saturating_sub(used.dim1),
            dim2: self.dim2.saturating_sub(used.dim2),
        }
    }
}

impl fmt::Display for Capacity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.dim1, self.dim2)
    }
}

/// How many items may share one pack.
///
/// `Unbounded` resolves to `min(capacity.dim1, capacity.dim2)`. Serialized as
/// an integer or the string `"max"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ItemLimit {
    Bounded(u32),
    #[default]
    Unbounded,
}

impl ItemLimit {
    /// Concrete limit for `capacity`; `None` when the bound is zero.
    #[must_use]
    pub fn resolve(self, capacity: Capacity) -> Option<u32> {
        match self {
            Self::Bounded(0) => None,
            Self::Bounded(limit) => Some(limit),
            Self::Unbounded => Some(capacity.dim1.min(capacity.dim2).max(1)),
        }
    }
}

impl fmt::Display for ItemLimit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bounded(limit) => write!(f, "{limit}"),
            Self::Unbounded => f.write_str("max"),
        }
    }
}

impl FromStr for ItemLimit {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let trimmed = raw.trim();
        match trimmed.to_ascii_lowercase().as_str() {
            "max" | "unbounded" => return Ok(Self::Unbounded),
            _ => {}
        }
        let value: i64 = trimmed
            .parse()
            .map_err(|_| format!("expected a positive integer or \"max\", got '{trimmed}'"))?;
        if value < 0 {
            return Err(format!("max items per pack must be positive, got {value}"));
        }
        u32::try_from(value)
            .map(Self::Bounded)
            .map_err(|_| format!("max items per pack {value} is out of range"))
    }
}

impl Serialize for ItemLimit {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Bounded(limit) => serializer.serialize_u32(*limit),
            Self::Unbounded => serializer.serialize_str("max"),
        }
    }
}

impl<'de> Deserialize<'de> for ItemLimit {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Count(i64),
            Name(String),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Count(value) => value.to_string().parse().map_err(serde::de::Error::custom),
            Raw::Name(name) => name.parse().map_err(serde::de::Error::custom),
        }
    }
}
