//! Standardized error codes for machine-parseable output.
//!
//! Error codes follow a numeric taxonomy:
//! - 1xx: Packing parameter errors
//! - 2xx: Histogram input errors
//! - 3xx: Config errors
//! - 6xx: Storage and serialization errors
//! - 9xx: Internal errors

use serde::{Deserialize, Serialize};

/// Standardized error codes for JSON output.
///
/// Each variant maps to a numeric code (e.g., `ItemExceedsCapacity` -> E101).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // ========================================
    // Packing errors (1xx)
    // ========================================
    /// E101: A histogram shape does not fit an empty pack
    ItemExceedsCapacity,
    /// E102: Capacity has a zero component
    CapacityInvalid,
    /// E103: Max items per pack is zero
    ItemLimitInvalid,
    /// E104: Heuristic name is not in the catalog
    HeuristicUnknown,

    // ========================================
    // Histogram errors (2xx)
    // ========================================
    /// E201: Histogram document is malformed
    HistogramInvalid,
    /// E202: Histogram file could not be read
    HistogramUnreadable,

    // ========================================
    // Config errors (3xx)
    // ========================================
    /// E302: Config file has invalid syntax or values
    ConfigInvalid,
    /// E304: Required config value is missing
    ConfigMissingRequired,

    // ========================================
    // Storage errors (6xx)
    // ========================================
    /// E605: Serialization/deserialization failed
    SerializationError,

    // ========================================
    // Internal errors (9xx)
    // ========================================
    /// E906: IO operation failed
    IoError,
}

impl ErrorCode {
    /// Get the numeric error code (e.g., `ItemExceedsCapacity` -> 101).
    #[must_use]
    pub const fn numeric(&self) -> u16 {
        match self {
            Self::ItemExceedsCapacity => 101,
            Self::CapacityInvalid => 102,
            Self::ItemLimitInvalid => 103,
            Self::HeuristicUnknown => 104,

            Self::HistogramInvalid => 201,
            Self::HistogramUnreadable => 202,

            Self::ConfigInvalid => 302,
            Self::ConfigMissingRequired => 304,

            Self::SerializationError => 605,

            Self::IoError => 906,
        }
    }

    /// Get the error code as a formatted string (e.g., "E101").
    #[must_use]
    pub fn code_string(&self) -> String {
        format!("E{}", self.numeric())
    }

    /// Get the default suggestion for this error code.
    #[must_use]
    pub const fn suggestion(&self) -> &'static str {
        match self {
            Self::ItemExceedsCapacity => "Raise --capacity-dim1/--capacity-dim2 to at least the largest item, or drop oversized items from the histogram",
            Self::CapacityInvalid => "Both capacity dimensions must be at least 1",
            Self::ItemLimitInvalid => "Pass a positive --max-items value, or `max` to bound packs only by capacity",
            Self::HeuristicUnknown => "Run `histopack heuristics` to list the available heuristics",

            Self::HistogramInvalid => "Expected JSON like {\"entries\": [{\"dim1\": 2, \"dim2\": 3, \"count\": 5}]} or a bare array of entries",
            Self::HistogramUnreadable => "Check that the histogram path exists and is readable",

            Self::ConfigInvalid => "Run `histopack config` to see current values. Check TOML syntax in config file",
            Self::ConfigMissingRequired => "Set the missing value in histopack.toml or pass it on the command line",

            Self::SerializationError => "The data format may be corrupted. Check input data for validity",

            Self::IoError => "File operation failed. Check path exists and permissions are correct",
        }
    }

    /// Check if this error is potentially recoverable by the user.
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        !matches!(self, Self::SerializationError)
    }

    /// Get the category name for this error code.
    #[must_use]
    pub const fn category(&self) -> &'static str {
        match self.numeric() / 100 {
            1 => "packing",
            2 => "histogram",
            3 => "config",
            6 => "storage",
            _ => "internal",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code_string())
    }
}
