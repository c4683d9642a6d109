//! Error handling for histopack.
//!
//! This module provides:
//! - [`HpError`]: The main error enum for all histopack operations
//! - [`ErrorCode`]: Standardized error codes for machine parsing
//! - [`StructuredError`]: Rich error type with suggestions and context
//! - Suggestion helpers for context-aware error recovery hints

mod codes;
mod suggestions;

use std::io;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::core::{PackError, UnknownHeuristic};

pub use codes::ErrorCode;
pub use suggestions::{suggest_for_error, suggest_similar_names};

/// Main error type for histopack operations.
#[derive(Error, Debug)]
pub enum HpError {
    #[error(transparent)]
    Pack(#[from] PackError),

    #[error(transparent)]
    UnknownHeuristic(#[from] UnknownHeuristic),

    #[error("Invalid histogram: {0}")]
    InvalidHistogram(String),

    #[error("Cannot read histogram {path}: {source}")]
    HistogramRead {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Missing required config: {0}")]
    MissingConfig(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl HpError {
    /// Get the error code for this error.
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::Pack(PackError::InvalidCapacity { .. }) => ErrorCode::ItemExceedsCapacity,
            Self::Pack(PackError::ZeroCapacity { .. }) => ErrorCode::CapacityInvalid,
            Self::Pack(PackError::NonPositiveMaxItemsPerPack) => ErrorCode::ItemLimitInvalid,
            Self::UnknownHeuristic(_) => ErrorCode::HeuristicUnknown,
            Self::InvalidHistogram(_) => ErrorCode::HistogramInvalid,
            Self::HistogramRead { .. } => ErrorCode::HistogramUnreadable,
            Self::Io(_) => ErrorCode::IoError,
            Self::Json(_) | Self::Serialization(_) => ErrorCode::SerializationError,
            Self::Config(_) => ErrorCode::ConfigInvalid,
            Self::MissingConfig(_) => ErrorCode::ConfigMissingRequired,
        }
    }

    /// Get context information for this error as JSON.
    #[must_use]
    pub fn context(&self) -> Option<Value> {
        match self {
            Self::Pack(PackError::InvalidCapacity { shape, capacity }) => {
                Some(serde_json::json!({ "shape": shape, "capacity": capacity }))
            }
            Self::Pack(PackError::ZeroCapacity { capacity }) => {
                Some(serde_json::json!({ "capacity": capacity }))
            }
            Self::UnknownHeuristic(UnknownHeuristic(name)) => {
                Some(serde_json::json!({ "heuristic": name }))
            }
            Self::HistogramRead { path, .. } => Some(serde_json::json!({ "path": path })),
            Self::MissingConfig(key) => Some(serde_json::json!({ "config_key": key })),
            _ => None,
        }
    }

    /// Convert this error to a structured error.
    #[must_use]
    pub fn to_structured(&self) -> StructuredError {
        StructuredError::from_hp_error(self)
    }
}

/// A structured error with machine-readable code, suggestion, and context.
///
/// Emitted on stderr in machine mode so callers can branch on `code`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StructuredError {
    /// The error code (e.g., "ITEM_EXCEEDS_CAPACITY")
    pub code: ErrorCode,

    /// The numeric error code (e.g., 101)
    pub numeric_code: u16,

    /// Human-readable error message
    pub message: String,

    /// Actionable suggestion for recovery
    pub suggestion: String,

    /// Additional context for debugging
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<Value>,

    /// Whether this error is potentially recoverable by the user
    pub recoverable: bool,

    /// Error category (e.g., "packing", "config")
    pub category: String,
}

impl StructuredError {
    /// Create a new structured error.
    #[must_use]
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        let message = message.into();
        Self {
            numeric_code: code.numeric(),
            suggestion: suggest_for_error(code, None),
            context: None,
            recoverable: code.is_recoverable(),
            category: code.category().to_string(),
            code,
            message,
        }
    }

    /// Create a structured error from an [`HpError`].
    #[must_use]
    pub fn from_hp_error(err: &HpError) -> Self {
        let structured = Self::new(err.code(), err.to_string());
        match err.context() {
            Some(context) => structured.with_context(context),
            None => structured,
        }
    }

    /// Add context to this error.
    #[must_use]
    pub fn with_context(mut self, context: Value) -> Self {
        self.context = Some(context);
        // Regenerate suggestion with new context
        self.suggestion = suggest_for_error(self.code, self.context.as_ref());
        self
    }
}

impl std::fmt::Display for StructuredError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

impl From<HpError> for StructuredError {
    fn from(err: HpError) -> Self {
        Self::from_hp_error(&err)
    }
}

impl From<&HpError> for StructuredError {
    fn from(err: &HpError) -> Self {
        Self::from_hp_error(err)
    }
}

/// Result type alias using HpError.
pub type Result<T> = std::result::Result<T, HpError>;
