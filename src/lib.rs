//! Two-dimensional histogram packing.
//!
//! Packs a histogram of `(dim1, dim2)` item sizes into as few fixed-capacity
//! packs as possible, returning compositions with repeat counts plus token
//! efficiency in both dimensions. See [`core::pack`].

pub mod app;
pub mod cli;
pub mod config;
pub mod core;
pub mod error;

pub use error::{HpError, Result};

/// Package version from Cargo.toml.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
