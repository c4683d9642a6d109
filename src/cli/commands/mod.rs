//! CLI command implementations
//!
//! Each subcommand has its own module with:
//! - Args struct for command-line arguments
//! - `run()` function to execute the command

use std::io::Read;
use std::path::Path;

use tracing::debug;

use crate::app::AppContext;
use crate::cli::Commands;
use crate::core::SizeHistogram;
use crate::error::{HpError, Result};

pub mod completions;
pub mod config;
pub mod heuristics;
pub mod pack;
pub mod sweep;

/// Dispatch a command to its handler
pub fn run(ctx: &AppContext, command: &Commands) -> Result<()> {
    match command {
        Commands::Pack(args) => pack::run(ctx, args),
        Commands::Sweep(args) => sweep::run(ctx, args),
        Commands::Heuristics(args) => heuristics::run(ctx, args),
        Commands::Config(args) => config::run(ctx, args),
        Commands::Completions(args) => completions::run(args),
    }
}

/// Read a histogram document from a file, or stdin when `path` is `-`.
pub fn load_histogram(path: &Path) -> Result<SizeHistogram> {
    let shown = path.display().to_string();
    let raw = if shown == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .map_err(|source| HpError::HistogramRead {
                path: shown.clone(),
                source,
            })?;
        buf
    } else {
        std::fs::read_to_string(path).map_err(|source| HpError::HistogramRead {
            path: shown.clone(),
            source,
        })?
    };

    let histogram = parse_histogram(&raw)?;
    debug!(
        path = %shown,
        shapes = histogram.len(),
        items = histogram.total_items(),
        "loaded histogram"
    );
    Ok(histogram)
}

pub fn parse_histogram(raw: &str) -> Result<SizeHistogram> {
    SizeHistogram::from_json_str(raw).map_err(|err| HpError::InvalidHistogram(err.to_string()))
}
