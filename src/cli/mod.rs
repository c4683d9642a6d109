//! CLI module - Command-line interface definitions and handlers
//!
//! Uses clap v4 with derive macros for argument parsing.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use output::OutputFormat;

pub mod commands;
pub mod output;
pub mod progress;

#[derive(Parser, Debug)]
#[command(name = "histopack")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output format (human, json, jsonl, plain, tsv)
    #[arg(long, short = 'O', global = true, value_enum)]
    pub output_format: Option<OutputFormat>,

    /// Machine-readable JSON output (shorthand for -O json)
    #[arg(long, short = 'm', global = true)]
    pub machine: bool,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress progress and log output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Config file (replaces global and project config)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Whether errors should be reported as JSON.
    #[must_use]
    pub fn json_errors(&self) -> bool {
        self.machine || matches!(self.output_format, Some(OutputFormat::Json | OutputFormat::Jsonl))
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Pack a size histogram into shared-capacity strategies
    Pack(commands::pack::PackArgs),

    /// Rank heuristics and item limits for a histogram
    Sweep(commands::sweep::SweepArgs),

    /// List the available ordering heuristics
    Heuristics(commands::heuristics::HeuristicsArgs),

    /// Show the resolved configuration
    Config(commands::config::ConfigArgs),

    /// Generate shell completions
    Completions(commands::completions::CompletionsArgs),
}
