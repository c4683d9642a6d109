//! histopack - pack size histograms into shared-capacity batches.

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use histopack::Result;
use histopack::app::AppContext;
use histopack::cli::output::{emit_json, robot_error};
use histopack::cli::{Cli, Commands};

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(&cli);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::debug!(error = ?e, "command failed");
            if cli.json_errors() {
                // Machine mode: structured error on stdout
                if emit_json(&robot_error(&e)).is_err() {
                    eprintln!("Error: {e}");
                }
            } else {
                let structured = e.to_structured();
                eprintln!("Error [{}]: {e}", structured.code);
                eprintln!("  hint: {}", structured.suggestion);
            }
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<()> {
    if let Commands::Completions(args) = &cli.command {
        return histopack::cli::commands::completions::run(args);
    }
    let ctx = AppContext::from_cli(cli)?;
    histopack::cli::commands::run(&ctx, &cli.command)
}

fn init_tracing(cli: &Cli) {
    if cli.quiet {
        return;
    }

    let filter = match cli.verbose {
        0 => "warn",
        1 => "warn,histopack=info",
        2 => "info,histopack=debug",
        _ => "trace",
    };

    let env_filter =
        EnvFilter::try_from_env("HISTOPACK_LOG").unwrap_or_else(|_| EnvFilter::new(filter));

    if cli.machine {
        // JSON logging for machine mode
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}
