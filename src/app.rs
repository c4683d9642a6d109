//! Per-invocation state shared by every command.

use tracing::debug;

use crate::cli::Cli;
use crate::cli::output::OutputFormat;
use crate::cli::progress::ProgressReporter;
use crate::config::Config;
use crate::error::Result;

pub struct AppContext {
    pub config: Config,
    pub output_format: OutputFormat,
    pub robot_mode: bool,
    pub quiet: bool,
}

impl AppContext {
    pub fn from_cli(cli: &Cli) -> Result<Self> {
        let cwd = std::env::current_dir()?;
        let config = Config::load(cli.config.as_deref(), &cwd)?;
        debug!(?config, "resolved configuration");
        Ok(Self::new(cli, config))
    }

    #[must_use]
    pub fn new(cli: &Cli, config: Config) -> Self {
        let output_format =
            OutputFormat::from_args(cli.machine, cli.output_format, config.output.format);
        Self {
            robot_mode: matches!(output_format, OutputFormat::Json | OutputFormat::Jsonl),
            quiet: cli.quiet,
            output_format,
            config,
        }
    }

    #[must_use]
    pub fn progress(&self) -> ProgressReporter {
        ProgressReporter::new(self.robot_mode, self.quiet)
    }
}
