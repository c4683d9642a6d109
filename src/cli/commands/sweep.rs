//! histopack sweep - Rank heuristics and item limits for one histogram.

use std::path::PathBuf;

use clap::Args;
use colored::Colorize;
use serde::Serialize;

use super::load_histogram;
use crate::app::AppContext;
use crate::cli::output::{
    HumanLayout, OutputFormat, emit_human, emit_json, emit_jsonl, emit_tsv, robot_ok,
};
use crate::core::{Capacity, HeuristicKind, ItemLimit, Sweep, SweepReport, SweepRow};
use crate::error::Result;

#[derive(Args, Debug)]
pub struct SweepArgs {
    /// Histogram JSON file (`-` for stdin)
    pub histogram: PathBuf,

    /// Pack capacity in the first dimension
    #[arg(long, value_name = "N")]
    pub capacity_dim1: Option<u32>,

    /// Pack capacity in the second dimension
    #[arg(long, value_name = "N")]
    pub capacity_dim2: Option<u32>,

    /// Heuristics to try (comma separated)
    #[arg(long, value_delimiter = ',', value_name = "NAMES")]
    pub heuristics: Vec<String>,

    /// Item limits to try (comma separated, `max` allowed)
    #[arg(long, value_delimiter = ',', value_name = "LIMITS")]
    pub max_items: Vec<ItemLimit>,

    /// Ranked rows to show
    #[arg(long, value_name = "N")]
    pub top: Option<usize>,

    /// Run grid points one at a time
    #[arg(long)]
    pub sequential: bool,
}

#[derive(Serialize)]
struct SweepOutput<'a> {
    capacity: Capacity,
    grid_size: usize,
    rows: &'a [SweepRow],
}

pub fn run(ctx: &AppContext, args: &SweepArgs) -> Result<()> {
    let capacity = ctx
        .config
        .packing
        .capacity(args.capacity_dim1, args.capacity_dim2)?;
    let heuristics = if args.heuristics.is_empty() {
        ctx.config.sweep.heuristics.clone()
    } else {
        args.heuristics
            .iter()
            .map(|name| name.parse::<HeuristicKind>())
            .collect::<std::result::Result<Vec<_>, _>>()?
    };
    let limits = if args.max_items.is_empty() {
        ctx.config.sweep.max_items_per_pack.clone()
    } else {
        args.max_items.clone()
    };
    let parallel = ctx.config.sweep.parallel && !args.sequential;
    let top = args.top.unwrap_or(ctx.config.sweep.top);

    let histogram = load_histogram(&args.histogram)?;
    let sweep = Sweep::new(&histogram, capacity)
        .heuristics(heuristics)
        .limits(limits)
        .parallel(parallel);

    let progress = ctx.progress();
    let bar = progress.progress(sweep.grid_len() as u64, "Sweeping parameters");
    let report = match sweep.run_with(|_| bar.inc(1)) {
        Ok(report) => report,
        Err(err) => {
            bar.abandon_with_message(&err.to_string());
            return Err(err.into());
        }
    };
    bar.finish_with_message(&format!("{} grid points evaluated", report.rows.len()));
    if let Some(notice) = degraded_notice(&report) {
        progress.warn(&notice);
    }

    let shown = &report.rows[..top.min(report.rows.len())];
    match ctx.output_format {
        OutputFormat::Json => emit_json(&robot_ok(SweepOutput {
            capacity: report.capacity,
            grid_size: report.rows.len(),
            rows: shown,
        })),
        OutputFormat::Jsonl => emit_jsonl(shown),
        OutputFormat::Tsv => {
            emit_tsv(
                &[
                    "rank",
                    "heuristic",
                    "max_items",
                    "dim1",
                    "dim2",
                    "harmonic_mean",
                    "packs",
                    "degraded",
                ],
                &shown.iter().enumerate().collect::<Vec<_>>(),
                |(idx, row)| tsv_row(*idx, row),
            );
            Ok(())
        }
        OutputFormat::Human | OutputFormat::Plain => {
            emit_human(render_human(&report, shown, ctx.output_format));
            Ok(())
        }
    }
}

fn tsv_row(idx: usize, row: &SweepRow) -> Vec<String> {
    vec![
        (idx + 1).to_string(),
        row.heuristic.to_string(),
        row.max_items_per_pack.to_string(),
        format!("{:.4}", row.efficiency.dim1),
        format!("{:.4}", row.efficiency.dim2),
        format!("{:.4}", row.harmonic_mean),
        row.stats.total_packs.to_string(),
        row.degraded.to_string(),
    ]
}

fn render_human(report: &SweepReport, shown: &[SweepRow], format: OutputFormat) -> HumanLayout {
    let mut layout = HumanLayout::for_format(format);
    layout.title("Parameter Sweep");
    layout.kv("Capacity", &report.capacity.to_string());
    layout.kv("Grid points", &report.rows.len().to_string());
    layout.blank();

    if shown.is_empty() {
        layout.push_line("No grid points to evaluate.");
        return layout;
    }

    layout.section("Ranking");
    layout.push_line(format!(
        "{:>4}  {:<8} {:>9} {:>8} {:>8} {:>8} {:>8}",
        "#", "heur", "max_items", "dim1", "dim2", "hmean", "packs"
    ));
    for (idx, row) in shown.iter().enumerate() {
        let mut line = format!(
            "{:>4}  {:<8} {:>9} {:>7.2}% {:>7.2}% {:>7.2}% {:>8}",
            idx + 1,
            row.heuristic.as_str(),
            row.max_items_per_pack.to_string(),
            row.efficiency.dim1,
            row.efficiency.dim2,
            row.harmonic_mean,
            row.stats.total_packs,
        );
        if row.degraded {
            line.push_str("  (degraded)");
        }
        if idx == 0 && format.use_colors() {
            line = line.green().bold().to_string();
        }
        layout.push_line(line);
    }

    let hidden = report.rows.len() - shown.len();
    if hidden > 0 {
        layout.push_line(format!("... {hidden} more (use --top to list them)"));
    }
    layout
}

/// Summary of grid points whose packs never reach the requested capacity.
fn degraded_notice(report: &SweepReport) -> Option<String> {
    let degraded = report.rows.iter().filter(|row| row.degraded).count();
    (degraded > 0).then(|| {
        format!(
            "{degraded} of {} grid points ran below capacity {}",
            report.rows.len(),
            report.capacity
        )
    })
}
