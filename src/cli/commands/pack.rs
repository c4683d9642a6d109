//! histopack pack - Pack a size histogram.

use std::path::PathBuf;

use clap::Args;

use super::load_histogram;
use crate::app::AppContext;
use crate::cli::output::{
    HumanLayout, OutputFormat, emit_human, emit_json, emit_jsonl, emit_tsv, robot_ok,
};
use crate::core::{HeuristicKind, HistogramPacker, ItemLimit, PackingResult, Strategy};
use crate::error::Result;

#[derive(Args, Debug)]
pub struct PackArgs {
    /// Histogram JSON file (`-` for stdin)
    pub histogram: PathBuf,

    /// Pack capacity in the first dimension
    #[arg(long, value_name = "N")]
    pub capacity_dim1: Option<u32>,

    /// Pack capacity in the second dimension
    #[arg(long, value_name = "N")]
    pub capacity_dim2: Option<u32>,

    /// Max items per pack, or `max` to bound only by capacity
    #[arg(long, value_name = "N|max")]
    pub max_items: Option<ItemLimit>,

    /// Ordering heuristic (see `histopack heuristics`)
    #[arg(long, value_name = "NAME")]
    pub heuristic: Option<String>,

    /// Strategies to list in human output
    #[arg(long, value_name = "N")]
    pub show: Option<usize>,
}

pub fn run(ctx: &AppContext, args: &PackArgs) -> Result<()> {
    let packing = &ctx.config.packing;
    let capacity = packing.capacity(args.capacity_dim1, args.capacity_dim2)?;
    let limit = args.max_items.unwrap_or(packing.max_items_per_pack);
    let heuristic = match &args.heuristic {
        Some(name) => name.parse::<HeuristicKind>()?,
        None => packing.heuristic,
    };

    let histogram = load_histogram(&args.histogram)?;
    let progress = ctx.progress();
    let spinner = progress.spinner("Packing histogram");
    let result = match HistogramPacker::new(capacity, limit).pack(&histogram, &heuristic) {
        Ok(result) => result,
        Err(err) => {
            spinner.abandon_with_message(&err.to_string());
            return Err(err.into());
        }
    };
    spinner.finish();

    match ctx.output_format {
        OutputFormat::Json => {
            emit_json(&robot_ok(&result).with_warnings(degradation_warning(&result)))
        }
        OutputFormat::Jsonl => emit_jsonl(&result.strategies),
        OutputFormat::Tsv => {
            emit_tsv(
                &["repeat_count", "items", "dim1_sum", "dim2_sum"],
                &result.strategies,
                strategy_row,
            );
            Ok(())
        }
        OutputFormat::Human | OutputFormat::Plain => {
            let show = args.show.unwrap_or(ctx.config.output.show_strategies);
            emit_human(render_human(&result, ctx.output_format, show));
            Ok(())
        }
    }
}

fn degradation_warning(result: &PackingResult) -> Vec<String> {
    result
        .degraded
        .iter()
        .map(|degraded| {
            format!(
                "capacity degraded from {} to {}",
                degraded.requested, degraded.effective
            )
        })
        .collect()
}

fn strategy_row(strategy: &Strategy) -> Vec<String> {
    vec![
        strategy.repeat_count.to_string(),
        format_items(strategy),
        strategy.dim1_sum().to_string(),
        strategy.dim2_sum().to_string(),
    ]
}

fn format_items(strategy: &Strategy) -> String {
    strategy
        .items
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" ")
}

pub(crate) fn render_human(result: &PackingResult, format: OutputFormat, show: usize) -> HumanLayout {
    let mut layout = HumanLayout::for_format(format);
    layout.title("Histogram Packing");
    layout.kv("Heuristic", &result.heuristic);
    layout.kv("Capacity", &result.capacity.to_string());
    layout.kv("Max items per pack", &result.max_items_per_pack.to_string());
    layout.blank();

    layout.section("Efficiency");
    layout.kv("dim1", &format!("{:.2}%", result.efficiency.dim1));
    layout.kv("dim2", &format!("{:.2}%", result.efficiency.dim2));
    layout.kv("harmonic mean", &format!("{:.2}%", result.efficiency.harmonic_mean()));
    layout.blank();

    layout.section("Stats");
    let stats = &result.stats;
    layout.kv("Items", &stats.total_items.to_string());
    layout.kv("Packs", &stats.total_packs.to_string());
    layout.kv("Strategies", &stats.distinct_strategies.to_string());
    layout.kv("Items per pack", &format!("{:.2}", stats.average_items_per_pack));
    layout.kv("Speedup", &format!("{:.2}x", stats.speedup));

    if let Some(degraded) = &result.degraded {
        layout.blank();
        layout.warning(&format!(
            "no pack reaches the requested capacity {}; effective capacity is {} ({:.2}% / {:.2}%)",
            degraded.requested,
            degraded.effective,
            degraded.effective_efficiency.dim1,
            degraded.effective_efficiency.dim2,
        ));
    }

    if !result.strategies.is_empty() && show > 0 {
        layout.blank();
        layout.section("Strategies");
        for strategy in result.strategies.iter().take(show) {
            layout.push_line(format!(
                "{:>6} x [{}]  ({}, {})",
                strategy.repeat_count,
                format_items(strategy),
                strategy.dim1_sum(),
                strategy.dim2_sum()
            ));
        }
        let hidden = result.strategies.len().saturating_sub(show);
        if hidden > 0 {
            layout.push_line(format!("... {hidden} more (use --show to list them)"));
        }
    }

    layout
}
