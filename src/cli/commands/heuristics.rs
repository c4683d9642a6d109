//! histopack heuristics - List the ordering heuristics.

use clap::Args;
use colored::Colorize;
use serde::Serialize;

use crate::app::AppContext;
use crate::cli::output::{
    HumanLayout, OutputFormat, emit_human, emit_json, emit_jsonl, emit_tsv, robot_ok,
};
use crate::core::HeuristicKind;
use crate::error::Result;

#[derive(Args, Debug)]
pub struct HeuristicsArgs {}

#[derive(Debug, Serialize)]
struct HeuristicEntry {
    name: &'static str,
    formula: &'static str,
    default: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    note: Option<&'static str>,
}

fn catalog(default: HeuristicKind) -> Vec<HeuristicEntry> {
    HeuristicKind::ALL
        .iter()
        .map(|kind| HeuristicEntry {
            name: kind.as_str(),
            formula: kind.formula(),
            default: *kind == default,
            note: kind.note(),
        })
        .collect()
}

pub fn run(ctx: &AppContext, _args: &HeuristicsArgs) -> Result<()> {
    let entries = catalog(ctx.config.packing.heuristic);

    match ctx.output_format {
        OutputFormat::Json => emit_json(&robot_ok(&entries)),
        OutputFormat::Jsonl => emit_jsonl(&entries),
        OutputFormat::Tsv => {
            emit_tsv(&["name", "formula", "default", "note"], &entries, |entry| {
                vec![
                    entry.name.to_string(),
                    entry.formula.to_string(),
                    entry.default.to_string(),
                    entry.note.unwrap_or_default().to_string(),
                ]
            });
            Ok(())
        }
        OutputFormat::Human | OutputFormat::Plain => {
            emit_human(render_human(&entries, ctx.output_format));
            Ok(())
        }
    }
}

fn render_human(entries: &[HeuristicEntry], format: OutputFormat) -> HumanLayout {
    let mut layout = HumanLayout::for_format(format);
    layout.title("Heuristics");
    for entry in entries {
        let marker = if entry.default { " (default)" } else { "" };
        let name = if format.use_colors() {
            entry.name.cyan().to_string()
        } else {
            entry.name.to_string()
        };
        layout.push_line(format!("{name:<10} {:<10}{marker}", entry.formula));
        if let Some(note) = entry.note {
            layout.push_line(format!("           note: {note}"));
        }
    }
    layout
}
