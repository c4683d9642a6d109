//! Context-aware error suggestions.
//!
//! Complements the static suggestions in the `codes` module with hints built
//! from the error's JSON context.

use serde_json::Value;

use super::codes::ErrorCode;
use crate::core::HeuristicKind;

/// Generate a context-aware suggestion for an error.
pub fn suggest_for_error(code: ErrorCode, context: Option<&Value>) -> String {
    match code {
        ErrorCode::ItemExceedsCapacity => suggest_item_exceeds_capacity(context),
        ErrorCode::HeuristicUnknown => suggest_heuristic_unknown(context),
        ErrorCode::HistogramUnreadable => suggest_histogram_unreadable(context),
        ErrorCode::ConfigMissingRequired => suggest_config_missing_required(context),
        _ => code.suggestion().to_string(),
    }
}

fn suggest_item_exceeds_capacity(context: Option<&Value>) -> String {
    let dims = |key: &str| {
        let value = context.and_then(|c| c.get(key))?;
        Some((
            value.get("dim1").and_then(Value::as_u64)?,
            value.get("dim2").and_then(Value::as_u64)?,
        ))
    };

    match (dims("shape"), dims("capacity")) {
        (Some((item1, item2)), Some((cap1, cap2))) => {
            let mut fixes = Vec::new();
            if item1 > cap1 {
                fixes.push(format!("--capacity-dim1 {item1}"));
            }
            if item2 > cap2 {
                fixes.push(format!("--capacity-dim2 {item2}"));
            }
            format!(
                "Item ({item1}, {item2}) does not fit capacity ({cap1}, {cap2}). Try:\n  - {}\n  - removing items of this shape from the histogram",
                fixes.join(" ")
            )
        }
        _ => ErrorCode::ItemExceedsCapacity.suggestion().to_string(),
    }
}

fn suggest_heuristic_unknown(context: Option<&Value>) -> String {
    let name = context
        .and_then(|c| c.get("heuristic"))
        .and_then(Value::as_str);
    let available: Vec<&str> = HeuristicKind::ALL.iter().map(HeuristicKind::as_str).collect();

    match name {
        Some(name) => {
            let similar = suggest_similar_names(name, &available, 2);
            if similar.is_empty() {
                format!(
                    "Unknown heuristic '{name}'. Available: {}",
                    available.join(", ")
                )
            } else {
                format!("Unknown heuristic '{name}'. Did you mean: {}?", similar.join(", "))
            }
        }
        None => ErrorCode::HeuristicUnknown.suggestion().to_string(),
    }
}

fn suggest_histogram_unreadable(context: Option<&Value>) -> String {
    let path = context.and_then(|c| c.get("path")).and_then(Value::as_str);

    match path {
        Some(path) => format!("Could not read '{path}'. Check the path and file permissions"),
        None => ErrorCode::HistogramUnreadable.suggestion().to_string(),
    }
}

fn suggest_config_missing_required(context: Option<&Value>) -> String {
    let config_key = context
        .and_then(|c| c.get("config_key"))
        .and_then(Value::as_str);

    match config_key {
        Some(key) => format!(
            "Required config '{key}' is missing. Set it in histopack.toml or via HISTOPACK_{}",
            key.strip_prefix("packing.")
                .unwrap_or(key)
                .replace('.', "_")
                .to_uppercase()
        ),
        None => ErrorCode::ConfigMissingRequired.suggestion().to_string(),
    }
}

/// Names from `available` resembling a misspelled `query`.
pub fn suggest_similar_names(query: &str, available: &[&str], max_suggestions: usize) -> Vec<String> {
    let query_lower = query.to_lowercase();
    let mut scored: Vec<_> = available
        .iter()
        .map(|s| (s, similarity_score(&query_lower, &s.to_lowercase())))
        .filter(|(_, score)| *score > 0.3)
        .collect();

    scored.sort_by(|a, b| b.1.total_cmp(&a.1));
    scored
        .into_iter()
        .take(max_suggestions)
        .map(|(s, _)| (*s).to_string())
        .collect()
}

/// Jaccard similarity on character trigrams, with a prefix fallback for
/// strings too short to have trigrams.
fn similarity_score(a: &str, b: &str) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }

    let a_trigrams: std::collections::HashSet<_> = trigrams(a).collect();
    let b_trigrams: std::collections::HashSet<_> = trigrams(b).collect();

    if a_trigrams.is_empty() || b_trigrams.is_empty() {
        if a.starts_with(b) || b.starts_with(a) {
            return 0.8;
        }
        if a.contains(b) || b.contains(a) {
            return 0.5;
        }
        return 0.0;
    }

    let intersection = a_trigrams.intersection(&b_trigrams).count();
    let union = a_trigrams.union(&b_trigrams).count();

    if union == 0 {
        0.0
    } else {
        intersection as f64 / union as f64
    }
}

fn trigrams(s: &str) -> impl Iterator<Item = &str> {
    (0..s.len().saturating_sub(2)).filter_map(move |i| s.get(i..i + 3))
}
