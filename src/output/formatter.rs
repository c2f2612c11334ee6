use std::io::IsTerminal;

use owo_colors::OwoColorize;
use serde::Serialize;
use terminal_size::{terminal_size, Width};

use crate::scoring::{
    uses_default, Catalog, DriverScores, EvaluationMode, FactorSource, OutcomeScore,
    DEFAULT_FACTOR_SCORE,
};

pub const OUTCOME_HEADER: &str = "Readiness Outcome";
pub const SCORE_HEADER: &str = "Score (1–5)";

/// Check if stdout is a TTY (for auto-detecting color support)
pub fn should_use_colors() -> bool {
    std::io::stdout().is_terminal()
}

/// Scores are always shown with exactly two decimals
pub fn format_score(score: f64) -> String {
    format!("{:.2}", score)
}

/// Get terminal width, defaulting to None for pipes (unlimited)
fn get_terminal_width() -> Option<usize> {
    terminal_size().map(|(Width(w), _)| w as usize)
}

/// Truncate a name to fit available width, accounting for Unicode
pub fn truncate_name(name: &str, max_width: usize) -> String {
    let chars: Vec<char> = name.chars().collect();
    if chars.len() <= max_width {
        name.to_string()
    } else if max_width > 3 {
        format!("{}...", chars[..max_width - 3].iter().collect::<String>())
    } else {
        chars[..max_width].iter().collect()
    }
}

fn pad_right(s: &str, width: usize) -> String {
    let len = s.chars().count();
    format!("{}{}", s, " ".repeat(width.saturating_sub(len)))
}

/// Two-column table: outcome name, score.
/// Score column is right-aligned under its header.
pub fn format_outcome_table(outcomes: &[OutcomeScore], use_colors: bool) -> String {
    format_outcome_table_width(outcomes, use_colors, get_terminal_width())
}

/// Same as [`format_outcome_table`] with an explicit terminal width (None = unlimited)
pub fn format_outcome_table_width(
    outcomes: &[OutcomeScore],
    use_colors: bool,
    term_width: Option<usize>,
) -> String {
    if outcomes.is_empty() {
        return "No outcomes defined.".to_string();
    }

    let score_width = SCORE_HEADER.chars().count();
    let separator = "  ";
    let widest = outcomes
        .iter()
        .map(|o| o.name.chars().count())
        .max()
        .unwrap_or(0)
        .max(OUTCOME_HEADER.len());

    let name_width = match term_width {
        Some(width) if width > score_width + separator.len() + 10 => {
            widest.min(width - score_width - separator.len())
        }
        Some(_) => 20,
        None => widest,
    };

    let header = format!(
        "{}{}{:>width$}",
        pad_right(OUTCOME_HEADER, name_width),
        separator,
        SCORE_HEADER,
        width = score_width
    );
    let rule = "-".repeat(name_width + separator.len() + score_width);

    let mut lines = Vec::with_capacity(outcomes.len() + 2);
    if use_colors {
        lines.push(header.bold().to_string());
        lines.push(rule.dimmed().to_string());
    } else {
        lines.push(header);
        lines.push(rule);
    }

    for outcome in outcomes {
        let name = pad_right(&truncate_name(&outcome.name, name_width), name_width);
        let score = format!("{:>width$}", format_score(outcome.score), width = score_width);
        if use_colors {
            lines.push(format!("{}{}{}", name, separator, score.bold()));
        } else {
            lines.push(format!("{}{}{}", name, separator, score));
        }
    }

    lines.join("\n")
}

/// Tab-separated values for scripting
/// Columns: outcome, score (no headers, no colors)
pub fn format_tsv(outcomes: &[OutcomeScore]) -> String {
    outcomes
        .iter()
        .map(|o| format!("{}\t{}", o.name, format_score(o.score)))
        .collect::<Vec<_>>()
        .join("\n")
}

#[derive(Serialize)]
struct JsonDriver<'a> {
    name: &'a str,
    score: u8,
}

#[derive(Serialize)]
struct JsonReport<'a> {
    evaluation: EvaluationMode,
    drivers: Vec<JsonDriver<'a>>,
    outcomes: &'a [OutcomeScore],
}

/// Full report as pretty JSON: mode, driver inputs, outcomes with breakdowns
pub fn format_json(
    scores: &DriverScores,
    outcomes: &[OutcomeScore],
    mode: EvaluationMode,
) -> serde_json::Result<String> {
    let report = JsonReport {
        evaluation: mode,
        drivers: scores
            .iter()
            .map(|(name, score)| JsonDriver { name, score })
            .collect(),
        outcomes,
    };
    serde_json::to_string_pretty(&report)
}

pub fn source_label(source: FactorSource) -> &'static str {
    match source {
        FactorSource::Driver => "driver",
        FactorSource::Outcome => "outcome",
        FactorSource::Default => "default",
    }
}

/// Multi-line breakdown of one outcome (for verbose mode)
pub fn format_breakdown(outcome: &OutcomeScore, use_colors: bool) -> String {
    let mut lines = Vec::with_capacity(outcome.factors.len() + 1);
    let title = format!("{}: {}", outcome.name, format_score(outcome.score));
    lines.push(if use_colors {
        title.bold().to_string()
    } else {
        title
    });

    for factor in &outcome.factors {
        let line = format!(
            "  {} x{} -> {:.2} ({})",
            factor.name,
            factor.weight,
            factor.score,
            source_label(factor.source)
        );
        if use_colors && factor.source == FactorSource::Default {
            lines.push(line.yellow().to_string());
        } else {
            lines.push(line);
        }
    }

    lines.join("\n")
}

/// Catalog listing: drivers with defaults, outcomes with weighted factors.
/// Factors that will take the default score under `mode` are marked.
pub fn format_catalog(catalog: &Catalog, mode: EvaluationMode, use_colors: bool) -> String {
    let mut lines = Vec::new();

    let heading = |s: &str| {
        if use_colors {
            s.bold().to_string()
        } else {
            s.to_string()
        }
    };

    lines.push(heading(&format!("Drivers ({})", catalog.drivers.len())));
    for driver in &catalog.drivers {
        lines.push(format!("  {:<28} default {}", driver.name, driver.default));
    }

    lines.push(String::new());
    lines.push(heading(&format!(
        "Outcomes ({}, {} evaluation)",
        catalog.outcomes.len(),
        mode.label()
    )));
    for outcome in &catalog.outcomes {
        lines.push(format!("  {}", outcome.name));
        for factor in &outcome.factors {
            let mut line = format!("    {:<28} weight {}", factor.name, factor.weight);
            if uses_default(catalog, &factor.name, mode) {
                let marker = format!("  -> default {}", DEFAULT_FACTOR_SCORE);
                if use_colors {
                    line.push_str(&marker.yellow().to_string());
                } else {
                    line.push_str(&marker);
                }
            }
            lines.push(line);
        }
    }

    lines.join("\n")
}
