pub mod formatter;

pub use formatter::{
    format_breakdown, format_catalog, format_json, format_outcome_table, format_score,
    format_tsv, should_use_colors, source_label, OUTCOME_HEADER, SCORE_HEADER,
};
