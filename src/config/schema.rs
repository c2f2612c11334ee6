use serde::{Deserialize, Serialize};

use crate::scoring::{Catalog, EvaluationMode};

/// Top-level config file.
///
/// Every field is optional; an empty file means built-in defaults.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// How outcome -> outcome factors resolve (default: inputs-only)
    #[serde(default)]
    pub evaluation: Option<EvaluationMode>,

    /// Show the radar chart when the terminal supports it (default: true)
    #[serde(default)]
    pub chart: Option<bool>,

    /// Replaces the built-in driver/outcome catalog
    #[serde(default)]
    pub catalog: Option<Catalog>,
}

impl Config {
    pub fn evaluation_mode(&self) -> EvaluationMode {
        self.evaluation.unwrap_or_default()
    }

    pub fn chart_enabled(&self) -> bool {
        self.chart.unwrap_or(true)
    }

    pub fn effective_catalog(&self) -> Catalog {
        self.catalog.clone().unwrap_or_default()
    }
}
