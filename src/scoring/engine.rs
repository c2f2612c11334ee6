use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use super::catalog::{Catalog, FactorKind};
use super::inputs::DriverScores;

/// Score used for any factor that cannot be resolved.
pub const DEFAULT_FACTOR_SCORE: f64 = 3.0;

/// How factors that name other outcomes are resolved.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum EvaluationMode {
    /// Factors are looked up in the driver scores only; outcome references
    /// fall back to the default score.
    #[default]
    InputsOnly,
    /// Outcomes are evaluated in dependency order so an outcome can consume
    /// another outcome's score from the same pass.
    Staged,
}

impl EvaluationMode {
    pub fn label(&self) -> &'static str {
        match self {
            EvaluationMode::InputsOnly => "inputs-only",
            EvaluationMode::Staged => "staged",
        }
    }

    pub fn toggle(self) -> Self {
        match self {
            EvaluationMode::InputsOnly => EvaluationMode::Staged,
            EvaluationMode::Staged => EvaluationMode::InputsOnly,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FactorSource {
    Driver,
    Outcome,
    Default,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FactorContribution {
    pub name: String,
    pub weight: u32,
    pub score: f64,
    pub source: FactorSource,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutcomeScore {
    pub name: String,
    /// Rounded to two decimals
    pub score: f64,
    #[serde(skip)]
    pub raw: f64,
    pub factors: Vec<FactorContribution>,
}

/// Round half to even at the second decimal (3.375 -> 3.38, 3.125 -> 3.12).
///
/// Ties are judged on the exact binary value, so 1.075 (stored just below
/// the midpoint) rounds to 1.07.
pub fn round_score(value: f64) -> f64 {
    let scaled = value * 100.0;
    // Exact error of the product above
    let residual = value.mul_add(100.0, -scaled);
    let lower = scaled.floor();
    let offset = (scaled - lower - 0.5) + residual;
    let cents = if offset > 0.0 {
        lower + 1.0
    } else if offset < 0.0 {
        lower
    } else if lower % 2.0 == 0.0 {
        lower
    } else {
        lower + 1.0
    };
    cents / 100.0
}

/// Compute every outcome of `catalog` from the current driver scores.
///
/// Results come back in catalog declaration order regardless of mode.
pub fn calculate_outcomes(
    scores: &DriverScores,
    catalog: &Catalog,
    mode: EvaluationMode,
) -> Vec<OutcomeScore> {
    let order: Vec<usize> = match mode {
        EvaluationMode::InputsOnly => (0..catalog.outcomes.len()).collect(),
        EvaluationMode::Staged => evaluation_order(catalog),
    };

    let mut computed: Vec<Option<OutcomeScore>> = vec![None; catalog.outcomes.len()];

    for idx in order {
        let outcome = &catalog.outcomes[idx];
        let mut weighted_sum = 0.0;
        let mut total_weight: u64 = 0;
        let mut factors = Vec::with_capacity(outcome.factors.len());

        for factor in &outcome.factors {
            let (score, source) = resolve_factor(&factor.name, scores, catalog, mode, &computed);
            weighted_sum += score * factor.weight as f64;
            total_weight += factor.weight as u64;
            factors.push(FactorContribution {
                name: factor.name.clone(),
                weight: factor.weight,
                score,
                source,
            });
        }

        let raw = if total_weight > 0 {
            weighted_sum / total_weight as f64
        } else {
            0.0
        };

        computed[idx] = Some(OutcomeScore {
            name: outcome.name.clone(),
            score: round_score(raw),
            raw,
            factors,
        });
    }

    computed.into_iter().flatten().collect()
}

fn resolve_factor(
    name: &str,
    scores: &DriverScores,
    catalog: &Catalog,
    mode: EvaluationMode,
    computed: &[Option<OutcomeScore>],
) -> (f64, FactorSource) {
    if let Some(value) = scores.get(name) {
        return (value as f64, FactorSource::Driver);
    }

    if mode == EvaluationMode::Staged {
        let earlier = catalog
            .outcome_index(name)
            .and_then(|idx| computed.get(idx))
            .and_then(|slot| slot.as_ref());
        if let Some(outcome) = earlier {
            return (outcome.raw, FactorSource::Outcome);
        }
    }

    (DEFAULT_FACTOR_SCORE, FactorSource::Default)
}

/// Topological order of outcomes over outcome -> outcome factor edges.
///
/// Ties resolve in declaration order. Outcomes caught in a cycle are appended
/// in declaration order; their unresolved references take the default score.
pub fn evaluation_order(catalog: &Catalog) -> Vec<usize> {
    let n = catalog.outcomes.len();
    let deps: Vec<Vec<usize>> = (0..n).map(|i| catalog.outcome_dependencies(i)).collect();

    let mut pending: Vec<usize> = deps.iter().map(|d| d.len()).collect();
    let mut dependents: Vec<Vec<usize>> = vec![Vec::new(); n];
    for (idx, d) in deps.iter().enumerate() {
        for &dep in d {
            dependents[dep].push(idx);
        }
    }

    let mut ready: VecDeque<usize> = (0..n).filter(|&i| pending[i] == 0).collect();
    let mut order = Vec::with_capacity(n);
    let mut placed = vec![false; n];

    while let Some(idx) = ready.pop_front() {
        order.push(idx);
        placed[idx] = true;
        let mut unlocked = Vec::new();
        for &next in &dependents[idx] {
            pending[next] -= 1;
            if pending[next] == 0 {
                unlocked.push(next);
            }
        }
        unlocked.sort_unstable();
        ready.extend(unlocked);
    }

    order.extend((0..n).filter(|&i| !placed[i]));
    order
}

/// Outcomes that sit on (or behind) a dependency cycle.
pub fn cyclic_outcomes(catalog: &Catalog) -> Vec<usize> {
    let n = catalog.outcomes.len();
    let mut resolved = vec![false; n];
    loop {
        let mut progressed = false;
        for idx in 0..n {
            if resolved[idx] {
                continue;
            }
            if catalog
                .outcome_dependencies(idx)
                .iter()
                .all(|&dep| resolved[dep])
            {
                resolved[idx] = true;
                progressed = true;
            }
        }
        if !progressed {
            break;
        }
    }
    (0..n).filter(|&i| !resolved[i]).collect()
}

/// Whether a factor reference is resolved by the default score under `mode`.
pub fn uses_default(catalog: &Catalog, factor: &str, mode: EvaluationMode) -> bool {
    match catalog.classify_factor(factor) {
        FactorKind::Driver => false,
        FactorKind::Outcome => mode == EvaluationMode::InputsOnly,
        FactorKind::Unsurveyed => true,
    }
}
