pub mod catalog;
pub mod engine;
pub mod inputs;
pub mod validation;

pub use catalog::*;
pub use engine::{
    calculate_outcomes, cyclic_outcomes, round_score, uses_default, EvaluationMode,
    FactorContribution, FactorSource, OutcomeScore, DEFAULT_FACTOR_SCORE,
};
pub use inputs::{parse_override, ClampedOverride, DriverScores, MAX_SCORE, MIN_SCORE};
pub use validation::validate_catalog;
