use std::collections::HashSet;

use super::catalog::Catalog;
use super::engine::{cyclic_outcomes, EvaluationMode};
use super::inputs::{MAX_SCORE, MIN_SCORE};

/// Validate the catalog at startup.
/// Returns all validation errors at once (not just the first).
pub fn validate_catalog(catalog: &Catalog, mode: EvaluationMode) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    if catalog.drivers.is_empty() {
        errors.push("catalog.drivers: at least one driver is required".to_string());
    }
    if catalog.outcomes.is_empty() {
        errors.push("catalog.outcomes: at least one outcome is required".to_string());
    }

    let mut driver_names = HashSet::new();
    for (i, driver) in catalog.drivers.iter().enumerate() {
        if driver.name.trim().is_empty() {
            errors.push(format!("catalog.drivers[{}].name: must not be empty", i));
        }
        if !driver_names.insert(driver.name.as_str()) {
            errors.push(format!(
                "catalog.drivers[{}].name: duplicate driver '{}'",
                i, driver.name
            ));
        }
        if !(MIN_SCORE..=MAX_SCORE).contains(&driver.default) {
            errors.push(format!(
                "catalog.drivers[{}].default: {} is outside {}-{}",
                i, driver.default, MIN_SCORE, MAX_SCORE
            ));
        }
    }

    let mut outcome_names = HashSet::new();
    for (i, outcome) in catalog.outcomes.iter().enumerate() {
        if outcome.name.trim().is_empty() {
            errors.push(format!("catalog.outcomes[{}].name: must not be empty", i));
        }
        if !outcome_names.insert(outcome.name.as_str()) {
            errors.push(format!(
                "catalog.outcomes[{}].name: duplicate outcome '{}'",
                i, outcome.name
            ));
        }
        if driver_names.contains(outcome.name.as_str()) {
            errors.push(format!(
                "catalog.outcomes[{}].name: '{}' is also a driver",
                i, outcome.name
            ));
        }
        if outcome.factors.is_empty() {
            errors.push(format!(
                "catalog.outcomes[{}].factors: at least one factor is required",
                i
            ));
        }

        let mut factor_names = HashSet::new();
        for (j, factor) in outcome.factors.iter().enumerate() {
            if !factor_names.insert(factor.name.as_str()) {
                errors.push(format!(
                    "catalog.outcomes[{}].factors[{}].name: duplicate factor '{}'",
                    i, j, factor.name
                ));
            }
            if factor.weight == 0 {
                errors.push(format!(
                    "catalog.outcomes[{}].factors[{}].weight: must be positive",
                    i, j
                ));
            }
        }
    }

    if mode == EvaluationMode::Staged {
        for idx in cyclic_outcomes(catalog) {
            errors.push(format!(
                "catalog.outcomes[{}]: '{}' is part of a dependency cycle (not allowed in staged mode)",
                idx, catalog.outcomes[idx].name
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
