use serde::{Deserialize, Serialize};

/// Driver and outcome catalog.
///
/// Built once at startup, either from the compiled-in default or from the
/// `catalog:` section of the config file. Computation code only reads it.
///
/// Example YAML:
/// ```yaml
/// catalog:
///   drivers:
///     - { name: "R&D Investment", default: 4 }
///     - { name: "Workforce Expertise", default: 4 }
///   outcomes:
///     - name: "Climate Tech Maturity"
///       factors:
///         - { name: "R&D Investment", weight: 5 }
///         - { name: "Workforce Expertise", weight: 4 }
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Catalog {
    /// User-adjustable inputs, in display order
    pub drivers: Vec<DriverSpec>,

    /// Derived metrics, in display order
    pub outcomes: Vec<OutcomeSpec>,
}

/// A driver: one slider, scored 1-5.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct DriverSpec {
    pub name: String,

    /// Initial slider value (1-5)
    pub default: u8,
}

/// An outcome: weighted mean over its factors.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct OutcomeSpec {
    pub name: String,

    /// Contributing factors in declaration order. A factor may name a driver,
    /// another outcome, or something never surveyed (e.g. "Sector Type").
    pub factors: Vec<FactorWeight>,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct FactorWeight {
    pub name: String,
    pub weight: u32,
}

/// What a factor name refers to within a catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FactorKind {
    Driver,
    Outcome,
    /// Neither a driver nor an outcome; always scored with the default.
    Unsurveyed,
}

impl Catalog {
    pub fn driver(&self, name: &str) -> Option<&DriverSpec> {
        self.drivers.iter().find(|d| d.name == name)
    }

    pub fn outcome_index(&self, name: &str) -> Option<usize> {
        self.outcomes.iter().position(|o| o.name == name)
    }

    /// Drivers win over outcomes of the same name, matching lookup order in the engine.
    pub fn classify_factor(&self, name: &str) -> FactorKind {
        if self.driver(name).is_some() {
            FactorKind::Driver
        } else if self.outcome_index(name).is_some() {
            FactorKind::Outcome
        } else {
            FactorKind::Unsurveyed
        }
    }

    /// Indices of the outcomes that `outcome_idx` lists as factors.
    pub fn outcome_dependencies(&self, outcome_idx: usize) -> Vec<usize> {
        let Some(outcome) = self.outcomes.get(outcome_idx) else {
            return Vec::new();
        };
        outcome
            .factors
            .iter()
            .filter(|f| self.classify_factor(&f.name) == FactorKind::Outcome)
            .filter_map(|f| self.outcome_index(&f.name))
            .collect()
    }
}

fn driver(name: &str, default: u8) -> DriverSpec {
    DriverSpec {
        name: name.to_string(),
        default,
    }
}

fn outcome(name: &str, factors: &[(&str, u32)]) -> OutcomeSpec {
    OutcomeSpec {
        name: name.to_string(),
        factors: factors
            .iter()
            .map(|(name, weight)| FactorWeight {
                name: name.to_string(),
                weight: *weight,
            })
            .collect(),
    }
}

impl Default for Catalog {
    /// The climate tech readiness catalog: 13 drivers, 4 outcomes.
    fn default() -> Self {
        Self {
            drivers: vec![
                driver("Leadership Commitment", 5),
                driver("R&D Investment", 4),
                driver("Workforce Expertise", 4),
                driver("Innovation Culture", 4),
                driver("Digital Infrastructure", 3),
                driver("Internal ESG Targets", 3),
                driver("Policy & Regulation", 5),
                driver("Market Demand", 4),
                driver("Access to Infrastructure", 4),
                driver("Investor Expectations", 3),
                driver("Supply Chain Readiness", 3),
                driver("Industry Competition", 3),
                driver("Legacy Asset Intensity", 2),
            ],
            outcomes: vec![
                outcome(
                    "Climate Tech Maturity",
                    &[
                        ("R&D Investment", 5),
                        ("Workforce Expertise", 4),
                        ("Access to Infrastructure", 4),
                    ],
                ),
                outcome(
                    "Decarbonization Progress",
                    &[
                        ("R&D Investment", 4),
                        ("Internal ESG Targets", 3),
                        ("Policy & Regulation", 5),
                        ("Climate Tech Maturity", 4),
                        ("Sector Type", 3),
                    ],
                ),
                outcome(
                    "Innovation Diffusion Speed",
                    &[
                        ("Innovation Culture", 4),
                        ("Digital Infrastructure", 3),
                        ("Market Demand", 4),
                        ("Supply Chain Readiness", 3),
                        ("Legacy Asset Intensity", 2),
                    ],
                ),
                outcome(
                    "ESG Performance Trajectory",
                    &[("Innovation Diffusion Speed", 4), ("Business Resilience", 3)],
                ),
            ],
        }
    }
}
