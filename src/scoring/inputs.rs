use anyhow::{bail, Context, Result};

use super::catalog::Catalog;

pub const MIN_SCORE: u8 = 1;
pub const MAX_SCORE: u8 = 5;

/// Clamp any integer into the slider range.
pub fn clamp_score(value: i64) -> u8 {
    value.clamp(MIN_SCORE as i64, MAX_SCORE as i64) as u8
}

/// Current driver scores, one entry per catalog driver, in catalog order.
///
/// Every write goes through [`clamp_score`], so values never leave 1-5.
/// Names are fixed at construction; unknown names are rejected, not added.
#[derive(Debug, Clone, PartialEq)]
pub struct DriverScores {
    entries: Vec<(String, u8)>,
}

/// A `--set` override whose value had to be clamped.
#[derive(Debug, Clone, PartialEq)]
pub struct ClampedOverride {
    pub name: String,
    pub requested: i64,
    pub applied: u8,
}

impl DriverScores {
    pub fn from_catalog(catalog: &Catalog) -> Self {
        Self {
            entries: catalog
                .drivers
                .iter()
                .map(|d| (d.name.clone(), clamp_score(d.default as i64)))
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<u8> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| *v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u8)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), *v))
    }

    /// Set a driver by name. Returns the clamped value actually stored.
    pub fn set(&mut self, name: &str, value: i64) -> Result<u8> {
        let Some(idx) = self.entries.iter().position(|(n, _)| n == name) else {
            bail!("Unknown driver '{}'", name);
        };
        Ok(self.set_at(idx, value))
    }

    pub fn value_at(&self, idx: usize) -> Option<u8> {
        self.entries.get(idx).map(|(_, v)| *v)
    }

    pub fn name_at(&self, idx: usize) -> Option<&str> {
        self.entries.get(idx).map(|(n, _)| n.as_str())
    }

    /// Set by position. Out-of-range positions are ignored and return MIN_SCORE.
    pub fn set_at(&mut self, idx: usize, value: i64) -> u8 {
        match self.entries.get_mut(idx) {
            Some((_, v)) => {
                *v = clamp_score(value);
                *v
            }
            None => MIN_SCORE,
        }
    }

    pub fn increment(&mut self, name: &str) -> Result<u8> {
        let current = self
            .get(name)
            .with_context(|| format!("Unknown driver '{}'", name))?;
        self.set(name, current as i64 + 1)
    }

    pub fn decrement(&mut self, name: &str) -> Result<u8> {
        let current = self
            .get(name)
            .with_context(|| format!("Unknown driver '{}'", name))?;
        self.set(name, current as i64 - 1)
    }

    /// Restore every driver to its catalog default.
    pub fn reset(&mut self, catalog: &Catalog) {
        *self = Self::from_catalog(catalog);
    }

    /// True when every driver sits at its catalog default.
    pub fn is_default(&self, catalog: &Catalog) -> bool {
        *self == Self::from_catalog(catalog)
    }

    /// Apply `NAME=SCORE` overrides. Unknown names fail the whole batch
    /// before anything is written; out-of-range values are clamped and reported.
    pub fn apply_overrides(&mut self, overrides: &[(String, i64)]) -> Result<Vec<ClampedOverride>> {
        for (name, _) in overrides {
            if self.get(name).is_none() {
                bail!("Unknown driver '{}'", name);
            }
        }

        let mut clamped = Vec::new();
        for (name, value) in overrides {
            let applied = self.set(name, *value)?;
            if applied as i64 != *value {
                clamped.push(ClampedOverride {
                    name: name.clone(),
                    requested: *value,
                    applied,
                });
            }
        }
        Ok(clamped)
    }
}

/// Parse a `NAME=SCORE` override. The name may contain spaces and '&';
/// the split happens at the last '='.
pub fn parse_override(s: &str) -> Result<(String, i64)> {
    let Some((name, value)) = s.rsplit_once('=') else {
        bail!("Expected NAME=SCORE, got '{}'", s);
    };
    let name = name.trim();
    if name.is_empty() {
        bail!("Missing driver name in '{}'", s);
    }
    let value: i64 = value
        .trim()
        .parse()
        .with_context(|| format!("Invalid score in '{}'", s))?;
    Ok((name.to_string(), value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_catalog_uses_defaults() {
        let catalog = Catalog::default();
        let scores = DriverScores::from_catalog(&catalog);
        assert_eq!(scores.len(), 13);
        assert_eq!(scores.get("Leadership Commitment"), Some(5));
        assert_eq!(scores.get("Legacy Asset Intensity"), Some(2));
        assert_eq!(scores.get("Sector Type"), None);
        assert!(scores.is_default(&catalog));
    }

    #[test]
    fn test_iter_preserves_catalog_order() {
        let catalog = Catalog::default();
        let scores = DriverScores::from_catalog(&catalog);
        let names: Vec<&str> = scores.iter().map(|(n, _)| n).collect();
        let expected: Vec<&str> = catalog.drivers.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, expected);
    }

    #[test]
    fn test_set_clamps() {
        let mut scores = DriverScores::from_catalog(&Catalog::default());
        assert_eq!(scores.set("Market Demand", 9).unwrap(), 5);
        assert_eq!(scores.set("Market Demand", -3).unwrap(), 1);
        assert_eq!(scores.set("Market Demand", 2).unwrap(), 2);
        assert_eq!(scores.get("Market Demand"), Some(2));
    }

    #[test]
    fn test_set_unknown_driver_fails() {
        let mut scores = DriverScores::from_catalog(&Catalog::default());
        assert!(scores.set("Sector Type", 4).is_err());
        assert_eq!(scores.get("Sector Type"), None);
    }

    #[test]
    fn test_increment_decrement_saturate() {
        let mut scores = DriverScores::from_catalog(&Catalog::default());
        assert_eq!(scores.increment("Leadership Commitment").unwrap(), 5);
        assert_eq!(scores.decrement("Legacy Asset Intensity").unwrap(), 1);
        assert_eq!(scores.decrement("Legacy Asset Intensity").unwrap(), 1);
        assert_eq!(scores.increment("Legacy Asset Intensity").unwrap(), 2);
    }

    #[test]
    fn test_reset() {
        let catalog = Catalog::default();
        let mut scores = DriverScores::from_catalog(&catalog);
        scores.set("R&D Investment", 1).unwrap();
        assert!(!scores.is_default(&catalog));
        scores.reset(&catalog);
        assert!(scores.is_default(&catalog));
    }

    #[test]
    fn test_apply_overrides_reports_clamping() {
        let mut scores = DriverScores::from_catalog(&Catalog::default());
        let clamped = scores
            .apply_overrides(&[
                ("Market Demand".to_string(), 1),
                ("Innovation Culture".to_string(), 7),
            ])
            .unwrap();
        assert_eq!(scores.get("Market Demand"), Some(1));
        assert_eq!(scores.get("Innovation Culture"), Some(5));
        assert_eq!(
            clamped,
            vec![ClampedOverride {
                name: "Innovation Culture".to_string(),
                requested: 7,
                applied: 5,
            }]
        );
    }

    #[test]
    fn test_apply_overrides_unknown_name_writes_nothing() {
        let catalog = Catalog::default();
        let mut scores = DriverScores::from_catalog(&catalog);
        let result = scores.apply_overrides(&[
            ("Market Demand".to_string(), 1),
            ("Nope".to_string(), 3),
        ]);
        assert!(result.is_err());
        assert!(scores.is_default(&catalog));
    }

    #[test]
    fn test_parse_override() {
        assert_eq!(
            parse_override("Policy & Regulation=2").unwrap(),
            ("Policy & Regulation".to_string(), 2)
        );
        assert_eq!(
            parse_override(" R&D Investment = 5 ").unwrap(),
            ("R&D Investment".to_string(), 5)
        );
        assert!(parse_override("Market Demand").is_err());
        assert!(parse_override("=3").is_err());
        assert!(parse_override("Market Demand=high").is_err());
    }
}
