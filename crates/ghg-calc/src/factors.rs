//! In-memory emission factor table

use chrono::NaiveDate;
use ghg_domain::traits::FactorLookup;
use ghg_domain::{EmissionFactor, Scope};
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;

/// A list of emission factors with the authoritative-factor lookup rule
///
/// Candidates must match scope and category (case-insensitive), be valid on
/// the date, and apply to the region exactly or via "global". Among those an
/// exact region beats global, then the better tier wins, then the latest
/// `valid_from`.
///
/// TOML layout (dates are quoted strings):
///
/// ```toml
/// [[factor]]
/// scope = 2
/// category = "electricity"
/// region = "DE"
/// value = 0.310
/// unit = "kg_co2e_per_kwh"
/// valid_from = "2024-01-01"
/// tier = 1
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FactorTable {
    #[serde(default, rename = "factor")]
    factors: Vec<EmissionFactor>,
}

impl FactorTable {
    /// Empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table from factors, validating each
    pub fn from_factors(factors: Vec<EmissionFactor>) -> Result<Self, String> {
        for factor in &factors {
            factor.validate()?;
        }
        Ok(Self { factors })
    }

    /// Add a factor
    pub fn insert(&mut self, factor: EmissionFactor) -> Result<(), String> {
        factor.validate()?;
        self.factors.push(factor);
        Ok(())
    }

    /// Builder-style insert for fixtures
    pub fn with(mut self, factor: EmissionFactor) -> Result<Self, String> {
        self.insert(factor)?;
        Ok(self)
    }

    /// Number of factors
    pub fn len(&self) -> usize {
        self.factors.len()
    }

    /// Whether the table is empty
    pub fn is_empty(&self) -> bool {
        self.factors.is_empty()
    }

    /// Iterate factors
    pub fn iter(&self) -> impl Iterator<Item = &EmissionFactor> {
        self.factors.iter()
    }

    /// Load a table from TOML
    pub fn from_toml(toml_str: &str) -> Result<Self, String> {
        let table: Self =
            toml::from_str(toml_str).map_err(|e| format!("Failed to parse TOML: {}", e))?;
        Self::from_factors(table.factors)
    }

    /// Serialize the table to TOML
    pub fn to_toml(&self) -> Result<String, String> {
        toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize to TOML: {}", e))
    }

    /// Find the authoritative factor
    pub fn find(
        &self,
        scope: Scope,
        category: &str,
        region: &str,
        date: NaiveDate,
    ) -> Option<&EmissionFactor> {
        let category = category.trim();
        self.factors
            .iter()
            .filter(|f| f.scope == scope)
            .filter(|f| f.category.eq_ignore_ascii_case(category))
            .filter(|f| f.is_valid_on(date))
            .filter(|f| f.applies_to_region(region))
            .max_by_key(|f| (!f.is_global(), Reverse(f.tier), f.valid_from))
    }
}

impl FactorLookup for FactorTable {
    fn lookup(
        &self,
        scope: Scope,
        category: &str,
        region: &str,
        date: NaiveDate,
    ) -> Option<EmissionFactor> {
        self.find(scope, category, region, date).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ghg_domain::QualityTier;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn electricity(value: f64, from: NaiveDate) -> EmissionFactor {
        EmissionFactor::new(Scope::Two, "electricity", value, "kg_co2e_per_kwh", from)
    }

    #[test]
    fn test_exact_region_beats_global() {
        let table = FactorTable::new()
            .with(electricity(0.4, date(2020, 1, 1)).with_tier(QualityTier::Tier1))
            .unwrap()
            .with(electricity(0.31, date(2020, 1, 1)).with_region("DE").with_tier(QualityTier::Tier3))
            .unwrap();

        let f = table.lookup(Scope::Two, "Electricity", "de", date(2024, 6, 1)).unwrap();
        assert_eq!(f.value, 0.31);

        let f = table.lookup(Scope::Two, "electricity", "FR", date(2024, 6, 1)).unwrap();
        assert_eq!(f.value, 0.4);
    }

    #[test]
    fn test_better_tier_then_latest() {
        let table = FactorTable::from_factors(vec![
            electricity(0.50, date(2020, 1, 1)).with_tier(QualityTier::Tier3),
            electricity(0.45, date(2021, 1, 1)).with_tier(QualityTier::Tier2),
            electricity(0.40, date(2023, 1, 1)).with_tier(QualityTier::Tier2),
        ])
        .unwrap();

        let f = table.lookup(Scope::Two, "electricity", "US", date(2024, 1, 1)).unwrap();
        assert_eq!(f.value, 0.40);

        let f = table.lookup(Scope::Two, "electricity", "US", date(2022, 1, 1)).unwrap();
        assert_eq!(f.value, 0.45);
    }

    #[test]
    fn test_expired_and_wrong_scope_excluded() {
        let table = FactorTable::from_factors(vec![
            electricity(0.5, date(2020, 1, 1)).with_valid_to(date(2020, 12, 31)),
        ])
        .unwrap();
        assert!(table.lookup(Scope::Two, "electricity", "US", date(2021, 1, 1)).is_none());
        assert!(table.lookup(Scope::One, "electricity", "US", date(2020, 6, 1)).is_none());
    }

    #[test]
    fn test_from_toml() {
        let table = FactorTable::from_toml(
            r#"
            [[factor]]
            scope = 1
            category = "diesel"
            value = 2.68
            unit = "kg_co2e_per_liter"
            valid_from = "2023-01-01"
            gas_breakdown = { co2 = 0.99, ch4 = 0.005, n2o = 0.005 }

            [[factor]]
            scope = 2
            category = "electricity"
            region = "TW"
            value = 0.502
            unit = "kg_co2e_per_kwh"
            valid_from = "2023-01-01"
            tier = 1
            "#,
        )
        .unwrap();

        assert_eq!(table.len(), 2);
        let f = table.lookup(Scope::Two, "electricity", "TW", date(2024, 1, 1)).unwrap();
        assert_eq!(f.tier, QualityTier::Tier1);
        let diesel = table.lookup(Scope::One, "diesel", "TW", date(2024, 1, 1)).unwrap();
        assert!(diesel.gas_breakdown.unwrap().is_complete());
    }

    #[test]
    fn test_from_toml_rejects_bad_factor() {
        let result = FactorTable::from_toml(
            r#"
            [[factor]]
            scope = 1
            category = "diesel"
            value = -2.0
            unit = "kg_co2e_per_liter"
            valid_from = "2023-01-01"
            "#,
        );
        assert!(result.is_err());
    }
}
