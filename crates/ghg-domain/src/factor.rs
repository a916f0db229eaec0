//! Emission factors

use crate::scope::Scope;
use crate::tier::QualityTier;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Region value for factors that apply everywhere
pub const GLOBAL_REGION: &str = "global";

/// Fractions of a factor's CO2e attributable to each gas
///
/// Fractions are taken as given; they are not required to sum to 1.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GasBreakdown {
    /// CO2 fraction
    #[serde(default)]
    pub co2: f64,
    /// CH4 fraction
    #[serde(default)]
    pub ch4: f64,
    /// N2O fraction
    #[serde(default)]
    pub n2o: f64,
}

impl GasBreakdown {
    /// Tolerance used by [`GasBreakdown::is_complete`]
    pub const SUM_TOLERANCE: f64 = 1e-6;

    /// Create a breakdown
    pub fn new(co2: f64, ch4: f64, n2o: f64) -> Self {
        Self { co2, ch4, n2o }
    }

    /// Sum of all fractions
    pub fn sum(&self) -> f64 {
        self.co2 + self.ch4 + self.n2o
    }

    /// Whether the fractions sum to 1 within tolerance
    pub fn is_complete(&self) -> bool {
        (self.sum() - 1.0).abs() <= Self::SUM_TOLERANCE
    }
}

impl Default for GasBreakdown {
    /// All CO2e attributed to CO2
    fn default() -> Self {
        Self {
            co2: 1.0,
            ch4: 0.0,
            n2o: 0.0,
        }
    }
}

/// A CO2e-per-unit multiplier scoped by scope, category, region and validity window
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmissionFactor {
    /// Scope the factor applies to
    pub scope: Scope,

    /// Category the factor applies to (matched case-insensitively)
    pub category: String,

    /// Region code, or "global"
    #[serde(default = "default_region")]
    pub region: String,

    /// CO2e per one unit of activity
    pub value: f64,

    /// Factor unit, e.g. "kg_co2e_per_kwh"
    pub unit: String,

    /// Optional gas split of the CO2e
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gas_breakdown: Option<GasBreakdown>,

    /// First day the factor is valid
    pub valid_from: NaiveDate,

    /// Last day the factor is valid; open-ended when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub valid_to: Option<NaiveDate>,

    /// Data-quality tier of the factor
    #[serde(default = "default_tier")]
    pub tier: QualityTier,

    /// Publisher / dataset label
    #[serde(default)]
    pub source: String,
}

fn default_region() -> String {
    GLOBAL_REGION.to_string()
}

fn default_tier() -> QualityTier {
    QualityTier::Tier2
}

impl EmissionFactor {
    /// Create a global, open-ended factor
    pub fn new(
        scope: Scope,
        category: impl Into<String>,
        value: f64,
        unit: impl Into<String>,
        valid_from: NaiveDate,
    ) -> Self {
        Self {
            scope,
            category: category.into(),
            region: default_region(),
            value,
            unit: unit.into(),
            gas_breakdown: None,
            valid_from,
            valid_to: None,
            tier: default_tier(),
            source: String::new(),
        }
    }

    /// Restrict the factor to a region
    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = region.into();
        self
    }

    /// Close the validity window
    pub fn with_valid_to(mut self, valid_to: NaiveDate) -> Self {
        self.valid_to = Some(valid_to);
        self
    }

    /// Set the tier
    pub fn with_tier(mut self, tier: QualityTier) -> Self {
        self.tier = tier;
        self
    }

    /// Attach a gas breakdown
    pub fn with_gas_breakdown(mut self, breakdown: GasBreakdown) -> Self {
        self.gas_breakdown = Some(breakdown);
        self
    }

    /// Set the source label
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = source.into();
        self
    }

    /// Whether the factor is valid on `date`
    pub fn is_valid_on(&self, date: NaiveDate) -> bool {
        self.valid_from <= date && self.valid_to.is_none_or(|end| end >= date)
    }

    /// Whether the factor applies to every region
    pub fn is_global(&self) -> bool {
        self.region.eq_ignore_ascii_case(GLOBAL_REGION)
    }

    /// Whether the factor applies to `region` (exactly, or via "global")
    pub fn applies_to_region(&self, region: &str) -> bool {
        self.is_global() || self.region.eq_ignore_ascii_case(region)
    }

    /// Check value and window sanity
    pub fn validate(&self) -> Result<(), String> {
        if !self.value.is_finite() || self.value < 0.0 {
            return Err(format!(
                "factor {}/{} has invalid value {}",
                self.scope, self.category, self.value
            ));
        }
        if let Some(end) = self.valid_to {
            if end < self.valid_from {
                return Err(format!(
                    "factor {}/{} valid_to {} is before valid_from {}",
                    self.scope, self.category, end, self.valid_from
                ));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_validity_window() {
        let f = EmissionFactor::new(Scope::Two, "electricity", 0.389, "kg_co2e_per_kwh", date(2023, 1, 1))
            .with_valid_to(date(2023, 12, 31));
        assert!(!f.is_valid_on(date(2022, 12, 31)));
        assert!(f.is_valid_on(date(2023, 1, 1)));
        assert!(f.is_valid_on(date(2023, 12, 31)));
        assert!(!f.is_valid_on(date(2024, 1, 1)));
    }

    #[test]
    fn test_open_ended_window() {
        let f = EmissionFactor::new(Scope::One, "natural_gas", 5.3, "kg_co2e_per_therm", date(2020, 1, 1));
        assert!(f.is_valid_on(date(2099, 1, 1)));
    }

    #[test]
    fn test_region_matching() {
        let global = EmissionFactor::new(Scope::One, "diesel", 2.68, "kg_co2e_per_liter", date(2020, 1, 1));
        let de = global.clone().with_region("DE");
        assert!(global.applies_to_region("TW"));
        assert!(de.applies_to_region("de"));
        assert!(!de.applies_to_region("US"));
    }

    #[test]
    fn test_gas_breakdown_completeness() {
        assert!(GasBreakdown::default().is_complete());
        assert!(GasBreakdown::new(0.95, 0.03, 0.02).is_complete());
        assert!(!GasBreakdown::new(0.9, 0.0, 0.0).is_complete());
    }

    #[test]
    fn test_validate_rejects_negative_value() {
        let f = EmissionFactor::new(Scope::One, "diesel", -1.0, "kg_co2e_per_liter", date(2020, 1, 1));
        assert!(f.validate().is_err());
    }
}
