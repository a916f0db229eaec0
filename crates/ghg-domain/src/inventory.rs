//! Facility and company inventories

use crate::scope::Scope3Category;
use crate::tier::QualityTier;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Aggregated emissions of one facility for one period, in metric tons CO2e
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FacilityInventory {
    /// Facility identifier
    pub facility_id: String,

    /// Display name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Scope 1 total
    pub scope_1: f64,

    /// Scope 2 location-based total
    pub scope_2_location: f64,

    /// Scope 2 market-based total
    pub scope_2_market: f64,

    /// Scope 3 total
    pub scope_3: f64,

    /// Scope 1 came from an estimate
    pub scope_1_estimated: bool,

    /// Scope 2 came from an estimate
    pub scope_2_estimated: bool,

    /// Scope 3 came from an estimate
    pub scope_3_estimated: bool,

    /// A contributing calculation relied on a unit assumption
    #[serde(default)]
    pub assumed: bool,

    /// Data-quality tier
    pub tier: QualityTier,

    /// Facility quality score (0-5)
    pub quality_score: f64,
}

impl FacilityInventory {
    /// Empty inventory for a facility
    pub fn new(facility_id: impl Into<String>, tier: QualityTier) -> Self {
        Self {
            facility_id: facility_id.into(),
            name: None,
            scope_1: 0.0,
            scope_2_location: 0.0,
            scope_2_market: 0.0,
            scope_3: 0.0,
            scope_1_estimated: false,
            scope_2_estimated: false,
            scope_3_estimated: false,
            assumed: false,
            tier,
            quality_score: tier.base_score(),
        }
    }

    /// Scope 2 under the market-based convention
    pub fn scope_2(&self) -> f64 {
        self.scope_2_market
    }

    /// Total emissions (market-based Scope 2)
    pub fn total(&self) -> f64 {
        self.scope_1 + self.scope_2() + self.scope_3
    }

    /// Number of scope values that were estimated
    pub fn estimated_count(&self) -> usize {
        [self.scope_1_estimated, self.scope_2_estimated, self.scope_3_estimated]
            .iter()
            .filter(|&&flag| flag)
            .count()
    }

    /// Whether any scope value was estimated
    pub fn has_estimates(&self) -> bool {
        self.estimated_count() > 0
    }
}

/// Company-level inventory: facility sums plus the Scope 3 breakdown
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CompanyInventory {
    /// Company name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company_name: Option<String>,

    /// Reporting year
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reporting_year: Option<i32>,

    /// Per-facility inventories
    pub facilities: Vec<FacilityInventory>,

    /// Scope 1 total
    pub scope_1_total: f64,

    /// Scope 2 location-based total
    pub scope_2_location_total: f64,

    /// Scope 2 market-based total
    pub scope_2_market_total: f64,

    /// Reported Scope 3 total
    pub scope_3_total: f64,

    /// Sum of facility-level Scope 3 values
    pub scope_3_facility_total: f64,

    /// Scope 3 emissions by category
    pub scope_3_breakdown: BTreeMap<Scope3Category, f64>,

    /// Excluded categories and why
    pub exclusions: BTreeMap<Scope3Category, String>,

    /// Methodology text per included category
    pub methodology: BTreeMap<Scope3Category, String>,

    /// Emission-weighted quality score (0-5)
    pub quality_score: f64,

    /// Fraction of facilities with sufficiently complete reporting
    pub reporting_completeness: f64,

    /// Percentage of facilities carrying at least one estimate
    pub estimated_data_pct: f64,
}

impl CompanyInventory {
    /// Scope 2 under the market-based convention
    pub fn scope_2_total(&self) -> f64 {
        self.scope_2_market_total
    }

    /// Scope 1 + market-based Scope 2 + Scope 3
    pub fn grand_total(&self) -> f64 {
        self.scope_1_total + self.scope_2_total() + self.scope_3_total
    }

    /// Scope 1 + location-based Scope 2 + Scope 3
    pub fn grand_total_location(&self) -> f64 {
        self.scope_1_total + self.scope_2_location_total + self.scope_3_total
    }

    /// Number of categories in the Scope 3 breakdown
    pub fn included_categories(&self) -> usize {
        self.scope_3_breakdown.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_facility_totals_use_market() {
        let mut f = FacilityInventory::new("a", QualityTier::Tier1);
        f.scope_1 = 10.0;
        f.scope_2_location = 50.0;
        f.scope_2_market = 20.0;
        f.scope_3 = 5.0;
        assert_eq!(f.total(), 35.0);
    }

    #[test]
    fn test_estimated_count() {
        let mut f = FacilityInventory::new("a", QualityTier::Tier2);
        assert!(!f.has_estimates());
        f.scope_1_estimated = true;
        f.scope_3_estimated = true;
        assert_eq!(f.estimated_count(), 2);
    }

    #[test]
    fn test_company_grand_totals() {
        let inv = CompanyInventory {
            scope_1_total: 100.0,
            scope_2_location_total: 300.0,
            scope_2_market_total: 200.0,
            scope_3_total: 50.0,
            ..Default::default()
        };
        assert_eq!(inv.grand_total(), 350.0);
        assert_eq!(inv.grand_total_location(), 450.0);
    }

    #[test]
    fn test_breakdown_serializes_with_numeric_keys() {
        let mut inv = CompanyInventory::default();
        inv.scope_3_breakdown.insert(Scope3Category(6), 12.5);
        let json = serde_json::to_value(&inv).unwrap();
        assert_eq!(json["scope_3_breakdown"]["6"], 12.5);
    }
}
