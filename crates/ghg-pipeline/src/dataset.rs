//! Raw company datasets as reported by sites
//!
//! Facility records arrive in heterogeneous schemas: electricity in kWh, MWh
//! or GWh; natural gas in therms, m³, MMBtu or a nested `{amount, unit}`;
//! emissions either flat or under `emissions_data`. Known fields are typed,
//! everything else is preserved untouched in `extra`.

use crate::error::PipelineError;
use ghg_domain::{ActivityRecord, CompanyProfile, QualityTier};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

fn is_false(b: &bool) -> bool {
    !*b
}

/// Natural gas reported as an amount with a unit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NaturalGasEntry {
    /// Quantity
    pub amount: f64,
    /// Unit of `amount`
    pub unit: String,
}

/// Nested emissions block used by some reporting systems
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EmissionsData {
    /// Scope 1 in t CO2e
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope_1_tons: Option<f64>,
    /// Scope 2 in t CO2e
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope_2_tons: Option<f64>,
    /// Scope 3 in t CO2e
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope_3_tons: Option<f64>,
}

/// One facility's raw or normalized record
///
/// Emission values are metric tons CO2e. Fields the pipeline fills in
/// (`*_estimated`, `assumed`, `annualization_factor`) are omitted from
/// serialized output while unset.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FacilityRecord {
    /// Facility identifier
    pub facility_id: String,

    /// Display name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Free-text address
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,

    /// Grid region code
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,

    /// Scope 1 total
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope_1: Option<f64>,

    /// Scope 2 total (market-based convention)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope_2: Option<f64>,

    /// Scope 3 total
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope_3: Option<f64>,

    /// Scope 2 location-based
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope_2_location: Option<f64>,

    /// Scope 2 market-based
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope_2_market: Option<f64>,

    /// Nested emissions block
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emissions_data: Option<EmissionsData>,

    /// Electricity in kWh
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub electricity_kwh: Option<f64>,

    /// Electricity in MWh
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub electricity_mwh: Option<f64>,

    /// Electricity in GWh
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub electricity_gwh: Option<f64>,

    /// Renewable electricity covered by contracts, in kWh
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub renewable_electricity_kwh: Option<f64>,

    /// Supplier-specific factor for market-based Scope 2, kg CO2e/kWh
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub supplier_factor_kg_per_kwh: Option<f64>,

    /// Natural gas in therms
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub natural_gas_therms: Option<f64>,

    /// Natural gas in cubic meters
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub natural_gas_m3: Option<f64>,

    /// Natural gas in MMBtu
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub natural_gas_mmbtu: Option<f64>,

    /// Natural gas with an explicit unit
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub natural_gas: Option<NaturalGasEntry>,

    /// Nameplate process-gas use in kg, by gas
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub process_gases_kg: BTreeMap<String, f64>,

    /// Data-quality label, e.g. "Tier 2"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_quality: Option<String>,

    /// Share of expected data actually reported (0-1)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reporting_completeness: Option<f64>,

    /// Months of operation in the reporting year
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operational_months: Option<u32>,

    /// Activity records for calculating missing scopes
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub activities: Vec<ActivityRecord>,

    /// Scope 1 was estimated
    #[serde(default, skip_serializing_if = "is_false")]
    pub scope_1_estimated: bool,

    /// Scope 2 was estimated
    #[serde(default, skip_serializing_if = "is_false")]
    pub scope_2_estimated: bool,

    /// Scope 3 was estimated
    #[serde(default, skip_serializing_if = "is_false")]
    pub scope_3_estimated: bool,

    /// A calculated scope relied on a unit assumption
    #[serde(default, skip_serializing_if = "is_false")]
    pub assumed: bool,

    /// Multiplier applied by annualization
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub annualization_factor: Option<f64>,

    /// Fields the pipeline does not interpret
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl FacilityRecord {
    /// Empty record for a facility
    pub fn new(facility_id: impl Into<String>) -> Self {
        Self {
            facility_id: facility_id.into(),
            ..Self::default()
        }
    }

    /// Parsed tier, if the label is present and valid
    pub fn tier(&self) -> Option<QualityTier> {
        self.data_quality.as_deref().and_then(QualityTier::parse)
    }

    /// Scope 1 + Scope 2 + Scope 3, missing values counted as zero
    pub fn total(&self) -> f64 {
        self.scope_1.unwrap_or(0.0) + self.scope_2.unwrap_or(0.0) + self.scope_3.unwrap_or(0.0)
    }

    /// Whether any scope was estimated
    pub fn has_estimates(&self) -> bool {
        self.scope_1_estimated || self.scope_2_estimated || self.scope_3_estimated
    }
}

/// Spend line in a Scope 3 category
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SpendItem {
    /// What was bought
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub commodity: Option<String>,
    /// Spend in `currency` units
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spend: Option<f64>,
    /// Spend in millions of USD
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spend_usd_millions: Option<f64>,
    /// Currency code (default USD)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    /// kg CO2e per currency unit
    #[serde(default, alias = "emission_factor", skip_serializing_if = "Option::is_none")]
    pub factor: Option<f64>,
    /// Whether a factor exists upstream
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ef_available: Option<bool>,
}

impl SpendItem {
    /// Spend and currency, preferring the explicit `spend` field
    pub fn amount(&self) -> Option<(f64, String)> {
        match (self.spend, self.spend_usd_millions) {
            (Some(spend), _) => Some((spend, self.currency.clone().unwrap_or_else(|| "USD".into()))),
            (None, Some(millions)) => Some((millions * 1_000_000.0, "USD".into())),
            (None, None) => None,
        }
    }
}

/// Distance line in a Scope 3 category
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DistanceItem {
    /// Transport mode or trip description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<String>,
    /// Distance travelled
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance: Option<f64>,
    /// Unit of `distance` (default km)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    /// kg CO2e per km
    #[serde(default, alias = "emission_factor", skip_serializing_if = "Option::is_none")]
    pub factor: Option<f64>,
}

/// Waste line in a Scope 3 category
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WasteItem {
    /// Waste stream
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub waste_type: Option<String>,
    /// Quantity in `unit`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<f64>,
    /// Quantity in tons
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tons: Option<f64>,
    /// Unit of `amount` (default tons)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    /// Disposal route
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disposal: Option<String>,
    /// kg CO2e per ton
    #[serde(default, alias = "emission_factor", skip_serializing_if = "Option::is_none")]
    pub factor: Option<f64>,
}

impl WasteItem {
    /// Quantity and unit, preferring `amount`/`unit` over `tons`
    pub fn quantity(&self) -> Option<(f64, String)> {
        match (self.amount, self.tons) {
            (Some(amount), _) => Some((amount, self.unit.clone().unwrap_or_else(|| "tons".into()))),
            (None, Some(tons)) => Some((tons, "tons".into())),
            (None, None) => None,
        }
    }
}

/// Raw data for one Scope 3 category (`category_N`)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Scope3CategoryRaw {
    /// "Excluded", "Not Applicable", "Partially Estimated", ...
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    /// Methodology label
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
    /// Why the category is excluded
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rationale: Option<String>,
    /// Alternate field for `rationale`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exclusion_rationale: Option<String>,
    /// Explicit category total in t CO2e
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_emissions_estimate: Option<f64>,
    /// Data-quality label
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_quality: Option<String>,
    /// Share of expected data reported (0-1)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completeness: Option<f64>,
    /// Spend detail
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub spend_data: Vec<SpendItem>,
    /// Distance detail
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub distance_data: Vec<DistanceItem>,
    /// Waste detail
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub waste_data: Vec<WasteItem>,
    /// Fields the pipeline does not interpret
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl Scope3CategoryRaw {
    /// Rationale from either field
    pub fn rationale(&self) -> Option<&str> {
        self.rationale
            .as_deref()
            .or(self.exclusion_rationale.as_deref())
    }

    /// Parsed tier
    pub fn tier(&self) -> Option<QualityTier> {
        self.data_quality.as_deref().and_then(QualityTier::parse)
    }

    /// Whether the status marks the category as out of the inventory
    pub fn is_excluded(&self) -> bool {
        self.status.as_deref().is_some_and(|s| {
            let s = s.trim().to_lowercase().replace(['_', '-'], " ");
            s == "excluded" || s == "not applicable"
        })
    }

    /// Whether any activity detail is present
    pub fn has_detail(&self) -> bool {
        !(self.spend_data.is_empty() && self.distance_data.is_empty() && self.waste_data.is_empty())
    }
}

/// One company's raw dataset
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawDataset {
    /// Company name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company_name: Option<String>,

    /// Reporting year
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reporting_year: Option<i32>,

    /// Facility records
    #[serde(default, alias = "facilities_raw")]
    pub facilities: Vec<FacilityRecord>,

    /// Scope 3 raw data keyed `category_N`
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub scope_3_raw_data: BTreeMap<String, Scope3CategoryRaw>,

    /// Profile for the baseline estimator
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company_profile: Option<CompanyProfile>,

    /// Monthly company totals in t CO2e, oldest first
    #[serde(default, alias = "monthly_emissions", skip_serializing_if = "Vec::is_empty")]
    pub monthly_history: Vec<f64>,

    /// Fields the pipeline does not interpret
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl RawDataset {
    /// Parse a dataset from JSON
    pub fn from_json(json: &str) -> Result<Self, PipelineError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Whether stage 2 has anything to resolve a baseline from
    pub fn has_baseline_inputs(&self) -> bool {
        self.company_profile.is_some() || !self.monthly_history.is_empty()
    }
}
