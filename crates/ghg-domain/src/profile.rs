//! Company profiles and baseline predictions

use crate::interval::Interval;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Industry classification used by the baseline estimator
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Industry {
    /// Steel, chemicals, semiconductors, cement
    ManufacturingHeavy,
    /// Assembly, light manufacturing
    ManufacturingLight,
    /// Power generation and utilities
    EnergyUtilities,
    /// Logistics and transport
    Transportation,
    /// Retail
    Retail,
    /// Software and IT services
    Technology,
    /// Banking, insurance
    FinancialServices,
    /// Hospitals, pharma services
    Healthcare,
    /// Hotels, restaurants
    Hospitality,
    /// Construction
    Construction,
    /// Agriculture
    Agriculture,
    /// Real estate
    RealEstate,
    /// Anything else, kept verbatim
    Other(String),
}

impl Industry {
    /// Default intensity for industries without a benchmark (t CO2e per $M revenue)
    pub const DEFAULT_INTENSITY: f64 = 50.0;

    /// All benchmarked industries
    pub const BENCHMARKED: [Industry; 12] = [
        Industry::ManufacturingHeavy,
        Industry::ManufacturingLight,
        Industry::EnergyUtilities,
        Industry::Transportation,
        Industry::Retail,
        Industry::Technology,
        Industry::FinancialServices,
        Industry::Healthcare,
        Industry::Hospitality,
        Industry::Construction,
        Industry::Agriculture,
        Industry::RealEstate,
    ];

    /// Parse an industry code; unknown codes become `Other`
    pub fn parse(code: &str) -> Self {
        match code.trim().to_lowercase().replace([' ', '-'], "_").as_str() {
            "manufacturing_heavy" => Industry::ManufacturingHeavy,
            "manufacturing_light" => Industry::ManufacturingLight,
            "energy_utilities" => Industry::EnergyUtilities,
            "transportation" => Industry::Transportation,
            "retail" => Industry::Retail,
            "technology" => Industry::Technology,
            "financial_services" => Industry::FinancialServices,
            "healthcare" => Industry::Healthcare,
            "hospitality" => Industry::Hospitality,
            "construction" => Industry::Construction,
            "agriculture" => Industry::Agriculture,
            "real_estate" => Industry::RealEstate,
            _ => Industry::Other(code.trim().to_string()),
        }
    }

    /// Snake-case code
    pub fn code(&self) -> &str {
        match self {
            Industry::ManufacturingHeavy => "manufacturing_heavy",
            Industry::ManufacturingLight => "manufacturing_light",
            Industry::EnergyUtilities => "energy_utilities",
            Industry::Transportation => "transportation",
            Industry::Retail => "retail",
            Industry::Technology => "technology",
            Industry::FinancialServices => "financial_services",
            Industry::Healthcare => "healthcare",
            Industry::Hospitality => "hospitality",
            Industry::Construction => "construction",
            Industry::Agriculture => "agriculture",
            Industry::RealEstate => "real_estate",
            Industry::Other(code) => code,
        }
    }

    /// Benchmark emissions intensity in t CO2e per $M revenue
    pub fn intensity(&self) -> f64 {
        match self {
            Industry::ManufacturingHeavy => 450.0,
            Industry::ManufacturingLight => 120.0,
            Industry::EnergyUtilities => 2500.0,
            Industry::Transportation => 380.0,
            Industry::Retail => 45.0,
            Industry::Technology => 25.0,
            Industry::FinancialServices => 15.0,
            Industry::Healthcare => 65.0,
            Industry::Hospitality => 85.0,
            Industry::Construction => 180.0,
            Industry::Agriculture => 220.0,
            Industry::RealEstate => 55.0,
            Industry::Other(_) => Self::DEFAULT_INTENSITY,
        }
    }

    /// Typical (scope 1, scope 2) shares of total emissions; scope 3 takes the rest
    pub fn scope_split(&self) -> (f64, f64) {
        match self {
            Industry::ManufacturingHeavy
            | Industry::ManufacturingLight
            | Industry::EnergyUtilities => (0.3, 0.4),
            Industry::Transportation => (0.4, 0.2),
            _ => (0.1, 0.4),
        }
    }
}

impl From<String> for Industry {
    fn from(s: String) -> Self {
        Industry::parse(&s)
    }
}

impl From<Industry> for String {
    fn from(industry: Industry) -> Self {
        industry.code().to_string()
    }
}

impl fmt::Display for Industry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Company characteristics fed to the baseline estimator
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompanyProfile {
    /// Annual revenue in USD
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub revenue: Option<f64>,

    /// Headcount
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub employees: Option<f64>,

    /// Annual energy spend in USD
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub energy_spend: Option<f64>,

    /// Total facility floor area in square feet
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub facility_area: Option<f64>,

    /// Industry
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub industry: Option<Industry>,

    /// Region code
    ///
    /// Carried for reporting. The regression estimator does not read it:
    /// its synthetic population varies by grid mix at random, so a region
    /// label has no signal to learn.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
}

impl CompanyProfile {
    /// Whether the profile carries what an estimator needs at minimum
    pub fn is_estimable(&self) -> bool {
        self.revenue.is_some_and(|r| r > 0.0) && self.industry.is_some()
    }
}

/// Estimator output
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BaselinePrediction {
    /// Total annual emissions in t CO2e
    pub total: f64,
    /// Scope 1 share
    pub scope_1: f64,
    /// Scope 2 share
    pub scope_2: f64,
    /// Scope 3 share
    pub scope_3: f64,
    /// Prediction interval for the total
    pub interval: Interval,
    /// (upper - lower) / total × 100
    pub uncertainty_pct: f64,
    /// Label of the model that produced the prediction
    pub method: String,
}
