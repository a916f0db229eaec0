//! Calculation results and the assumptions behind them

use crate::factor::GasBreakdown;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A silent default taken while calculating a result
///
/// Unit assumptions mean the engine could not confirm the unit it was given
/// and proceeded as if it matched; they lower the quality score. A partial
/// gas breakdown is recorded for audit only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Assumption {
    /// Activity unit could not be converted to the factor's unit
    ActivityUnit {
        /// Unit supplied by the caller
        given: String,
        /// Unit the factor expects
        expected: String,
    },
    /// Mass unit not recognized; kilograms assumed
    MassUnit {
        /// Unit supplied by the caller
        unit: String,
    },
    /// Steam/heat unit not recognized; MMBtu assumed
    SteamUnit {
        /// Unit supplied by the caller
        unit: String,
    },
    /// Distance unit not recognized; kilometres assumed
    DistanceUnit {
        /// Unit supplied by the caller
        unit: String,
    },
    /// Waste unit not recognized; tons assumed
    WasteUnit {
        /// Unit supplied by the caller
        unit: String,
    },
    /// Gas fractions do not sum to 1
    PartialGasBreakdown {
        /// Sum of the supplied fractions
        sum: f64,
    },
}

impl Assumption {
    /// Whether this assumption should count against data quality
    pub fn affects_quality(&self) -> bool {
        !matches!(self, Assumption::PartialGasBreakdown { .. })
    }
}

impl fmt::Display for Assumption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Assumption::ActivityUnit { given, expected } => {
                write!(f, "assumed '{}' matches factor unit '{}'", given, expected)
            }
            Assumption::MassUnit { unit } => write!(f, "assumed '{}' is kg", unit),
            Assumption::SteamUnit { unit } => write!(f, "assumed '{}' is MMBtu", unit),
            Assumption::DistanceUnit { unit } => write!(f, "assumed '{}' is km", unit),
            Assumption::WasteUnit { unit } => write!(f, "assumed '{}' is tons", unit),
            Assumption::PartialGasBreakdown { sum } => {
                write!(f, "gas fractions sum to {:.4}, not 1", sum)
            }
        }
    }
}

/// Output of one emission calculation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmissionResult {
    /// Total emissions in kg CO2e
    pub co2e_kg: f64,

    /// CO2 share in kg
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub co2_kg: Option<f64>,

    /// CH4 share in kg
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ch4_kg: Option<f64>,

    /// N2O share in kg
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub n2o_kg: Option<f64>,

    /// Human-readable audit formula
    pub formula: String,

    /// Uncertainty as a percentage of the total
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uncertainty_pct: Option<f64>,

    /// Defaults taken while calculating
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub assumptions: Vec<Assumption>,
}

impl EmissionResult {
    /// Create a result with a total and its formula
    pub fn new(co2e_kg: f64, formula: impl Into<String>) -> Self {
        Self {
            co2e_kg,
            co2_kg: None,
            ch4_kg: None,
            n2o_kg: None,
            formula: formula.into(),
            uncertainty_pct: None,
            assumptions: Vec::new(),
        }
    }

    /// Split the total across gases using `breakdown` fractions
    pub fn with_gases(mut self, breakdown: &GasBreakdown) -> Self {
        self.co2_kg = Some(self.co2e_kg * breakdown.co2);
        self.ch4_kg = Some(self.co2e_kg * breakdown.ch4);
        self.n2o_kg = Some(self.co2e_kg * breakdown.n2o);
        self
    }

    /// Record an assumption
    pub fn with_assumption(mut self, assumption: Assumption) -> Self {
        self.assumptions.push(assumption);
        self
    }

    /// Record several assumptions
    pub fn with_assumptions(mut self, assumptions: impl IntoIterator<Item = Assumption>) -> Self {
        self.assumptions.extend(assumptions);
        self
    }

    /// Total in metric tons CO2e
    pub fn tons(&self) -> f64 {
        self.co2e_kg / 1000.0
    }

    /// Whether any quality-affecting assumption was made
    pub fn is_assumed(&self) -> bool {
        self.assumptions.iter().any(Assumption::affects_quality)
    }
}
