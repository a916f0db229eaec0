//! Scope 1: stationary combustion, mobile combustion and fugitive emissions

use crate::error::CalcError;
use crate::tables::ReferenceTables;
use crate::units::{FactorUnit, UnitConverter};
use ghg_domain::{Assumption, EmissionResult, GasBreakdown};
use tracing::{debug, warn};

/// Direct emission formulas
#[derive(Debug, Clone, Default)]
pub struct Scope1Engine {
    converter: UnitConverter,
}

impl Scope1Engine {
    /// Create an engine
    pub fn new() -> Self {
        Self::default()
    }

    /// `activity (in factor units) × factor = kg CO2e`
    ///
    /// The expected activity unit comes from the `<magnitude>_per_<unit>`
    /// factor unit. When it cannot be parsed or the activity cannot be
    /// converted to it, the activity is used as given and the result carries
    /// an [`Assumption::ActivityUnit`].
    pub fn calculate_emission(
        &self,
        activity_amount: f64,
        activity_unit: &str,
        factor: f64,
        factor_unit: &str,
        gas_breakdown: Option<&GasBreakdown>,
    ) -> EmissionResult {
        let parsed = FactorUnit::parse(factor_unit);
        let mut assumptions = Vec::new();

        let (amount, amount_desc) = match parsed.per.as_deref() {
            Some(expected) => match self.converter.convert(activity_amount, activity_unit, expected) {
                Ok(converted) if activity_unit.trim().eq_ignore_ascii_case(expected) => {
                    (converted, format!("{} {}", activity_amount, activity_unit))
                }
                Ok(converted) => (
                    converted,
                    format!(
                        "{} {} ({:.4} {})",
                        activity_amount, activity_unit, converted, expected
                    ),
                ),
                Err(_) => {
                    warn!(
                        "Cannot convert {} to {}; assuming units match",
                        activity_unit, expected
                    );
                    assumptions.push(Assumption::ActivityUnit {
                        given: activity_unit.to_string(),
                        expected: expected.to_string(),
                    });
                    (activity_amount, format!("{} {}", activity_amount, activity_unit))
                }
            },
            None => {
                warn!(
                    "Factor unit '{}' has no per-unit; assuming '{}' matches",
                    factor_unit, activity_unit
                );
                assumptions.push(Assumption::ActivityUnit {
                    given: activity_unit.to_string(),
                    expected: factor_unit.to_string(),
                });
                (activity_amount, format!("{} {}", activity_amount, activity_unit))
            }
        };

        let mass = self.converter.to_kg_co2e(amount * factor, &parsed.magnitude);
        assumptions.extend(mass.assumption);

        if let Some(breakdown) = gas_breakdown.filter(|b| !b.is_complete()) {
            warn!(
                "Gas breakdown sums to {:.4}; gas split will not add up to the total",
                breakdown.sum()
            );
            assumptions.push(Assumption::PartialGasBreakdown {
                sum: breakdown.sum(),
            });
        }

        let formula = format!(
            "{} × {} {} = {:.2} kg CO2e",
            amount_desc, factor, factor_unit, mass.value
        );
        debug!("Scope 1: {}", formula);

        let result = EmissionResult::new(mass.value, formula).with_assumptions(assumptions);
        match gas_breakdown {
            Some(breakdown) => result.with_gases(breakdown),
            None => result,
        }
    }

    /// Fuel burned in boilers, furnaces, generators
    pub fn stationary_combustion(
        &self,
        fuel_amount: f64,
        fuel_unit: &str,
        factor: f64,
        factor_unit: &str,
        gas_breakdown: Option<&GasBreakdown>,
    ) -> EmissionResult {
        let mut result =
            self.calculate_emission(fuel_amount, fuel_unit, factor, factor_unit, gas_breakdown);
        result.formula = format!("Stationary combustion: {}", result.formula);
        result
    }

    /// Fuel burned or distance driven by owned vehicles
    pub fn mobile_combustion(
        &self,
        amount: f64,
        unit: &str,
        factor: f64,
        factor_unit: &str,
        gas_breakdown: Option<&GasBreakdown>,
    ) -> EmissionResult {
        let mut result = self.calculate_emission(amount, unit, factor, factor_unit, gas_breakdown);
        result.formula = format!("Mobile combustion: {}", result.formula);
        result
    }

    /// `kg leaked × GWP = kg CO2e`
    pub fn fugitive(&self, leaked_kg: f64, gas: &str, gwp: f64) -> EmissionResult {
        let co2e = leaked_kg * gwp;
        let formula = format!(
            "Fugitive {}: {} kg × GWP {} = {:.2} kg CO2e",
            gas, leaked_kg, gwp, co2e
        );
        debug!("Scope 1: {}", formula);
        EmissionResult::new(co2e, formula)
    }

    /// Fugitive emissions with the GWP taken from the reference tables
    pub fn fugitive_gas(
        &self,
        leaked_kg: f64,
        gas: &str,
        tables: &ReferenceTables,
    ) -> Result<EmissionResult, CalcError> {
        let gwp = tables
            .gwp(gas)
            .ok_or_else(|| CalcError::MissingFactor(format!("no GWP for gas '{}'", gas)))?;
        Ok(self.fugitive(leaked_kg, gas, gwp))
    }
}
