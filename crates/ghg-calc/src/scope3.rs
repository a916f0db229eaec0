//! Scope 3: value-chain categories
//!
//! Categories map onto four formula families:
//! - spend-based (1, 2): `spend × kg CO2e per currency unit`
//! - distance-based (4, 6, 7, 9): `km × kg CO2e per km`
//! - waste-based (5): `tons × kg CO2e per ton`
//! - generic (everything else): activity × factor with unit harmonization

use crate::scope1::Scope1Engine;
use crate::units::{FactorUnit, Unit, UnitCategory, UnitConverter};
use ghg_domain::{Assumption, EmissionResult, GasBreakdown, Scope3Category, Scope3Method};
use tracing::{debug, warn};

/// Value-chain formulas
#[derive(Debug, Clone, Default)]
pub struct Scope3Engine {
    converter: UnitConverter,
    generic: Scope1Engine,
}

impl Scope3Engine {
    /// Create an engine
    pub fn new() -> Self {
        Self::default()
    }

    /// Dispatch on the category's formula family, or on `method` when given
    #[allow(clippy::too_many_arguments)]
    pub fn calculate(
        &self,
        category: Scope3Category,
        method: Option<Scope3Method>,
        amount: f64,
        unit: &str,
        factor: f64,
        factor_unit: &str,
        gas_breakdown: Option<&GasBreakdown>,
    ) -> EmissionResult {
        match method.unwrap_or_else(|| category.method()) {
            Scope3Method::SpendBased => {
                let (factor_kg, assumptions) = self.magnitude_only(factor, factor_unit);
                self.spend_based(category, amount, unit, factor_kg)
                    .with_assumptions(assumptions)
            }
            Scope3Method::DistanceBased => {
                let (factor_kg, assumptions) = self.converter.rebase_factor(factor, factor_unit, "km");
                self.distance_based(category, amount, unit, factor_kg)
                    .with_assumptions(assumptions)
            }
            Scope3Method::WasteBased => {
                let (factor_kg, assumptions) = self.converter.rebase_factor(factor, factor_unit, "ton");
                self.waste_based(category, amount, unit, factor_kg)
                    .with_assumptions(assumptions)
            }
            Scope3Method::Generic => self.generic(category, amount, unit, factor, factor_unit, gas_breakdown),
        }
    }

    fn magnitude_only(&self, factor: f64, factor_unit: &str) -> (f64, Vec<Assumption>) {
        let magnitude = FactorUnit::parse(factor_unit).magnitude;
        let conv = self.converter.to_kg_co2e(factor, &magnitude);
        (conv.value, conv.assumption.into_iter().collect())
    }

    /// `spend × factor (kg CO2e per currency unit) = kg CO2e`
    pub fn spend_based(
        &self,
        category: Scope3Category,
        spend: f64,
        currency: &str,
        factor_kg_per_currency: f64,
    ) -> EmissionResult {
        let co2e = spend * factor_kg_per_currency;
        let formula = format!(
            "{} {} × {} kg CO2e/{} = {:.2} kg CO2e ({})",
            spend,
            currency,
            factor_kg_per_currency,
            currency,
            co2e,
            category.name()
        );
        debug!("Scope 3: {}", formula);
        EmissionResult::new(co2e, formula)
    }

    /// `distance (km) × factor (kg CO2e per km) = kg CO2e`
    pub fn distance_based(
        &self,
        category: Scope3Category,
        distance: f64,
        unit: &str,
        factor_kg_per_km: f64,
    ) -> EmissionResult {
        let (km, assumption) = match Unit::parse(unit).filter(|u| u.category() == UnitCategory::Distance) {
            Some(u) => (self.converter.convert(distance, u.symbol(), "km").unwrap_or(distance), None),
            None => {
                warn!("Unrecognized distance unit '{}'; assuming km", unit);
                (
                    distance,
                    Some(Assumption::DistanceUnit {
                        unit: unit.to_string(),
                    }),
                )
            }
        };

        let co2e = km * factor_kg_per_km;
        let formula = format!(
            "{:.2} km × {} kg CO2e/km = {:.2} kg CO2e ({})",
            km,
            factor_kg_per_km,
            co2e,
            category.name()
        );
        debug!("Scope 3: {}", formula);
        EmissionResult::new(co2e, formula).with_assumptions(assumption)
    }

    /// `mass (tons) × factor (kg CO2e per ton) = kg CO2e`
    pub fn waste_based(
        &self,
        category: Scope3Category,
        mass: f64,
        unit: &str,
        factor_kg_per_ton: f64,
    ) -> EmissionResult {
        let (tons, assumption) = match Unit::parse(unit).filter(|u| u.category() == UnitCategory::Mass) {
            Some(u) => (self.converter.convert(mass, u.symbol(), "t").unwrap_or(mass), None),
            None => {
                warn!("Unrecognized waste unit '{}'; assuming tons", unit);
                (
                    mass,
                    Some(Assumption::WasteUnit {
                        unit: unit.to_string(),
                    }),
                )
            }
        };

        let co2e = tons * factor_kg_per_ton;
        let formula = format!(
            "{:.4} tons × {} kg CO2e/ton = {:.2} kg CO2e ({})",
            tons,
            factor_kg_per_ton,
            co2e,
            category.name()
        );
        debug!("Scope 3: {}", formula);
        EmissionResult::new(co2e, formula).with_assumptions(assumption)
    }

    /// Generic activity × factor for categories without a specialized formula
    pub fn generic(
        &self,
        category: Scope3Category,
        amount: f64,
        unit: &str,
        factor: f64,
        factor_unit: &str,
        gas_breakdown: Option<&GasBreakdown>,
    ) -> EmissionResult {
        let mut result = self
            .generic
            .calculate_emission(amount, unit, factor, factor_unit, gas_breakdown);
        result.formula = format!("{} ({})", result.formula, category.name());
        result
    }
}
