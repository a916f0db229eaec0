//! Scope 2: purchased electricity, steam and heat

use crate::error::CalcError;
use crate::units::{Unit, UnitConverter};
use ghg_domain::{Assumption, EmissionResult, GasBreakdown};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// MMBtu per GJ
pub const MMBTU_PER_GJ: f64 = 0.947817;

/// MMBtu per kWh
pub const MMBTU_PER_KWH: f64 = 0.00341214;

/// Typical gas split of grid electricity emissions
pub const GRID_GAS_BREAKDOWN: GasBreakdown = GasBreakdown {
    co2: 0.95,
    ch4: 0.03,
    n2o: 0.02,
};

/// Location- and market-based results for the same consumption
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DualScope2 {
    /// Grid-average result
    pub location_based: EmissionResult,
    /// Contractual / supplier result
    pub market_based: EmissionResult,
}

impl DualScope2 {
    /// The figure used for a single grand total (market-based)
    pub fn preferred(&self) -> &EmissionResult {
        &self.market_based
    }
}

/// Purchased-energy formulas
#[derive(Debug, Clone, Default)]
pub struct Scope2Engine {
    converter: UnitConverter,
}

impl Scope2Engine {
    /// Create an engine
    pub fn new() -> Self {
        Self::default()
    }

    fn to_kwh(&self, amount: f64, unit: &str) -> Result<f64, CalcError> {
        self.converter.convert(amount, unit, "kwh")
    }

    /// `kWh × grid factor = kg CO2e`
    pub fn location_based(
        &self,
        amount: f64,
        unit: &str,
        grid_factor_kg_per_kwh: f64,
    ) -> Result<EmissionResult, CalcError> {
        let kwh = self.to_kwh(amount, unit)?;
        let co2e = kwh * grid_factor_kg_per_kwh;
        let formula = format!(
            "{:.2} kWh × {} kg CO2e/kWh = {:.2} kg CO2e (location-based)",
            kwh, grid_factor_kg_per_kwh, co2e
        );
        debug!("Scope 2: {}", formula);
        Ok(EmissionResult::new(co2e, formula).with_gases(&GRID_GAS_BREAKDOWN))
    }

    /// `(kWh − renewable kWh) × supplier factor = kg CO2e`
    ///
    /// Renewable coverage above consumption is clamped so the result never
    /// goes negative.
    pub fn market_based(
        &self,
        amount: f64,
        unit: &str,
        renewable_kwh: f64,
        supplier_factor_kg_per_kwh: f64,
    ) -> Result<EmissionResult, CalcError> {
        let kwh = self.to_kwh(amount, unit)?;
        if renewable_kwh > kwh {
            warn!(
                "Renewable coverage {:.2} kWh exceeds consumption {:.2} kWh; clamping",
                renewable_kwh, kwh
            );
        }
        let net = (kwh - renewable_kwh).max(0.0);
        let co2e = net * supplier_factor_kg_per_kwh;
        let formula = format!(
            "({:.2} kWh − {:.2} kWh renewable) × {} kg CO2e/kWh = {:.2} kg CO2e (market-based)",
            kwh, renewable_kwh, supplier_factor_kg_per_kwh, co2e
        );
        debug!("Scope 2: {}", formula);
        Ok(EmissionResult::new(co2e, formula).with_gases(&GRID_GAS_BREAKDOWN))
    }

    /// Both methods at once; market-based falls back to the grid factor
    pub fn dual(
        &self,
        amount: f64,
        unit: &str,
        renewable_kwh: f64,
        grid_factor_kg_per_kwh: f64,
        supplier_factor_kg_per_kwh: Option<f64>,
    ) -> Result<DualScope2, CalcError> {
        let location_based = self.location_based(amount, unit, grid_factor_kg_per_kwh)?;
        let market_based = self.market_based(
            amount,
            unit,
            renewable_kwh,
            supplier_factor_kg_per_kwh.unwrap_or(grid_factor_kg_per_kwh),
        )?;
        Ok(DualScope2 {
            location_based,
            market_based,
        })
    }

    /// Steam or heat: amount normalized to MMBtu, then `× factor`
    ///
    /// GJ and kWh use fixed constants; other energy units go through the
    /// converter. Anything else is taken as MMBtu and tagged.
    pub fn steam_heat(&self, amount: f64, unit: &str, factor_kg_per_mmbtu: f64) -> EmissionResult {
        let mut assumption = None;
        let mmbtu = match Unit::parse(unit) {
            Some(Unit::Mmbtu) => amount,
            Some(Unit::Gj) => amount * MMBTU_PER_GJ,
            Some(Unit::Kwh) => amount * MMBTU_PER_KWH,
            _ => match self.converter.convert(amount, unit, "mmbtu") {
                Ok(v) => v,
                Err(_) => {
                    warn!("Unrecognized steam/heat unit '{}'; assuming MMBtu", unit);
                    assumption = Some(Assumption::SteamUnit {
                        unit: unit.to_string(),
                    });
                    amount
                }
            },
        };

        let co2e = mmbtu * factor_kg_per_mmbtu;
        let formula = format!(
            "{} {} = {:.4} MMBtu × {} kg CO2e/MMBtu = {:.2} kg CO2e (steam/heat)",
            amount, unit, mmbtu, factor_kg_per_mmbtu, co2e
        );
        debug!("Scope 2: {}", formula);
        EmissionResult::new(co2e, formula).with_assumptions(assumption)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-6
    }

    #[test]
    fn test_location_based() {
        let engine = Scope2Engine::new();
        let r = engine.location_based(100.0, "MWh", 0.389).unwrap();
        assert!(close(r.co2e_kg, 38_900.0));
        assert!(close(r.co2_kg.unwrap(), 38_900.0 * 0.95));
    }

    #[test]
    fn test_market_based_full_renewable_is_zero() {
        let engine = Scope2Engine::new();
        let r = engine.market_based(50_000.0, "kWh", 50_000.0, 0.45).unwrap();
        assert_eq!(r.co2e_kg, 0.0);
    }

    #[test]
    fn test_market_based_clamps() {
        let engine = Scope2Engine::new();
        let r = engine.market_based(1_000.0, "kWh", 5_000.0, 0.45).unwrap();
        assert_eq!(r.co2e_kg, 0.0);
    }

    #[test]
    fn test_dual_prefers_market() {
        let engine = Scope2Engine::new();
        let dual = engine.dual(10_000.0, "kWh", 4_000.0, 0.4, None).unwrap();
        assert!(close(dual.location_based.co2e_kg, 4_000.0));
        assert!(close(dual.preferred().co2e_kg, 2_400.0));

        let dual = engine.dual(10_000.0, "kWh", 0.0, 0.4, Some(0.1)).unwrap();
        assert!(close(dual.market_based.co2e_kg, 1_000.0));
    }

    #[test]
    fn test_non_energy_unit_fails() {
        let engine = Scope2Engine::new();
        assert!(matches!(
            engine.location_based(1.0, "kg", 0.4),
            Err(CalcError::UnitConversion { .. })
        ));
    }

    #[test]
    fn test_steam_heat_units() {
        let engine = Scope2Engine::new();
        assert!(close(engine.steam_heat(100.0, "GJ", 66.33).co2e_kg, 94.7817 * 66.33));
        assert!(close(engine.steam_heat(1000.0, "kWh", 66.33).co2e_kg, 3.41214 * 66.33));
        assert!(close(engine.steam_heat(10.0, "therms", 1.0).co2e_kg, 1.0));

        let r = engine.steam_heat(5.0, "lbs_steam", 2.0);
        assert_eq!(r.co2e_kg, 10.0);
        assert!(r.is_assumed());
    }
}
