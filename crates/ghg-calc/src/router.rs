//! Calculation router
//!
//! Dispatches a (scope, category, method hint) triple to the right engine
//! and returns one [`EmissionResult`] with its audit formula.

use crate::error::CalcError;
use crate::scope1::Scope1Engine;
use crate::scope2::Scope2Engine;
use crate::scope3::Scope3Engine;
use crate::tables::ReferenceTables;
use crate::units::{Unit, UnitCategory, UnitConverter};
use ghg_domain::traits::FactorLookup;
use ghg_domain::{
    ActivityRecord, EmissionResult, GasBreakdown, QualityTier, Scope, Scope3Category, Scope3Method,
};
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::{debug, error, info, warn};

/// Optional hints for a calculation; anything missing is defaulted
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CalculationContext {
    /// Scope 3 category (defaults to 1)
    pub scope_3_category: Option<u8>,

    /// Override the category's formula family
    pub method: Option<Scope3Method>,

    /// Gas split of the factor
    pub gas_breakdown: Option<GasBreakdown>,
}

impl CalculationContext {
    /// Context for a Scope 3 category
    pub fn scope_3(category: u8) -> Self {
        Self {
            scope_3_category: Some(category),
            ..Self::default()
        }
    }
}

/// One record's result plus where it came from
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecordCalculation {
    /// Facility the record belongs to
    pub facility_id: String,
    /// Scope of the record
    pub scope: Scope,
    /// Record category
    pub category: String,
    /// Scope 3 category, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scope_3_category: Option<Scope3Category>,
    /// Region the factor was resolved for
    pub region: String,
    /// Source label of the factor used ("GWP table" for fugitive gases)
    pub factor_source: String,
    /// Worse of record and factor tier
    pub tier: QualityTier,
    /// The calculation result
    pub result: EmissionResult,
}

/// A record that could not be calculated
#[derive(Debug, Clone, PartialEq)]
pub struct RecordFailure {
    /// Position of the record in the batch
    pub index: usize,
    /// Facility the record belongs to
    pub facility_id: String,
    /// What went wrong
    pub error: CalcError,
}

/// Outcome of a batch: successes and failures side by side
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchOutcome {
    /// Calculated records, in input order
    pub results: Vec<RecordCalculation>,
    /// Records that failed, in input order
    pub failures: Vec<RecordFailure>,
}

impl BatchOutcome {
    /// Sum of all successful results in kg CO2e
    pub fn total_kg(&self) -> f64 {
        self.results.iter().map(|r| r.result.co2e_kg).sum()
    }

    /// Successful totals per scope in kg CO2e
    pub fn totals_by_scope(&self) -> BTreeMap<Scope, f64> {
        let mut totals = BTreeMap::new();
        for r in &self.results {
            *totals.entry(r.scope).or_insert(0.0) += r.result.co2e_kg;
        }
        totals
    }

    /// Whether every record succeeded
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Single entry point over the three scope engines
///
/// # Examples
///
/// ```
/// use ghg_calc::{CalculationContext, Calculator, CalcError};
///
/// let calc = Calculator::default();
/// let r = calc
///     .calculate(2, "electricity", 100.0, "MWh", 0.389, "kg_co2e_per_kwh", &CalculationContext::default())
///     .unwrap();
/// assert!((r.co2e_kg - 38_900.0).abs() < 1e-6);
///
/// let err = calc.calculate(4, "x", 1.0, "kWh", 1.0, "kg_co2e_per_kwh", &CalculationContext::default());
/// assert!(matches!(err, Err(CalcError::InvalidScope(4))));
/// ```
#[derive(Debug, Clone, Default)]
pub struct Calculator {
    converter: UnitConverter,
    scope1: Scope1Engine,
    scope2: Scope2Engine,
    scope3: Scope3Engine,
    tables: ReferenceTables,
}

impl Calculator {
    /// Create a calculator over the given reference tables
    pub fn new(tables: ReferenceTables) -> Self {
        Self {
            tables,
            ..Self::default()
        }
    }

    /// Reference tables in use
    pub fn tables(&self) -> &ReferenceTables {
        &self.tables
    }

    /// Unit converter in use
    pub fn converter(&self) -> &UnitConverter {
        &self.converter
    }

    /// Scope 2 engine, for dual reporting
    pub fn scope2(&self) -> &Scope2Engine {
        &self.scope2
    }

    /// Scope 3 engine, for category-detail calculations
    pub fn scope3(&self) -> &Scope3Engine {
        &self.scope3
    }

    /// Route one calculation
    ///
    /// - scope 1 → activity × factor with unit harmonization
    /// - scope 2 → location-based electricity when `category` is
    ///   "electricity", otherwise steam/heat
    /// - scope 3 → the category's formula (category from `context`, default 1)
    ///
    /// # Errors
    /// [`CalcError::InvalidScope`] for scopes outside 1..=3, and
    /// [`CalcError::UnitConversion`] when electricity is not in an energy unit.
    #[allow(clippy::too_many_arguments)]
    pub fn calculate(
        &self,
        scope: u8,
        category: &str,
        activity_amount: f64,
        activity_unit: &str,
        factor: f64,
        factor_unit: &str,
        context: &CalculationContext,
    ) -> Result<EmissionResult, CalcError> {
        let scope = Scope::from_number(scope).ok_or(CalcError::InvalidScope(scope))?;

        let result = match scope {
            Scope::One => self.scope1.calculate_emission(
                activity_amount,
                activity_unit,
                factor,
                factor_unit,
                context.gas_breakdown.as_ref(),
            ),
            Scope::Two if category.trim().eq_ignore_ascii_case("electricity") => {
                let (per_kwh, assumptions) = self.converter.rebase_factor(factor, factor_unit, "kwh");
                self.scope2
                    .location_based(activity_amount, activity_unit, per_kwh)?
                    .with_assumptions(assumptions)
            }
            Scope::Two => {
                let (per_mmbtu, assumptions) = self.converter.rebase_factor(factor, factor_unit, "mmbtu");
                self.scope2
                    .steam_heat(activity_amount, activity_unit, per_mmbtu)
                    .with_assumptions(assumptions)
            }
            Scope::Three => {
                let category = context
                    .scope_3_category
                    .map(Scope3Category)
                    .unwrap_or(Scope3Category::DEFAULT);
                self.scope3.calculate(
                    category,
                    context.method,
                    activity_amount,
                    activity_unit,
                    factor,
                    factor_unit,
                    context.gas_breakdown.as_ref(),
                )
            }
        };

        for assumption in &result.assumptions {
            warn!("{} {}: {}", scope, category, assumption);
        }
        Ok(result)
    }

    /// Validate a record, resolve its factor and route it
    ///
    /// The factor region is the record's own region, else `default_region`,
    /// else the tables' default. Scope 1 records naming a refrigerant fall
    /// back to the GWP table when no factor is found.
    pub fn calculate_record(
        &self,
        record: &ActivityRecord,
        factors: &dyn FactorLookup,
        default_region: Option<&str>,
    ) -> Result<RecordCalculation, CalcError> {
        record.validate().map_err(CalcError::InvalidRecord)?;

        let region = record
            .region
            .as_deref()
            .or(default_region)
            .unwrap_or(&self.tables.default_region)
            .to_string();

        let factor = factors.lookup(record.scope, &record.category, &region, record.period_start);

        let (result, factor_source, factor_tier) = match (factor, record.refrigerant.as_deref()) {
            (Some(factor), _) => {
                let context = CalculationContext {
                    scope_3_category: record.scope_3_category.map(|c| c.number()),
                    method: None,
                    gas_breakdown: factor.gas_breakdown,
                };
                let result = self.calculate(
                    record.scope.number(),
                    &record.category,
                    record.amount,
                    &record.unit,
                    factor.value,
                    &factor.unit,
                    &context,
                )?;
                (result, factor.source, factor.tier)
            }
            (None, Some(gas)) if record.scope == Scope::One => {
                let leaked_kg = self.leaked_kg(record)?;
                let result = self.scope1.fugitive_gas(leaked_kg, gas, &self.tables)?;
                (result, "GWP table".to_string(), record.tier)
            }
            (None, _) => {
                return Err(CalcError::MissingFactor(format!(
                    "{} / {} in {} on {}",
                    record.scope, record.category, region, record.period_start
                )));
            }
        };

        debug!("{} {}: {}", record.facility_id, record.category, result.formula);

        Ok(RecordCalculation {
            facility_id: record.facility_id.clone(),
            scope: record.scope,
            category: record.category.clone(),
            scope_3_category: record.scope_3_category,
            region,
            factor_source,
            tier: record.tier.max(factor_tier),
            result,
        })
    }

    fn leaked_kg(&self, record: &ActivityRecord) -> Result<f64, CalcError> {
        match Unit::parse(&record.unit) {
            Some(u) if u.category() == UnitCategory::Mass => {
                self.converter.convert(record.amount, &record.unit, "kg")
            }
            _ => Err(CalcError::unit_conversion(&record.unit, "kg")),
        }
    }

    /// Calculate many records; a failing record never aborts the batch
    pub fn calculate_batch(
        &self,
        records: &[ActivityRecord],
        factors: &dyn FactorLookup,
        default_region: Option<&str>,
    ) -> BatchOutcome {
        let mut outcome = BatchOutcome::default();

        for (index, record) in records.iter().enumerate() {
            match self.calculate_record(record, factors, default_region) {
                Ok(calc) => outcome.results.push(calc),
                Err(e) => {
                    error!("Record {} ({}) failed: {}", index, record.facility_id, e);
                    outcome.failures.push(RecordFailure {
                        index,
                        facility_id: record.facility_id.clone(),
                        error: e,
                    });
                }
            }
        }

        info!(
            "Batch complete: {} calculated, {} failed, {:.2} kg CO2e",
            outcome.results.len(),
            outcome.failures.len(),
            outcome.total_kg()
        );
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use ghg_domain::EmissionFactor;

    fn ctx() -> CalculationContext {
        CalculationContext::default()
    }

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-6
    }

    #[test]
    fn test_invalid_scope() {
        let calc = Calculator::default();
        for scope in [0u8, 4, 255] {
            let err = calc
                .calculate(scope, "x", 1.0, "kWh", 1.0, "kg_co2e_per_kwh", &ctx())
                .unwrap_err();
            assert_eq!(err, CalcError::InvalidScope(scope));
        }
    }

    #[test]
    fn test_scope_1_route() {
        let calc = Calculator::default();
        let r = calc
            .calculate(1, "natural_gas", 1000.0, "therms", 5.3, "kg_co2e_per_therm", &ctx())
            .unwrap();
        assert!(close(r.co2e_kg, 5300.0));
    }

    #[test]
    fn test_scope_2_electricity_route() {
        let calc = Calculator::default();
        let r = calc
            .calculate(2, "Electricity", 1000.0, "kWh", 0.000389, "t_co2e_per_kwh", &ctx())
            .unwrap();
        assert!(close(r.co2e_kg, 389.0));
        assert!(r.formula.contains("location-based"));
    }

    #[test]
    fn test_scope_2_steam_route() {
        let calc = Calculator::default();
        let r = calc
            .calculate(2, "steam", 10.0, "GJ", 66.33, "kg_co2e_per_mmbtu", &ctx())
            .unwrap();
        assert!(close(r.co2e_kg, 10.0 * 0.947817 * 66.33));
        assert!(r.formula.contains("steam/heat"));
    }

    #[test]
    fn test_scope_2_electricity_wrong_dimension() {
        let calc = Calculator::default();
        let r = calc.calculate(2, "electricity", 1.0, "liters", 0.4, "kg_co2e_per_kwh", &ctx());
        assert!(matches!(r, Err(CalcError::UnitConversion { .. })));
    }

    #[test]
    fn test_scope_3_defaults_to_category_1() {
        let calc = Calculator::default();
        let r = calc
            .calculate(3, "purchases", 1000.0, "USD", 0.5, "kg_co2e_per_usd", &ctx())
            .unwrap();
        assert!(close(r.co2e_kg, 500.0));
        assert!(r.formula.contains("Purchased goods and services"));
    }

    #[test]
    fn test_scope_3_category_from_context() {
        let calc = Calculator::default();
        let r = calc
            .calculate(3, "travel", 100.0, "miles", 0.2, "kg_co2e_per_km", &CalculationContext::scope_3(6))
            .unwrap();
        assert!(close(r.co2e_kg, 160.934 * 0.2));
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_calculate_record_rejects_invalid() {
        let calc = Calculator::default();
        let table = crate::FactorTable::new();
        let mut record = ActivityRecord::new("a", Scope::One, "diesel", date(2024, 1, 1), date(2024, 2, 1), 1.0, "L");
        record.period_end = date(2023, 1, 1);
        assert!(matches!(
            calc.calculate_record(&record, &table, None),
            Err(CalcError::InvalidRecord(_))
        ));
    }

    #[test]
    fn test_calculate_record_refrigerant_fallback() {
        let calc = Calculator::default();
        let table = crate::FactorTable::new();
        let record = ActivityRecord::new("a", Scope::One, "fugitive", date(2024, 1, 1), date(2024, 12, 31), 2.0, "lb")
            .with_refrigerant("R-410A");
        let calc_result = calc.calculate_record(&record, &table, None).unwrap();
        assert!(close(calc_result.result.co2e_kg, 2.0 * 0.453592 * 2088.0));
        assert_eq!(calc_result.factor_source, "GWP table");
    }

    #[test]
    fn test_calculate_record_tier_is_worst_of_both() {
        let calc = Calculator::default();
        let table = crate::FactorTable::new()
            .with(
                EmissionFactor::new(Scope::One, "diesel", 2.68, "kg_co2e_per_liter", date(2020, 1, 1))
                    .with_tier(QualityTier::Tier3),
            )
            .unwrap();
        let record = ActivityRecord::new("a", Scope::One, "diesel", date(2024, 1, 1), date(2024, 12, 31), 100.0, "L")
            .with_tier(QualityTier::Tier1);
        let calc_result = calc.calculate_record(&record, &table, Some("DE")).unwrap();
        assert_eq!(calc_result.tier, QualityTier::Tier3);
        assert_eq!(calc_result.region, "DE");
        assert!(close(calc_result.result.co2e_kg, 268.0));
    }
}
