//! Stage 2: fill missing scope totals
//!
//! Order of preference for each scope: a reported value (flat field, then the
//! nested `emissions_data` block), a value calculated from the facility's
//! activity records, and finally a heuristic estimate. Only the last one sets
//! the `*_estimated` flag.

use crate::audit::AuditTrail;
use crate::config::PipelineConfig;
use crate::dataset::FacilityRecord;
use crate::error::PipelineError;
use ghg_calc::Calculator;
use ghg_domain::traits::FactorLookup;
use ghg_domain::Scope;

/// Fill every missing scope total of one facility
pub fn estimate_missing(
    facility: &mut FacilityRecord,
    calculator: &Calculator,
    factors: Option<&dyn FactorLookup>,
    config: &PipelineConfig,
    audit: &mut AuditTrail,
) -> Result<(), PipelineError> {
    fill_reported(facility);

    if let Some(factors) = factors {
        calculate_from_activities(facility, calculator, factors, audit);
    }

    if facility.scope_1.is_none() {
        estimate_scope_1(facility, calculator, config, audit);
    }

    if facility.scope_2.is_none() {
        estimate_scope_2(facility, calculator, audit)?;
    } else {
        let scope_2 = facility.scope_2;
        if facility.scope_2_market.is_none() {
            facility.scope_2_market = scope_2;
        }
        if facility.scope_2_location.is_none() {
            facility.scope_2_location = scope_2;
        }
    }

    if facility.scope_3.is_none() {
        estimate_scope_3(facility, config, audit);
    }

    Ok(())
}

fn fill_reported(facility: &mut FacilityRecord) {
    if let Some(data) = facility.emissions_data.clone() {
        facility.scope_1 = facility.scope_1.or(data.scope_1_tons);
        facility.scope_2 = facility.scope_2.or(data.scope_2_tons);
        facility.scope_3 = facility.scope_3.or(data.scope_3_tons);
    }
    if facility.scope_2.is_none() {
        facility.scope_2 = facility.scope_2_market.or(facility.scope_2_location);
    }
}

fn missing(facility: &FacilityRecord, scope: Scope) -> bool {
    match scope {
        Scope::One => facility.scope_1.is_none(),
        Scope::Two => facility.scope_2.is_none(),
        Scope::Three => facility.scope_3.is_none(),
    }
}

fn calculate_from_activities(
    facility: &mut FacilityRecord,
    calculator: &Calculator,
    factors: &dyn FactorLookup,
    audit: &mut AuditTrail,
) {
    let records: Vec<_> = facility
        .activities
        .iter()
        .filter(|r| missing(facility, r.scope))
        .cloned()
        .collect();
    if records.is_empty() {
        return;
    }

    let outcome = calculator.calculate_batch(&records, factors, facility.region.as_deref());
    let id = facility.facility_id.clone();

    for failure in &outcome.failures {
        audit.error(
            "activity_failed",
            format!("{}: activity {} could not be calculated: {}", id, failure.index, failure.error),
        );
    }
    audit.metrics.record_failures(outcome.failures.len());

    for scope in Scope::ALL {
        let results: Vec<_> = outcome.results.iter().filter(|r| r.scope == scope).collect();
        if results.is_empty() {
            continue;
        }
        let tons: f64 = results.iter().map(|r| r.result.tons()).sum();
        let failed = outcome
            .failures
            .iter()
            .filter(|f| records.get(f.index).is_some_and(|r| r.scope == scope))
            .count();
        let assumed = failed > 0 || results.iter().any(|r| r.result.is_assumed());

        match scope {
            Scope::One => facility.scope_1 = Some(tons),
            Scope::Two => facility.scope_2 = Some(tons),
            Scope::Three => facility.scope_3 = Some(tons),
        }
        facility.assumed |= assumed;
        audit.metrics.record_calculated(scope);

        let detail = format!(
            "{}: {} = {:.4} t CO2e from {} activity records",
            id,
            scope,
            tons,
            results.len()
        );
        if failed > 0 {
            audit.warn(
                "calculated_partial",
                format!("{}; {} records for this scope failed and are not counted", detail, failed),
            );
        } else if assumed {
            audit.warn("calculated_with_assumption", detail);
        } else {
            audit.info("calculated", detail);
        }
    }
}

fn estimate_scope_1(
    facility: &mut FacilityRecord,
    calculator: &Calculator,
    config: &PipelineConfig,
    audit: &mut AuditTrail,
) {
    let tables = calculator.tables();
    let therms = facility.natural_gas_therms.unwrap_or(0.0);
    let combustion = therms * tables.natural_gas_t_per_therm;

    let released = 1.0 - config.abatement_efficiency;
    let mut process = 0.0;
    for (gas, kg) in &facility.process_gases_kg {
        let gwp = match tables.gwp(gas) {
            Some(gwp) => gwp,
            None => {
                audit.warn(
                    "unknown_gas",
                    format!("{}: no GWP for '{}'; using 1", facility.facility_id, gas),
                );
                1.0
            }
        };
        process += kg * released * gwp / 1000.0;
    }

    let total = combustion + process;
    facility.scope_1 = Some(total);
    facility.scope_1_estimated = true;
    audit.metrics.record_estimate(Scope::One);
    audit.warn(
        "estimate_scope_1",
        format!(
            "{}: Scope 1 estimated at {:.4} t ({} therms × {} t/therm + {:.4} t process gases at {:.0}% abatement)",
            facility.facility_id,
            total,
            therms,
            tables.natural_gas_t_per_therm,
            process,
            config.abatement_efficiency * 100.0
        ),
    );
}

fn estimate_scope_2(
    facility: &mut FacilityRecord,
    calculator: &Calculator,
    audit: &mut AuditTrail,
) -> Result<(), PipelineError> {
    let tables = calculator.tables();
    let id = facility.facility_id.clone();

    let Some(kwh) = facility.electricity_kwh else {
        facility.scope_2 = Some(0.0);
        facility.scope_2_location = Some(0.0);
        facility.scope_2_market = Some(0.0);
        facility.scope_2_estimated = true;
        audit.metrics.record_estimate(Scope::Two);
        audit.warn(
            "estimate_scope_2",
            format!("{}: no electricity data; Scope 2 set to 0", id),
        );
        return Ok(());
    };

    let region = facility
        .region
        .clone()
        .unwrap_or_else(|| tables.default_region.clone());
    let grid_t_per_kwh = tables
        .grid_factor(&region)
        .unwrap_or_else(|| tables.default_grid_factor());

    let dual = calculator.scope2().dual(
        kwh,
        "kwh",
        facility.renewable_electricity_kwh.unwrap_or(0.0),
        grid_t_per_kwh * 1000.0,
        facility.supplier_factor_kg_per_kwh,
    )?;

    let location = dual.location_based.tons();
    let market = dual.preferred().tons();
    facility.scope_2_location = Some(location);
    facility.scope_2_market = Some(market);
    facility.scope_2 = Some(market);
    facility.scope_2_estimated = true;
    audit.metrics.record_estimate(Scope::Two);
    audit.warn(
        "estimate_scope_2",
        format!(
            "{}: Scope 2 estimated at {:.4} t market-based, {:.4} t location-based ({} kWh, {} grid {} t/kWh)",
            id, market, location, kwh, region, grid_t_per_kwh
        ),
    );
    Ok(())
}

fn estimate_scope_3(facility: &mut FacilityRecord, config: &PipelineConfig, audit: &mut AuditTrail) {
    let base = facility.scope_1.unwrap_or(0.0) + facility.scope_2.unwrap_or(0.0);
    let total = base * config.scope_3_ratio;
    facility.scope_3 = Some(total);
    facility.scope_3_estimated = true;
    audit.metrics.record_estimate(Scope::Three);
    audit.warn(
        "estimate_scope_3",
        format!(
            "{}: Scope 3 estimated at {:.4} t ({:.0}% of Scope 1 + Scope 2, screening heuristic)",
            facility.facility_id,
            total,
            config.scope_3_ratio * 100.0
        ),
    );
}
