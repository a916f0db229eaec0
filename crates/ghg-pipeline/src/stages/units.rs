//! Stage 1: canonical units and grid region
//!
//! Electricity ends up in `electricity_kwh`, natural gas in
//! `natural_gas_therms`. Source fields are removed once converted, so running
//! the stage again changes nothing.

use crate::audit::AuditTrail;
use crate::dataset::FacilityRecord;
use ghg_calc::{ReferenceTables, Unit, UnitConverter};

/// kWh per MWh
pub const KWH_PER_MWH: f64 = 1_000.0;
/// kWh per GWh
pub const KWH_PER_GWH: f64 = 1_000_000.0;
/// Therms per cubic meter of natural gas
pub const THERMS_PER_M3: f64 = 0.0353;
/// Therms per MMBtu
pub const THERMS_PER_MMBTU: f64 = 10.0;

/// Rewrite a facility's energy fields onto kWh and therms and resolve its region
///
/// A nested natural-gas entry with no path to therms is logged as an error
/// and left in place; stage 2 then treats the gas volume as missing.
pub fn normalize_units(
    facility: &mut FacilityRecord,
    converter: &UnitConverter,
    tables: &ReferenceTables,
    audit: &mut AuditTrail,
) {
    normalize_electricity(facility, audit);
    normalize_natural_gas(facility, converter, audit);
    resolve_region(facility, tables, audit);
}

fn normalize_electricity(facility: &mut FacilityRecord, audit: &mut AuditTrail) {
    let sources = [
        (facility.electricity_mwh.take(), "MWh", KWH_PER_MWH),
        (facility.electricity_gwh.take(), "GWh", KWH_PER_GWH),
    ];
    for (value, unit, factor) in sources {
        if let Some(value) = value {
            let kwh = value * factor;
            if store_canonical(&mut facility.electricity_kwh, kwh, &facility.facility_id, "kWh", audit) {
                audit.metrics.record_conversion();
                audit.info(
                    "unit_conversion",
                    format!("{}: electricity {} {} -> {} kWh", facility.facility_id, value, unit, kwh),
                );
            }
        }
    }
}

fn normalize_natural_gas(facility: &mut FacilityRecord, converter: &UnitConverter, audit: &mut AuditTrail) {
    let mut sources = vec![
        (facility.natural_gas_m3.take(), "m3".to_string(), THERMS_PER_M3),
        (facility.natural_gas_mmbtu.take(), "MMBtu".to_string(), THERMS_PER_MMBTU),
    ];

    if let Some(entry) = facility.natural_gas.take() {
        let factor = match Unit::parse(&entry.unit) {
            Some(Unit::Therm) => Ok(1.0),
            Some(Unit::CubicMeter) => Ok(THERMS_PER_M3),
            Some(Unit::Mmbtu) => Ok(THERMS_PER_MMBTU),
            _ => converter.convert(1.0, &entry.unit, "therm"),
        };
        match factor {
            Ok(factor) => sources.push((Some(entry.amount), entry.unit, factor)),
            Err(e) => {
                audit.metrics.record_failures(1);
                audit.error(
                    "unit_conversion_failed",
                    format!(
                        "{}: natural gas {} {} left unconverted: {}",
                        facility.facility_id, entry.amount, entry.unit, e
                    ),
                );
                facility.natural_gas = Some(entry);
            }
        }
    }

    for (value, unit, factor) in sources {
        if let Some(value) = value {
            let therms = value * factor;
            if store_canonical(&mut facility.natural_gas_therms, therms, &facility.facility_id, "therms", audit) {
                audit.metrics.record_conversion();
                audit.info(
                    "unit_conversion",
                    format!(
                        "{}: natural gas {} {} -> {} therms",
                        facility.facility_id, value, unit, therms
                    ),
                );
            }
        }
    }
}

/// An already-canonical value wins over a converted duplicate; returns
/// whether `value` was stored
fn store_canonical(slot: &mut Option<f64>, value: f64, facility_id: &str, unit: &str, audit: &mut AuditTrail) -> bool {
    match slot {
        Some(existing) => {
            audit.warn(
                "conflicting_units",
                format!(
                    "{}: keeping reported {} {}, discarding converted {} {}",
                    facility_id, existing, unit, value, unit
                ),
            );
            false
        }
        None => {
            *slot = Some(value);
            true
        }
    }
}

fn resolve_region(facility: &mut FacilityRecord, tables: &ReferenceTables, audit: &mut AuditTrail) {
    let id = facility.facility_id.clone();

    if let Some(region) = facility.region.as_deref() {
        match tables.region_code(region) {
            Some(code) => {
                if code != region {
                    facility.region = Some(code.to_string());
                }
            }
            None => {
                audit.warn(
                    "unknown_region",
                    format!(
                        "{}: region '{}' has no grid factor; using {}",
                        id, region, tables.default_region
                    ),
                );
                facility.region = Some(tables.default_region.clone());
            }
        }
        return;
    }

    match facility.address.as_deref().and_then(|a| tables.infer_region(a)) {
        Some(code) => {
            audit.metrics.record_region_inference();
            audit.info("region_inferred", format!("{}: region {} inferred from address", id, code));
            facility.region = Some(code);
        }
        None => {
            audit.warn(
                "region_defaulted",
                format!("{}: no region or recognizable address; using {}", id, tables.default_region),
            );
            facility.region = Some(tables.default_region.clone());
        }
    }
}
