//! Stage 3: scale partial-year facilities to twelve months

use crate::audit::AuditTrail;
use crate::dataset::FacilityRecord;

/// Multiply every scope total by `12 / operational_months`
///
/// Runs after estimation, so an estimated value is scaled too. The applied
/// factor is stored on the record and a record that already carries one is
/// left alone.
pub fn annualize(facility: &mut FacilityRecord, audit: &mut AuditTrail) {
    let Some(months) = facility.operational_months else {
        return;
    };
    if months >= 12 || facility.annualization_factor.is_some() {
        return;
    }
    if months == 0 {
        audit.warn(
            "annualization_skipped",
            format!("{}: operational_months is 0; totals left as reported", facility.facility_id),
        );
        return;
    }

    let factor = 12.0 / f64::from(months);
    for value in [
        &mut facility.scope_1,
        &mut facility.scope_2,
        &mut facility.scope_3,
        &mut facility.scope_2_location,
        &mut facility.scope_2_market,
    ] {
        if let Some(v) = value.as_mut() {
            *v *= factor;
        }
    }
    facility.annualization_factor = Some(factor);
    audit.metrics.record_annualization();

    let compounded = if facility.has_estimates() {
        " (includes estimated values)"
    } else {
        ""
    };
    audit.warn(
        "annualized",
        format!(
            "{}: {} operational months scaled by {:.4}{}",
            facility.facility_id, months, factor, compounded
        ),
    );
}
