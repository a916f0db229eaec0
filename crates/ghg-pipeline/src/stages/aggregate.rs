//! Stage 4: company totals, Scope 3 breakdown and quality scoring

use crate::audit::AuditTrail;
use crate::config::PipelineConfig;
use crate::dataset::{FacilityRecord, Scope3CategoryRaw};
use ghg_calc::Scope3Engine;
use ghg_domain::{CompanyInventory, FacilityInventory, Scope3Category, Scope3Method};
use std::collections::BTreeMap;

/// Scope 3 categories split into included values, exclusions and methodology
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Scope3Breakdown {
    /// t CO2e per included category
    pub totals: BTreeMap<Scope3Category, f64>,
    /// Rationale per excluded category
    pub exclusions: BTreeMap<Scope3Category, String>,
    /// Methodology per included category
    pub methodology: BTreeMap<Scope3Category, String>,
}

impl Scope3Breakdown {
    /// Sum of included categories
    pub fn total(&self) -> f64 {
        self.totals.values().sum()
    }
}

/// Facility inventory with its quality score
pub fn facility_inventory(
    facility: &FacilityRecord,
    config: &PipelineConfig,
    audit: &mut AuditTrail,
) -> FacilityInventory {
    let tier = match (facility.data_quality.as_deref(), facility.tier()) {
        (_, Some(tier)) => tier,
        (Some(label), None) => {
            audit.warn(
                "unknown_tier",
                format!(
                    "{}: data quality '{}' not recognized; using {}",
                    facility.facility_id, label, config.default_tier
                ),
            );
            config.default_tier
        }
        (None, None) => config.default_tier,
    };

    let scope_2 = facility.scope_2.unwrap_or(0.0);
    let mut inventory = FacilityInventory::new(facility.facility_id.clone(), tier);
    inventory.name = facility.name.clone();
    inventory.scope_1 = facility.scope_1.unwrap_or(0.0);
    inventory.scope_2_location = facility.scope_2_location.unwrap_or(scope_2);
    inventory.scope_2_market = facility.scope_2_market.unwrap_or(scope_2);
    inventory.scope_3 = facility.scope_3.unwrap_or(0.0);
    inventory.scope_1_estimated = facility.scope_1_estimated;
    inventory.scope_2_estimated = facility.scope_2_estimated;
    inventory.scope_3_estimated = facility.scope_3_estimated;
    inventory.assumed = facility.assumed;
    inventory.quality_score = facility_score(&inventory, config);
    inventory
}

/// Tier score less the estimate and assumption penalties, clamped to [0, 5]
pub fn facility_score(inventory: &FacilityInventory, config: &PipelineConfig) -> f64 {
    let mut score = config.tier_scores.score(inventory.tier)
        - config.estimate_penalty * inventory.estimated_count() as f64;
    if inventory.assumed {
        score -= config.assumption_penalty;
    }
    score.clamp(0.0, 5.0)
}

/// Emission-weighted mean of facility scores
///
/// Falls back to the configured default when total emissions are zero.
pub fn quality_score(facilities: &[FacilityInventory], config: &PipelineConfig) -> f64 {
    let total: f64 = facilities.iter().map(FacilityInventory::total).sum();
    if total <= 0.0 {
        return config.default_quality_score;
    }
    facilities
        .iter()
        .map(|f| f.quality_score * f.total())
        .sum::<f64>()
        / total
}

/// Share of facilities whose reporting completeness exceeds the threshold
pub fn reporting_completeness(facilities: &[FacilityRecord], threshold: f64) -> f64 {
    if facilities.is_empty() {
        return 0.0;
    }
    let complete = facilities
        .iter()
        .filter(|f| f.reporting_completeness.unwrap_or(0.0) > threshold)
        .count();
    complete as f64 / facilities.len() as f64
}

/// Percentage of facilities carrying at least one estimated scope
pub fn estimated_data_pct(facilities: &[FacilityInventory]) -> f64 {
    if facilities.is_empty() {
        return 0.0;
    }
    let estimated = facilities.iter().filter(|f| f.has_estimates()).count();
    estimated as f64 / facilities.len() as f64 * 100.0
}

fn default_methodology(method: Scope3Method) -> &'static str {
    match method {
        Scope3Method::SpendBased => "Spend-based method using environmentally-extended input-output factors",
        Scope3Method::DistanceBased => "Distance-based method using mode-specific emission factors",
        Scope3Method::WasteBased => "Waste-type-specific method using disposal-route emission factors",
        Scope3Method::Generic => "Calculated using activity data and emission factors",
    }
}

/// Category total in t CO2e from its activity detail
///
/// Items without a factor or quantity are skipped. `None` when nothing could
/// be calculated.
fn calculate_category(
    category: Scope3Category,
    raw: &Scope3CategoryRaw,
    engine: &Scope3Engine,
    audit: &mut AuditTrail,
) -> Option<f64> {
    let mut kg = 0.0;
    let mut calculated = 0usize;
    let mut skipped = 0usize;

    for item in &raw.spend_data {
        match (item.amount(), item.factor) {
            (Some((spend, currency)), Some(factor)) => {
                kg += engine.spend_based(category, spend, &currency, factor).co2e_kg;
                calculated += 1;
            }
            _ => skipped += 1,
        }
    }
    for item in &raw.distance_data {
        match (item.distance, item.factor) {
            (Some(distance), Some(factor)) => {
                let unit = item.unit.as_deref().unwrap_or("km");
                kg += engine.distance_based(category, distance, unit, factor).co2e_kg;
                calculated += 1;
            }
            _ => skipped += 1,
        }
    }
    for item in &raw.waste_data {
        match (item.quantity(), item.factor) {
            (Some((amount, unit)), Some(factor)) => {
                kg += engine.waste_based(category, amount, &unit, factor).co2e_kg;
                calculated += 1;
            }
            _ => skipped += 1,
        }
    }

    if skipped > 0 {
        audit.warn(
            "scope_3_item_skipped",
            format!(
                "Category {}: {} activity items without a factor or quantity were skipped",
                category.number(),
                skipped
            ),
        );
    }

    (calculated > 0).then_some(kg / 1000.0)
}

/// Build the Scope 3 breakdown from raw category data
///
/// Categories 1-15 never mentioned are excluded as not reported when any
/// category data is present at all.
pub fn scope_3_breakdown(
    raw: &BTreeMap<String, Scope3CategoryRaw>,
    engine: &Scope3Engine,
    config: &PipelineConfig,
    audit: &mut AuditTrail,
) -> Scope3Breakdown {
    let mut breakdown = Scope3Breakdown::default();
    if raw.is_empty() {
        return breakdown;
    }

    for (key, data) in raw {
        let Some(category) = Scope3Category::from_key(key) else {
            audit.warn("unknown_scope_3_key", format!("Ignoring Scope 3 entry '{}'", key));
            continue;
        };
        let n = category.number();
        if !category.is_standard() {
            audit.warn(
                "nonstandard_category",
                format!("Category {} is outside 1-15; calculated with the generic formula", n),
            );
        }

        if data.is_excluded() {
            let status = data.status.as_deref().unwrap_or("Excluded");
            let rationale = data
                .rationale()
                .map(str::to_string)
                .unwrap_or_else(|| format!("{} marked {}", category.name(), status));
            exclude(&mut breakdown, category, rationale, audit);
            continue;
        }

        let value = data
            .total_emissions_estimate
            .or_else(|| calculate_category(category, data, engine, audit));

        if let Some(tier) = data.tier().filter(|t| *t > config.scope_3_max_tier) {
            let screening = match value {
                Some(v) => format!("Screening estimate: {:.0} t CO2e", v),
                None => "No screening estimate available".to_string(),
            };
            let mut rationale = format!(
                "{} excluded due to extreme data uncertainty ({} quality). {}",
                category.name(),
                tier,
                screening
            );
            if let Some(extra) = data.rationale() {
                rationale = format!("{}. {}", rationale, extra);
            }
            exclude(&mut breakdown, category, rationale, audit);
            continue;
        }

        let Some(value) = value else {
            exclude(
                &mut breakdown,
                category,
                format!("{} excluded: insufficient data to calculate", category.name()),
                audit,
            );
            continue;
        };

        if data
            .status
            .as_deref()
            .is_some_and(|s| s.to_lowercase().contains("partial"))
        {
            audit.warn(
                "scope_3_partial",
                format!("Category {} is partially estimated: {:.2} t CO2e", n, value),
            );
        }

        let methodology = data
            .method
            .clone()
            .unwrap_or_else(|| default_methodology(category.method()).to_string());
        breakdown.totals.insert(category, value);
        breakdown.methodology.insert(category, methodology);
        audit.info("scope_3_category", format!("Category {} ({}): {:.2} t CO2e", n, category.name(), value));
    }

    for category in Scope3Category::all() {
        if !breakdown.totals.contains_key(&category) && !breakdown.exclusions.contains_key(&category) {
            exclude(
                &mut breakdown,
                category,
                format!("{} not reported", category.name()),
                audit,
            );
        }
    }

    breakdown
}

fn exclude(breakdown: &mut Scope3Breakdown, category: Scope3Category, rationale: String, audit: &mut AuditTrail) {
    audit.metrics.record_exclusion();
    audit.warn(
        "scope_3_excluded",
        format!("Category {}: {}", category.number(), rationale),
    );
    breakdown.exclusions.insert(category, rationale);
}

/// Sum facilities into a company inventory and attach the Scope 3 breakdown
///
/// A non-empty category breakdown is the reported Scope 3 total; otherwise the
/// facility sum is. Both are kept.
pub fn aggregate(
    facilities: &[FacilityRecord],
    breakdown: Scope3Breakdown,
    config: &PipelineConfig,
    audit: &mut AuditTrail,
) -> CompanyInventory {
    let inventories: Vec<FacilityInventory> = facilities
        .iter()
        .map(|f| facility_inventory(f, config, audit))
        .collect();

    let scope_1_total = inventories.iter().map(|f| f.scope_1).sum();
    let scope_2_location_total = inventories.iter().map(|f| f.scope_2_location).sum();
    let scope_2_market_total = inventories.iter().map(|f| f.scope_2_market).sum();
    let scope_3_facility_total: f64 = inventories.iter().map(|f| f.scope_3).sum();

    let scope_3_total = if breakdown.totals.is_empty() {
        scope_3_facility_total
    } else {
        let category_total = breakdown.total();
        let larger = category_total.abs().max(scope_3_facility_total.abs());
        if scope_3_facility_total > 0.0
            && (category_total - scope_3_facility_total).abs() > config.reconciliation_tolerance * larger
        {
            audit.warn(
                "scope_3_reconciliation",
                format!(
                    "Scope 3 category total {:.2} t differs from facility sum {:.2} t; reporting the category total",
                    category_total, scope_3_facility_total
                ),
            );
        }
        category_total
    };

    let inventory = CompanyInventory {
        company_name: None,
        reporting_year: None,
        scope_1_total,
        scope_2_location_total,
        scope_2_market_total,
        scope_3_total,
        scope_3_facility_total,
        scope_3_breakdown: breakdown.totals,
        exclusions: breakdown.exclusions,
        methodology: breakdown.methodology,
        quality_score: quality_score(&inventories, config),
        reporting_completeness: reporting_completeness(facilities, config.completeness_threshold),
        estimated_data_pct: estimated_data_pct(&inventories),
        facilities: inventories,
    };

    audit.info(
        "aggregate",
        format!(
            "Scope 1 {:.2} t, Scope 2 {:.2} t (location {:.2} t), Scope 3 {:.2} t, quality {:.2}",
            inventory.scope_1_total,
            inventory.scope_2_market_total,
            inventory.scope_2_location_total,
            inventory.scope_3_total,
            inventory.quality_score
        ),
    );
    inventory
}
