//! Normalization pipeline orchestration

use crate::audit::AuditTrail;
use crate::blending::{resolve_baseline, BaselineOutcome};
use crate::config::PipelineConfig;
use crate::dataset::{FacilityRecord, RawDataset};
use crate::error::PipelineError;
use crate::metrics::PipelineMetrics;
use crate::stages;
use ghg_calc::{Calculator, ReferenceTables};
use ghg_domain::traits::{BaselineEstimator, FactorLookup};
use ghg_domain::{CompanyInventory, NormalizationLog, Severity};
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::convert::Infallible;
use tracing::info;

/// Output of one pipeline run
#[derive(Debug, Clone, Serialize)]
pub struct NormalizedDataset {
    /// Company name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company_name: Option<String>,

    /// Reporting year
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reporting_year: Option<i32>,

    /// Normalized facility records
    pub facilities: Vec<FacilityRecord>,

    /// Company inventory
    pub inventory: CompanyInventory,

    /// Resolved baseline, when the dataset carried a profile or history
    #[serde(skip_serializing_if = "Option::is_none")]
    pub baseline: Option<BaselineOutcome>,

    /// Audit log of the run
    pub normalization_log: NormalizationLog,

    /// Run counters
    #[serde(skip)]
    pub metrics: PipelineMetrics,

    /// Company-level input fields carried through untouched
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl NormalizedDataset {
    /// WARNING entries in the log
    pub fn warnings(&self) -> usize {
        self.normalization_log.count(Severity::Warning)
    }

    /// ERROR entries in the log
    pub fn errors(&self) -> usize {
        self.normalization_log.count(Severity::Error)
    }
}

/// Four-stage normalization of one company's dataset
///
/// 1. units: energy onto kWh and therms, grid region resolved
/// 2. estimation: missing scope totals calculated or estimated, baseline resolved
/// 3. annualization: partial-year facilities scaled to twelve months
/// 4. aggregation: company totals, Scope 3 breakdown, quality score
///
/// The input dataset is never modified; every stage works on a copy.
pub struct NormalizationPipeline {
    config: PipelineConfig,
    calculator: Calculator,
    factors: Option<Box<dyn FactorLookup + Send + Sync>>,
}

impl NormalizationPipeline {
    /// Create a pipeline over the given reference tables
    pub fn new(config: PipelineConfig, tables: ReferenceTables) -> Result<Self, PipelineError> {
        config.validate().map_err(PipelineError::Config)?;
        tables.validate().map_err(PipelineError::Config)?;
        Ok(Self {
            config,
            calculator: Calculator::new(tables),
            factors: None,
        })
    }

    /// Calculate missing scopes from facility activity records using `factors`
    pub fn with_factors(mut self, factors: Box<dyn FactorLookup + Send + Sync>) -> Self {
        self.factors = Some(factors);
        self
    }

    /// Active configuration
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Calculator shared by every stage
    pub fn calculator(&self) -> &Calculator {
        &self.calculator
    }

    /// Run all stages without a statistical estimator
    ///
    /// A baseline is still resolved from history or the industry intensity
    /// when the dataset carries either.
    pub fn run(&self, raw: &RawDataset) -> Result<NormalizedDataset, PipelineError> {
        self.run_inner::<dyn BaselineEstimator<Error = Infallible>>(raw, None)
    }

    /// Run all stages, resolving the baseline with `estimator`
    pub fn run_with_baseline<E: BaselineEstimator + ?Sized>(
        &self,
        raw: &RawDataset,
        estimator: &E,
    ) -> Result<NormalizedDataset, PipelineError> {
        self.run_inner(raw, Some(estimator))
    }

    fn run_inner<E: BaselineEstimator + ?Sized>(
        &self,
        raw: &RawDataset,
        estimator: Option<&E>,
    ) -> Result<NormalizedDataset, PipelineError> {
        let mut audit = AuditTrail::new();
        let mut facilities = raw.facilities.clone();
        audit.metrics.facilities = facilities.len();
        info!(
            "Normalizing {} facilities for {}",
            facilities.len(),
            raw.company_name.as_deref().unwrap_or("unnamed company")
        );

        self.normalize_units(&mut facilities, &mut audit);

        self.estimate_missing(&mut facilities, &mut audit)?;
        let baseline = raw.has_baseline_inputs().then(|| {
            resolve_baseline(
                &raw.monthly_history,
                raw.company_profile.as_ref(),
                estimator,
                &mut audit,
            )
        });

        self.annualize(&mut facilities, &mut audit);

        let mut inventory = self.aggregate(raw, &facilities, &mut audit);
        inventory.company_name = raw.company_name.clone();
        inventory.reporting_year = raw.reporting_year;

        info!("{}", audit.metrics.summary());

        Ok(NormalizedDataset {
            company_name: raw.company_name.clone(),
            reporting_year: raw.reporting_year,
            facilities,
            inventory,
            baseline,
            normalization_log: audit.log,
            metrics: audit.metrics,
            extra: raw.extra.clone(),
        })
    }

    /// Stage 1 over every facility
    pub fn normalize_units(&self, facilities: &mut [FacilityRecord], audit: &mut AuditTrail) {
        for facility in facilities.iter_mut() {
            stages::normalize_units(facility, self.calculator.converter(), self.calculator.tables(), audit);
        }
    }

    /// Stage 2 over every facility
    pub fn estimate_missing(
        &self,
        facilities: &mut [FacilityRecord],
        audit: &mut AuditTrail,
    ) -> Result<(), PipelineError> {
        let factors = self.factors.as_deref().map(|f| f as &dyn FactorLookup);
        for facility in facilities.iter_mut() {
            stages::estimate_missing(facility, &self.calculator, factors, &self.config, audit)?;
        }
        Ok(())
    }

    /// Stage 3 over every facility
    pub fn annualize(&self, facilities: &mut [FacilityRecord], audit: &mut AuditTrail) {
        for facility in facilities.iter_mut() {
            stages::annualize(facility, audit);
        }
    }

    /// Stage 4: company inventory from normalized facilities
    pub fn aggregate(
        &self,
        raw: &RawDataset,
        facilities: &[FacilityRecord],
        audit: &mut AuditTrail,
    ) -> CompanyInventory {
        let breakdown = stages::scope_3_breakdown(
            &raw.scope_3_raw_data,
            self.calculator.scope3(),
            &self.config,
            audit,
        );
        stages::aggregate(facilities, breakdown, &self.config, audit)
    }
}

impl Default for NormalizationPipeline {
    fn default() -> Self {
        Self {
            config: PipelineConfig::default(),
            calculator: Calculator::default(),
            factors: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dataset() -> RawDataset {
        RawDataset::from_json(
            r#"{
                "company_name": "Test Co",
                "reporting_year": 2024,
                "facilities_raw": [
                    {"facility_id": "A", "scope_1": 100.0, "scope_2": 50.0, "scope_3": 10.0,
                     "data_quality": "Tier 1", "operational_months": 6, "reporting_completeness": 0.9},
                    {"facility_id": "B", "electricity_mwh": 100, "natural_gas_therms": 1000,
                     "address": "Penang, Malaysia", "data_quality": "Tier 2"}
                ],
                "sector": "semiconductors"
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = PipelineConfig {
            abatement_efficiency: 2.0,
            ..Default::default()
        };
        assert!(matches!(
            NormalizationPipeline::new(config, ReferenceTables::default()),
            Err(PipelineError::Config(_))
        ));
    }

    #[test]
    fn test_run_does_not_modify_input() {
        let raw = dataset();
        let before = raw.clone();
        let out = NormalizationPipeline::default().run(&raw).unwrap();
        assert_eq!(raw, before);
        assert_eq!(out.facilities.len(), 2);
    }

    #[test]
    fn test_run_end_to_end() {
        let out = NormalizationPipeline::default().run(&dataset()).unwrap();

        let a = &out.facilities[0];
        assert_eq!(a.scope_1, Some(200.0));
        assert_eq!(a.annualization_factor, Some(2.0));

        let b = &out.facilities[1];
        assert_eq!(b.electricity_kwh, Some(100_000.0));
        assert_eq!(b.region.as_deref(), Some("MY"));
        assert!((b.scope_1.unwrap() - 5.3).abs() < 1e-9);
        assert!((b.scope_2.unwrap() - 65.8).abs() < 1e-9);
        assert!(b.scope_3_estimated);

        assert_eq!(out.inventory.company_name.as_deref(), Some("Test Co"));
        assert_eq!(out.inventory.reporting_completeness, 0.5);
        assert_eq!(out.inventory.estimated_data_pct, 50.0);
        assert!(out.warnings() > 0);
        assert_eq!(out.errors(), 0);
        assert!(out.baseline.is_none());

        let json = serde_json::to_value(&out).unwrap();
        assert_eq!(json["sector"], "semiconductors");
        assert!(json["facilities"][1].get("electricity_mwh").is_none());
    }

    #[test]
    fn test_unconvertible_gas_does_not_abort_run() {
        let raw = RawDataset::from_json(
            r#"{
                "facilities": [
                    {"facility_id": "A", "electricity_kwh": 1000, "region": "US", "data_quality": "Tier 1"},
                    {"facility_id": "B", "region": "US", "natural_gas": {"amount": 10, "unit": "kg"},
                     "data_quality": "Tier 1"}
                ]
            }"#,
        )
        .unwrap();
        let out = NormalizationPipeline::default().run(&raw).unwrap();

        assert_eq!(out.facilities.len(), 2);
        let b = &out.facilities[1];
        assert_eq!(b.natural_gas_therms, None);
        assert_eq!(b.scope_1, Some(0.0));
        assert!(b.scope_1_estimated);
        assert_eq!(out.errors(), 1);
        assert_eq!(out.normalization_log.with_action("unit_conversion_failed").count(), 1);
    }

    #[test]
    fn test_stages_are_idempotent() {
        let pipeline = NormalizationPipeline::default();
        let mut facilities = dataset().facilities;
        let mut audit = AuditTrail::new();

        pipeline.normalize_units(&mut facilities, &mut audit);
        let after_units = facilities.clone();
        pipeline.normalize_units(&mut facilities, &mut audit);
        assert_eq!(facilities, after_units);

        pipeline.estimate_missing(&mut facilities, &mut audit).unwrap();
        let after_estimate = facilities.clone();
        pipeline.estimate_missing(&mut facilities, &mut audit).unwrap();
        assert_eq!(facilities, after_estimate);

        pipeline.annualize(&mut facilities, &mut audit);
        let after_annualize = facilities.clone();
        pipeline.annualize(&mut facilities, &mut audit);
        assert_eq!(facilities, after_annualize);
    }
}
