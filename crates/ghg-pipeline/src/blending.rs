//! Baseline resolution from monthly history and a statistical estimate
//!
//! | months of history | result                                           |
//! |-------------------|--------------------------------------------------|
//! | ≥ 12              | historical average, annualized                   |
//! | 6-11              | blend, history weighted by months / 12           |
//! | 1-5               | estimate only, annotated                         |
//! | 0                 | estimate, or industry intensity × revenue        |
//!
//! When the estimator is unavailable or fails the resolver falls back one
//! step: to the annualized history if there is any, else to the industry
//! intensity.

use crate::audit::AuditTrail;
use ghg_domain::traits::BaselineEstimator;
use ghg_domain::{BaselinePrediction, CompanyProfile, Industry};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Months of history needed to skip the estimator
pub const FULL_YEAR_MONTHS: usize = 12;
/// Minimum months of history that get blended rather than replaced
pub const BLEND_MIN_MONTHS: usize = 6;
/// Revenue assumed by the intensity fallback when the profile has none, USD
pub const FALLBACK_REVENUE_USD: f64 = 1_000_000.0;

/// How the baseline value was obtained
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BaselineMethod {
    /// Mean of monthly history × 12
    HistoricalAverage,
    /// Linear blend of history and estimate
    Blended,
    /// Statistical estimate alone
    EstimatorOnly,
    /// Industry intensity × revenue
    IndustryAverage,
}

impl BaselineMethod {
    /// snake_case label
    pub fn as_str(&self) -> &'static str {
        match self {
            BaselineMethod::HistoricalAverage => "historical_average",
            BaselineMethod::Blended => "blended",
            BaselineMethod::EstimatorOnly => "estimator_only",
            BaselineMethod::IndustryAverage => "industry_average",
        }
    }
}

impl fmt::Display for BaselineMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Resolved annual baseline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BaselineOutcome {
    /// How the value was obtained
    pub method: BaselineMethod,
    /// Annual emissions in t CO2e
    pub value: f64,
    /// Months of history available
    pub months_of_data: usize,
    /// Weight of the estimate in `value` (0-1)
    pub estimator_weight: f64,
    /// Annualized historical average, if any history exists
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub historical_annual: Option<f64>,
    /// Estimator output, if it was used
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prediction: Option<BaselinePrediction>,
    /// Human-readable note on how to read the value
    pub annotation: String,
}

/// Mean of the first twelve months (or fewer), × 12
///
/// The baseline year is the start of the record, so later months never
/// shift it.
pub fn historical_annual(history: &[f64]) -> Option<f64> {
    if history.is_empty() {
        return None;
    }
    let year = &history[..history.len().min(FULL_YEAR_MONTHS)];
    Some(year.iter().sum::<f64>() / year.len() as f64 * 12.0)
}

/// Industry intensity (t CO2e per $M) × revenue
pub fn industry_average(profile: Option<&CompanyProfile>) -> f64 {
    let intensity = profile
        .and_then(|p| p.industry.as_ref())
        .map(Industry::intensity)
        .unwrap_or(Industry::DEFAULT_INTENSITY);
    let revenue = profile
        .and_then(|p| p.revenue)
        .filter(|r| *r > 0.0)
        .unwrap_or(FALLBACK_REVENUE_USD);
    intensity * revenue / 1_000_000.0
}

fn try_estimate<E: BaselineEstimator + ?Sized>(
    profile: Option<&CompanyProfile>,
    estimator: Option<&E>,
    audit: &mut AuditTrail,
) -> Option<BaselinePrediction> {
    let (profile, estimator) = (profile?, estimator?);
    match estimator.predict(profile) {
        Ok(prediction) => Some(prediction),
        Err(e) => {
            audit.warn("baseline_estimator_failed", format!("Baseline estimator failed: {}", e));
            None
        }
    }
}

/// Resolve the baseline for a company
pub fn resolve_baseline<E: BaselineEstimator + ?Sized>(
    history: &[f64],
    profile: Option<&CompanyProfile>,
    estimator: Option<&E>,
    audit: &mut AuditTrail,
) -> BaselineOutcome {
    let months = history.len();
    let historical = historical_annual(history);

    let outcome = if months >= FULL_YEAR_MONTHS {
        BaselineOutcome {
            method: BaselineMethod::HistoricalAverage,
            value: historical.unwrap_or(0.0),
            months_of_data: months,
            estimator_weight: 0.0,
            historical_annual: historical,
            prediction: None,
            annotation: format!("Historical average of the first {} months", FULL_YEAR_MONTHS),
        }
    } else {
        match (try_estimate(profile, estimator, audit), historical) {
            (Some(prediction), Some(hist)) if months >= BLEND_MIN_MONTHS => {
                let history_weight = months as f64 / FULL_YEAR_MONTHS as f64;
                let estimator_weight = 1.0 - history_weight;
                BaselineOutcome {
                    method: BaselineMethod::Blended,
                    value: history_weight * hist + estimator_weight * prediction.total,
                    months_of_data: months,
                    estimator_weight,
                    historical_annual: historical,
                    annotation: format!(
                        "{} months of history blended with the estimate ({:.0}% history)",
                        months,
                        history_weight * 100.0
                    ),
                    prediction: Some(prediction),
                }
            }
            (Some(prediction), _) => BaselineOutcome {
                method: BaselineMethod::EstimatorOnly,
                value: prediction.total,
                months_of_data: months,
                estimator_weight: 1.0,
                historical_annual: historical,
                annotation: if months == 0 {
                    "No history; statistical estimate".to_string()
                } else {
                    format!(
                        "Only {} months of history; statistical estimate used, history for reference",
                        months
                    )
                },
                prediction: Some(prediction),
            },
            (None, Some(hist)) => BaselineOutcome {
                method: BaselineMethod::HistoricalAverage,
                value: hist,
                months_of_data: months,
                estimator_weight: 0.0,
                historical_annual: historical,
                prediction: None,
                annotation: format!(
                    "Only {} months of history annualized; no estimate available",
                    months
                ),
            },
            (None, None) => BaselineOutcome {
                method: BaselineMethod::IndustryAverage,
                value: industry_average(profile),
                months_of_data: 0,
                estimator_weight: 0.0,
                historical_annual: None,
                prediction: None,
                annotation: "No history or estimate; industry intensity × revenue".to_string(),
            },
        }
    };

    let detail = format!(
        "Baseline {:.2} t CO2e via {} ({})",
        outcome.value, outcome.method, outcome.annotation
    );
    if outcome.method == BaselineMethod::HistoricalAverage && months >= FULL_YEAR_MONTHS {
        audit.info("baseline", detail);
    } else {
        audit.warn("baseline", detail);
    }
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use ghg_domain::Interval;

    struct Fixed(f64);

    impl BaselineEstimator for Fixed {
        type Error = String;

        fn predict(&self, _profile: &CompanyProfile) -> Result<BaselinePrediction, String> {
            Ok(BaselinePrediction {
                total: self.0,
                scope_1: self.0 * 0.1,
                scope_2: self.0 * 0.4,
                scope_3: self.0 * 0.5,
                interval: Interval::new(self.0 * 0.5, self.0 * 1.5),
                uncertainty_pct: 100.0,
                method: "fixed".into(),
            })
        }
    }

    struct Failing;

    impl BaselineEstimator for Failing {
        type Error = String;

        fn predict(&self, _profile: &CompanyProfile) -> Result<BaselinePrediction, String> {
            Err("no model".into())
        }
    }

    fn profile() -> CompanyProfile {
        CompanyProfile {
            revenue: Some(10_000_000.0),
            industry: Some(Industry::Technology),
            ..Default::default()
        }
    }

    #[test]
    fn test_full_year_ignores_estimator() {
        let history = vec![10.0; 14];
        let mut audit = AuditTrail::new();
        let out = resolve_baseline(&history, Some(&profile()), Some(&Fixed(1.0)), &mut audit);
        assert_eq!(out.method, BaselineMethod::HistoricalAverage);
        assert_eq!(out.value, 120.0);
        assert!(out.prediction.is_none());
    }

    #[test]
    fn test_baseline_year_is_first_twelve_months() {
        let mut history = vec![10.0; 12];
        history.extend([50.0, 50.0, 50.0]);
        assert_eq!(historical_annual(&history), Some(120.0));
        assert_eq!(historical_annual(&[5.0, 15.0]), Some(120.0));
        assert_eq!(historical_annual(&[]), None);
    }

    #[test]
    fn test_nine_months_blends() {
        let history = vec![10.0; 9];
        let mut audit = AuditTrail::new();
        let out = resolve_baseline(&history, Some(&profile()), Some(&Fixed(200.0)), &mut audit);
        assert_eq!(out.method, BaselineMethod::Blended);
        assert!((out.value - (0.75 * 120.0 + 0.25 * 200.0)).abs() < 1e-9);
        assert!((out.estimator_weight - 0.25).abs() < 1e-12);
    }

    #[test]
    fn test_three_months_uses_estimate() {
        let history = vec![10.0; 3];
        let mut audit = AuditTrail::new();
        let out = resolve_baseline(&history, Some(&profile()), Some(&Fixed(200.0)), &mut audit);
        assert_eq!(out.method, BaselineMethod::EstimatorOnly);
        assert_eq!(out.value, 200.0);
        assert_eq!(out.historical_annual, Some(120.0));
        assert!(out.annotation.contains("3 months"));
    }

    #[test]
    fn test_failing_estimator_falls_back_to_history() {
        let history = vec![10.0; 8];
        let mut audit = AuditTrail::new();
        let out = resolve_baseline(&history, Some(&profile()), Some(&Failing), &mut audit);
        assert_eq!(out.method, BaselineMethod::HistoricalAverage);
        assert_eq!(out.value, 120.0);
        assert_eq!(audit.log.with_action("baseline_estimator_failed").count(), 1);
    }

    #[test]
    fn test_no_data_uses_industry_intensity() {
        let mut audit = AuditTrail::new();
        let out = resolve_baseline::<Fixed>(&[], Some(&profile()), None, &mut audit);
        assert_eq!(out.method, BaselineMethod::IndustryAverage);
        assert_eq!(out.value, 250.0);

        let out = resolve_baseline::<Fixed>(&[], None, None, &mut audit);
        assert_eq!(out.value, 50.0);
    }
}
