//! Regression-based baseline estimator

use crate::config::BaselineConfig;
use crate::error::BaselineError;
use crate::regression::{Features, LogLinearModel};
use crate::synthetic::{generate, TrainingSample};
use ghg_domain::traits::BaselineEstimator;
use ghg_domain::{BaselinePrediction, CompanyProfile, Industry, Interval};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info, warn};

/// Revenue per employee assumed when headcount is missing, USD
pub const REVENUE_PER_EMPLOYEE: f64 = 300_000.0;
/// Energy spend share of revenue assumed when missing
pub const ENERGY_SPEND_SHARE: f64 = 0.035;
/// Floor area per employee assumed when missing, sq ft
pub const AREA_PER_EMPLOYEE: f64 = 300.0;

/// Linear-interpolated percentile of `values` (0-100)
///
/// Returns 0.0 for an empty slice.
pub fn percentile(values: &[f64], pct: f64) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let rank = (pct.clamp(0.0, 100.0) / 100.0) * (sorted.len() - 1) as f64;
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    let frac = rank - lo as f64;
    sorted[lo] + (sorted[hi] - sorted[lo]) * frac
}

/// Baseline estimator trained on a synthetic population
///
/// A point model fitted on every sample gives the estimate; a bootstrap
/// ensemble gives the interval.
///
/// # Examples
///
/// ```
/// use ghg_baseline::{BaselineConfig, RegressionEstimator};
/// use ghg_domain::traits::BaselineEstimator;
/// use ghg_domain::{CompanyProfile, Industry};
///
/// let estimator = RegressionEstimator::new(BaselineConfig::fast()).unwrap();
/// let profile = CompanyProfile {
///     revenue: Some(20_000_000.0),
///     industry: Some(Industry::Technology),
///     ..Default::default()
/// };
/// let prediction = estimator.predict(&profile).unwrap();
/// assert!(prediction.total > 0.0);
/// assert!(prediction.interval.lower <= prediction.interval.upper);
/// ```
#[derive(Debug, Clone)]
pub struct RegressionEstimator {
    config: BaselineConfig,
    model: LogLinearModel,
    ensemble: Vec<LogLinearModel>,
}

impl RegressionEstimator {
    /// Generate the training set and fit the models
    pub fn new(config: BaselineConfig) -> Result<Self, BaselineError> {
        config.validate().map_err(BaselineError::Config)?;
        let samples = generate(&config)?;
        let model = LogLinearModel::fit_all(&samples)?;
        let ensemble = Self::bootstrap(&config, &samples)?;

        info!(
            "Baseline estimator trained on {} samples with {} bootstrap models",
            samples.len(),
            ensemble.len()
        );
        Ok(Self {
            config,
            model,
            ensemble,
        })
    }

    /// Active configuration
    pub fn config(&self) -> &BaselineConfig {
        &self.config
    }

    fn bootstrap(config: &BaselineConfig, samples: &[TrainingSample]) -> Result<Vec<LogLinearModel>, BaselineError> {
        let mut rng = StdRng::seed_from_u64(config.seed.wrapping_add(1));
        let n = samples.len();
        (0..config.bootstrap_rounds)
            .map(|_| {
                let indices: Vec<usize> = (0..n).map(|_| rng.gen_range(0..n)).collect();
                LogLinearModel::fit(samples, &indices)
            })
            .collect()
    }

    /// Model inputs for a profile, imputing missing size measures from revenue
    ///
    /// `profile.region` is ignored; regional grid mix only widens the
    /// training noise.
    pub fn features(&self, profile: &CompanyProfile) -> Result<Features, BaselineError> {
        let revenue = profile
            .revenue
            .filter(|r| r.is_finite() && *r > 0.0)
            .ok_or_else(|| BaselineError::InsufficientProfile("revenue must be a positive number".to_string()))?;

        let intensity = match &profile.industry {
            Some(industry) => industry.intensity(),
            None => {
                warn!("Profile has no industry; using default intensity");
                Industry::DEFAULT_INTENSITY
            }
        };

        let employees = profile.employees.unwrap_or(revenue / REVENUE_PER_EMPLOYEE);
        Ok(Features {
            revenue,
            intensity,
            employees,
            energy_spend: profile.energy_spend.unwrap_or(revenue * ENERGY_SPEND_SHARE),
            facility_area: profile.facility_area.unwrap_or(employees * AREA_PER_EMPLOYEE),
        })
    }
}

impl BaselineEstimator for RegressionEstimator {
    type Error = BaselineError;

    fn predict(&self, profile: &CompanyProfile) -> Result<BaselinePrediction, BaselineError> {
        let features = self.features(profile)?;
        let total = self.model.predict(&features);

        let ensemble: Vec<f64> = self.ensemble.iter().map(|m| m.predict(&features)).collect();
        let interval = Interval::spanning(
            percentile(&ensemble, self.config.lower_percentile),
            percentile(&ensemble, self.config.upper_percentile),
        );
        let uncertainty_pct = interval.relative_width_pct(total);

        let (scope_1_share, scope_2_share) = profile
            .industry
            .as_ref()
            .map(Industry::scope_split)
            .unwrap_or((0.1, 0.4));

        debug!(
            "Baseline: {:.2} t CO2e [{:.2}, {:.2}]",
            total, interval.lower, interval.upper
        );

        Ok(BaselinePrediction {
            total,
            scope_1: total * scope_1_share,
            scope_2: total * scope_2_share,
            scope_3: total * (1.0 - scope_1_share - scope_2_share),
            interval,
            uncertainty_pct,
            method: format!(
                "Log-linear regression ({} synthetic samples, {} bootstrap models)",
                self.config.samples, self.config.bootstrap_rounds
            ),
        })
    }
}
