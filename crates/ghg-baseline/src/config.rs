//! Configuration for the regression estimator

use serde::{Deserialize, Serialize};

/// Training and interval settings for [`crate::RegressionEstimator`]
///
/// # Examples
///
/// ```
/// use ghg_baseline::BaselineConfig;
///
/// let config = BaselineConfig::default();
/// assert_eq!(config.seed, 42);
/// assert_eq!(config.samples, 5000);
///
/// // Smaller training set for interactive use
/// let config = BaselineConfig::fast();
/// assert!(config.samples < BaselineConfig::default().samples);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BaselineConfig {
    /// RNG seed for the synthetic training set and bootstrap resampling
    /// Default: 42
    pub seed: u64,

    /// Synthetic companies generated for training
    /// Default: 5000
    pub samples: usize,

    /// Models in the bootstrap ensemble
    /// Default: 200
    pub bootstrap_rounds: usize,

    /// Lower interval percentile (0-100)
    /// Default: 10
    pub lower_percentile: f64,

    /// Upper interval percentile (0-100)
    /// Default: 90
    pub upper_percentile: f64,

    /// Mean of ln(revenue USD) in the synthetic population
    /// Default: 15.0
    #[serde(default = "default_revenue_log_mean")]
    pub revenue_log_mean: f64,

    /// Standard deviation of ln(revenue USD)
    /// Default: 2.0
    #[serde(default = "default_revenue_log_sigma")]
    pub revenue_log_sigma: f64,
}

fn default_revenue_log_mean() -> f64 {
    15.0
}

fn default_revenue_log_sigma() -> f64 {
    2.0
}

impl Default for BaselineConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            samples: 5000,
            bootstrap_rounds: 200,
            lower_percentile: 10.0,
            upper_percentile: 90.0,
            revenue_log_mean: default_revenue_log_mean(),
            revenue_log_sigma: default_revenue_log_sigma(),
        }
    }
}

impl BaselineConfig {
    /// Smaller training set and ensemble for interactive use
    ///
    /// - Samples: 1000
    /// - Bootstrap rounds: 50
    pub fn fast() -> Self {
        Self {
            samples: 1000,
            bootstrap_rounds: 50,
            ..Self::default()
        }
    }

    /// Larger training set and ensemble for final reporting
    ///
    /// - Samples: 20000
    /// - Bootstrap rounds: 500
    pub fn thorough() -> Self {
        Self {
            samples: 20_000,
            bootstrap_rounds: 500,
            ..Self::default()
        }
    }

    /// Check settings
    pub fn validate(&self) -> Result<(), String> {
        if self.samples < 100 {
            return Err("samples must be at least 100".to_string());
        }
        if self.bootstrap_rounds < 2 {
            return Err("bootstrap_rounds must be at least 2".to_string());
        }
        if !(0.0..=100.0).contains(&self.lower_percentile)
            || !(0.0..=100.0).contains(&self.upper_percentile)
            || self.lower_percentile >= self.upper_percentile
        {
            return Err("percentiles must satisfy 0 <= lower < upper <= 100".to_string());
        }
        if !(self.revenue_log_sigma.is_finite() && self.revenue_log_sigma > 0.0) {
            return Err("revenue_log_sigma must be positive".to_string());
        }
        Ok(())
    }

    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, String> {
        let config: Self = toml::from_str(toml_str).map_err(|e| format!("Failed to parse TOML: {}", e))?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize configuration to TOML string
    pub fn to_toml(&self) -> Result<String, String> {
        toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize to TOML: {}", e))
    }
}
