//! Configuration for the normalization pipeline
//!
//! Heuristic coefficients for estimation and the quality-scoring table.

use ghg_domain::QualityTier;
use serde::{Deserialize, Serialize};

/// Base quality score per data tier
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TierScores {
    /// Measured / supplier-specific
    pub tier_1: f64,
    /// Regional / process-specific
    pub tier_2: f64,
    /// Industry averages
    pub tier_3: f64,
    /// Spend-based or proxy
    pub tier_4: f64,
}

impl Default for TierScores {
    fn default() -> Self {
        Self {
            tier_1: QualityTier::Tier1.base_score(),
            tier_2: QualityTier::Tier2.base_score(),
            tier_3: QualityTier::Tier3.base_score(),
            tier_4: QualityTier::Tier4.base_score(),
        }
    }
}

impl TierScores {
    /// Score for a tier
    pub fn score(&self, tier: QualityTier) -> f64 {
        match tier {
            QualityTier::Tier1 => self.tier_1,
            QualityTier::Tier2 => self.tier_2,
            QualityTier::Tier3 => self.tier_3,
            QualityTier::Tier4 => self.tier_4,
        }
    }
}

/// Configuration for [`crate::NormalizationPipeline`]
///
/// # Examples
///
/// ```
/// use ghg_pipeline::PipelineConfig;
///
/// let config = PipelineConfig::default();
/// assert_eq!(config.abatement_efficiency, 0.85);
/// assert_eq!(config.scope_3_ratio, 0.45);
///
/// // Harsher penalties for estimated data
/// let config = PipelineConfig::conservative();
/// assert!(config.estimate_penalty > PipelineConfig::default().estimate_penalty);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Share of nameplate process gas destroyed before release
    /// Default: 0.85
    pub abatement_efficiency: f64,

    /// Scope 3 heuristic as a share of Scope 1 + Scope 2
    /// Default: 0.45
    pub scope_3_ratio: f64,

    /// Quality points lost per estimated scope value
    /// Default: 0.5
    pub estimate_penalty: f64,

    /// Quality points lost when a calculation relied on a unit assumption
    /// Default: 0.25
    #[serde(default = "default_assumption_penalty")]
    pub assumption_penalty: f64,

    /// Overall score when total emissions are zero
    /// Default: 2.5
    pub default_quality_score: f64,

    /// Reporting completeness above which a facility counts as complete
    /// Default: 0.75
    pub completeness_threshold: f64,

    /// Tier for facilities with no (or an unparseable) data-quality label
    /// Default: Tier 3
    #[serde(default = "default_tier")]
    pub default_tier: QualityTier,

    /// Worst Scope 3 tier still included in the inventory
    /// Default: Tier 3
    #[serde(default = "default_tier")]
    pub scope_3_max_tier: QualityTier,

    /// Relative difference between category and facility Scope 3 totals that triggers a warning
    /// Default: 0.01
    #[serde(default = "default_reconciliation_tolerance")]
    pub reconciliation_tolerance: f64,

    /// Base score per tier
    #[serde(default)]
    pub tier_scores: TierScores,
}

fn default_assumption_penalty() -> f64 {
    0.25
}

fn default_tier() -> QualityTier {
    QualityTier::Tier3
}

fn default_reconciliation_tolerance() -> f64 {
    0.01
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            abatement_efficiency: 0.85,
            scope_3_ratio: 0.45,
            estimate_penalty: 0.5,
            assumption_penalty: default_assumption_penalty(),
            default_quality_score: 2.5,
            completeness_threshold: 0.75,
            default_tier: default_tier(),
            scope_3_max_tier: default_tier(),
            reconciliation_tolerance: default_reconciliation_tolerance(),
            tier_scores: TierScores::default(),
        }
    }
}

impl PipelineConfig {
    /// Stricter scoring for external assurance
    ///
    /// - Abatement: 0.75 (more process gas assumed released)
    /// - Estimate penalty: 1.0
    /// - Completeness threshold: 0.9
    /// - Scope 3 limited to Tier 2 and better
    pub fn conservative() -> Self {
        Self {
            abatement_efficiency: 0.75,
            estimate_penalty: 1.0,
            assumption_penalty: 0.5,
            completeness_threshold: 0.9,
            scope_3_max_tier: QualityTier::Tier2,
            ..Self::default()
        }
    }

    /// Relaxed scoring for early screening
    ///
    /// - Estimate penalty: 0.25
    /// - Completeness threshold: 0.5
    /// - Scope 3 includes Tier 4 screening values
    pub fn lenient() -> Self {
        Self {
            estimate_penalty: 0.25,
            assumption_penalty: 0.1,
            completeness_threshold: 0.5,
            scope_3_max_tier: QualityTier::Tier4,
            ..Self::default()
        }
    }

    /// Check coefficient ranges
    pub fn validate(&self) -> Result<(), String> {
        let unit_interval = [
            ("abatement_efficiency", self.abatement_efficiency),
            ("completeness_threshold", self.completeness_threshold),
            ("reconciliation_tolerance", self.reconciliation_tolerance),
        ];
        for (name, value) in unit_interval {
            if !(0.0..=1.0).contains(&value) {
                return Err(format!("{} must be between 0 and 1", name));
            }
        }

        let non_negative = [
            ("scope_3_ratio", self.scope_3_ratio),
            ("estimate_penalty", self.estimate_penalty),
            ("assumption_penalty", self.assumption_penalty),
            ("default_quality_score", self.default_quality_score),
        ];
        for (name, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(format!("{} must be a non-negative number", name));
            }
        }

        let scores = &self.tier_scores;
        if !(scores.tier_1 >= scores.tier_2 && scores.tier_2 >= scores.tier_3 && scores.tier_3 >= scores.tier_4) {
            return Err("tier_scores must not increase from tier_1 to tier_4".to_string());
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = PipelineConfig::default();
        assert_eq!(config.abatement_efficiency, 0.85);
        assert_eq!(config.scope_3_ratio, 0.45);
        assert_eq!(config.estimate_penalty, 0.5);
        assert_eq!(config.default_quality_score, 2.5);
        assert_eq!(config.completeness_threshold, 0.75);
        assert_eq!(config.default_tier, QualityTier::Tier3);
        assert_eq!(config.tier_scores.score(QualityTier::Tier1), 5.0);
        assert_eq!(config.tier_scores.score(QualityTier::Tier4), 1.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_presets() {
        let conservative = PipelineConfig::conservative();
        let lenient = PipelineConfig::lenient();
        assert!(conservative.validate().is_ok());
        assert!(lenient.validate().is_ok());
        assert!(conservative.scope_3_max_tier < PipelineConfig::default().scope_3_max_tier);
        assert_eq!(lenient.scope_3_max_tier, QualityTier::Tier4);
    }

    #[test]
    fn test_validate_rejects_bad_ranges() {
        let config = PipelineConfig {
            abatement_efficiency: 1.5,
            ..Default::default()
        };
        assert!(config.validate().unwrap_err().contains("abatement_efficiency"));

        let config = PipelineConfig {
            scope_3_ratio: -0.1,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = PipelineConfig {
            tier_scores: TierScores {
                tier_1: 1.0,
                tier_2: 2.0,
                tier_3: 3.0,
                tier_4: 4.0,
            },
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_toml_roundtrip() {
        let config = PipelineConfig::conservative();
        let toml = config.to_toml().unwrap();
        let back = PipelineConfig::from_toml(&toml).unwrap();
        assert_eq!(config, back);
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let toml = r#"
abatement_efficiency = 0.9
scope_3_ratio = 0.5
estimate_penalty = 0.5
default_quality_score = 2.5
completeness_threshold = 0.75
"#;
        let config = PipelineConfig::from_toml(toml).unwrap();
        assert_eq!(config.abatement_efficiency, 0.9);
        assert_eq!(config.assumption_penalty, 0.25);
        assert_eq!(config.scope_3_max_tier, QualityTier::Tier3);
    }
}
