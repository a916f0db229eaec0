//! Tier module - data-quality classes for activity data

use serde::{Deserialize, Serialize};

/// Data-quality tier of a facility, record or factor
///
/// Lower numbers are better:
/// - Tier1: measured (meters, invoices)
/// - Tier2: calculated from primary data
/// - Tier3: estimated from secondary data
/// - Tier4: proxy / screening values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum QualityTier {
    /// Measured data
    Tier1,

    /// Calculated from primary data
    Tier2,

    /// Estimated from secondary data
    Tier3,

    /// Proxy or screening data
    Tier4,
}

impl QualityTier {
    /// Tier number (1 = best, 4 = worst)
    pub fn number(&self) -> u8 {
        match self {
            QualityTier::Tier1 => 1,
            QualityTier::Tier2 => 2,
            QualityTier::Tier3 => 3,
            QualityTier::Tier4 => 4,
        }
    }

    /// Get the tier label as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            QualityTier::Tier1 => "Tier 1",
            QualityTier::Tier2 => "Tier 2",
            QualityTier::Tier3 => "Tier 3",
            QualityTier::Tier4 => "Tier 4",
        }
    }

    /// Tier from its number
    pub fn from_number(n: u8) -> Option<Self> {
        match n {
            1 => Some(QualityTier::Tier1),
            2 => Some(QualityTier::Tier2),
            3 => Some(QualityTier::Tier3),
            4 => Some(QualityTier::Tier4),
            _ => None,
        }
    }

    /// Parse labels such as "Tier 1", "tier2", "T3" or "4"
    pub fn parse(s: &str) -> Option<Self> {
        let lowered = s.trim().to_lowercase();
        let digits = lowered
            .trim_start_matches("tier")
            .trim_start_matches('t')
            .trim_start_matches(['_', '-', ' ']);
        digits.parse::<u8>().ok().and_then(Self::from_number)
    }

    /// Default base quality score (0-5 scale) before estimate penalties
    pub fn base_score(&self) -> f64 {
        match self {
            QualityTier::Tier1 => 5.0,
            QualityTier::Tier2 => 3.5,
            QualityTier::Tier3 => 2.0,
            QualityTier::Tier4 => 1.0,
        }
    }

    /// The next better tier
    pub fn better(&self) -> Option<Self> {
        match self {
            QualityTier::Tier1 => None, // Already best
            QualityTier::Tier2 => Some(QualityTier::Tier1),
            QualityTier::Tier3 => Some(QualityTier::Tier2),
            QualityTier::Tier4 => Some(QualityTier::Tier3),
        }
    }

    /// The next worse tier
    pub fn worse(&self) -> Option<Self> {
        match self {
            QualityTier::Tier1 => Some(QualityTier::Tier2),
            QualityTier::Tier2 => Some(QualityTier::Tier3),
            QualityTier::Tier3 => Some(QualityTier::Tier4),
            QualityTier::Tier4 => None, // Already worst
        }
    }
}

impl TryFrom<u8> for QualityTier {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::from_number(value).ok_or_else(|| format!("Invalid quality tier: {}", value))
    }
}

impl From<QualityTier> for u8 {
    fn from(tier: QualityTier) -> Self {
        tier.number()
    }
}

impl std::str::FromStr for QualityTier {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("Invalid quality tier: {}", s))
    }
}

impl std::fmt::Display for QualityTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tier_parse_labels() {
        assert_eq!(QualityTier::parse("Tier 1"), Some(QualityTier::Tier1));
        assert_eq!(QualityTier::parse("tier2"), Some(QualityTier::Tier2));
        assert_eq!(QualityTier::parse("T3"), Some(QualityTier::Tier3));
        assert_eq!(QualityTier::parse("4"), Some(QualityTier::Tier4));
        assert_eq!(QualityTier::parse("Tier 5"), None);
        assert_eq!(QualityTier::parse("good"), None);
    }

    #[test]
    fn test_tier_base_scores() {
        assert_eq!(QualityTier::Tier1.base_score(), 5.0);
        assert_eq!(QualityTier::Tier2.base_score(), 3.5);
        assert_eq!(QualityTier::Tier3.base_score(), 2.0);
        assert_eq!(QualityTier::Tier4.base_score(), 1.0);
    }

    #[test]
    fn test_tier_progression() {
        assert_eq!(QualityTier::Tier4.better(), Some(QualityTier::Tier3));
        assert_eq!(QualityTier::Tier1.better(), None);
        assert_eq!(QualityTier::Tier3.worse(), Some(QualityTier::Tier4));
        assert_eq!(QualityTier::Tier4.worse(), None);
        assert!(QualityTier::Tier1 < QualityTier::Tier4);
    }
}
