//! Scope and Scope 3 category classification

use serde::{Deserialize, Serialize};
use std::fmt;

/// GHG Protocol emission scope
///
/// - Scope 1: direct emissions from owned or controlled sources
/// - Scope 2: indirect emissions from purchased electricity, steam, heat
/// - Scope 3: all other value-chain emissions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Scope {
    /// Direct emissions
    One,
    /// Purchased energy
    Two,
    /// Value chain
    Three,
}

impl Scope {
    /// All scopes in reporting order
    pub const ALL: [Scope; 3] = [Scope::One, Scope::Two, Scope::Three];

    /// Map a scope number onto a scope, `None` outside 1..=3
    pub fn from_number(n: u8) -> Option<Self> {
        match n {
            1 => Some(Scope::One),
            2 => Some(Scope::Two),
            3 => Some(Scope::Three),
            _ => None,
        }
    }

    /// Scope number (1, 2 or 3)
    pub fn number(&self) -> u8 {
        match self {
            Scope::One => 1,
            Scope::Two => 2,
            Scope::Three => 3,
        }
    }
}

impl TryFrom<u8> for Scope {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::from_number(value).ok_or_else(|| format!("Invalid scope: {}", value))
    }
}

impl From<Scope> for u8 {
    fn from(scope: Scope) -> Self {
        scope.number()
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Scope {}", self.number())
    }
}

/// Formula family used for a Scope 3 category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Scope3Method {
    /// Spend × factor (CO2e per currency unit)
    SpendBased,
    /// Distance in km × factor (CO2e per km)
    DistanceBased,
    /// Mass in tons × factor (CO2e per ton)
    WasteBased,
    /// Activity × factor with unit harmonization
    Generic,
}

impl Scope3Method {
    /// Short label used in audit formulas and methodology text
    pub fn as_str(&self) -> &'static str {
        match self {
            Scope3Method::SpendBased => "spend-based",
            Scope3Method::DistanceBased => "distance-based",
            Scope3Method::WasteBased => "waste-based",
            Scope3Method::Generic => "generic",
        }
    }
}

/// A Scope 3 category number
///
/// The fifteen GHG Protocol categories are numbered 1..=15. Numbers outside
/// that range are carried through and calculated with the generic formula
/// rather than rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Scope3Category(pub u8);

const CATEGORY_NAMES: [&str; 15] = [
    "Purchased goods and services",
    "Capital goods",
    "Fuel- and energy-related activities",
    "Upstream transportation and distribution",
    "Waste generated in operations",
    "Business travel",
    "Employee commuting",
    "Upstream leased assets",
    "Downstream transportation and distribution",
    "Processing of sold products",
    "Use of sold products",
    "End-of-life treatment of sold products",
    "Downstream leased assets",
    "Franchises",
    "Investments",
];

impl Scope3Category {
    /// Category used when the caller gives none
    pub const DEFAULT: Scope3Category = Scope3Category(1);

    /// Iterate the fifteen standard categories
    pub fn all() -> impl Iterator<Item = Scope3Category> {
        (1..=15).map(Scope3Category)
    }

    /// Category number
    pub fn number(&self) -> u8 {
        self.0
    }

    /// Whether this is one of the fifteen GHG Protocol categories
    pub fn is_standard(&self) -> bool {
        (1..=15).contains(&self.0)
    }

    /// Human-readable category name
    pub fn name(&self) -> String {
        if self.is_standard() {
            CATEGORY_NAMES[(self.0 - 1) as usize].to_string()
        } else {
            format!("Category {}", self.0)
        }
    }

    /// Formula family for this category
    pub fn method(&self) -> Scope3Method {
        match self.0 {
            1 | 2 => Scope3Method::SpendBased,
            4 | 6 | 7 | 9 => Scope3Method::DistanceBased,
            5 => Scope3Method::WasteBased,
            _ => Scope3Method::Generic,
        }
    }

    /// Parse a raw-data key such as `category_6`
    pub fn from_key(key: &str) -> Option<Self> {
        key.trim()
            .to_lowercase()
            .strip_prefix("category_")
            .and_then(|n| n.parse::<u8>().ok())
            .map(Scope3Category)
    }
}

impl fmt::Display for Scope3Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scope_from_number() {
        assert_eq!(Scope::from_number(1), Some(Scope::One));
        assert_eq!(Scope::from_number(3), Some(Scope::Three));
        assert_eq!(Scope::from_number(0), None);
        assert_eq!(Scope::from_number(4), None);
    }

    #[test]
    fn test_scope_serde_as_number() {
        let json = serde_json::to_string(&Scope::Two).unwrap();
        assert_eq!(json, "2");
        let parsed: Scope = serde_json::from_str("3").unwrap();
        assert_eq!(parsed, Scope::Three);
        assert!(serde_json::from_str::<Scope>("5").is_err());
    }

    #[test]
    fn test_category_methods() {
        assert_eq!(Scope3Category(1).method(), Scope3Method::SpendBased);
        assert_eq!(Scope3Category(2).method(), Scope3Method::SpendBased);
        assert_eq!(Scope3Category(6).method(), Scope3Method::DistanceBased);
        assert_eq!(Scope3Category(9).method(), Scope3Method::DistanceBased);
        assert_eq!(Scope3Category(5).method(), Scope3Method::WasteBased);
        assert_eq!(Scope3Category(11).method(), Scope3Method::Generic);
        assert_eq!(Scope3Category(42).method(), Scope3Method::Generic);
    }

    #[test]
    fn test_category_names() {
        assert_eq!(Scope3Category(6).name(), "Business travel");
        assert_eq!(Scope3Category(15).name(), "Investments");
        assert_eq!(Scope3Category(0).name(), "Category 0");
        assert!(!Scope3Category(16).is_standard());
        assert_eq!(Scope3Category::all().count(), 15);
    }

    #[test]
    fn test_category_from_key() {
        assert_eq!(Scope3Category::from_key("category_7"), Some(Scope3Category(7)));
        assert_eq!(Scope3Category::from_key("Category_11"), Some(Scope3Category(11)));
        assert_eq!(Scope3Category::from_key("scope_3_total"), None);
    }
}
