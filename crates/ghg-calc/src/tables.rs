//! Reference tables shared by the calculator and the normalization pipeline
//!
//! One swappable configuration holds the GWP values, grid factors and
//! default estimation factors, so every code path reads the same numbers.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// GWP values, grid factors and estimation constants
///
/// # Examples
///
/// ```
/// use ghg_calc::ReferenceTables;
///
/// let tables = ReferenceTables::default();
/// assert_eq!(tables.gwp("SF6"), Some(23500.0));
/// assert_eq!(tables.grid_factor("DE"), Some(0.000310));
/// assert_eq!(tables.infer_region("Hsinchu Science Park, Taiwan"), Some("TW".to_string()));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferenceTables {
    /// Region used when a facility has none or an unknown one
    #[serde(default = "default_region")]
    pub default_region: String,

    /// Natural gas combustion factor in t CO2e per therm
    #[serde(default = "default_natural_gas_factor")]
    pub natural_gas_t_per_therm: f64,

    /// Global warming potentials (IPCC AR5, 100-year)
    #[serde(default = "default_gwp")]
    pub gwp: BTreeMap<String, f64>,

    /// Location-based grid factors by region code, in t CO2e per kWh
    #[serde(default = "default_grid_factors")]
    pub grid_factors: BTreeMap<String, f64>,

    /// Country names per region code, used only for legacy address matching
    #[serde(default = "default_region_aliases")]
    pub region_aliases: BTreeMap<String, Vec<String>>,
}

fn default_region() -> String {
    "US".to_string()
}

fn default_natural_gas_factor() -> f64 {
    0.0053
}

fn default_gwp() -> BTreeMap<String, f64> {
    [
        ("CO2", 1.0),
        ("CH4", 28.0),
        ("N2O", 265.0),
        ("NF3", 16100.0),
        ("SF6", 23500.0),
        ("CF4", 6630.0),
        ("CHF3", 12400.0),
        ("C2F6", 11100.0),
        ("C4F8", 8600.0),
        ("HFC-134a", 1430.0),
        ("R-410A", 2088.0),
        ("R-404A", 3922.0),
        ("R-22", 1810.0),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v))
    .collect()
}

fn default_grid_factors() -> BTreeMap<String, f64> {
    [
        ("US", 0.000389),
        ("DE", 0.000310),
        ("TW", 0.000502),
        ("KR", 0.000405),
        ("CN", 0.000555),
        ("SG", 0.000392),
        ("JP", 0.000463),
        ("IE", 0.000285),
        ("MY", 0.000658),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v))
    .collect()
}

fn default_region_aliases() -> BTreeMap<String, Vec<String>> {
    [
        ("US", &["USA", "United States", "U.S."][..]),
        ("DE", &["Germany", "Deutschland"][..]),
        ("TW", &["Taiwan"][..]),
        ("KR", &["South Korea", "Korea"][..]),
        ("CN", &["China"][..]),
        ("SG", &["Singapore"][..]),
        ("JP", &["Japan"][..]),
        ("IE", &["Ireland"][..]),
        ("MY", &["Malaysia"][..]),
    ]
    .into_iter()
    .map(|(k, names)| (k.to_string(), names.iter().map(|n| n.to_string()).collect()))
    .collect()
}

impl Default for ReferenceTables {
    fn default() -> Self {
        Self {
            default_region: default_region(),
            natural_gas_t_per_therm: default_natural_gas_factor(),
            gwp: default_gwp(),
            grid_factors: default_grid_factors(),
            region_aliases: default_region_aliases(),
        }
    }
}

impl ReferenceTables {
    /// GWP for a gas, matched case-insensitively
    pub fn gwp(&self, gas: &str) -> Option<f64> {
        let gas = gas.trim();
        self.gwp
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(gas))
            .map(|(_, &v)| v)
    }

    /// Canonical code for a known region, matched case-insensitively
    pub fn region_code(&self, region: &str) -> Option<&str> {
        let region = region.trim();
        self.grid_factors
            .keys()
            .find(|code| code.eq_ignore_ascii_case(region))
            .map(String::as_str)
    }

    /// Grid factor (t CO2e/kWh) for a region code
    pub fn grid_factor(&self, region: &str) -> Option<f64> {
        self.region_code(region)
            .and_then(|code| self.grid_factors.get(code).copied())
    }

    /// Grid factor for the default region
    pub fn default_grid_factor(&self) -> f64 {
        self.grid_factor(&self.default_region).unwrap_or(0.0)
    }

    /// Match a free-text address against the country aliases
    ///
    /// Longer aliases are tried first so "South Korea" wins over "Korea".
    pub fn infer_region(&self, address: &str) -> Option<String> {
        let haystack = address.to_lowercase();
        let mut candidates: Vec<(&String, &String)> = self
            .region_aliases
            .iter()
            .flat_map(|(code, names)| names.iter().map(move |n| (code, n)))
            .collect();
        candidates.sort_by_key(|(_, name)| std::cmp::Reverse(name.len()));

        candidates
            .into_iter()
            .find(|(_, name)| haystack.contains(&name.to_lowercase()))
            .map(|(code, _)| code.clone())
    }

    /// Validate the tables
    pub fn validate(&self) -> Result<(), String> {
        if !self.grid_factors.contains_key(&self.default_region) {
            return Err(format!(
                "default_region '{}' has no grid factor",
                self.default_region
            ));
        }
        if !(self.natural_gas_t_per_therm.is_finite() && self.natural_gas_t_per_therm > 0.0) {
            return Err("natural_gas_t_per_therm must be positive".to_string());
        }
        if let Some((gas, v)) = self.gwp.iter().find(|(_, v)| !(v.is_finite() && **v > 0.0)) {
            return Err(format!("GWP for {} must be positive, got {}", gas, v));
        }
        if let Some((region, v)) = self
            .grid_factors
            .iter()
            .find(|(_, v)| !(v.is_finite() && **v >= 0.0))
        {
            return Err(format!("grid factor for {} must be non-negative, got {}", region, v));
        }
        Ok(())
    }

    /// Load tables from TOML; omitted sections keep their defaults
    pub fn from_toml(toml_str: &str) -> Result<Self, String> {
        let tables: Self =
            toml::from_str(toml_str).map_err(|e| format!("Failed to parse TOML: {}", e))?;
        tables.validate()?;
        Ok(tables)
    }

    /// Serialize tables to TOML
    pub fn to_toml(&self) -> Result<String, String> {
        toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize to TOML: {}", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_tables_are_valid() {
        assert!(ReferenceTables::default().validate().is_ok());
    }

    #[test]
    fn test_gwp_case_insensitive() {
        let t = ReferenceTables::default();
        assert_eq!(t.gwp("nf3"), Some(16100.0));
        assert_eq!(t.gwp("hfc-134A"), Some(1430.0));
        assert_eq!(t.gwp("unobtainium"), None);
    }

    #[test]
    fn test_grid_factor_lookup() {
        let t = ReferenceTables::default();
        assert_eq!(t.grid_factor("my"), Some(0.000658));
        assert_eq!(t.grid_factor("XX"), None);
        assert_eq!(t.default_grid_factor(), 0.000389);
        assert_eq!(t.region_code("sg"), Some("SG"));
    }

    #[test]
    fn test_infer_region() {
        let t = ReferenceTables::default();
        assert_eq!(t.infer_region("1 Dresden Str, Germany").as_deref(), Some("DE"));
        assert_eq!(t.infer_region("Pyeongtaek, South Korea").as_deref(), Some("KR"));
        assert_eq!(t.infer_region("Austin, TX, USA").as_deref(), Some("US"));
        assert_eq!(t.infer_region("Somewhere"), None);
    }

    #[test]
    fn test_toml_partial_override() {
        let t = ReferenceTables::from_toml(
            r#"
            default_region = "DE"

            [grid_factors]
            DE = 0.0004
            US = 0.0004
            "#,
        )
        .unwrap();
        assert_eq!(t.default_grid_factor(), 0.0004);
        assert_eq!(t.gwp("SF6"), Some(23500.0));
    }

    #[test]
    fn test_toml_rejects_unknown_default_region() {
        assert!(ReferenceTables::from_toml("default_region = \"XX\"").is_err());
    }

    #[test]
    fn test_toml_round_trip() {
        let t = ReferenceTables::default();
        let parsed = ReferenceTables::from_toml(&t.to_toml().unwrap()).unwrap();
        assert_eq!(t, parsed);
    }
}
