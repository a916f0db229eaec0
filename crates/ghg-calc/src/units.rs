//! Unit conversion across energy, volume, mass and distance
//!
//! A conversion is resolved in three steps: the direct table of published
//! constants, the inverse of a direct entry, then the per-category base table
//! (kWh, litre, kg, km). Units from different categories never convert.

use crate::error::CalcError;
use ghg_domain::Assumption;
use std::fmt;
use std::str::FromStr;

/// Physical dimension of a unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnitCategory {
    /// kWh, MWh, GWh, TJ, GJ, MMBtu, therm, BTU
    Energy,
    /// litre, gallon, m³
    Volume,
    /// g, kg, ton, lb
    Mass,
    /// km, mile
    Distance,
}

/// A recognized unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[allow(missing_docs)]
pub enum Unit {
    Kwh,
    Mwh,
    Gwh,
    Tj,
    Gj,
    Mmbtu,
    Therm,
    Btu,
    Liter,
    Gallon,
    CubicMeter,
    Gram,
    Kg,
    Ton,
    Lb,
    Km,
    Mile,
}

impl Unit {
    /// Every recognized unit
    pub const ALL: [Unit; 17] = [
        Unit::Kwh,
        Unit::Mwh,
        Unit::Gwh,
        Unit::Tj,
        Unit::Gj,
        Unit::Mmbtu,
        Unit::Therm,
        Unit::Btu,
        Unit::Liter,
        Unit::Gallon,
        Unit::CubicMeter,
        Unit::Gram,
        Unit::Kg,
        Unit::Ton,
        Unit::Lb,
        Unit::Km,
        Unit::Mile,
    ];

    /// Parse a unit string, case-insensitive, accepting common aliases
    pub fn parse(s: &str) -> Option<Self> {
        let normalized = s
            .trim()
            .trim_end_matches('.')
            .to_lowercase()
            .replace('³', "3")
            .replace([' ', '-'], "_");

        let unit = match normalized.as_str() {
            "kwh" | "kilowatt_hour" | "kilowatt_hours" => Unit::Kwh,
            "mwh" | "megawatt_hour" | "megawatt_hours" => Unit::Mwh,
            "gwh" | "gigawatt_hour" | "gigawatt_hours" => Unit::Gwh,
            "tj" | "terajoule" | "terajoules" => Unit::Tj,
            "gj" | "gigajoule" | "gigajoules" => Unit::Gj,
            "mmbtu" | "mm_btu" | "million_btu" => Unit::Mmbtu,
            "therm" | "therms" | "thm" => Unit::Therm,
            "btu" | "btus" => Unit::Btu,
            "l" | "ltr" | "liter" | "liters" | "litre" | "litres" => Unit::Liter,
            "gal" | "gallon" | "gallons" => Unit::Gallon,
            "m3" | "cubic_meter" | "cubic_meters" | "cubic_metre" | "cubic_metres" => {
                Unit::CubicMeter
            }
            "g" | "gram" | "grams" => Unit::Gram,
            "kg" | "kgs" | "kilogram" | "kilograms" => Unit::Kg,
            "t" | "ton" | "tons" | "tonne" | "tonnes" | "metric_ton" | "metric_tons" => Unit::Ton,
            "lb" | "lbs" | "pound" | "pounds" => Unit::Lb,
            "km" | "kms" | "kilometer" | "kilometers" | "kilometre" | "kilometres" => Unit::Km,
            "mi" | "mile" | "miles" => Unit::Mile,
            _ => return None,
        };
        Some(unit)
    }

    /// Dimension of this unit
    pub fn category(&self) -> UnitCategory {
        match self {
            Unit::Kwh
            | Unit::Mwh
            | Unit::Gwh
            | Unit::Tj
            | Unit::Gj
            | Unit::Mmbtu
            | Unit::Therm
            | Unit::Btu => UnitCategory::Energy,
            Unit::Liter | Unit::Gallon | Unit::CubicMeter => UnitCategory::Volume,
            Unit::Gram | Unit::Kg | Unit::Ton | Unit::Lb => UnitCategory::Mass,
            Unit::Km | Unit::Mile => UnitCategory::Distance,
        }
    }

    /// Canonical symbol
    pub fn symbol(&self) -> &'static str {
        match self {
            Unit::Kwh => "kWh",
            Unit::Mwh => "MWh",
            Unit::Gwh => "GWh",
            Unit::Tj => "TJ",
            Unit::Gj => "GJ",
            Unit::Mmbtu => "MMBtu",
            Unit::Therm => "therm",
            Unit::Btu => "BTU",
            Unit::Liter => "L",
            Unit::Gallon => "gal",
            Unit::CubicMeter => "m³",
            Unit::Gram => "g",
            Unit::Kg => "kg",
            Unit::Ton => "t",
            Unit::Lb => "lb",
            Unit::Km => "km",
            Unit::Mile => "mi",
        }
    }

    /// Size of one unit in the category base (kWh, litre, kg, km)
    fn base_factor(&self) -> f64 {
        match self {
            Unit::Kwh => 1.0,
            Unit::Mwh => 1_000.0,
            Unit::Gwh => 1_000_000.0,
            Unit::Tj => 1.0 / 3.6e-6,
            Unit::Gj => 1.0 / 0.0036,
            Unit::Mmbtu => 293.071,
            Unit::Therm => 29.3071,
            Unit::Btu => 0.000293071,
            Unit::Liter => 1.0,
            Unit::Gallon => 3.78541,
            Unit::CubicMeter => 1_000.0,
            Unit::Gram => 0.001,
            Unit::Kg => 1.0,
            Unit::Ton => 1_000.0,
            Unit::Lb => 0.453592,
            Unit::Km => 1.0,
            Unit::Mile => 1.60934,
        }
    }
}

impl FromStr for Unit {
    type Err = CalcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Unit::parse(s).ok_or_else(|| CalcError::unit_conversion(s, "<known unit>"))
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Published conversion constants, from → to
const DIRECT: &[(Unit, Unit, f64)] = &[
    (Unit::Kwh, Unit::Mwh, 0.001),
    (Unit::Kwh, Unit::Gwh, 1e-6),
    (Unit::Kwh, Unit::Tj, 3.6e-6),
    (Unit::Btu, Unit::Kwh, 0.000293071),
    (Unit::Liter, Unit::Gallon, 0.264172),
    (Unit::Gallon, Unit::Liter, 3.78541),
    (Unit::CubicMeter, Unit::Liter, 1_000.0),
    (Unit::Kg, Unit::Ton, 0.001),
    (Unit::Lb, Unit::Kg, 0.453592),
    (Unit::Km, Unit::Mile, 0.621371),
    (Unit::Mile, Unit::Km, 1.60934),
];

/// How a conversion factor was resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConversionPath {
    /// Same unit
    Identity,
    /// Entry in the direct table
    Direct,
    /// Inverse of a direct entry
    Inverse,
    /// Ratio of category base factors
    Category,
}

/// A value collapsed to kg CO2e, tagged when the magnitude was assumed
#[derive(Debug, Clone, PartialEq)]
pub struct Conversion {
    /// Converted value
    pub value: f64,
    /// Set when the unit was not recognized and a default was taken
    pub assumption: Option<Assumption>,
}

impl Conversion {
    /// Whether a default was taken
    pub fn is_assumed(&self) -> bool {
        self.assumption.is_some()
    }
}

/// A factor unit split into its magnitude and per-unit parts
///
/// `kg_co2e_per_kwh` → magnitude `kg_co2e`, per `kwh`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FactorUnit {
    /// Mass part (e.g. "kg_co2e")
    pub magnitude: String,
    /// Activity unit the factor applies to
    pub per: Option<String>,
}

impl FactorUnit {
    /// Split on `_per_`, ` per ` or `/`
    pub fn parse(unit: &str) -> Self {
        let lowered = unit.trim().to_lowercase();
        for sep in ["_per_", " per ", "/"] {
            if let Some((magnitude, per)) = lowered.split_once(sep) {
                return Self {
                    magnitude: magnitude.trim().to_string(),
                    per: Some(per.trim().to_string()).filter(|p| !p.is_empty()),
                };
            }
        }
        Self {
            magnitude: lowered,
            per: None,
        }
    }
}

/// Stateless unit converter
#[derive(Debug, Clone, Copy, Default)]
pub struct UnitConverter;

impl UnitConverter {
    /// Create a converter
    pub fn new() -> Self {
        Self
    }

    /// Resolve the multiplier from one unit to another
    pub fn factor(&self, from: Unit, to: Unit) -> Option<(f64, ConversionPath)> {
        if from == to {
            return Some((1.0, ConversionPath::Identity));
        }
        if let Some(&(_, _, f)) = DIRECT.iter().find(|(a, b, _)| *a == from && *b == to) {
            return Some((f, ConversionPath::Direct));
        }
        if let Some(&(_, _, f)) = DIRECT.iter().find(|(a, b, _)| *a == to && *b == from) {
            return Some((1.0 / f, ConversionPath::Inverse));
        }
        if from.category() == to.category() {
            return Some((from.base_factor() / to.base_factor(), ConversionPath::Category));
        }
        None
    }

    /// Convert `value` from one unit string to another
    ///
    /// Identical unit strings (ignoring case) are a no-op even when the unit is
    /// not recognized.
    pub fn convert(&self, value: f64, from: &str, to: &str) -> Result<f64, CalcError> {
        if from.trim().eq_ignore_ascii_case(to.trim()) {
            return Ok(value);
        }

        let (Some(from_unit), Some(to_unit)) = (Unit::parse(from), Unit::parse(to)) else {
            return Err(CalcError::unit_conversion(from, to));
        };

        self.factor(from_unit, to_unit)
            .map(|(f, _)| value * f)
            .ok_or_else(|| CalcError::unit_conversion(from, to))
    }

    /// Collapse a gas-mass value to kilograms
    ///
    /// The magnitude is read from the leading token (`kg_co2e` → kg,
    /// `t CO2e` → t), then from substrings ("ton", "kg", "lb", a leading "g").
    /// Anything else is taken as kilograms and tagged as an assumption.
    pub fn to_kg_co2e(&self, value: f64, unit: &str) -> Conversion {
        let lowered = unit.trim().to_lowercase();
        let token = lowered
            .split(['_', ' ', '/'])
            .next()
            .unwrap_or_default();

        if let Some(mass) = Unit::parse(token).filter(|u| u.category() == UnitCategory::Mass) {
            return Conversion {
                value: value * mass.base_factor(),
                assumption: None,
            };
        }

        let multiplier = if lowered.contains("ton") {
            Some(1_000.0)
        } else if lowered.contains("kg") {
            Some(1.0)
        } else if lowered.contains("lb") {
            Some(Unit::Lb.base_factor())
        } else if token.starts_with('g') {
            Some(0.001)
        } else {
            None
        };

        match multiplier {
            Some(m) => Conversion {
                value: value * m,
                assumption: None,
            },
            None => Conversion {
                value,
                assumption: Some(Assumption::MassUnit {
                    unit: unit.to_string(),
                }),
            },
        }
    }

    /// Express a factor as kg CO2e per `target` unit
    ///
    /// When the factor's per-unit cannot be converted to `target`, the factor is
    /// used as-is and an [`Assumption::ActivityUnit`] is returned.
    pub fn rebase_factor(&self, value: f64, factor_unit: &str, target: &str) -> (f64, Vec<Assumption>) {
        let parsed = FactorUnit::parse(factor_unit);
        let magnitude = self.to_kg_co2e(value, &parsed.magnitude);
        let mut assumptions: Vec<Assumption> = magnitude.assumption.into_iter().collect();

        let rebased = match parsed.per.as_deref() {
            Some(per) => match self.convert(1.0, target, per) {
                Ok(per_target) => magnitude.value * per_target,
                Err(_) => {
                    assumptions.push(Assumption::ActivityUnit {
                        given: target.to_string(),
                        expected: per.to_string(),
                    });
                    magnitude.value
                }
            },
            None => magnitude.value,
        };

        (rebased, assumptions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() <= 1e-6 * b.abs().max(1.0)
    }

    #[test]
    fn test_parse_aliases() {
        assert_eq!(Unit::parse("kWh"), Some(Unit::Kwh));
        assert_eq!(Unit::parse("MMBTU"), Some(Unit::Mmbtu));
        assert_eq!(Unit::parse("litres"), Some(Unit::Liter));
        assert_eq!(Unit::parse("m³"), Some(Unit::CubicMeter));
        assert_eq!(Unit::parse("cubic meters"), Some(Unit::CubicMeter));
        assert_eq!(Unit::parse("tonnes"), Some(Unit::Ton));
        assert_eq!(Unit::parse("lbs"), Some(Unit::Lb));
        assert_eq!(Unit::parse("mi"), Some(Unit::Mile));
        assert_eq!(Unit::parse("furlong"), None);
    }

    #[test]
    fn test_direct_and_inverse_paths() {
        let c = UnitConverter::new();
        assert_eq!(c.factor(Unit::Kwh, Unit::Mwh), Some((0.001, ConversionPath::Direct)));
        let (f, path) = c.factor(Unit::Mwh, Unit::Kwh).unwrap();
        assert_eq!(path, ConversionPath::Inverse);
        assert!(close(f, 1000.0));
        let (_, path) = c.factor(Unit::Gj, Unit::Mmbtu).unwrap();
        assert_eq!(path, ConversionPath::Category);
    }

    #[test]
    fn test_convert_values() {
        let c = UnitConverter::new();
        assert!(close(c.convert(100.0, "MWh", "kWh").unwrap(), 100_000.0));
        assert!(close(c.convert(1.0, "GJ", "MMBtu").unwrap(), 0.947817));
        assert!(close(c.convert(10.0, "mmbtu", "therms").unwrap(), 100.0));
        assert!(close(c.convert(100.0, "miles", "km").unwrap(), 160.934));
        assert!(close(c.convert(2000.0, "lb", "kg").unwrap(), 907.184));
        assert!(close(c.convert(1.0, "m3", "gallons").unwrap(), 264.172));
    }

    #[test]
    fn test_same_unit_is_noop() {
        let c = UnitConverter::new();
        assert_eq!(c.convert(42.0, "widgets", "WIDGETS").unwrap(), 42.0);
    }

    #[test]
    fn test_cross_category_fails() {
        let c = UnitConverter::new();
        let err = c.convert(1.0, "kWh", "kg").unwrap_err();
        assert!(matches!(err, CalcError::UnitConversion { .. }));
        assert!(c.convert(1.0, "furlong", "km").is_err());
    }

    #[test]
    fn test_to_kg_co2e_magnitudes() {
        let c = UnitConverter::new();
        assert_eq!(c.to_kg_co2e(2.0, "tons_co2e").value, 2000.0);
        assert_eq!(c.to_kg_co2e(2.0, "t CO2e").value, 2000.0);
        assert_eq!(c.to_kg_co2e(2.0, "kg_co2e").value, 2.0);
        assert_eq!(c.to_kg_co2e(2000.0, "g_co2e").value, 2.0);
        assert!(close(c.to_kg_co2e(1.0, "metric_tonnes_co2e").value, 1000.0));
        assert!(!c.to_kg_co2e(1.0, "kilograms").is_assumed());
    }

    #[test]
    fn test_to_kg_co2e_unknown_is_tagged() {
        let c = UnitConverter::new();
        let conv = c.to_kg_co2e(5.0, "co2e");
        assert_eq!(conv.value, 5.0);
        assert_eq!(
            conv.assumption,
            Some(Assumption::MassUnit {
                unit: "co2e".into()
            })
        );
    }

    #[test]
    fn test_factor_unit_parse() {
        let fu = FactorUnit::parse("kg_co2e_per_kwh");
        assert_eq!(fu.magnitude, "kg_co2e");
        assert_eq!(fu.per.as_deref(), Some("kwh"));

        let fu = FactorUnit::parse("kg CO2e/MWh");
        assert_eq!(fu.per.as_deref(), Some("mwh"));

        assert_eq!(FactorUnit::parse("kg_co2e").per, None);
    }

    #[test]
    fn test_rebase_factor() {
        let c = UnitConverter::new();
        let (f, assumptions) = c.rebase_factor(389.0, "kg_co2e_per_mwh", "kwh");
        assert!(close(f, 0.389));
        assert!(assumptions.is_empty());

        let (f, assumptions) = c.rebase_factor(0.000389, "t_co2e_per_kwh", "kwh");
        assert!(close(f, 0.389));
        assert!(assumptions.is_empty());

        let (f, assumptions) = c.rebase_factor(2.0, "kg_co2e_per_widget", "kwh");
        assert_eq!(f, 2.0);
        assert_eq!(assumptions.len(), 1);
    }

    fn same_category_pair() -> impl Strategy<Value = (Unit, Unit)> {
        (0..Unit::ALL.len(), 0..Unit::ALL.len())
            .prop_map(|(a, b)| (Unit::ALL[a], Unit::ALL[b]))
            .prop_filter("same category", |(a, b)| a.category() == b.category())
    }

    proptest! {
        #[test]
        fn prop_round_trip_conversion((a, b) in same_category_pair(), x in 1e-3f64..1e9) {
            let c = UnitConverter::new();
            let there = c.convert(x, a.symbol(), b.symbol()).unwrap();
            let back = c.convert(there, b.symbol(), a.symbol()).unwrap();
            prop_assert!((back - x).abs() <= 1e-5 * x, "{} {} -> {} -> {}", x, a, b, back);
        }
    }
}
