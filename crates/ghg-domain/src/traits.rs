//! Trait definitions for external collaborators
//!
//! These traits define the boundaries between the calculation core and the
//! services that feed it. Implementations live in other crates.

use crate::{BaselinePrediction, CompanyProfile, EmissionFactor, Scope};
use chrono::NaiveDate;

/// Trait for resolving the authoritative emission factor
///
/// Implemented by `ghg-calc::FactorTable`. Lookups are infallible: a missing
/// factor is a data gap, not an error.
pub trait FactorLookup {
    /// Find the factor for (scope, category, region, date)
    fn lookup(
        &self,
        scope: Scope,
        category: &str,
        region: &str,
        date: NaiveDate,
    ) -> Option<EmissionFactor>;
}

impl<T: FactorLookup + ?Sized> FactorLookup for &T {
    fn lookup(
        &self,
        scope: Scope,
        category: &str,
        region: &str,
        date: NaiveDate,
    ) -> Option<EmissionFactor> {
        (**self).lookup(scope, category, region, date)
    }
}

impl<T: FactorLookup + ?Sized> FactorLookup for Box<T> {
    fn lookup(
        &self,
        scope: Scope,
        category: &str,
        region: &str,
        date: NaiveDate,
    ) -> Option<EmissionFactor> {
        (**self).lookup(scope, category, region, date)
    }
}

/// Trait for statistical baseline estimation
///
/// Implemented by `ghg-baseline::RegressionEstimator`
pub trait BaselineEstimator {
    /// Error type for prediction
    type Error: std::fmt::Display;

    /// Predict annual emissions for a company profile
    fn predict(&self, profile: &CompanyProfile) -> Result<BaselinePrediction, Self::Error>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Interval;

    struct Fixed(EmissionFactor);

    impl FactorLookup for Fixed {
        fn lookup(&self, scope: Scope, category: &str, _: &str, date: NaiveDate) -> Option<EmissionFactor> {
            (self.0.scope == scope && self.0.category == category && self.0.is_valid_on(date))
                .then(|| self.0.clone())
        }
    }

    struct Flat;

    impl BaselineEstimator for Flat {
        type Error = String;

        fn predict(&self, _: &CompanyProfile) -> Result<BaselinePrediction, String> {
            Ok(BaselinePrediction {
                total: 100.0,
                scope_1: 10.0,
                scope_2: 40.0,
                scope_3: 50.0,
                interval: Interval::new(80.0, 120.0),
                uncertainty_pct: 40.0,
                method: "flat".into(),
            })
        }
    }

    #[test]
    fn test_lookup_through_box_and_ref() {
        let d = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let table: Box<dyn FactorLookup> = Box::new(Fixed(EmissionFactor::new(
            Scope::One,
            "diesel",
            2.68,
            "kg_co2e_per_liter",
            d,
        )));
        assert!(table.lookup(Scope::One, "diesel", "US", d).is_some());
        assert!((&table).lookup(Scope::Two, "diesel", "US", d).is_none());
    }

    #[test]
    fn test_estimator_trait_object_free_use() {
        let p = Flat.predict(&CompanyProfile::default()).unwrap();
        assert_eq!(p.scope_1 + p.scope_2 + p.scope_3, p.total);
    }
}
