//! Activity records - the raw quantities an emission factor converts

use crate::scope::{Scope, Scope3Category};
use crate::tier::QualityTier;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One reported activity at one facility for one period
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityRecord {
    /// Facility this activity belongs to
    pub facility_id: String,

    /// GHG Protocol scope
    pub scope: Scope,

    /// Free-form category used for routing and factor lookup
    /// (e.g. "stationary_combustion", "electricity", "business_travel")
    pub category: String,

    /// Scope 3 category, only meaningful when `scope` is Scope 3
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope_3_category: Option<Scope3Category>,

    /// First day of the reporting period
    pub period_start: NaiveDate,

    /// Last day of the reporting period (exclusive of `period_start`)
    pub period_end: NaiveDate,

    /// Activity quantity
    pub amount: f64,

    /// Unit of `amount`
    pub unit: String,

    /// Source label (meter, invoice, ERP export, ...)
    #[serde(default)]
    pub source: String,

    /// Data-quality tier of this record
    #[serde(default = "default_tier")]
    pub tier: QualityTier,

    /// Fuel type for combustion records
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fuel_type: Option<String>,

    /// Refrigerant or process gas for fugitive records
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refrigerant: Option<String>,

    /// Transport mode for distance-based records
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<String>,

    /// Grid / factor region code; falls back to the facility region
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
}

fn default_tier() -> QualityTier {
    QualityTier::Tier3
}

impl ActivityRecord {
    /// Create a record with the required fields
    pub fn new(
        facility_id: impl Into<String>,
        scope: Scope,
        category: impl Into<String>,
        period_start: NaiveDate,
        period_end: NaiveDate,
        amount: f64,
        unit: impl Into<String>,
    ) -> Self {
        Self {
            facility_id: facility_id.into(),
            scope,
            category: category.into(),
            scope_3_category: None,
            period_start,
            period_end,
            amount,
            unit: unit.into(),
            source: String::new(),
            tier: default_tier(),
            fuel_type: None,
            refrigerant: None,
            mode: None,
            region: None,
        }
    }

    /// Set the Scope 3 category
    pub fn with_scope_3_category(mut self, category: u8) -> Self {
        self.scope_3_category = Some(Scope3Category(category));
        self
    }

    /// Set the quality tier
    pub fn with_tier(mut self, tier: QualityTier) -> Self {
        self.tier = tier;
        self
    }

    /// Set the source label
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = source.into();
        self
    }

    /// Set the region code
    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    /// Set the fuel type
    pub fn with_fuel_type(mut self, fuel: impl Into<String>) -> Self {
        self.fuel_type = Some(fuel.into());
        self
    }

    /// Set the refrigerant / process gas
    pub fn with_refrigerant(mut self, gas: impl Into<String>) -> Self {
        self.refrigerant = Some(gas.into());
        self
    }

    /// Set the transport mode
    pub fn with_mode(mut self, mode: impl Into<String>) -> Self {
        self.mode = Some(mode.into());
        self
    }

    /// Length of the period in days
    pub fn period_days(&self) -> i64 {
        (self.period_end - self.period_start).num_days()
    }

    /// Check the record invariants
    ///
    /// - the period must end after it starts
    /// - the amount must be a finite number
    /// - a Scope 3 category is only allowed on Scope 3 records and must be 1..=15
    pub fn validate(&self) -> Result<(), String> {
        if self.period_end <= self.period_start {
            return Err(format!(
                "period_end ({}) must be after period_start ({})",
                self.period_end, self.period_start
            ));
        }

        if !self.amount.is_finite() {
            return Err(format!("amount must be finite, got {}", self.amount));
        }

        if let Some(category) = self.scope_3_category {
            if self.scope != Scope::Three {
                return Err(format!(
                    "scope_3_category {} set on a {} record",
                    category.number(),
                    self.scope
                ));
            }
            if !category.is_standard() {
                return Err(format!(
                    "scope_3_category must be in [1, 15], got {}",
                    category.number()
                ));
            }
        }

        Ok(())
    }
}
