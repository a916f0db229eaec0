//! Counters collected during a pipeline run

use ghg_domain::Scope;
use std::collections::BTreeMap;

/// Metrics collected during a normalization run
///
/// Tracks unit conversions, estimates per scope and Scope 3 exclusions.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PipelineMetrics {
    /// Facilities processed
    pub facilities: usize,

    /// Unit conversions applied
    pub conversions: usize,

    /// Estimated values per scope
    pub estimated: BTreeMap<Scope, usize>,

    /// Scope values calculated from activity records
    pub calculated: BTreeMap<Scope, usize>,

    /// Activity records that failed to calculate
    pub record_failures: usize,

    /// Facilities scaled to a full year
    pub annualized: usize,

    /// Grid regions inferred from an address
    pub regions_inferred: usize,

    /// Scope 3 categories excluded from the inventory
    pub excluded_categories: usize,
}

impl PipelineMetrics {
    /// Create new empty metrics
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a unit conversion
    pub fn record_conversion(&mut self) {
        self.conversions += 1;
    }

    /// Record an estimated scope value
    pub fn record_estimate(&mut self, scope: Scope) {
        *self.estimated.entry(scope).or_insert(0) += 1;
    }

    /// Record a scope value calculated from activity records
    pub fn record_calculated(&mut self, scope: Scope) {
        *self.calculated.entry(scope).or_insert(0) += 1;
    }

    /// Record failed activity records
    pub fn record_failures(&mut self, count: usize) {
        self.record_failures += count;
    }

    /// Record an annualized facility
    pub fn record_annualization(&mut self) {
        self.annualized += 1;
    }

    /// Record a region inferred from an address
    pub fn record_region_inference(&mut self) {
        self.regions_inferred += 1;
    }

    /// Record an excluded Scope 3 category
    pub fn record_exclusion(&mut self) {
        self.excluded_categories += 1;
    }

    /// Total estimates across scopes
    pub fn total_estimated(&self) -> usize {
        self.estimated.values().sum()
    }

    /// Total calculated values across scopes
    pub fn total_calculated(&self) -> usize {
        self.calculated.values().sum()
    }

    /// Generate a summary report of metrics
    pub fn summary(&self) -> String {
        let mut lines = vec![
            "Normalization Summary".to_string(),
            "=====================".to_string(),
            format!("Facilities: {}", self.facilities),
            format!("Unit conversions: {}", self.conversions),
            format!("Annualized facilities: {}", self.annualized),
            format!("Regions inferred from address: {}", self.regions_inferred),
            String::new(),
        ];

        if !self.estimated.is_empty() {
            lines.push("Estimates by scope:".to_string());
            for (scope, count) in &self.estimated {
                lines.push(format!("  {}: {}", scope, count));
            }
            lines.push(format!("  Total: {}", self.total_estimated()));
            lines.push(String::new());
        }

        if !self.calculated.is_empty() {
            lines.push("Calculated from activities:".to_string());
            for (scope, count) in &self.calculated {
                lines.push(format!("  {}: {}", scope, count));
            }
            lines.push(format!("  Failed records: {}", self.record_failures));
            lines.push(String::new());
        }

        lines.push(format!("Excluded Scope 3 categories: {}", self.excluded_categories));

        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_recording() {
        let mut metrics = PipelineMetrics::new();
        metrics.record_estimate(Scope::One);
        metrics.record_estimate(Scope::One);
        metrics.record_estimate(Scope::Three);
        metrics.record_conversion();

        assert_eq!(metrics.estimated[&Scope::One], 2);
        assert_eq!(metrics.total_estimated(), 3);
        assert_eq!(metrics.conversions, 1);
    }

    #[test]
    fn test_summary() {
        let mut metrics = PipelineMetrics::new();
        metrics.facilities = 2;
        metrics.record_estimate(Scope::Two);
        metrics.record_calculated(Scope::One);
        metrics.record_failures(1);

        let summary = metrics.summary();
        assert!(summary.contains("Facilities: 2"));
        assert!(summary.contains("Scope 2: 1"));
        assert!(summary.contains("Failed records: 1"));
    }
}
