//! Audit trail for one pipeline run
//!
//! Every entry goes to the persisted [`NormalizationLog`] and is mirrored as a
//! tracing event at the matching level.

use crate::metrics::PipelineMetrics;
use ghg_domain::{NormalizationLog, Severity};
use tracing::{error, info, warn};

/// Log and counters accumulated while a dataset is normalized
#[derive(Debug, Clone, Default)]
pub struct AuditTrail {
    /// Append-only audit log
    pub log: NormalizationLog,
    /// Run counters
    pub metrics: PipelineMetrics,
}

impl AuditTrail {
    /// Empty trail
    pub fn new() -> Self {
        Self::default()
    }

    /// Routine step
    pub fn info(&mut self, action: &str, detail: impl Into<String>) {
        let detail = detail.into();
        info!(action, "{}", detail);
        self.log.record(action, detail, Severity::Info);
    }

    /// Estimate, assumption or exclusion
    pub fn warn(&mut self, action: &str, detail: impl Into<String>) {
        let detail = detail.into();
        warn!(action, "{}", detail);
        self.log.record(action, detail, Severity::Warning);
    }

    /// Record that could not be processed
    pub fn error(&mut self, action: &str, detail: impl Into<String>) {
        let detail = detail.into();
        error!(action, "{}", detail);
        self.log.record(action, detail, Severity::Error);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entries_keep_order_and_severity() {
        let mut audit = AuditTrail::new();
        audit.info("unit_conversion", "A: 1 MWh -> 1000 kWh");
        audit.warn("estimate_scope_1", "A: 5.3 t");
        audit.error("activity_failed", "A: record 0");

        let entries = audit.log.entries();
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].severity, Severity::Info);
        assert_eq!(entries[1].action, "estimate_scope_1");
        assert_eq!(audit.log.count(Severity::Error), 1);
    }
}
