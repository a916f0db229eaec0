//! Normalization audit log

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Severity of a log entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    /// Routine step
    Info,
    /// Estimate, assumption or exclusion
    Warning,
    /// A record could not be processed
    Error,
}

impl Severity {
    /// Upper-case label
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Info => "INFO",
            Severity::Warning => "WARNING",
            Severity::Error => "ERROR",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single audit entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizationLogEntry {
    /// When the entry was recorded
    pub timestamp: DateTime<Utc>,

    /// Short action label (e.g. "unit_conversion", "estimate_scope_1")
    pub action: String,

    /// Free-text detail
    pub detail: String,

    /// Severity
    pub severity: Severity,
}

/// Append-only log confined to one pipeline run
///
/// Entries can be read but never changed or removed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NormalizationLog {
    entries: Vec<NormalizationLogEntry>,
}

impl NormalizationLog {
    /// Empty log
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry and return it
    pub fn record(
        &mut self,
        action: impl Into<String>,
        detail: impl Into<String>,
        severity: Severity,
    ) -> &NormalizationLogEntry {
        self.entries.push(NormalizationLogEntry {
            timestamp: Utc::now(),
            action: action.into(),
            detail: detail.into(),
            severity,
        });
        &self.entries[self.entries.len() - 1]
    }

    /// All entries in insertion order
    pub fn entries(&self) -> &[NormalizationLogEntry] {
        &self.entries
    }

    /// Iterate entries
    pub fn iter(&self) -> std::slice::Iter<'_, NormalizationLogEntry> {
        self.entries.iter()
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the log is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of entries at `severity`
    pub fn count(&self, severity: Severity) -> usize {
        self.entries.iter().filter(|e| e.severity == severity).count()
    }

    /// Entries whose action matches `action`
    pub fn with_action<'a>(&'a self, action: &'a str) -> impl Iterator<Item = &'a NormalizationLogEntry> {
        self.entries.iter().filter(move |e| e.action == action)
    }
}

impl<'a> IntoIterator for &'a NormalizationLog {
    type Item = &'a NormalizationLogEntry;
    type IntoIter = std::slice::Iter<'a, NormalizationLogEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_append_and_count() {
        let mut log = NormalizationLog::new();
        log.record("unit_conversion", "fab-1: 100 MWh -> 100000 kWh", Severity::Info);
        log.record("estimate_scope_1", "fab-1: 5.3 t", Severity::Warning);
        log.record("estimate_scope_2", "fab-2: 1.0 t", Severity::Warning);

        assert_eq!(log.len(), 3);
        assert_eq!(log.count(Severity::Warning), 2);
        assert_eq!(log.count(Severity::Error), 0);
        assert_eq!(log.with_action("unit_conversion").count(), 1);
    }

    #[test]
    fn test_entries_keep_order() {
        let mut log = NormalizationLog::new();
        log.record("a", "", Severity::Info);
        log.record("b", "", Severity::Info);
        let actions: Vec<_> = log.iter().map(|e| e.action.as_str()).collect();
        assert_eq!(actions, vec!["a", "b"]);
        assert!(log.entries()[0].timestamp <= log.entries()[1].timestamp);
    }

    #[test]
    fn test_severity_serializes_upper_case() {
        assert_eq!(serde_json::to_string(&Severity::Warning).unwrap(), "\"WARNING\"");
    }
}
