//! Ordered collection of validation findings.

use serde::Serialize;
use std::fmt;

/// How serious a finding is.
///
/// - `Error`: the content will not decode or behave as declared.
/// - `Warning`: structurally or semantically suspicious, may still work.
/// - `Info`: placement or style advice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
    Error,
}

impl Severity {
    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Info => "info",
            Severity::Warning => "warning",
            Severity::Error => "error",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single finding.
///
/// Entries have no identity beyond their fields; two identical entries may
/// both appear in a report.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Entry {
    #[serde(rename = "kind")]
    pub severity: Severity,

    /// Human-readable message, without any line reference
    pub message: String,

    /// Line number (1-based)
    pub line: usize,
}

impl Entry {
    pub fn new(severity: Severity, message: impl Into<String>, line: usize) -> Self {
        Self {
            severity,
            message: message.into(),
            line: line.max(1),
        }
    }
}

impl fmt::Display for Entry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}: {}: {}", self.line, self.severity, self.message)
    }
}

/// Append-only, ordered list of entries for one validation run.
///
/// Insertion order is emission order across every stage that ran.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Report {
    entries: Vec<Entry>,
}

impl Report {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, entry: Entry) {
        tracing::trace!(%entry, "report entry");
        self.entries.push(entry);
    }

    pub fn info(&mut self, line: usize, message: impl Into<String>) {
        self.push(Entry::new(Severity::Info, message, line));
    }

    pub fn warning(&mut self, line: usize, message: impl Into<String>) {
        self.push(Entry::new(Severity::Warning, message, line));
    }

    pub fn error(&mut self, line: usize, message: impl Into<String>) {
        self.push(Entry::new(Severity::Error, message, line));
    }

    /// Read-only view of the entries, in emission order.
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn has_errors(&self) -> bool {
        self.entries.iter().any(|e| e.severity == Severity::Error)
    }

    /// The most serious severity present, if any.
    pub fn max_severity(&self) -> Option<Severity> {
        self.entries.iter().map(|e| e.severity).max()
    }
}

impl<'a> IntoIterator for &'a Report {
    type Item = &'a Entry;
    type IntoIter = std::slice::Iter<'a, Entry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entries_keep_insertion_order() {
        let mut report = Report::new();
        report.error(3, "c");
        report.info(1, "a");
        report.warning(2, "b");
        report.info(1, "a");

        let lines: Vec<usize> = report.entries().iter().map(|e| e.line).collect();
        assert_eq!(lines, vec![3, 1, 2, 1]);
        assert_eq!(report.len(), 4);
        assert_eq!(report.entries()[1], report.entries()[3]);
    }

    #[test]
    fn test_severity_summary() {
        let mut report = Report::new();
        assert!(report.is_empty());
        assert_eq!(report.max_severity(), None);

        report.info(1, "hint");
        assert!(!report.has_errors());
        assert_eq!(report.max_severity(), Some(Severity::Info));

        report.error(2, "broken");
        assert!(report.has_errors());
        assert_eq!(report.max_severity(), Some(Severity::Error));
    }

    #[test]
    fn test_entry_display() {
        let entry = Entry::new(Severity::Warning, "discovery URL is not valid", 3);
        assert_eq!(entry.to_string(), "line 3: warning: discovery URL is not valid");
    }

    #[test]
    fn test_line_is_at_least_one() {
        assert_eq!(Entry::new(Severity::Error, "x", 0).line, 1);
    }

    #[test]
    fn test_json_shape() {
        let mut report = Report::new();
        report.info(2, "write_files doesn't belong under coreos");
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(
            json,
            serde_json::json!([
                {"kind": "info", "message": "write_files doesn't belong under coreos", "line": 2}
            ])
        );
    }
}
