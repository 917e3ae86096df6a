//! Top-level validation entry points.

use crate::report::Report;
use crate::rules::run_rules;
use crate::user_data::{UserDataKind, classify};
use cloud_config_yaml::{Node, parse_bytes};
use thiserror::Error;

/// Validation could not run past parsing.
#[derive(Debug, Error)]
pub enum ValidateError {
    /// The document is not well-formed YAML. The report holds exactly one
    /// Error entry describing the failure.
    #[error("cloud-config could not be parsed: {source}")]
    Parse {
        report: Report,
        #[source]
        source: cloud_config_yaml::Error,
    },
}

impl ValidateError {
    /// The report built before validation stopped.
    pub fn report(&self) -> &Report {
        match self {
            ValidateError::Parse { report, .. } => report,
        }
    }

    pub fn into_report(self) -> Report {
        match self {
            ValidateError::Parse { report, .. } => report,
        }
    }
}

/// Parse a cloud-config document, recording a failure in `report`.
///
/// On failure exactly one Error entry is appended, at the line the parser
/// gave up on, and the parser error is returned.
pub fn parse_cloud_config(
    config: &[u8],
    report: &mut Report,
) -> Result<Node, cloud_config_yaml::Error> {
    parse_bytes(config).inspect_err(|err| {
        tracing::debug!(line = err.line(), %err, "cloud-config does not parse");
        report.error(err.line(), err.to_string());
    })
}

/// Validate a cloud-config document.
///
/// Every rule runs against the parsed tree and the findings come back in
/// rule order. Fails only when the document does not parse.
///
/// # Example
///
/// ```rust
/// use cloud_config_validation::validate;
///
/// let report = validate(b"hostname: node1\nbogus: 1\n").unwrap();
/// assert_eq!(report.entries()[0].to_string(), "line 2: warning: unrecognized key \"bogus\"");
///
/// let err = validate(b"a:\na").unwrap_err();
/// assert_eq!(err.report().entries()[0].line, 2);
/// ```
pub fn validate(config: &[u8]) -> Result<Report, ValidateError> {
    let mut report = Report::new();
    let root = match parse_cloud_config(config, &mut report) {
        Ok(root) => root,
        Err(source) => return Err(ValidateError::Parse { report, source }),
    };
    run_rules(&root, &mut report);
    Ok(report)
}

/// Validate raw user data.
///
/// Scripts, Ignition configs and empty payloads are not cloud-config and
/// produce an empty report. Anything without a recognized header is an
/// error at line 1.
pub fn validate_user_data(data: &[u8]) -> Result<Report, ValidateError> {
    let kind = classify(data);
    tracing::debug!(?kind, "classified user data");
    match kind {
        UserDataKind::CloudConfig => validate(data),
        UserDataKind::Empty | UserDataKind::Script | UserDataKind::Ignition => Ok(Report::new()),
        UserDataKind::Unknown => {
            let mut report = Report::new();
            report.error(1, "must be \"#cloud-config\" or begin with \"#!\"");
            Ok(report)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Entry, Severity};

    fn parse_entries(config: &str) -> Vec<Entry> {
        let mut report = Report::new();
        let _ = parse_cloud_config(config.as_bytes(), &mut report);
        report.entries().to_vec()
    }

    #[test]
    fn test_parse_cloud_config() {
        assert!(parse_entries("").is_empty());
        assert!(parse_entries("\t").is_empty());
        for (config, line) in [("a:\na", 2), ("#hello\na:\na", 3)] {
            let entries = parse_entries(config);
            assert_eq!(entries.len(), 1, "{:?}", config);
            assert_eq!(entries[0].severity, Severity::Error);
            assert_eq!(entries[0].line, line, "{:?}", config);
        }
    }

    #[test]
    fn test_parse_failure_stops_validation() {
        let err = validate(b"bogus: 1\nhostname: [unclosed\n").unwrap_err();
        assert_eq!(err.report().len(), 1);
        assert!(err.report().has_errors());
        assert!(matches!(err, ValidateError::Parse { .. }));
    }

    #[test]
    fn test_validate_runs_rules_in_order() {
        let report = validate(
            b"coreos:\n  etcd:\n    discovery: disco\nbogus: 1\nhostname: bad_host\n",
        )
        .unwrap();
        let kinds: Vec<_> = report.entries().iter().map(|e| (e.severity, e.line)).collect();
        assert_eq!(
            kinds,
            vec![
                (Severity::Warning, 3),
                (Severity::Warning, 4),
                (Severity::Error, 5),
            ]
        );
    }

    #[test]
    fn test_user_data_headers() {
        assert!(validate_user_data(b"").unwrap().is_empty());
        assert!(validate_user_data(b"#!/bin/sh\nexit 1\n").unwrap().is_empty());
        assert!(validate_user_data(br#"{"ignition": {"version": "2.0.0"}}"#)
            .unwrap()
            .is_empty());
        assert!(validate_user_data(b"#cloud-config\nhostname: a\n").unwrap().is_empty());

        let report = validate_user_data(b"hostname: a\n").unwrap();
        assert_eq!(
            report.entries(),
            [Entry::new(
                Severity::Error,
                "must be \"#cloud-config\" or begin with \"#!\"",
                1
            )]
        );
    }

    #[test]
    fn test_user_data_keeps_document_lines() {
        let report = validate_user_data(b"#cloud-config\nhostname: a\nbogus: 1\n").unwrap();
        assert_eq!(report.entries()[0].line, 3);
    }
}
