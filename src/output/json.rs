//! JSON output formatter for machine processing
//!
//! This module provides:
//! - JSON serialization of the check report
//! - A summary block plus one entry per dependency in lockfile order

use crate::domain::{CheckOutcome, CheckReport};
use crate::output::OutputFormatter;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::io::Write;

/// JSON formatter for machine-readable output
#[derive(Debug, Default)]
pub struct JsonFormatter;

impl JsonFormatter {
    /// Create a new JSON formatter
    pub fn new() -> Self {
        Self
    }
}

/// JSON representation of the full report
#[derive(Serialize)]
struct JsonOutput<'a> {
    /// Lockfile that was checked
    lockfile: String,
    /// Registry that was queried
    registry: &'a str,
    /// When the check started
    checked_at: DateTime<Utc>,
    /// Whether every check passed or was skipped
    success: bool,
    /// Summary statistics
    summary: JsonSummary,
    /// Per-dependency outcomes
    outcomes: Vec<JsonOutcome<'a>>,
}

/// JSON representation of summary statistics
#[derive(Serialize)]
struct JsonSummary {
    total: usize,
    passed: usize,
    failed: usize,
    skipped: usize,
}

/// JSON representation of one outcome with its rendered message
#[derive(Serialize)]
struct JsonOutcome<'a> {
    #[serde(flatten)]
    outcome: &'a CheckOutcome,
    message: String,
}

impl JsonFormatter {
    fn report_to_json<'a>(&self, report: &'a CheckReport) -> JsonOutput<'a> {
        JsonOutput {
            lockfile: report.lockfile.display().to_string(),
            registry: &report.registry,
            checked_at: report.checked_at,
            success: report.is_success(),
            summary: JsonSummary {
                total: report.total(),
                passed: report.passed_count(),
                failed: report.failed_count(),
                skipped: report.skipped_count(),
            },
            outcomes: report
                .outcomes
                .iter()
                .map(|outcome| JsonOutcome {
                    outcome,
                    message: outcome.message(),
                })
                .collect(),
        }
    }
}

impl OutputFormatter for JsonFormatter {
    fn format(&self, report: &CheckReport, writer: &mut dyn Write) -> std::io::Result<()> {
        let output = self.report_to_json(report);
        serde_json::to_writer_pretty(&mut *writer, &output).map_err(std::io::Error::other)?;
        writeln!(writer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{DependencySpec, SkipReason};

    fn create_test_report() -> CheckReport {
        let mut report = CheckReport::new("poetry.lock", "https://pypi.org/pypi");
        report.add_outcome(CheckOutcome::passed(
            &DependencySpec::new("click", "8.1.3"),
            "8.1.3",
        ));
        report.add_outcome(CheckOutcome::outdated(
            &DependencySpec::new("requests", "2.28.0"),
            "2.31.0",
        ));
        report.add_outcome(CheckOutcome::skipped(
            &DependencySpec::new("black", "23.1.0"),
            None,
            SkipReason::Ignored,
        ));
        report
    }

    fn render(report: &CheckReport) -> serde_json::Value {
        let mut output = Vec::new();
        JsonFormatter::new().format(report, &mut output).unwrap();
        serde_json::from_slice(&output).unwrap()
    }

    #[test]
    fn test_format_json() {
        let parsed = render(&create_test_report());

        assert_eq!(parsed["lockfile"], "poetry.lock");
        assert_eq!(parsed["registry"], "https://pypi.org/pypi");
        assert_eq!(parsed["success"], false);
        assert_eq!(parsed["summary"]["total"], 3);
        assert_eq!(parsed["summary"]["passed"], 1);
        assert_eq!(parsed["summary"]["failed"], 1);
        assert_eq!(parsed["summary"]["skipped"], 1);
    }

    #[test]
    fn test_format_json_outcomes_in_order() {
        let parsed = render(&create_test_report());
        let outcomes = parsed["outcomes"].as_array().unwrap();

        assert_eq!(outcomes.len(), 3);
        assert_eq!(outcomes[0]["name"], "click");
        assert_eq!(outcomes[0]["status"], "passed");
        assert_eq!(outcomes[1]["name"], "requests");
        assert_eq!(outcomes[1]["status"], "failed");
        assert_eq!(outcomes[1]["pinned_version"], "2.28.0");
        assert_eq!(outcomes[1]["latest_version"], "2.31.0");
        assert_eq!(
            outcomes[1]["message"],
            "requests is not up to date, 2.28.0 < 2.31.0"
        );
        assert_eq!(outcomes[2]["status"], "skipped");
        assert_eq!(outcomes[2]["skip"]["reason"], "ignored");
        assert!(outcomes[2]["latest_version"].is_null());
    }

    #[test]
    fn test_format_json_empty_report() {
        let report = CheckReport::new("uv.lock", "https://pypi.org/pypi");
        let parsed = render(&report);

        assert_eq!(parsed["success"], true);
        assert_eq!(parsed["summary"]["total"], 0);
        assert!(parsed["outcomes"].as_array().unwrap().is_empty());
    }
}
