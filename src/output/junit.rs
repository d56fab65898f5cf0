//! JUnit XML output for CI test report viewers
//!
//! Each dependency becomes one `<testcase>`; outdated packages and failed
//! lookups carry a `<failure>`, skipped packages a `<skipped>`.

use crate::domain::{CheckOutcome, CheckReport, CheckStatus, FailureReason};
use crate::output::OutputFormatter;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

/// Test suite name used in the report
const SUITE_NAME: &str = "lockfresh";

/// JUnit XML formatter
#[derive(Debug, Default)]
pub struct JunitFormatter;

impl JunitFormatter {
    /// Create a new JUnit formatter
    pub fn new() -> Self {
        Self
    }

    /// Test class shared by all cases, derived from the lockfile name
    fn classname(report: &CheckReport) -> String {
        let lockfile = report
            .lockfile
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| report.lockfile.display().to_string());
        format!("{}.{}", SUITE_NAME, lockfile)
    }

    fn write_testcase<W: Write>(
        xml: &mut Writer<W>,
        classname: &str,
        outcome: &CheckOutcome,
    ) -> io::Result<()> {
        let testcase = BytesStart::new("testcase").with_attributes([
            ("classname", classname),
            ("name", outcome.name.as_str()),
        ]);

        let (child, kind) = match &outcome.status {
            CheckStatus::Passed => return emit(xml, Event::Empty(testcase)),
            CheckStatus::Failed {
                failure: FailureReason::Outdated,
            } => ("failure", "outdated"),
            CheckStatus::Failed {
                failure: FailureReason::LookupFailed(_),
            } => ("failure", "lookup_failed"),
            CheckStatus::Skipped { .. } => ("skipped", "skipped"),
        };

        let message = outcome.message();
        emit(xml, Event::Start(testcase))?;
        if child == "failure" {
            let element =
                BytesStart::new(child).with_attributes([("message", message.as_str()), ("type", kind)]);
            emit(xml, Event::Start(element))?;
            emit(xml, Event::Text(BytesText::new(&message)))?;
            emit(xml, Event::End(BytesEnd::new(child)))?;
        } else {
            let element = BytesStart::new(child).with_attributes([("message", message.as_str())]);
            emit(xml, Event::Empty(element))?;
        }
        emit(xml, Event::End(BytesEnd::new("testcase")))
    }

    fn write_report<W: Write>(&self, report: &CheckReport, inner: W) -> io::Result<()> {
        let mut xml = Writer::new_with_indent(inner, b' ', 2);
        let tests = report.total().to_string();
        let failures = report.failed_count().to_string();
        let skipped = report.skipped_count().to_string();
        let timestamp = report.checked_at.format("%Y-%m-%dT%H:%M:%S").to_string();

        emit(&mut xml, Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;

        let suites = BytesStart::new("testsuites").with_attributes([
            ("name", SUITE_NAME),
            ("tests", tests.as_str()),
            ("failures", failures.as_str()),
            ("errors", "0"),
            ("skipped", skipped.as_str()),
        ]);
        emit(&mut xml, Event::Start(suites))?;

        let suite = BytesStart::new("testsuite").with_attributes([
            ("name", SUITE_NAME),
            ("tests", tests.as_str()),
            ("failures", failures.as_str()),
            ("errors", "0"),
            ("skipped", skipped.as_str()),
            ("timestamp", timestamp.as_str()),
        ]);
        if report.outcomes.is_empty() {
            emit(&mut xml, Event::Empty(suite))?;
        } else {
            emit(&mut xml, Event::Start(suite))?;
            let classname = Self::classname(report);
            for outcome in &report.outcomes {
                Self::write_testcase(&mut xml, &classname, outcome)?;
            }
            emit(&mut xml, Event::End(BytesEnd::new("testsuite")))?;
        }

        emit(&mut xml, Event::End(BytesEnd::new("testsuites")))?;

        let mut inner = xml.into_inner();
        writeln!(inner)?;
        inner.flush()
    }
}

impl OutputFormatter for JunitFormatter {
    fn format(&self, report: &CheckReport, writer: &mut dyn Write) -> io::Result<()> {
        self.write_report(report, writer)
    }
}

/// Write the JUnit XML report to a file, replacing any existing one
pub fn write_junit_file(report: &CheckReport, path: &Path) -> io::Result<()> {
    let file = File::create(path)?;
    JunitFormatter::new().write_report(report, BufWriter::new(file))
}

fn emit<W: Write>(xml: &mut Writer<W>, event: Event<'_>) -> io::Result<()> {
    xml.write_event(event).map_err(io::Error::other)
}
