//! Text output formatter for human-readable display
//!
//! This module provides:
//! - One PASSED / FAILED / SKIPPED line per dependency, with colors
//! - Semantic version change type indication (major/minor/patch/ahead) for outdated packages
//! - A failures section repeating the full message of each failed check
//! - A one-line summary with counts

use crate::domain::{CheckOutcome, CheckReport, CheckStatus, FailureReason, SkipReason};
use crate::output::{OutputFormatter, Verbosity};
use colored::Colorize;
use std::io::Write;

/// Semantic version change type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VersionChangeType {
    /// Major version change (breaking)
    Major,
    /// Minor version change (features)
    Minor,
    /// Patch version change (fixes)
    Patch,
    /// Locked version is newer than the latest release
    Ahead,
    /// Unknown or unparseable
    Unknown,
}

impl VersionChangeType {
    /// Determine the change type between two versions
    pub fn from_versions(old: &str, new: &str) -> Self {
        let parse = |v: &str| -> Option<(u64, u64, u64)> {
            let v = v.strip_prefix('v').unwrap_or(v);
            // Split by . and - to handle prerelease suffixes
            let parts: Vec<&str> = v.split(['.', '-']).collect();
            if parts.len() >= 3 {
                Some((
                    parts[0].parse().ok()?,
                    parts[1].parse().ok()?,
                    parts[2].parse().unwrap_or(0),
                ))
            } else if parts.len() == 2 {
                Some((parts[0].parse().ok()?, parts[1].parse().ok()?, 0))
            } else {
                Some((parts[0].parse().ok()?, 0, 0))
            }
        };

        match (parse(old), parse(new)) {
            (Some(old), Some(new)) if old > new => VersionChangeType::Ahead,
            (Some((old_major, old_minor, _)), Some((new_major, new_minor, _))) => {
                if new_major != old_major {
                    VersionChangeType::Major
                } else if new_minor != old_minor {
                    VersionChangeType::Minor
                } else {
                    VersionChangeType::Patch
                }
            }
            _ => VersionChangeType::Unknown,
        }
    }

    /// Get the display label with color
    pub fn colored_label(&self) -> String {
        match self {
            VersionChangeType::Major => "major".red().bold().to_string(),
            VersionChangeType::Minor => "minor".yellow().to_string(),
            VersionChangeType::Patch => "patch".green().to_string(),
            VersionChangeType::Ahead => "ahead".cyan().to_string(),
            VersionChangeType::Unknown => "?".dimmed().to_string(),
        }
    }

    /// Get the plain label
    pub fn label(&self) -> &'static str {
        match self {
            VersionChangeType::Major => "major",
            VersionChangeType::Minor => "minor",
            VersionChangeType::Patch => "patch",
            VersionChangeType::Ahead => "ahead",
            VersionChangeType::Unknown => "?",
        }
    }
}

/// Text formatter for human-readable output
pub struct TextFormatter {
    /// Verbosity level
    verbosity: Verbosity,
    /// Whether to use colors
    color: bool,
}

impl TextFormatter {
    /// Create a new text formatter
    pub fn new(verbosity: Verbosity) -> Self {
        Self {
            verbosity,
            color: true,
        }
    }

    /// Create a new text formatter with color option
    pub fn with_color(verbosity: Verbosity, color: bool) -> Self {
        Self { verbosity, color }
    }

    /// Short skip reason shown after a SKIPPED line
    fn format_skip_reason(&self, outcome: &CheckOutcome, reason: &SkipReason) -> String {
        match (reason, outcome.latest_version.as_deref()) {
            (SkipReason::Frozen(constraint), Some(latest)) => {
                format!("frozen by {}, {} available", constraint, latest)
            }
            (SkipReason::Frozen(constraint), None) => format!("frozen by {}", constraint),
            (SkipReason::Ignored, _) => "ignored".to_string(),
            (SkipReason::NotSelected, _) => "not in --only".to_string(),
            (SkipReason::NotOnRegistry, _) => "not on registry".to_string(),
        }
    }

    /// Calculate the maximum package name length for alignment
    fn max_name_length(&self, report: &CheckReport) -> usize {
        report
            .outcomes
            .iter()
            .map(|o| o.name.len())
            .max()
            .unwrap_or(0)
    }

    /// Format a single outcome line
    fn format_outcome_line(
        &self,
        outcome: &CheckOutcome,
        max_name_len: usize,
        writer: &mut dyn Write,
    ) -> std::io::Result<()> {
        let name = format!("{:width$}", outcome.name, width = max_name_len);
        let pinned = &outcome.pinned_version;

        match &outcome.status {
            CheckStatus::Passed => {
                if self.color {
                    writeln!(writer, "{}  {} {}", "PASSED ".green(), name, pinned.dimmed())
                } else {
                    writeln!(writer, "PASSED   {} {}", name, pinned)
                }
            }
            CheckStatus::Failed {
                failure: FailureReason::Outdated,
            } => {
                let latest = outcome.latest_version.as_deref().unwrap_or("?");
                let change_type = VersionChangeType::from_versions(pinned, latest);
                if self.color {
                    writeln!(
                        writer,
                        "{}  {} {} {} {} [{}]",
                        "FAILED ".red().bold(),
                        name.bold(),
                        pinned.dimmed(),
                        "→".dimmed(),
                        latest.bright_white().bold(),
                        change_type.colored_label()
                    )
                } else {
                    writeln!(
                        writer,
                        "FAILED   {} {} -> {} [{}]",
                        name,
                        pinned,
                        latest,
                        change_type.label()
                    )
                }
            }
            CheckStatus::Failed {
                failure: FailureReason::LookupFailed(_),
            } => {
                if self.color {
                    writeln!(
                        writer,
                        "{}  {} {} {}",
                        "FAILED ".red().bold(),
                        name.bold(),
                        pinned.dimmed(),
                        "(lookup failed)".red()
                    )
                } else {
                    writeln!(writer, "FAILED   {} {} (lookup failed)", name, pinned)
                }
            }
            CheckStatus::Skipped { skip } => {
                let reason = self.format_skip_reason(outcome, skip);
                if self.color {
                    writeln!(
                        writer,
                        "{}  {} {} {}",
                        "SKIPPED".yellow(),
                        name.dimmed(),
                        pinned.dimmed(),
                        format!("({})", reason).dimmed()
                    )
                } else {
                    writeln!(writer, "SKIPPED  {} {} ({})", name, pinned, reason)
                }
            }
        }
    }

    /// Format a titled section listing full outcome messages
    fn format_messages<'a>(
        &self,
        title: &str,
        outcomes: impl Iterator<Item = &'a CheckOutcome>,
        writer: &mut dyn Write,
    ) -> std::io::Result<()> {
        let messages: Vec<String> = outcomes.map(|o| o.message()).collect();
        if messages.is_empty() {
            return Ok(());
        }

        if self.color {
            writeln!(writer, "{}:", title.bold())?;
        } else {
            writeln!(writer, "{}:", title)?;
        }
        for message in messages {
            writeln!(writer, "  {}", message)?;
        }
        writeln!(writer)
    }

    /// Count outdated packages by change type
    ///
    /// Locked versions ahead of the registry count as `other`.
    fn count_by_change_type(&self, report: &CheckReport) -> (usize, usize, usize, usize) {
        let mut major = 0;
        let mut minor = 0;
        let mut patch = 0;
        let mut unknown = 0;

        for outcome in report.failures() {
            if let (
                CheckStatus::Failed {
                    failure: FailureReason::Outdated,
                },
                Some(latest),
            ) = (&outcome.status, &outcome.latest_version)
            {
                match VersionChangeType::from_versions(&outcome.pinned_version, latest) {
                    VersionChangeType::Major => major += 1,
                    VersionChangeType::Minor => minor += 1,
                    VersionChangeType::Patch => patch += 1,
                    VersionChangeType::Ahead | VersionChangeType::Unknown => unknown += 1,
                }
            }
        }

        (major, minor, patch, unknown)
    }

    /// Format the summary line, e.g. `1 failed, 2 passed, 1 skipped`
    fn format_summary(&self, report: &CheckReport, writer: &mut dyn Write) -> std::io::Result<()> {
        if report.total() == 0 {
            if self.color {
                return writeln!(writer, "{}", "No dependencies to check".dimmed());
            }
            return writeln!(writer, "No dependencies to check");
        }

        let failed = report.failed_count();
        let passed = report.passed_count();
        let skipped = report.skipped_count();

        let mut parts = Vec::new();
        if failed > 0 {
            let part = format!("{} failed", failed);
            parts.push(if self.color {
                part.red().bold().to_string()
            } else {
                part
            });
        }
        if passed > 0 {
            let part = format!("{} passed", passed);
            parts.push(if self.color {
                part.green().to_string()
            } else {
                part
            });
        }
        if skipped > 0 {
            let part = format!("{} skipped", skipped);
            parts.push(if self.color {
                part.yellow().to_string()
            } else {
                part
            });
        }
        write!(writer, "{}", parts.join(", "))?;

        // Verbose: break outdated packages down by change type
        if self.verbosity == Verbosity::Verbose {
            let (major, minor, patch, unknown) = self.count_by_change_type(report);
            let breakdown: Vec<String> = [
                (major, "major"),
                (minor, "minor"),
                (patch, "patch"),
                (unknown, "other"),
            ]
            .iter()
            .filter(|(count, _)| *count > 0)
            .map(|(count, label)| format!("{} {}", count, label))
            .collect();
            if !breakdown.is_empty() {
                write!(writer, " (outdated: {})", breakdown.join(", "))?;
            }
        }

        writeln!(writer)
    }
}

impl OutputFormatter for TextFormatter {
    fn format(&self, report: &CheckReport, writer: &mut dyn Write) -> std::io::Result<()> {
        // In quiet mode, only show failures and the summary
        if self.verbosity == Verbosity::Quiet {
            self.format_messages("Failures", report.failures(), writer)?;
            return self.format_summary(report, writer);
        }

        if self.verbosity == Verbosity::Verbose {
            let header = format!(
                "{} against {}",
                report.lockfile.display(),
                report.registry
            );
            if self.color {
                writeln!(writer, "{}", header.bold())?;
            } else {
                writeln!(writer, "{}", header)?;
            }
        }

        let max_name_len = self.max_name_length(report).max(20);
        for outcome in &report.outcomes {
            self.format_outcome_line(outcome, max_name_len, writer)?;
        }
        if !report.outcomes.is_empty() {
            writeln!(writer)?;
        }

        self.format_messages("Failures", report.failures(), writer)?;
        if self.verbosity == Verbosity::Verbose {
            self.format_messages("Skipped", report.skips(), writer)?;
        }

        self.format_summary(report, writer)
    }
}
