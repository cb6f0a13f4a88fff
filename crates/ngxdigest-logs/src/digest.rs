//! Per-project scan and server-wide digest assembly

use ngxdigest_core::{DigestConfig, ProjectReport, ReportDate, Result};
use serde::Serialize;
use std::fmt;
use std::path::PathBuf;
use tracing::{debug, info, warn};

use crate::aggregate::Aggregator;
use crate::filter::CandidateLines;
use crate::parser::PatternSet;
use crate::report::format_report;
use crate::resolver::LogSource;

/// Why a project contributed nothing
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", content = "detail", rename_all = "snake_case")]
pub enum SkipReason {
    /// Neither the current nor the rotated log exists with content
    NoSource,
    /// The resolved log could not be opened
    Unreadable(String),
    /// The log was read but no line matched
    NoMatches,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::NoSource => write!(f, "log files not found or empty"),
            SkipReason::Unreadable(e) => write!(f, "log file unreadable: {}", e),
            SkipReason::NoMatches => write!(f, "no matching errors"),
        }
    }
}

/// Result of scanning one project
#[derive(Debug, Clone, Serialize)]
pub struct ScanOutcome {
    pub project: String,
    /// File that was read, if any
    pub source: Option<PathBuf>,
    pub report: ProjectReport,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skipped: Option<SkipReason>,
}

impl ScanOutcome {
    fn skipped(project: &str, source: Option<PathBuf>, reason: SkipReason) -> Self {
        Self {
            project: project.to_string(),
            source,
            report: ProjectReport::empty(project),
            skipped: Some(reason),
        }
    }
}

/// Every project's outcome plus the concatenated text
#[derive(Debug, Clone, Serialize)]
pub struct Digest {
    pub outcomes: Vec<ScanOutcome>,
    pub text: String,
}

impl Digest {
    /// Nothing to deliver
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Total occurrences across all projects
    pub fn total_count(&self) -> u64 {
        self.outcomes.iter().map(|o| o.report.total_count).sum()
    }

    /// Outcomes of projects that contributed nothing
    pub fn skipped(&self) -> impl Iterator<Item = (&str, &SkipReason)> {
        self.outcomes
            .iter()
            .filter_map(|o| o.skipped.as_ref().map(|r| (o.project.as_str(), r)))
    }
}

/// Runs resolver, filter, parser, aggregator and formatter for each project
#[derive(Debug, Clone)]
pub struct DigestEngine {
    source: LogSource,
    patterns: PatternSet,
}

impl DigestEngine {
    pub fn new(source: LogSource, patterns: PatternSet) -> Self {
        Self { source, patterns }
    }

    /// Build from configuration; `date` restricts the scan to one day
    pub fn from_config(config: &DigestConfig, date: Option<&ReportDate>) -> Result<Self> {
        let source = LogSource::new(&config.logs_dir, &config.file_suffix);
        let patterns = PatternSet::from_config(&config.patterns, date)?;
        Ok(Self::new(source, patterns))
    }

    /// Scan one project. Never fails: I/O trouble yields an empty report.
    pub fn scan_project(&self, project: &str) -> ScanOutcome {
        let Some(path) = self.source.resolve(project) else {
            return ScanOutcome::skipped(project, None, SkipReason::NoSource);
        };

        let lines = match CandidateLines::open(&path, self.patterns.filter()) {
            Ok(lines) => lines,
            Err(e) => {
                warn!("{}: cannot open {}: {}", project, path.display(), e);
                return ScanOutcome::skipped(project, Some(path), SkipReason::Unreadable(e.to_string()));
            }
        };

        let mut aggregator = Aggregator::new(project);
        for line in lines {
            match self.patterns.parse(&line.text) {
                Some(entry) => aggregator.push(entry),
                None => debug!(
                    "{}: skipped unparseable line {}:{}",
                    project,
                    line.source.display(),
                    line.line_number
                ),
            }
        }

        let report = aggregator.finish();
        if report.is_empty() {
            return ScanOutcome::skipped(project, Some(path), SkipReason::NoMatches);
        }

        info!(
            "{}: {} errors, {} distinct",
            project,
            report.total_count,
            report.distinct_count()
        );

        ScanOutcome {
            project: project.to_string(),
            source: Some(path),
            report,
            skipped: None,
        }
    }

    /// Scan projects in the given order and join their non-empty reports
    pub fn assemble<S: AsRef<str>>(&self, projects: &[S]) -> Digest {
        let outcomes: Vec<ScanOutcome> = projects
            .iter()
            .map(|p| self.scan_project(p.as_ref()))
            .collect();

        let text = outcomes
            .iter()
            .map(|o| format_report(&o.report))
            .collect::<String>();

        Digest { outcomes, text }
    }
}
