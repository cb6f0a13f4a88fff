//! Core types for ngxdigest

use chrono::{Duration, Local, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::constants::LOG_DATE_FORMAT;
use crate::error::{Error, Result};

/// Regex pattern for valid project names: alphanumeric, underscore, dot and hyphen
static PROJECT_NAME_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Z0-9_.-]+$").expect("Invalid project name regex")
});

/// Validate a project name so it cannot escape the logs directory
pub fn validate_project_name(name: &str) -> bool {
    !name.is_empty() && name != "." && name != ".." && PROJECT_NAME_REGEX.is_match(name)
}

/// One structured error line extracted from a log file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedEntry {
    /// Date token as written in the log (YYYY/MM/DD)
    pub date: String,
    /// Time token as written in the log (HH:MM:SS)
    pub time: String,
    /// Error message, the grouping key
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub server: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upstream: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
}

impl ParsedEntry {
    /// Create an entry without proxy context
    pub fn new(date: impl Into<String>, time: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            date: date.into(),
            time: time.into(),
            message: message.into(),
            client: None,
            server: None,
            request: None,
            upstream: None,
            host: None,
        }
    }

    /// Whether the entry carried the nginx upstream context tail
    pub fn has_proxy_context(&self) -> bool {
        self.client.is_some()
            || self.server.is_some()
            || self.request.is_some()
            || self.upstream.is_some()
            || self.host.is_some()
    }

    /// Render an optional context field, absent fields become empty text
    pub fn field_or_empty(field: &Option<String>) -> &str {
        field.as_deref().unwrap_or("")
    }

    /// Upstream context for display, `None` for a bare message
    pub fn context(&self) -> Option<RequestContext> {
        if !self.has_proxy_context() {
            return None;
        }

        Some(RequestContext {
            client: Self::field_or_empty(&self.client).to_string(),
            server: Self::field_or_empty(&self.server).to_string(),
            request: Self::field_or_empty(&self.request).to_string(),
            upstream: Self::field_or_empty(&self.upstream).to_string(),
            host: Self::field_or_empty(&self.host).to_string(),
        })
    }
}

/// The `client: .., server: .., request: .., upstream: .., host: ..` tail
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestContext {
    pub client: String,
    pub server: String,
    pub request: String,
    pub upstream: String,
    pub host: String,
}

/// All occurrences of one distinct message within a project's scan
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorGroup {
    pub message: String,
    pub count: u64,
    pub first_time: String,
    pub last_time: String,
    pub date: String,
    /// Context of the first occurrence that carried one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<RequestContext>,
}

impl ErrorGroup {
    /// Start a group from its first occurrence
    pub fn first_seen(entry: ParsedEntry) -> Self {
        let context = entry.context();
        Self {
            first_time: entry.time.clone(),
            last_time: entry.time,
            message: entry.message,
            count: 1,
            date: entry.date,
            context,
        }
    }

    /// Record a further occurrence; `first_time` never moves
    pub fn record(&mut self, entry: &ParsedEntry) {
        self.count += 1;
        self.last_time = entry.time.clone();
        if self.context.is_none() {
            self.context = entry.context();
        }
    }
}

/// Aggregated errors for one project, groups in first-seen order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectReport {
    pub project: String,
    pub total_count: u64,
    pub groups: Vec<ErrorGroup>,
}

impl ProjectReport {
    pub fn new(project: impl Into<String>, total_count: u64, groups: Vec<ErrorGroup>) -> Self {
        Self {
            project: project.into(),
            total_count,
            groups,
        }
    }

    /// Report for a project that contributed nothing
    pub fn empty(project: impl Into<String>) -> Self {
        Self::new(project, 0, Vec::new())
    }

    /// Number of distinct messages
    pub fn distinct_count(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.total_count == 0
    }
}

/// The day a digest covers, rendered as the `YYYY/MM/DD` token nginx writes
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct ReportDate(NaiveDate);

impl ReportDate {
    pub fn new(date: NaiveDate) -> Self {
        Self(date)
    }

    /// The previous calendar day in local time
    pub fn yesterday() -> Self {
        Self(Local::now().date_naive() - Duration::days(1))
    }

    /// Date token as it appears at the start of a log line
    pub fn token(&self) -> String {
        self.0.format(LOG_DATE_FORMAT).to_string()
    }

    pub fn date(&self) -> NaiveDate {
        self.0
    }
}

impl fmt::Display for ReportDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.token())
    }
}

impl FromStr for ReportDate {
    type Err = Error;

    /// Accepts `YYYY/MM/DD` and `YYYY-MM-DD`
    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        NaiveDate::parse_from_str(s, LOG_DATE_FORMAT)
            .or_else(|_| NaiveDate::parse_from_str(s, "%Y-%m-%d"))
            .map(Self)
            .map_err(|_| Error::invalid_date(format!("'{}' (expected YYYY/MM/DD)", s)))
    }
}
