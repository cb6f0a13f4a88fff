//! Coarse and structured patterns for nginx error lines
//!
//! Both regexes are built from the same date token, markers and case flag,
//! so every line the structured pattern accepts also passes the coarse one.

use ngxdigest_core::{Error, ParsedEntry, PatternConfig, ReportDate, Result};
use regex::{Captures, Regex};

/// Date token used when no report date restricts the scan
const ANY_DATE: &str = r"\d{4}/\d{2}/\d{2}";

/// Named groups a raw structured pattern must define
const REQUIRED_GROUPS: &[&str] = &["date", "time"];

/// Compiled filter and parse patterns
#[derive(Debug, Clone)]
pub struct PatternSet {
    filter: Regex,
    parse: Regex,
}

impl PatternSet {
    /// Build from configuration; `date` restricts both patterns to one day
    pub fn from_config(config: &PatternConfig, date: Option<&ReportDate>) -> Result<Self> {
        let date_token = date
            .map(|d| regex::escape(&d.token()))
            .unwrap_or_else(|| ANY_DATE.to_string());
        let flags = if config.case_insensitive { "(?i)" } else { "" };
        let markers = marker_alternation(&config.markers);

        let filter = match &config.filter {
            Some(raw) => Regex::new(raw)?,
            None => Regex::new(&format!(r"{flags}^{date_token} .*{markers}"))?,
        };

        let parse = match &config.parse {
            Some(raw) => {
                let parse = Regex::new(raw)?;
                check_groups(&parse)?;
                parse
            }
            None => Regex::new(&format!(
                concat!(
                    r"{flags}^(?P<date>{date}) (?P<time>\d{{2}}:\d{{2}}:\d{{2}}) .*?",
                    r"(?:(?P<message>{markers}.*?), client: (?P<client>.*?), server: (?P<server>.*?), ",
                    r"request: (?P<request>.*?)(?:, upstream: (?P<upstream>.*?))?, host: (?P<host>.*?)",
                    r"(?:, referrer: .*)?",
                    r"|(?P<plain>{markers}.*))$"
                ),
                flags = flags,
                date = date_token,
                markers = markers,
            ))?,
        };

        Ok(Self { filter, parse })
    }

    /// Coarse pattern used by the candidate filter
    pub fn filter(&self) -> &Regex {
        &self.filter
    }

    /// Extract a structured entry; `None` if the line does not carry a message
    pub fn parse(&self, line: &str) -> Option<ParsedEntry> {
        let caps = self.parse.captures(line)?;

        let message = non_empty(&caps, "message").or_else(|| non_empty(&caps, "plain"))?;

        Some(ParsedEntry {
            date: group(&caps, "date").unwrap_or_default(),
            time: group(&caps, "time").unwrap_or_default(),
            message,
            client: group(&caps, "client"),
            server: group(&caps, "server"),
            request: group(&caps, "request"),
            upstream: group(&caps, "upstream"),
            host: group(&caps, "host"),
        })
    }
}

fn marker_alternation(markers: &[String]) -> String {
    let escaped: Vec<String> = markers
        .iter()
        .filter(|m| !m.is_empty())
        .map(|m| regex::escape(m))
        .collect();
    format!("(?:{})", escaped.join("|"))
}

fn check_groups(parse: &Regex) -> Result<()> {
    let names: Vec<&str> = parse.capture_names().flatten().collect();

    for required in REQUIRED_GROUPS {
        if !names.contains(required) {
            return Err(Error::config(format!(
                "Parse pattern is missing the named group '{}'",
                required
            )));
        }
    }
    if !names.contains(&"message") && !names.contains(&"plain") {
        return Err(Error::config(
            "Parse pattern needs a 'message' or 'plain' named group",
        ));
    }
    Ok(())
}

/// Text of a group that participated in the match
fn group(caps: &Captures<'_>, name: &str) -> Option<String> {
    caps.name(name).map(|m| m.as_str().to_string())
}

fn non_empty(caps: &Captures<'_>, name: &str) -> Option<String> {
    caps.name(name)
        .map(|m| m.as_str())
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}
