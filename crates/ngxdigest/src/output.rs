//! Console output formatting

use colored::Colorize;
use ngxdigest_logs::{Digest, ScanOutcome, SkipReason};
use serde::Serialize;
use std::sync::atomic::{AtomicBool, Ordering};
use tabled::{
    settings::{object::Columns, Alignment, Modify, Style},
    Table, Tabled,
};

/// Global flag for JSON output mode
static JSON_MODE: AtomicBool = AtomicBool::new(false);

/// Enable or disable JSON output mode
pub fn set_json_mode(enabled: bool) {
    JSON_MODE.store(enabled, Ordering::SeqCst);
}

/// Check if JSON output mode is enabled
pub fn is_json_mode() -> bool {
    JSON_MODE.load(Ordering::SeqCst)
}

pub fn print_banner() {
    println!();
    println!("{}", " |=============================================|".yellow());
    println!("{}", " | Daily nginx error digest                    |".yellow());
    println!("{}", " |=============================================|".yellow());
}

#[derive(Tabled)]
pub struct SummaryRow {
    #[tabled(rename = "project")]
    pub project: String,
    #[tabled(rename = "source")]
    pub source: String,
    #[tabled(rename = "total")]
    pub total: u64,
    #[tabled(rename = "distinct")]
    pub distinct: usize,
    #[tabled(rename = "status")]
    pub status: String,
}

impl From<&ScanOutcome> for SummaryRow {
    fn from(outcome: &ScanOutcome) -> Self {
        let status = match &outcome.skipped {
            None => "reported".green().to_string(),
            Some(SkipReason::NoMatches) => "clean".cyan().to_string(),
            Some(reason) => reason.to_string().red().to_string(),
        };

        SummaryRow {
            project: outcome.project.clone(),
            source: outcome
                .source
                .as_ref()
                .and_then(|p| p.file_name())
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| "-".to_string()),
            total: outcome.report.total_count,
            distinct: outcome.report.distinct_count(),
            status,
        }
    }
}

pub fn print_summary_table(outcomes: &[ScanOutcome]) {
    let rows: Vec<SummaryRow> = outcomes.iter().map(SummaryRow::from).collect();

    let table = Table::new(rows)
        .with(Style::rounded())
        .with(Modify::new(Columns::new(2..4)).with(Alignment::right()))
        .to_string();

    println!("{}", table);
}

/// `[Error] [project                     ]  : reason`, on stderr
pub fn print_skipped(project: &str, reason: &SkipReason) {
    if is_json_mode() {
        return;
    }
    eprintln!(
        "{} {} : {}",
        "[Error]".red(),
        format!("{:<30}", format!("[{}]", project)).green(),
        reason
    );
}

/// JSON representation of a digest run
#[derive(Serialize)]
pub struct DigestJson<'a> {
    pub server: &'a str,
    pub date: &'a str,
    pub total_count: u64,
    pub projects: &'a [ScanOutcome],
    pub text: &'a str,
}

pub fn print_digest_json(server: &str, date: &str, digest: &Digest) {
    let json = DigestJson {
        server,
        date,
        total_count: digest.total_count(),
        projects: &digest.outcomes,
        text: &digest.text,
    };
    match serde_json::to_string_pretty(&json) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Error serializing to JSON: {}", e),
    }
}

pub fn print_success(message: &str) {
    if !is_json_mode() {
        println!("{} {}", "✓".green(), message);
    }
}

pub fn print_info(message: &str) {
    if !is_json_mode() {
        println!("{} {}", "ℹ".blue(), message);
    }
}
