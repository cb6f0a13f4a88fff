//! ngxdigest Logs - Error log extraction, deduplication, and digest rendering
//!
//! Data flows strictly downstream, one project at a time:
//! resolver -> filter -> parser -> aggregator -> report -> digest.

mod aggregate;
mod digest;
mod filter;
mod parser;
mod report;
mod resolver;

pub use aggregate::{aggregate, Aggregator};
pub use digest::{Digest, DigestEngine, ScanOutcome, SkipReason};
pub use filter::{CandidateLines, RawLine};
pub use parser::PatternSet;
pub use report::{format_group_line, format_report, title_case};
pub use resolver::LogSource;
