//! Constants and default values for ngxdigest

use std::path::{Path, PathBuf};

/// Default ngxdigest home directory name
pub const NGXDIGEST_DIR: &str = ".ngxdigest";

/// Config file name inside the home directory
pub const HOME_CONFIG_FILE: &str = "config.toml";

/// Default config file names to search for in the working directory (in priority order)
pub const CONFIG_FILES: &[&str] = &[
    "ngxdigest.toml",
    "ngxdigest.yaml",
    "ngxdigest.yml",
    "ngxdigest.json",
];

/// Default suffix appended to a project name to build its log file name
pub const DEFAULT_FILE_SUFFIX: &str = "-error.log";

/// Suffix of the one-generation-back rotated log
pub const ROTATED_SUFFIX: &str = ".1";

/// Error markers searched for when none are configured
pub const DEFAULT_MARKERS: &[&str] = &["Fatal error", "timed out", "No database selected"];

/// Default sendmail-compatible binary used for mail delivery
pub const DEFAULT_SENDMAIL_PATH: &str = "/usr/sbin/sendmail";

/// Default timeout for a single delivery attempt in seconds
pub const DEFAULT_DELIVERY_TIMEOUT_SECS: u64 = 30;

/// Width of the separator rule under each project header
pub const SEPARATOR_WIDTH: usize = 80;

/// Date layout used by nginx error logs and by the report date token
pub const LOG_DATE_FORMAT: &str = "%Y/%m/%d";

/// Environment variable overriding the configured Slack webhook URL
pub const SLACK_WEBHOOK_ENV: &str = "NGXDIGEST_SLACK_WEBHOOK";

/// Get the ngxdigest home directory
pub fn ngxdigest_home() -> PathBuf {
    dirs::home_dir()
        .map(|h| h.join(NGXDIGEST_DIR))
        .unwrap_or_else(|| PathBuf::from(NGXDIGEST_DIR))
}

/// Get the fallback config path in the home directory
pub fn home_config_path() -> PathBuf {
    ngxdigest_home().join(HOME_CONFIG_FILE)
}

/// Get the canonical log file path for a project
pub fn log_path(logs_dir: &Path, project: &str, suffix: &str) -> PathBuf {
    logs_dir.join(format!("{}{}", project, suffix))
}

/// Get the rotated (`.1`) counterpart of a log file path
pub fn rotated_log_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push(ROTATED_SUFFIX);
    PathBuf::from(name)
}
