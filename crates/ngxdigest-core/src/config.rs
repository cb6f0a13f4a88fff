//! Configuration file parsing for ngxdigest
//!
//! Supports multiple configuration file formats:
//! - TOML (.toml)
//! - YAML (.yaml, .yml)
//! - JSON (.json)

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::constants::*;
use crate::error::{Error, Result};
use crate::types::validate_project_name;

/// Supported configuration file formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Toml,
    Yaml,
    Json,
}

impl ConfigFormat {
    /// Detect format from file extension
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "toml" => Some(ConfigFormat::Toml),
            "yaml" | "yml" => Some(ConfigFormat::Yaml),
            "json" => Some(ConfigFormat::Json),
            _ => None,
        }
    }

    /// Detect format from file path
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|e| e.to_str())
            .and_then(Self::from_extension)
    }
}

fn default_file_suffix() -> String {
    DEFAULT_FILE_SUFFIX.to_string()
}

fn default_markers() -> Vec<String> {
    DEFAULT_MARKERS.iter().map(|s| s.to_string()).collect()
}

fn default_true() -> bool {
    true
}

fn default_sendmail() -> String {
    DEFAULT_SENDMAIL_PATH.to_string()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_DELIVERY_TIMEOUT_SECS
}

/// How candidate lines are selected and parsed
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatternConfig {
    /// Error markers; a line must contain one of them to be reported
    #[serde(default = "default_markers")]
    pub markers: Vec<String>,
    /// Match markers regardless of case
    #[serde(default = "default_true")]
    pub case_insensitive: bool,
    /// Raw coarse filter regex, replaces the one built from markers
    pub filter: Option<String>,
    /// Raw structured regex, replaces the one built from markers.
    /// Must define the named groups `date`, `time` and `message` and/or `plain`.
    pub parse: Option<String>,
}

impl Default for PatternConfig {
    fn default() -> Self {
        Self {
            markers: default_markers(),
            case_insensitive: true,
            filter: None,
            parse: None,
        }
    }
}

/// Delivery channel identifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Channel {
    Mail,
    Slack,
}

impl std::fmt::Display for Channel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Channel::Mail => write!(f, "mail"),
            Channel::Slack => write!(f, "slack"),
        }
    }
}

/// Local mail submission settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MailConfig {
    pub from: String,
    pub to: Vec<String>,
    /// Path to a sendmail-compatible binary
    #[serde(default = "default_sendmail")]
    pub sendmail: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

/// Slack incoming webhook settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlackConfig {
    pub webhook_url: String,
    pub channel: Option<String>,
    pub username: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

/// Where a non-empty digest is sent
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeliveryConfig {
    /// Channels to deliver to, in order (empty = print only)
    #[serde(default)]
    pub channels: Vec<Channel>,
    pub mail: Option<MailConfig>,
    pub slack: Option<SlackConfig>,
}

/// Configuration file structure (ngxdigest.toml/yaml/json)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DigestConfig {
    /// Directory holding the per-project error logs
    pub logs_dir: PathBuf,
    /// Suffix appended to the project name to form the log file name
    #[serde(default = "default_file_suffix")]
    pub file_suffix: String,
    /// Projects to scan, in report order
    #[serde(default)]
    pub projects: Vec<String>,
    /// Server identifiers accepted on the command line
    #[serde(default)]
    pub servers: Vec<String>,
    /// Sort projects alphabetically before scanning
    #[serde(default)]
    pub sort_projects: bool,
    #[serde(default)]
    pub patterns: PatternConfig,
    #[serde(default)]
    pub delivery: DeliveryConfig,
}

impl DigestConfig {
    /// Minimal config for a logs directory and project list
    pub fn new(logs_dir: impl Into<PathBuf>, projects: Vec<String>) -> Self {
        Self {
            logs_dir: logs_dir.into(),
            file_suffix: default_file_suffix(),
            projects,
            servers: Vec::new(),
            sort_projects: false,
            patterns: PatternConfig::default(),
            delivery: DeliveryConfig::default(),
        }
    }

    /// Load config from file, automatically detecting format from extension.
    /// A relative `logs_dir` is resolved against the config file's directory.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::ConfigNotFound(path.to_path_buf()));
        }

        let format = ConfigFormat::from_path(path).ok_or_else(|| {
            Error::ConfigError(format!(
                "Unsupported config file extension: {}. Expected .toml, .yaml, .yml, or .json",
                path.display()
            ))
        })?;

        let content = std::fs::read_to_string(path)?;
        let mut config = Self::parse(&content, format)?;

        if config.logs_dir.is_relative() {
            if let Some(base_dir) = path.parent() {
                config.logs_dir = base_dir.join(&config.logs_dir);
            }
        }

        Ok(config)
    }

    /// Parse config content with specified format
    pub fn parse(content: &str, format: ConfigFormat) -> Result<Self> {
        let config = match format {
            ConfigFormat::Toml => toml::from_str(content)?,
            ConfigFormat::Yaml => serde_yaml::from_str(content)?,
            ConfigFormat::Json => serde_json::from_str(content)?,
        };
        Ok(config)
    }

    /// Find and load config file from a directory
    pub fn find_and_load(dir: &Path) -> Result<(Self, PathBuf)> {
        for name in CONFIG_FILES {
            let path = dir.join(name);
            if path.exists() {
                let config = Self::load(&path)?;
                return Ok((config, path));
            }
        }
        Err(Error::ConfigError(format!(
            "No config file found in {}. Expected one of: {:?}",
            dir.display(),
            CONFIG_FILES
        )))
    }

    /// Resolve the config to use: an explicit path, then the working
    /// directory, then `~/.ngxdigest/config.toml`
    pub fn discover(explicit: Option<&Path>, cwd: &Path) -> Result<(Self, PathBuf)> {
        if let Some(path) = explicit {
            return Ok((Self::load(path)?, path.to_path_buf()));
        }

        match Self::find_and_load(cwd) {
            Ok(found) => Ok(found),
            Err(Error::ConfigError(_)) => {
                let path = home_config_path();
                Ok((Self::load(&path)?, path))
            }
            Err(e) => Err(e),
        }
    }

    /// Apply environment overrides (secrets kept out of the config file)
    pub fn apply_env_overrides(&mut self) {
        if let Ok(url) = std::env::var(SLACK_WEBHOOK_ENV) {
            if url.is_empty() {
                return;
            }
            match self.delivery.slack.as_mut() {
                Some(slack) => slack.webhook_url = url,
                None => {
                    self.delivery.slack = Some(SlackConfig {
                        webhook_url: url,
                        channel: None,
                        username: None,
                        timeout_secs: default_timeout_secs(),
                    })
                }
            }
        }
    }

    /// Check the config is usable before any file is read
    pub fn validate(&self) -> Result<()> {
        if self.projects.is_empty() {
            return Err(Error::config("No projects configured"));
        }

        let mut seen = HashSet::new();
        for project in &self.projects {
            if !validate_project_name(project) {
                return Err(Error::InvalidProject(format!(
                    "'{}' (only letters, digits, '_', '.' and '-' are allowed)",
                    project
                )));
            }
            if !seen.insert(project.as_str()) {
                return Err(Error::config(format!("Duplicate project: {}", project)));
            }
        }

        let raw_patterns = self.patterns.filter.is_some() && self.patterns.parse.is_some();
        if !raw_patterns && self.patterns.markers.iter().all(|m| m.is_empty()) {
            return Err(Error::config(
                "At least one error marker is required unless both raw patterns are set",
            ));
        }

        for channel in &self.delivery.channels {
            match channel {
                Channel::Mail => {
                    let mail = self.delivery.mail.as_ref().ok_or_else(|| {
                        Error::config("Channel 'mail' is enabled but [delivery.mail] is missing")
                    })?;
                    if mail.to.is_empty() {
                        return Err(Error::config("Mail delivery needs at least one recipient"));
                    }
                }
                Channel::Slack => {
                    let slack = self.delivery.slack.as_ref().ok_or_else(|| {
                        Error::config("Channel 'slack' is enabled but [delivery.slack] is missing")
                    })?;
                    if slack.webhook_url.is_empty() {
                        return Err(Error::config("Slack delivery needs a webhook_url"));
                    }
                }
            }
        }

        Ok(())
    }

    /// Whether a server name given on the command line is known
    pub fn is_valid_server(&self, name: &str) -> bool {
        !name.is_empty() && self.servers.iter().any(|s| s == name)
    }

    /// Projects in the order they are scanned and reported
    pub fn project_order(&self) -> Vec<String> {
        let mut projects = self.projects.clone();
        if self.sort_projects {
            projects.sort();
        }
        projects
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::{NamedTempFile, TempDir};

    const TOML_CONFIG: &str = r#"
logs_dir = "/var/log/nginx"
projects = ["shop", "blog"]
servers = ["web1", "web2"]

[patterns]
markers = ["Fatal error", "timed out"]

[delivery]
channels = ["mail"]

[delivery.mail]
from = "digest@example.com"
to = ["dev@example.com"]
"#;

    #[test]
    fn test_config_format_detection() {
        assert_eq!(ConfigFormat::from_extension("toml"), Some(ConfigFormat::Toml));
        assert_eq!(ConfigFormat::from_extension("yaml"), Some(ConfigFormat::Yaml));
        assert_eq!(ConfigFormat::from_extension("yml"), Some(ConfigFormat::Yaml));
        assert_eq!(ConfigFormat::from_extension("JSON"), Some(ConfigFormat::Json));
        assert_eq!(ConfigFormat::from_extension("txt"), None);
    }

    #[test]
    fn test_config_parse_toml() {
        let config = DigestConfig::parse(TOML_CONFIG, ConfigFormat::Toml).unwrap();
        assert_eq!(config.logs_dir, PathBuf::from("/var/log/nginx"));
        assert_eq!(config.file_suffix, "-error.log");
        assert_eq!(config.projects, vec!["shop", "blog"]);
        assert_eq!(config.patterns.markers, vec!["Fatal error", "timed out"]);
        assert!(config.patterns.case_insensitive);
        assert_eq!(config.delivery.channels, vec![Channel::Mail]);

        let mail = config.delivery.mail.as_ref().unwrap();
        assert_eq!(mail.sendmail, DEFAULT_SENDMAIL_PATH);
        assert_eq!(mail.timeout_secs, DEFAULT_DELIVERY_TIMEOUT_SECS);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_parse_yaml() {
        let content = r##"
logs_dir: /srv/logs
file_suffix: .error.log
projects:
  - api
servers:
  - prod
delivery:
  channels: [slack]
  slack:
    webhook_url: https://hooks.slack.com/services/T/B/X
    channel: "#ops"
"##;
        let config = DigestConfig::parse(content, ConfigFormat::Yaml).unwrap();
        assert_eq!(config.file_suffix, ".error.log");
        assert_eq!(config.patterns.markers.len(), DEFAULT_MARKERS.len());
        assert_eq!(
            config.delivery.slack.as_ref().unwrap().channel.as_deref(),
            Some("#ops")
        );
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_parse_json() {
        let content = r#"{"logs_dir": "/srv/logs", "projects": ["api"], "sort_projects": true}"#;
        let config = DigestConfig::parse(content, ConfigFormat::Json).unwrap();
        assert!(config.sort_projects);
        assert!(config.delivery.channels.is_empty());
    }

    #[test]
    fn test_load_resolves_relative_logs_dir() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("ngxdigest.toml");
        std::fs::write(&path, "logs_dir = \"logs\"\nprojects = [\"shop\"]\n").unwrap();

        let config = DigestConfig::load(&path).unwrap();
        assert_eq!(config.logs_dir, dir.path().join("logs"));
    }

    #[test]
    fn test_load_missing_file() {
        let result = DigestConfig::load(Path::new("/nonexistent/ngxdigest.toml"));
        assert!(matches!(result, Err(Error::ConfigNotFound(_))));
    }

    #[test]
    fn test_load_unsupported_extension() {
        let mut file = NamedTempFile::with_suffix(".ini").unwrap();
        file.write_all(b"logs_dir = /tmp").unwrap();
        let result = DigestConfig::load(file.path());
        assert!(matches!(result, Err(Error::ConfigError(_))));
    }

    #[test]
    fn test_find_and_load_priority() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join("ngxdigest.json"),
            r#"{"logs_dir": "/json", "projects": ["a"]}"#,
        )
        .unwrap();
        std::fs::write(
            dir.path().join("ngxdigest.toml"),
            "logs_dir = \"/toml\"\nprojects = [\"a\"]\n",
        )
        .unwrap();

        let (config, path) = DigestConfig::find_and_load(dir.path()).unwrap();
        assert!(path.ends_with("ngxdigest.toml"));
        assert_eq!(config.logs_dir, PathBuf::from("/toml"));
    }

    #[test]
    fn test_find_and_load_none() {
        let dir = TempDir::new().unwrap();
        assert!(DigestConfig::find_and_load(dir.path()).is_err());
    }

    #[test]
    fn test_discover_explicit_path() {
        let mut file = NamedTempFile::with_suffix(".toml").unwrap();
        file.write_all(TOML_CONFIG.as_bytes()).unwrap();
        let cwd = TempDir::new().unwrap();

        let (config, path) = DigestConfig::discover(Some(file.path()), cwd.path()).unwrap();
        assert_eq!(path, file.path());
        assert_eq!(config.servers, vec!["web1", "web2"]);
    }

    #[test]
    fn test_validate_rejects_bad_projects() {
        let config = DigestConfig::new("/logs", vec![]);
        assert!(config.validate().is_err());

        let config = DigestConfig::new("/logs", vec!["../secret".to_string()]);
        assert!(matches!(config.validate(), Err(Error::InvalidProject(_))));

        let config = DigestConfig::new("/logs", vec!["a".to_string(), "a".to_string()]);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_requires_markers_or_raw_patterns() {
        let mut config = DigestConfig::new("/logs", vec!["shop".to_string()]);
        config.patterns.markers.clear();
        assert!(config.validate().is_err());

        config.patterns.filter = Some("Fatal".to_string());
        config.patterns.parse = Some(r"(?P<date>\S+) (?P<time>\S+) (?P<plain>.*)".to_string());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_channel_sections() {
        let mut config = DigestConfig::new("/logs", vec!["shop".to_string()]);
        config.delivery.channels = vec![Channel::Slack];
        assert!(config.validate().is_err());

        config.delivery.slack = Some(SlackConfig {
            webhook_url: "https://hooks.example.com/x".to_string(),
            channel: None,
            username: None,
            timeout_secs: 5,
        });
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_is_valid_server() {
        let config = DigestConfig::parse(TOML_CONFIG, ConfigFormat::Toml).unwrap();
        assert!(config.is_valid_server("web1"));
        assert!(!config.is_valid_server("web3"));
        assert!(!config.is_valid_server(""));
    }

    #[test]
    fn test_project_order() {
        let mut config = DigestConfig::new(
            "/logs",
            vec!["shop".to_string(), "api".to_string(), "blog".to_string()],
        );
        assert_eq!(config.project_order(), vec!["shop", "api", "blog"]);

        config.sort_projects = true;
        assert_eq!(config.project_order(), vec!["api", "blog", "shop"]);
    }
}
