//! Error types for digest delivery

/// Delivery error type
#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Slack webhook error: {0}")]
    SlackError(String),

    #[error("Mail delivery failed: {0}")]
    MailError(String),

    #[error("Delivery timed out after {0}s")]
    Timeout(u64),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Notifier not configured: {0}")]
    NotConfigured(String),
}

/// Result type alias for delivery operations
pub type Result<T> = std::result::Result<T, NotifyError>;

impl NotifyError {
    pub fn slack<S: Into<String>>(msg: S) -> Self {
        NotifyError::SlackError(msg.into())
    }

    pub fn mail<S: Into<String>>(msg: S) -> Self {
        NotifyError::MailError(msg.into())
    }
}
