//! Slack incoming-webhook backend

use crate::error::{NotifyError, Result};
use crate::message::DigestMessage;
use crate::Notifier;
use async_trait::async_trait;
use ngxdigest_core::SlackConfig;
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, error, info};

/// Webhook payload
#[derive(Debug, Serialize)]
struct WebhookPayload<'a> {
    text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    channel: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    username: Option<&'a str>,
}

/// Posts the digest to a Slack incoming webhook
pub struct SlackNotifier {
    webhook_url: String,
    channel: Option<String>,
    username: Option<String>,
    client: reqwest::Client,
}

impl SlackNotifier {
    /// Create a new Slack notifier
    pub fn new(webhook_url: String, channel: Option<String>, username: Option<String>) -> Self {
        Self::with_client(webhook_url, channel, username, reqwest::Client::new())
    }

    /// Create with a custom HTTP client (useful for testing)
    pub fn with_client(
        webhook_url: String,
        channel: Option<String>,
        username: Option<String>,
        client: reqwest::Client,
    ) -> Self {
        Self {
            webhook_url,
            channel,
            username,
            client,
        }
    }

    pub fn from_config(config: &SlackConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self::with_client(
            config.webhook_url.clone(),
            config.channel.clone(),
            config.username.clone(),
            client,
        ))
    }

    /// Subject in bold, report in a code block to keep the columns aligned
    fn payload<'a>(&'a self, message: &DigestMessage) -> WebhookPayload<'a> {
        WebhookPayload {
            text: format!("*{}*\n```{}```", message.subject(), message.body),
            channel: self.channel.as_deref(),
            username: self.username.as_deref(),
        }
    }
}

#[async_trait]
impl Notifier for SlackNotifier {
    async fn send(&self, message: &DigestMessage) -> Result<()> {
        if !self.is_configured() {
            return Err(NotifyError::NotConfigured("slack".to_string()));
        }

        debug!("Posting digest to Slack webhook");

        let response = self
            .client
            .post(&self.webhook_url)
            .json(&self.payload(message))
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            info!("Slack notification sent successfully");
            Ok(())
        } else {
            let body = response.text().await.unwrap_or_default();
            let error_msg = if body.is_empty() {
                format!("HTTP {}", status)
            } else {
                format!("HTTP {}: {}", status, body)
            };
            error!("Slack webhook error: {}", error_msg);
            Err(NotifyError::slack(error_msg))
        }
    }

    fn is_configured(&self) -> bool {
        !self.webhook_url.is_empty()
    }

    fn name(&self) -> &'static str {
        "slack"
    }
}
