//! ngxdigest Delivery
//!
//! Sends a finished digest through the configured channels:
//! - Mail (local sendmail-compatible MTA)
//! - Slack (incoming webhook)

mod error;
mod mail;
mod message;
#[cfg(test)]
pub mod mock;
mod slack;

pub use error::{NotifyError, Result};
pub use mail::MailNotifier;
pub use message::DigestMessage;
pub use slack::SlackNotifier;

use async_trait::async_trait;
use ngxdigest_core::{Channel, DeliveryConfig};
use tracing::{error, info};

/// Trait for delivery backends
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Deliver a digest
    async fn send(&self, message: &DigestMessage) -> Result<()>;

    /// Check if the notifier is configured and ready
    fn is_configured(&self) -> bool;

    /// Channel name used in logs and console output
    fn name(&self) -> &'static str;
}

/// Sends a digest to every configured channel
pub struct DeliveryManager {
    notifiers: Vec<Box<dyn Notifier>>,
}

impl DeliveryManager {
    pub fn new(notifiers: Vec<Box<dyn Notifier>>) -> Self {
        Self { notifiers }
    }

    /// Build the channels listed in `config.channels`, in order
    pub fn from_config(config: &DeliveryConfig) -> Result<Self> {
        let mut notifiers: Vec<Box<dyn Notifier>> = Vec::new();

        for channel in &config.channels {
            match channel {
                Channel::Mail => {
                    let mail = config
                        .mail
                        .as_ref()
                        .ok_or_else(|| NotifyError::NotConfigured("mail".to_string()))?;
                    notifiers.push(Box::new(MailNotifier::from_config(mail)));
                }
                Channel::Slack => {
                    let slack = config
                        .slack
                        .as_ref()
                        .ok_or_else(|| NotifyError::NotConfigured("slack".to_string()))?;
                    notifiers.push(Box::new(SlackNotifier::from_config(slack)?));
                }
            }
        }

        Ok(Self::new(notifiers))
    }

    /// Check if any delivery channel is configured
    pub fn is_configured(&self) -> bool {
        self.notifiers.iter().any(|n| n.is_configured())
    }

    /// Names of the channels, in delivery order
    pub fn channel_names(&self) -> Vec<&'static str> {
        self.notifiers.iter().map(|n| n.name()).collect()
    }

    /// Send to each channel in turn. A failing channel does not stop the
    /// others; the last error is returned only if every channel failed.
    pub async fn deliver(&self, message: &DigestMessage) -> Result<usize> {
        let mut delivered = 0;
        let mut last_error = None;

        for notifier in &self.notifiers {
            match notifier.send(message).await {
                Ok(()) => {
                    info!("Digest delivered via {}", notifier.name());
                    delivered += 1;
                }
                Err(e) => {
                    error!("Delivery via {} failed: {}", notifier.name(), e);
                    last_error = Some(e);
                }
            }
        }

        match last_error {
            Some(e) if delivered == 0 => Err(e),
            _ => Ok(delivered),
        }
    }
}
