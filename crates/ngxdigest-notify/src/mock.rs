//! Mock implementations for testing

use crate::error::{NotifyError, Result};
use crate::message::DigestMessage;
use crate::Notifier;
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::Mutex;

/// A mock notifier for testing that records all sent messages
#[derive(Default, Clone)]
pub struct MockNotifier {
    /// Messages that have been sent
    messages: Arc<Mutex<Vec<DigestMessage>>>,
    /// Number of send calls
    call_count: Arc<AtomicUsize>,
    /// Whether to simulate failures
    should_fail: bool,
}

impl MockNotifier {
    /// Create a new mock notifier
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mock notifier that always fails
    pub fn failing() -> Self {
        Self {
            should_fail: true,
            ..Default::default()
        }
    }

    /// Get the number of times send was called
    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }

    /// Get all sent messages
    pub async fn messages(&self) -> Vec<DigestMessage> {
        self.messages.lock().await.clone()
    }

    /// Check if a body containing the given text was sent
    pub async fn was_sent(&self, text: &str) -> bool {
        self.messages.lock().await.iter().any(|m| m.body.contains(text))
    }
}

#[async_trait]
impl Notifier for MockNotifier {
    async fn send(&self, message: &DigestMessage) -> Result<()> {
        self.call_count.fetch_add(1, Ordering::SeqCst);

        if self.should_fail {
            return Err(NotifyError::slack("Mock failure"));
        }

        self.messages.lock().await.push(message.clone());
        Ok(())
    }

    fn is_configured(&self) -> bool {
        true
    }

    fn name(&self) -> &'static str {
        "mock"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_notifier_records_messages() {
        let notifier = MockNotifier::new();
        notifier.send(&DigestMessage::new("web1", "d", "Shop report")).await.unwrap();
        notifier.send(&DigestMessage::new("web1", "d", "Blog report")).await.unwrap();

        assert_eq!(notifier.call_count(), 2);
        assert_eq!(notifier.messages().await.len(), 2);
        assert!(notifier.was_sent("Blog").await);
        assert!(!notifier.was_sent("Api").await);
    }

    #[tokio::test]
    async fn test_mock_notifier_fails_when_configured() {
        let notifier = MockNotifier::failing();
        let result = notifier.send(&DigestMessage::new("s", "d", "b")).await;
        assert!(result.is_err());
        assert_eq!(notifier.call_count(), 1);
        assert!(notifier.messages().await.is_empty());
    }
}
