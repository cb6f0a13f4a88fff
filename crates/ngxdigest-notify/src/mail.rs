//! Mail delivery through a local sendmail-compatible MTA

use crate::error::{NotifyError, Result};
use crate::message::DigestMessage;
use crate::Notifier;
use async_trait::async_trait;
use base64::Engine;
use ngxdigest_core::MailConfig;
use std::process::Stdio;
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tokio::time::timeout;
use tracing::{debug, error, info};

/// Longest line allowed in a message, excluding the line ending (RFC 5322)
const MAX_LINE_OCTETS: usize = 998;

/// Line width of a base64 body (RFC 2045)
const BASE64_LINE_WIDTH: usize = 76;

/// Hands the digest to `sendmail -t -i`
pub struct MailNotifier {
    from: String,
    to: Vec<String>,
    sendmail: String,
    timeout_secs: u64,
}

impl MailNotifier {
    pub fn new(from: String, to: Vec<String>, sendmail: String, timeout_secs: u64) -> Self {
        Self {
            from,
            to,
            sendmail,
            timeout_secs,
        }
    }

    pub fn from_config(config: &MailConfig) -> Self {
        Self::new(
            config.from.clone(),
            config.to.clone(),
            config.sendmail.clone(),
            config.timeout_secs,
        )
    }

    /// Render the RFC 5322 message piped to sendmail
    fn render(&self, message: &DigestMessage) -> String {
        let (encoding, body) = encode_body(&message.full_text());
        format!(
            "From: {}\nTo: {}\nSubject: {}\nMIME-Version: 1.0\nContent-Type: text/plain; charset=utf-8\nContent-Transfer-Encoding: {}\n\n{}",
            self.from,
            self.to.join(", "),
            message.subject(),
            encoding,
            body
        )
    }

    async fn run_sendmail(&self, payload: String) -> Result<()> {
        let mut child = Command::new(&self.sendmail)
            .arg("-t")
            .arg("-i")
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| NotifyError::mail(format!("cannot run {}: {}", self.sendmail, e)))?;

        // An early exit closes the pipe; the exit status reports why
        if let Some(mut stdin) = child.stdin.take() {
            if let Err(e) = stdin.write_all(payload.as_bytes()).await {
                if e.kind() != std::io::ErrorKind::BrokenPipe {
                    return Err(e.into());
                }
            }
        }

        let output = child.wait_with_output().await?;
        if output.status.success() {
            Ok(())
        } else {
            let stderr = String::from_utf8_lossy(&output.stderr);
            Err(NotifyError::mail(format!(
                "{} exited with {}: {}",
                self.sendmail,
                output.status.code().unwrap_or(-1),
                stderr.trim()
            )))
        }
    }
}

/// Pick a transfer encoding: the text as-is while every line fits,
/// base64 once a single line would exceed the limit
fn encode_body(text: &str) -> (&'static str, String) {
    if text.lines().all(|line| line.len() <= MAX_LINE_OCTETS) {
        return ("8bit", text.to_string());
    }

    let encoded = base64::engine::general_purpose::STANDARD.encode(text.as_bytes());
    let mut wrapped = String::with_capacity(encoded.len() + encoded.len() / BASE64_LINE_WIDTH + 1);
    for chunk in encoded.as_bytes().chunks(BASE64_LINE_WIDTH) {
        wrapped.push_str(&String::from_utf8_lossy(chunk));
        wrapped.push('\n');
    }
    ("base64", wrapped)
}

#[async_trait]
impl Notifier for MailNotifier {
    async fn send(&self, message: &DigestMessage) -> Result<()> {
        if !self.is_configured() {
            return Err(NotifyError::NotConfigured("mail".to_string()));
        }

        debug!("Sending digest mail to {}", self.to.join(", "));

        let payload = self.render(message);
        match timeout(Duration::from_secs(self.timeout_secs), self.run_sendmail(payload)).await {
            Ok(Ok(())) => {
                info!("Digest mail sent to {} recipient(s)", self.to.len());
                Ok(())
            }
            Ok(Err(e)) => {
                error!("Mail delivery failed: {}", e);
                Err(e)
            }
            Err(_) => {
                error!("Mail delivery timed out");
                Err(NotifyError::Timeout(self.timeout_secs))
            }
        }
    }

    fn is_configured(&self) -> bool {
        !self.from.is_empty() && !self.to.is_empty() && !self.sendmail.is_empty()
    }

    fn name(&self) -> &'static str {
        "mail"
    }
}
