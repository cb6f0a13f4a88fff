//! The deliverable form of a digest

use ngxdigest_core::SEPARATOR_WIDTH;
use serde::Serialize;

/// A digest addressed to operators of one server
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DigestMessage {
    pub server: String,
    /// Day covered by the digest, as shown to readers
    pub date: String,
    /// Concatenated project reports
    pub body: String,
}

impl DigestMessage {
    pub fn new(server: impl Into<String>, date: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            server: server.into(),
            date: date.into(),
            body: body.into(),
        }
    }

    pub fn subject(&self) -> String {
        format!("[{}] Error logs for {}", self.server, self.date)
    }

    /// Body with a heading naming the server and day
    pub fn full_text(&self) -> String {
        format!(
            "\nError logs {} for {}\n{}\n\n{}",
            self.server,
            self.date,
            "-".repeat(SEPARATOR_WIDTH),
            self.body
        )
    }
}
