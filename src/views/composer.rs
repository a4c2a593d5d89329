//! Message composer — draft state owned by whichever screen shows it.

use tracing::debug;

use crate::backend::MessagingBackend;
use crate::error::MessagingError;
use crate::sms::send_message;

/// Recipient and body being written.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Composer {
    recipient: String,
    body: String,
}

impl Composer {
    pub fn new() -> Self {
        Self::default()
    }

    /// A composer with the recipient already filled in (reply box of a thread).
    pub fn to(recipient: impl Into<String>) -> Self {
        Self {
            recipient: recipient.into(),
            body: String::new(),
        }
    }

    pub fn recipient(&self) -> &str {
        &self.recipient
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn set_recipient(&mut self, recipient: impl Into<String>) {
        self.recipient = recipient.into();
    }

    pub fn set_body(&mut self, body: impl Into<String>) {
        self.body = body.into();
    }

    pub fn clear(&mut self) {
        self.recipient.clear();
        self.body.clear();
    }

    /// Both fields hold something other than whitespace.
    pub fn is_ready(&self) -> bool {
        !self.recipient.trim().is_empty() && !self.body.trim().is_empty()
    }

    /// Send the draft. The body is cleared only once the device accepted it.
    pub async fn send(&mut self, backend: &dyn MessagingBackend) -> Result<(), MessagingError> {
        send_message(backend, &self.recipient, &self.body).await?;
        debug!(to = %self.recipient, "Draft sent, clearing body");
        self.body.clear();
        Ok(())
    }
}
