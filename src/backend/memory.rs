//! In-memory messaging backend — a seeded stand-in for the device SMS store.

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use tracing::{debug, info};

use super::{MessagingBackend, PermissionStatus};
use crate::error::MessagingError;
use crate::sms::SmsMessage;

#[derive(Debug, Default)]
struct Mailboxes {
    inbox: Vec<SmsMessage>,
    sent: Vec<SmsMessage>,
}

/// Failures injected into the next calls of an [`InMemoryBackend`].
#[derive(Debug, Default, Clone)]
struct Faults {
    inbox: Option<String>,
    sent: Option<String>,
    send: Option<String>,
}

/// Messaging backend holding inbox and sent items in memory.
///
/// `send` appends to the sent mailbox without a direction, the way some
/// providers report freshly queued outbound messages.
pub struct InMemoryBackend {
    permission: RwLock<PermissionStatus>,
    mailboxes: RwLock<Mailboxes>,
    faults: RwLock<Faults>,
}

impl InMemoryBackend {
    pub fn new() -> Self {
        Self::with_messages(Vec::new(), Vec::new())
    }

    /// Create a backend seeded with inbox and sent messages.
    pub fn with_messages(inbox: Vec<SmsMessage>, sent: Vec<SmsMessage>) -> Self {
        Self {
            permission: RwLock::new(PermissionStatus::Granted),
            mailboxes: RwLock::new(Mailboxes { inbox, sent }),
            faults: RwLock::new(Faults::default()),
        }
    }

    pub async fn set_permission(&self, status: PermissionStatus) {
        *self.permission.write().await = status;
    }

    /// Deliver a message into the inbox, as if it just arrived.
    pub async fn deliver(&self, message: SmsMessage) {
        self.mailboxes.write().await.inbox.push(message);
    }

    /// Make every inbox fetch fail with `reason` until cleared.
    pub async fn fail_inbox(&self, reason: impl Into<String>) {
        self.faults.write().await.inbox = Some(reason.into());
    }

    /// Make every sent-items fetch fail with `reason` until cleared.
    pub async fn fail_sent(&self, reason: impl Into<String>) {
        self.faults.write().await.sent = Some(reason.into());
    }

    /// Make every send fail with `reason` until cleared.
    pub async fn fail_send(&self, reason: impl Into<String>) {
        self.faults.write().await.send = Some(reason.into());
    }

    pub async fn clear_faults(&self) {
        *self.faults.write().await = Faults::default();
    }

    /// Snapshot of the sent mailbox.
    pub async fn sent_items(&self) -> Vec<SmsMessage> {
        self.mailboxes.read().await.sent.clone()
    }
}

impl Default for InMemoryBackend {
    fn default() -> Self {
        Self::new()
    }
}

fn filtered(messages: &[SmsMessage], filter: Option<&str>) -> Vec<SmsMessage> {
    messages
        .iter()
        .filter(|m| match filter {
            Some(address) => m.address.as_deref() == Some(address),
            None => true,
        })
        .cloned()
        .collect()
}

#[async_trait]
impl MessagingBackend for InMemoryBackend {
    async fn request_permission(&self) -> PermissionStatus {
        *self.permission.read().await
    }

    async fn fetch_inbox(&self, filter: Option<&str>) -> Result<Vec<SmsMessage>, MessagingError> {
        if let Some(reason) = self.faults.read().await.inbox.clone() {
            return Err(MessagingError::Unavailable(reason));
        }
        let messages = filtered(&self.mailboxes.read().await.inbox, filter);
        debug!(count = messages.len(), filter = ?filter, "Inbox query");
        Ok(messages)
    }

    async fn fetch_sent(&self, filter: Option<&str>) -> Result<Vec<SmsMessage>, MessagingError> {
        if let Some(reason) = self.faults.read().await.sent.clone() {
            return Err(MessagingError::Unavailable(reason));
        }
        let messages = filtered(&self.mailboxes.read().await.sent, filter);
        debug!(count = messages.len(), filter = ?filter, "Sent query");
        Ok(messages)
    }

    async fn send(&self, to: &str, body: &str) -> Result<(), MessagingError> {
        if let Some(reason) = self.faults.read().await.send.clone() {
            return Err(MessagingError::Unavailable(reason));
        }
        let message = SmsMessage {
            address: Some(to.to_string()),
            body: Some(body.to_string()),
            date: Some(Utc::now().timestamp_millis()),
            direction: None,
        };
        self.mailboxes.write().await.sent.push(message);
        info!(to = %to, "Message queued for delivery");
        Ok(())
    }
}
