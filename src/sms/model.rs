//! SMS data model — messages as the device reports them, and derived summaries.

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// Device SMS provider value for a received message.
pub const MESSAGE_TYPE_RECEIVED: i32 = 1;

/// Device SMS provider value for a sent message.
pub const MESSAGE_TYPE_SENT: i32 = 2;

/// Whether a message was received or sent by the local device.
///
/// Serialized as the provider's integer `type` column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "i32", into = "i32")]
pub enum MessageDirection {
    Received,
    Sent,
}

impl TryFrom<i32> for MessageDirection {
    type Error = String;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        match value {
            MESSAGE_TYPE_RECEIVED => Ok(Self::Received),
            MESSAGE_TYPE_SENT => Ok(Self::Sent),
            other => Err(format!("unknown message type {other}")),
        }
    }
}

impl From<MessageDirection> for i32 {
    fn from(direction: MessageDirection) -> Self {
        match direction {
            MessageDirection::Received => MESSAGE_TYPE_RECEIVED,
            MessageDirection::Sent => MESSAGE_TYPE_SENT,
        }
    }
}

/// A single SMS as fetched from the device.
///
/// Every field is optional because providers leave columns empty; only
/// `direction` is ever rewritten after the fetch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SmsMessage {
    /// Phone number or sender identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,

    /// Message body.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,

    /// Timestamp (milliseconds since epoch).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<i64>,

    /// Message type (1 = received, 2 = sent).
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub direction: Option<MessageDirection>,
}

impl SmsMessage {
    /// An inbound message from `address`.
    pub fn received(address: impl Into<String>, body: impl Into<String>, date: i64) -> Self {
        Self {
            address: Some(address.into()),
            body: Some(body.into()),
            date: Some(date),
            direction: Some(MessageDirection::Received),
        }
    }

    /// An outbound message to `address`.
    pub fn sent(address: impl Into<String>, body: impl Into<String>, date: i64) -> Self {
        Self {
            address: Some(address.into()),
            body: Some(body.into()),
            date: Some(date),
            direction: Some(MessageDirection::Sent),
        }
    }

    /// Address, treating an empty string as absent.
    pub fn address(&self) -> Option<&str> {
        self.address.as_deref().filter(|a| !a.is_empty())
    }

    pub fn is_sent(&self) -> bool {
        self.direction == Some(MessageDirection::Sent)
    }

    /// The message timestamp as a UTC datetime, if present and in range.
    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        self.date
            .and_then(|ms| Utc.timestamp_millis_opt(ms).single())
    }

    /// First `max_chars` characters of the body, for list display.
    pub fn preview(&self, max_chars: usize) -> String {
        preview_text(self.body.as_deref(), max_chars)
    }
}

/// Latest message of one address, as shown in the conversation list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationSummary {
    pub address: String,
    pub latest_body: Option<String>,
    /// Timestamp of the latest message (ms since epoch).
    pub latest_timestamp: Option<i64>,
}

impl ConversationSummary {
    pub fn latest_at(&self) -> Option<DateTime<Utc>> {
        self.latest_timestamp
            .and_then(|ms| Utc.timestamp_millis_opt(ms).single())
    }

    pub fn preview(&self, max_chars: usize) -> String {
        preview_text(self.latest_body.as_deref(), max_chars)
    }
}

fn preview_text(body: Option<&str>, max_chars: usize) -> String {
    let body = body.unwrap_or_default();
    let mut preview: String = body.chars().take(max_chars).collect();
    if body.chars().count() > max_chars {
        preview.push('…');
    }
    preview
}
