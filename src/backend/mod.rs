//! Messaging backend abstraction — the device's SMS subsystem.

pub mod fixture;
pub mod memory;

pub use fixture::Fixture;
pub use memory::InMemoryBackend;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::MessagingError;
use crate::sms::SmsMessage;

/// Outcome of an SMS permission request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PermissionStatus {
    #[default]
    Granted,
    Denied,
    /// The user dismissed the prompt without answering.
    Undetermined,
}

impl PermissionStatus {
    /// Only an explicit grant counts; undetermined is a denial.
    pub fn is_granted(self) -> bool {
        self == Self::Granted
    }
}

impl std::str::FromStr for PermissionStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "granted" => Ok(Self::Granted),
            "denied" => Ok(Self::Denied),
            "undetermined" => Ok(Self::Undetermined),
            other => Err(format!(
                "expected granted, denied or undetermined, got '{other}'"
            )),
        }
    }
}

/// The four operations consumed from the device messaging subsystem.
///
/// Implementations report raw failures; the aggregators label them with the
/// mailbox they came from.
#[async_trait]
pub trait MessagingBackend: Send + Sync {
    /// Ask for SMS read/send permission.
    async fn request_permission(&self) -> PermissionStatus;

    /// Received messages, optionally restricted to one address.
    async fn fetch_inbox(&self, filter: Option<&str>) -> Result<Vec<SmsMessage>, MessagingError>;

    /// Sent messages, optionally restricted to one address.
    async fn fetch_sent(&self, filter: Option<&str>) -> Result<Vec<SmsMessage>, MessagingError>;

    /// Send `body` to `to`. Resolves once the device accepted the message.
    async fn send(&self, to: &str, body: &str) -> Result<(), MessagingError>;
}
