//! JSON fixtures describing a device's SMS store.
//!
//! ```json
//! {
//!   "permission": "granted",
//!   "inbox": [{ "address": "+15550100", "body": "hi", "date": 1700000000000, "type": 1 }],
//!   "sent":  [{ "address": "+15550100", "body": "yo", "date": 1700000060000 }]
//! }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use super::{InMemoryBackend, PermissionStatus};
use crate::error::{ConfigError, Result};
use crate::sms::SmsMessage;

/// Contents of a device fixture file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Fixture {
    #[serde(default)]
    pub permission: PermissionStatus,
    #[serde(default)]
    pub inbox: Vec<SmsMessage>,
    #[serde(default)]
    pub sent: Vec<SmsMessage>,
}

impl Fixture {
    /// Read and parse a fixture file.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path).map_err(ConfigError::Io)?;
        let fixture: Fixture =
            serde_json::from_str(&raw).map_err(|e| ConfigError::ParseError {
                path: path.display().to_string(),
                reason: e.to_string(),
            })?;
        info!(
            path = %path.display(),
            inbox = fixture.inbox.len(),
            sent = fixture.sent.len(),
            "Loaded SMS fixture"
        );
        Ok(fixture)
    }

    /// Build a backend seeded with this fixture.
    pub async fn into_backend(self) -> InMemoryBackend {
        let backend = InMemoryBackend::with_messages(self.inbox, self.sent);
        backend.set_permission(self.permission).await;
        backend
    }
}
