//! Conversation list screen state.

use std::sync::Arc;

use tracing::warn;

use crate::backend::MessagingBackend;
use crate::error::MessagingError;
use crate::sms::{ConversationSummary, load_conversations};

/// Summaries shown on the conversation list, rebuilt on every refresh.
pub struct ConversationList {
    backend: Arc<dyn MessagingBackend>,
    conversations: Vec<ConversationSummary>,
    last_error: Option<MessagingError>,
}

impl ConversationList {
    pub fn new(backend: Arc<dyn MessagingBackend>) -> Self {
        Self {
            backend,
            conversations: Vec::new(),
            last_error: None,
        }
    }

    /// Reload from the device. On failure the previous list is dropped.
    pub async fn refresh(&mut self) -> Result<&[ConversationSummary], MessagingError> {
        match load_conversations(self.backend.as_ref()).await {
            Ok(conversations) => {
                self.conversations = conversations;
                self.last_error = None;
                Ok(&self.conversations)
            }
            Err(e) => {
                warn!(error = %e, "Conversation list refresh failed");
                self.conversations.clear();
                self.last_error = Some(e.clone());
                Err(e)
            }
        }
    }

    pub fn conversations(&self) -> &[ConversationSummary] {
        &self.conversations
    }

    pub fn last_error(&self) -> Option<&MessagingError> {
        self.last_error.as_ref()
    }
}
