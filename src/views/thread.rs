//! Thread screen state — one address's messages plus its reply box.

use std::sync::Arc;

use tracing::{debug, warn};

use super::composer::Composer;
use crate::backend::MessagingBackend;
use crate::error::MessagingError;
use crate::sms::{SmsMessage, load_thread};

pub struct ThreadView {
    backend: Arc<dyn MessagingBackend>,
    address: String,
    messages: Vec<SmsMessage>,
    composer: Composer,
    last_error: Option<MessagingError>,
}

impl ThreadView {
    pub fn new(backend: Arc<dyn MessagingBackend>, address: impl Into<String>) -> Self {
        let address = address.into();
        Self {
            backend,
            composer: Composer::to(address.clone()),
            address,
            messages: Vec::new(),
            last_error: None,
        }
    }

    /// Open a thread and load it straight away.
    pub async fn open(
        backend: Arc<dyn MessagingBackend>,
        address: impl Into<String>,
    ) -> Result<Self, MessagingError> {
        let mut view = Self::new(backend, address);
        view.refresh().await?;
        Ok(view)
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn messages(&self) -> &[SmsMessage] {
        &self.messages
    }

    pub fn composer(&self) -> &Composer {
        &self.composer
    }

    /// Error of the last reload, cleared by the next successful one.
    pub fn last_error(&self) -> Option<&MessagingError> {
        self.last_error.as_ref()
    }

    /// Reload the thread. On failure the previous messages are dropped.
    pub async fn refresh(&mut self) -> Result<&[SmsMessage], MessagingError> {
        match load_thread(self.backend.as_ref(), &self.address).await {
            Ok(messages) => {
                self.messages = messages;
                self.last_error = None;
                Ok(&self.messages)
            }
            Err(e) => {
                warn!(address = %self.address, error = %e, "Thread refresh failed");
                self.messages.clear();
                self.last_error = Some(e.clone());
                Err(e)
            }
        }
    }

    /// Send the reply box contents to this thread's address, then reload.
    ///
    /// Succeeds once the device accepted the message. A failed reload after
    /// that is only recorded in [`ThreadView::last_error`].
    pub async fn send_draft(&mut self) -> Result<(), MessagingError> {
        self.composer.set_recipient(self.address.clone());
        self.composer.send(self.backend.as_ref()).await?;
        if self.refresh().await.is_err() {
            debug!(address = %self.address, "Reply sent, thread reload deferred");
        }
        Ok(())
    }

    /// Shorthand for filling the reply box and sending it.
    pub async fn reply(&mut self, body: impl Into<String>) -> Result<(), MessagingError> {
        self.composer.set_body(body);
        self.send_draft().await
    }
}
