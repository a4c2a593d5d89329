//! Error types for sms-threads.

use std::fmt;

/// Top-level error type.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Messaging error: {0}")]
    Messaging(#[from] MessagingError),
}

/// Configuration and fixture loading errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },

    #[error("Failed to parse fixture {path}: {reason}")]
    ParseError { path: String, reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Which device mailbox a fetch was reading from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mailbox {
    Inbox,
    Sent,
}

impl fmt::Display for Mailbox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Inbox => f.write_str("inbox"),
            Self::Sent => f.write_str("sent"),
        }
    }
}

/// Errors surfaced by the messaging collaborator and the aggregators.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MessagingError {
    /// The SMS permission request was denied or left undetermined.
    #[error("SMS permission denied")]
    PermissionDenied,

    #[error("Failed to fetch {mailbox} messages: {reason}")]
    FetchFailed { mailbox: Mailbox, reason: String },

    #[error("Failed to send message to {to}: {reason}")]
    SendFailed { to: String, reason: String },

    #[error("Recipient address is empty")]
    InvalidRecipient,

    #[error("Message body is empty")]
    EmptyBody,

    /// Raw failure reported by a backend before it is labeled.
    #[error("Messaging backend unavailable: {0}")]
    Unavailable(String),
}

impl MessagingError {
    /// Short label suitable for a status line.
    pub fn label(&self) -> &'static str {
        match self {
            Self::PermissionDenied => "permission_denied",
            Self::FetchFailed { .. } => "fetch_failed",
            Self::SendFailed { .. } => "send_failed",
            Self::InvalidRecipient => "invalid_recipient",
            Self::EmptyBody => "empty_body",
            Self::Unavailable(_) => "unavailable",
        }
    }
}

/// Result type alias for the crate.
pub type Result<T> = std::result::Result<T, Error>;
