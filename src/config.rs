//! Configuration types.

use std::path::PathBuf;

use crate::backend::PermissionStatus;
use crate::error::{ConfigError, Result};

/// Runtime configuration for the `sms-threads` binary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// JSON fixture describing the device SMS store. Empty device when unset.
    pub fixture_path: Option<PathBuf>,
    /// Overrides the fixture's permission answer.
    pub permission: Option<PermissionStatus>,
    /// Characters of the latest message shown per conversation.
    pub preview_chars: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            fixture_path: None,
            permission: None,
            preview_chars: 50,
        }
    }
}

impl AppConfig {
    /// Build config from environment variables.
    pub fn from_env() -> Result<Self> {
        Ok(Self::from_lookup(|key| std::env::var(key).ok())?)
    }

    /// Build config from any key lookup (the environment, or a map in tests).
    pub fn from_lookup<F>(lookup: F) -> std::result::Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let fixture_path = lookup("SMS_FIXTURE_PATH")
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .map(PathBuf::from);

        let permission = match lookup("SMS_PERMISSION") {
            Some(raw) if !raw.trim().is_empty() => {
                Some(raw.parse::<PermissionStatus>().map_err(|message| ConfigError::InvalidValue {
                    key: "SMS_PERMISSION".into(),
                    message,
                })?)
            }
            _ => None,
        };

        let preview_chars = match lookup("SMS_PREVIEW_CHARS") {
            Some(raw) => match raw.trim().parse::<usize>() {
                Ok(n) if n > 0 => n,
                _ => {
                    return Err(ConfigError::InvalidValue {
                        key: "SMS_PREVIEW_CHARS".into(),
                        message: format!("expected a positive integer, got '{raw}'"),
                    });
                }
            },
            None => defaults.preview_chars,
        };

        Ok(Self {
            fixture_path,
            permission,
            preview_chars,
        })
    }
}
