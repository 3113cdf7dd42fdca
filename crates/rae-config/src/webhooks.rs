//! External webhook endpoint configuration.

use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// Base path shared by every webhook.
pub const DEFAULT_WEBHOOK_BASE: &str = "https://api.ia2s.app/webhook/raedificare";

fn default_base_url() -> String {
    DEFAULT_WEBHOOK_BASE.to_string()
}

const fn default_timeout_secs() -> u64 {
    60
}

fn default_user_agent() -> String {
    "raedificare/0.1".to_string()
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct WebhookConfig {
    /// Base URL every webhook path is appended to.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Request timeout in seconds. Generation endpoints are slow.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for WebhookConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
            user_agent: default_user_agent(),
        }
    }
}

impl WebhookConfig {
    /// Full URL of a webhook path such as `/documents/save`.
    pub fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    /// Reject base URLs that are not HTTP(S).
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.base_url.starts_with("http://") || self.base_url.starts_with("https://") {
            Ok(())
        } else {
            Err(ConfigError::InvalidValue {
                field: "webhooks.base_url".to_string(),
                reason: format!("'{}' is not an http(s) URL", self.base_url),
            })
        }
    }
}
