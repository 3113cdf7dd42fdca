//! Remote store (Supabase REST) configuration.

use serde::{Deserialize, Serialize};

fn default_schema() -> String {
    "public".to_string()
}

const fn default_timeout_secs() -> u64 {
    30
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StoreConfig {
    /// Project URL (e.g., `https://abc.supabase.co`).
    #[serde(default)]
    pub url: String,

    /// Anonymous API key, sent as `apikey` and bearer token.
    #[serde(default)]
    pub anon_key: String,

    /// Postgres schema exposed through the REST endpoint.
    #[serde(default = "default_schema")]
    pub schema: String,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            anon_key: String::new(),
            schema: default_schema(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl StoreConfig {
    /// Check if the URL and key needed for remote access are present.
    pub fn is_configured(&self) -> bool {
        !self.url.is_empty() && !self.anon_key.is_empty()
    }

    /// Base URL of the REST API (`{url}/rest/v1`).
    pub fn rest_url(&self) -> String {
        format!("{}/rest/v1", self.url.trim_end_matches('/'))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_not_configured() {
        let config = StoreConfig::default();
        assert!(!config.is_configured());
        assert_eq!(config.schema, "public");
        assert_eq!(config.timeout_secs, 30);
    }

    #[test]
    fn configured_when_url_and_key_set() {
        let config = StoreConfig {
            url: "https://abc.supabase.co".into(),
            anon_key: "anon".into(),
            ..Default::default()
        };
        assert!(config.is_configured());
    }

    #[test]
    fn rest_url_strips_trailing_slash() {
        let config = StoreConfig {
            url: "https://abc.supabase.co/".into(),
            ..Default::default()
        };
        assert_eq!(config.rest_url(), "https://abc.supabase.co/rest/v1");
    }
}
