//! # rae-config
//!
//! Layered configuration loading for Raedificare using figment.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. Environment variables (`RAEDIFICARE_*` prefix, `__` as separator)
//! 2. External overrides passed to [`RaeConfig::load_with_env_overrides`]
//! 3. Project-level `.raedificare/config.toml`
//! 4. User-level `~/.config/raedificare/config.toml`
//! 5. Built-in defaults
//!
//! # Environment Variable Mapping
//!
//! Figment maps `RAEDIFICARE_STORE__URL` -> `store.url`,
//! `RAEDIFICARE_WEBHOOKS__BASE_URL` -> `webhooks.base_url`, etc.
//!
//! # Usage
//!
//! ```no_run
//! use rae_config::RaeConfig;
//!
//! let config = RaeConfig::load_with_dotenv().expect("config");
//! if config.store.is_configured() {
//!     println!("store: {}", config.store.rest_url());
//! }
//! ```

mod error;
mod general;
mod store;
mod webhooks;

pub use error::ConfigError;
pub use general::{FallbackPolicy, GeneralConfig};
pub use store::StoreConfig;
pub use webhooks::{DEFAULT_WEBHOOK_BASE, WebhookConfig};

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const ENV_PREFIX: &str = "RAEDIFICARE_";

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RaeConfig {
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub webhooks: WebhookConfig,
    #[serde(default)]
    pub general: GeneralConfig,
}

impl RaeConfig {
    /// Load configuration from all sources (TOML files + environment variables).
    ///
    /// Does NOT call `dotenvy`; use [`Self::load_with_dotenv`] for `.env` support.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_with_env_overrides(&[])
    }

    /// Load configuration with `.env` file support.
    pub fn load_with_dotenv() -> Result<Self, ConfigError> {
        Self::load_dotenv_from_workspace();
        Self::load()
    }

    /// Load configuration, filling gaps from externally supplied
    /// `RAEDIFICARE_*` key/value pairs. Process environment still wins.
    pub fn load_with_env_overrides(overrides: &[(String, String)]) -> Result<Self, ConfigError> {
        Self::load_in(Path::new("."), overrides)
    }

    /// Like [`Self::load_with_env_overrides`], reading the project-level
    /// file under `project_dir` instead of the current directory.
    pub fn load_in(project_dir: &Path, overrides: &[(String, String)]) -> Result<Self, ConfigError> {
        let config: Self = Self::figment_at(project_dir, overrides).extract()?;
        config.webhooks.validate()?;
        Ok(config)
    }

    /// Build the figment provider chain.
    ///
    /// Public so tests can inspect the figment directly or add providers on top.
    pub fn figment() -> Figment {
        Self::figment_at(Path::new("."), &[])
    }

    fn figment_at(project_dir: &Path, overrides: &[(String, String)]) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                figment = figment.merge(Toml::file(global_path));
            }
        }

        let local_path = project_dir.join(".raedificare").join("config.toml");
        if local_path.exists() {
            figment = figment.merge(Toml::file(local_path));
        }

        for (key, value) in overrides {
            if let Some(path) = env_key_to_path(key) {
                figment = figment.merge(Serialized::default(&path, value));
            }
        }

        figment.merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    /// Path to the user-global config file.
    fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("raedificare").join("config.toml"))
    }

    /// Load `.env` from the workspace root, or the current directory.
    fn load_dotenv_from_workspace() {
        if let Ok(manifest_dir) = std::env::var("CARGO_MANIFEST_DIR") {
            let mut dir = PathBuf::from(manifest_dir);
            // crate -> crates/ -> workspace root
            for _ in 0..3 {
                let env_path = dir.join(".env");
                if env_path.exists() {
                    let _ = dotenvy::from_path(&env_path);
                    return;
                }
                if !dir.pop() {
                    break;
                }
            }
        }

        let _ = dotenvy::dotenv();
    }
}

/// Map `RAEDIFICARE_STORE__ANON_KEY` to `store.anon_key`.
fn env_key_to_path(key: &str) -> Option<String> {
    let rest = key.strip_prefix(ENV_PREFIX)?;
    if rest.is_empty() {
        return None;
    }
    Some(rest.to_ascii_lowercase().replace("__", "."))
}
