//! The single configured connection shared by every state holder.

use std::sync::Arc;

use rae_config::RaeConfig;
use rae_store::{RemoteStore, SupabaseStore};
use rae_webhooks::{WebhookClient, Webhooks};

use crate::error::SyncError;
use crate::notices::{Notice, Notices};

/// Remote store, webhook gateway, notice sink and configuration, created
/// once by [`AppContext::init`] and handed to each component explicitly.
#[derive(Clone)]
pub struct AppContext {
    pub store: Arc<dyn RemoteStore>,
    pub webhooks: Arc<dyn Webhooks>,
    pub notices: Arc<Notices>,
    pub config: RaeConfig,
}

impl AppContext {
    /// Connect to the configured store and webhooks.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::Store`] if the store is not configured, or an
    /// HTTP client error if a client cannot be built.
    pub fn init(config: RaeConfig) -> Result<Self, SyncError> {
        let store = SupabaseStore::new(&config.store)?;
        let webhooks = WebhookClient::new(&config.webhooks)?;
        tracing::debug!(
            store = %config.store.rest_url(),
            webhooks = %config.webhooks.base_url,
            "application context initialized"
        );
        Ok(Self::from_parts(config, Arc::new(store), Arc::new(webhooks)))
    }

    /// Assemble a context from already-built collaborators.
    pub fn from_parts(
        config: RaeConfig,
        store: Arc<dyn RemoteStore>,
        webhooks: Arc<dyn Webhooks>,
    ) -> Self {
        Self {
            store,
            webhooks,
            notices: Arc::new(Notices::new()),
            config,
        }
    }

    /// Release the connection and return any notices nobody drained.
    pub fn shutdown(self) -> Vec<Notice> {
        let pending = self.notices.drain();
        tracing::debug!(pending = pending.len(), "application context shut down");
        pending
    }
}
