//! Cross-cutting error types for Raedificare.
//!
//! Transport-specific errors (`StoreError`, `WebhookError`) live in their
//! own crates. `rae-sync` converges them into `SyncError`.

use thiserror::Error;

/// Errors that can be raised by any Raedificare crate.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Entity lookup returned no result.
    #[error("Entity not found: {entity_type} {id}")]
    NotFound { entity_type: String, id: String },

    /// A string did not name a known enum value.
    #[error("Unknown {kind} '{value}'")]
    UnknownValue { kind: &'static str, value: String },

    /// Input failed validation before any remote call was made.
    #[error("Validation error: {0}")]
    Validation(String),
}
