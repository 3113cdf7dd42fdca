//! Remote store error types.

use thiserror::Error;

/// Errors that can occur when talking to the remote store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// HTTP transport error.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The store answered with a non-success status code.
    #[error("store error ({status}): {message}")]
    Api {
        /// HTTP status code returned by the store.
        status: u16,
        /// Error message parsed from the body, or the raw body.
        message: String,
    },

    /// A row could not be decoded into its entity shape.
    #[error("decode error in {collection}: {reason}")]
    Decode {
        collection: &'static str,
        reason: String,
    },

    /// An insert returned no representation.
    #[error("insert into {collection} returned no row")]
    EmptyInsert { collection: &'static str },

    /// Lookup by id found nothing.
    #[error("{collection} row {id} not found")]
    NotFound { collection: &'static str, id: String },

    /// Store URL or key missing from configuration.
    #[error("remote store is not configured (set store.url and store.anon_key)")]
    NotConfigured,

    /// A configured value cannot be sent as an HTTP header.
    #[error("store.{field} cannot be used as a header value: {reason}")]
    InvalidHeader { field: &'static str, reason: String },
}
