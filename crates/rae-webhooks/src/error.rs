//! Webhook error types.

use thiserror::Error;

/// Errors raised by webhook calls.
#[derive(Debug, Error)]
pub enum WebhookError {
    /// HTTP transport error (connection refused, timeout, ...).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The endpoint answered with a non-success status code.
    #[error("{endpoint} failed ({status}): {message}")]
    Api {
        endpoint: &'static str,
        /// HTTP status code.
        status: u16,
        /// `message` from the JSON error body, or the endpoint's fallback text.
        message: String,
    },

    /// The endpoint answered 2xx but a required field was absent or the
    /// body was not the expected JSON.
    #[error("unexpected response from {endpoint}: {detail}")]
    ExternalResponse {
        endpoint: &'static str,
        detail: String,
    },

    /// A local file could not be read for upload.
    #[error("cannot read {path}: {source}")]
    ReadFile {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl WebhookError {
    /// HTTP status of an `Api` error.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}
