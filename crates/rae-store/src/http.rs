//! Shared HTTP response helpers for the REST client.
//!
//! Centralizes the status-code check so the adapter methods stay focused on
//! request construction and row mapping.

use serde::Deserialize;

use crate::error::StoreError;

/// PostgREST error body. Only `message` is used.
#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

/// Check an HTTP response for a non-success status.
///
/// Returns the response unchanged on success. On failure the body is parsed
/// as a PostgREST error; when that fails the raw body text is kept.
pub async fn check_response(resp: reqwest::Response) -> Result<reqwest::Response, StoreError> {
    if resp.status().is_success() {
        return Ok(resp);
    }
    let status = resp.status().as_u16();
    let body = resp.text().await.unwrap_or_default();
    Err(StoreError::Api {
        status,
        message: error_message(&body),
    })
}

fn error_message(body: &str) -> String {
    serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|parsed| parsed.message)
        .unwrap_or_else(|| body.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_postgrest_message() {
        let body = r#"{"code":"42P01","message":"relation \"nope\" does not exist","details":null}"#;
        assert_eq!(error_message(body), "relation \"nope\" does not exist");
    }

    #[test]
    fn keeps_raw_body_when_not_json() {
        assert_eq!(error_message("Bad Gateway"), "Bad Gateway");
    }

    #[test]
    fn keeps_raw_body_when_message_missing() {
        assert_eq!(error_message(r#"{"hint":"x"}"#), r#"{"hint":"x"}"#);
    }
}
