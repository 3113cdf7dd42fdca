//! Shared HTTP response helpers for webhook calls.

use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::endpoint::Endpoint;
use crate::error::WebhookError;

#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

/// Check a webhook response for a non-success status.
///
/// The error body is parsed as `{"message": ...}` best-effort. When parsing
/// fails or the message is blank, the endpoint's fallback text is used.
pub async fn check_response(
    endpoint: Endpoint,
    resp: reqwest::Response,
) -> Result<reqwest::Response, WebhookError> {
    if resp.status().is_success() {
        return Ok(resp);
    }
    let status = resp.status().as_u16();
    let body = resp.text().await.unwrap_or_default();
    let message = error_message(&body).unwrap_or_else(|| endpoint.fallback_message().to_string());
    tracing::error!(endpoint = endpoint.path(), status, %message, "webhook call failed");
    Err(WebhookError::Api {
        endpoint: endpoint.path(),
        status,
        message,
    })
}

/// Decode a successful response body as JSON of the endpoint's response type.
pub async fn decode_json<T: DeserializeOwned>(
    endpoint: Endpoint,
    resp: reqwest::Response,
) -> Result<T, WebhookError> {
    let body = resp.text().await?;
    serde_json::from_str(&body).map_err(|e| WebhookError::ExternalResponse {
        endpoint: endpoint.path(),
        detail: format!("invalid JSON body: {e}"),
    })
}

fn error_message(body: &str) -> Option<String> {
    serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|parsed| parsed.message)
        .filter(|m| !m.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_message_field() {
        assert_eq!(
            error_message(r#"{"message":"Project not found"}"#).as_deref(),
            Some("Project not found")
        );
    }

    #[test]
    fn no_message_for_html_or_blank() {
        assert_eq!(error_message("<html>502</html>"), None);
        assert_eq!(error_message(r#"{"message":"  "}"#), None);
        assert_eq!(error_message(""), None);
    }
}
