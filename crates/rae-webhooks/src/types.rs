//! Request inputs and typed responses of the webhooks.
//!
//! Webhook bodies are loosely specified JSON. Each response is decoded into
//! an explicit shape here, and required fields are checked before anything
//! reaches the caller.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::WebhookError;

/// A file selected for upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Upload {
    pub file_name: String,
    pub bytes: Vec<u8>,
    pub mime: Option<String>,
}

impl Upload {
    pub fn new(file_name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            file_name: file_name.into(),
            bytes: bytes.into(),
            mime: None,
        }
    }

    /// Read a file from disk. The MIME type is guessed from the extension.
    ///
    /// # Errors
    ///
    /// Returns [`WebhookError::ReadFile`] if the file cannot be read.
    pub async fn from_path(path: &Path) -> Result<Self, WebhookError> {
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|source| WebhookError::ReadFile {
                path: path.display().to_string(),
                source,
            })?;
        let file_name = path
            .file_name()
            .map_or_else(|| "upload".to_string(), |n| n.to_string_lossy().into_owned());
        let mime = path
            .extension()
            .and_then(|e| e.to_str())
            .and_then(mime_for_extension)
            .map(str::to_string);
        Ok(Self {
            file_name,
            bytes,
            mime,
        })
    }
}

fn mime_for_extension(ext: &str) -> Option<&'static str> {
    match ext.to_ascii_lowercase().as_str() {
        "pdf" => Some("application/pdf"),
        "doc" => Some("application/msword"),
        "docx" => Some("application/vnd.openxmlformats-officedocument.wordprocessingml.document"),
        "xls" => Some("application/vnd.ms-excel"),
        "xlsx" => Some("application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"),
        "txt" => Some("text/plain"),
        "csv" => Some("text/csv"),
        "png" => Some("image/png"),
        "jpg" | "jpeg" => Some("image/jpeg"),
        _ => None,
    }
}

/// Result of `/documents/save`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    /// The file was stored at this URL.
    Stored(String),
    /// The call succeeded but returned no `document_url`.
    MissingUrl,
}

impl SaveOutcome {
    /// The stored URL, or an `ExternalResponse` error for flows that need it.
    ///
    /// # Errors
    ///
    /// Returns [`WebhookError::ExternalResponse`] for [`Self::MissingUrl`].
    pub fn require_url(self) -> Result<String, WebhookError> {
        match self {
            Self::Stored(url) => Ok(url),
            Self::MissingUrl => Err(WebhookError::ExternalResponse {
                endpoint: crate::Endpoint::SaveDocument.path(),
                detail: "response has no document_url".to_string(),
            }),
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct SaveResponse {
    pub document_url: Option<String>,
}

impl From<SaveResponse> for SaveOutcome {
    fn from(resp: SaveResponse) -> Self {
        match resp.document_url.filter(|u| !u.is_empty()) {
            Some(url) => Self::Stored(url),
            None => Self::MissingUrl,
        }
    }
}

/// Answer of either chat endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ChatReply {
    /// Answer text. `None` when the service produced none.
    #[serde(default, rename = "response")]
    pub answer: Option<String>,
    /// Ids of the documents the answer cites.
    #[serde(default)]
    pub document_ids: Vec<String>,
}

/// Input of `/rapport/content/suggestions`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SuggestionRequest {
    pub rapport_id: String,
    pub content_types: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instructions: Option<String>,
}

/// One generated suggestion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suggestion {
    pub content_type: String,
    pub generated_content: String,
    #[serde(default)]
    pub generated_image_url: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SuggestionResponse {
    #[serde(default)]
    pub suggestions: Vec<Suggestion>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CorrectionResponse {
    pub correction: Option<String>,
}
