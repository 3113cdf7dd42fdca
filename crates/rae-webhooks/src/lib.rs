//! # rae-webhooks
//!
//! Typed gateway to the Raedificare automation webhooks: document
//! ingestion, project linking and deletion, report chat, content and
//! report-part generation, and spell-checking.
//!
//! [`Webhooks`] is the seam used by the orchestrators; [`WebhookClient`] is
//! the HTTP implementation. Every call fails on a non-2xx status with
//! [`WebhookError::Api`], carrying the status and the best-effort `message`
//! of the error body. Responses are narrowed to explicit types, and a missing
//! required field is a [`WebhookError::ExternalResponse`].

mod client;
mod endpoint;
mod error;
mod http;
mod types;

pub use client::WebhookClient;
pub use endpoint::Endpoint;
pub use error::WebhookError;
pub use types::{ChatReply, SaveOutcome, Suggestion, SuggestionRequest, Upload};

use async_trait::async_trait;

#[async_trait]
pub trait Webhooks: Send + Sync {
    /// Upload one file to the ingestion endpoint.
    async fn save_document(&self, upload: &Upload) -> Result<SaveOutcome, WebhookError>;

    /// Attach stored documents to a project.
    async fn link_documents(
        &self,
        project_id: &str,
        document_urls: &[String],
    ) -> Result<(), WebhookError>;

    async fn delete_project(&self, project_id: &str) -> Result<(), WebhookError>;

    /// Register a stored file as a report.
    async fn add_report(&self, document_url: &str) -> Result<(), WebhookError>;

    /// Register a stored file as a titled report of a project.
    async fn add_project_report(
        &self,
        project_id: &str,
        document_url: &str,
        title: &str,
    ) -> Result<(), WebhookError>;

    /// Ask the report assistant. `session_id` scopes conversational memory.
    async fn report_chat(&self, query: &str, session_id: &str) -> Result<ChatReply, WebhookError>;

    /// Ask the assistant about one project's documents.
    async fn project_chat(
        &self,
        project_id: &str,
        query: &str,
        source_ids: &[String],
    ) -> Result<ChatReply, WebhookError>;

    async fn suggest_content(
        &self,
        request: &SuggestionRequest,
    ) -> Result<Vec<Suggestion>, WebhookError>;

    /// Request generation of report parts for the given template sections.
    async fn generate_parts(
        &self,
        project_id: &str,
        part_ids: &[String],
        instructions: Option<&str>,
    ) -> Result<(), WebhookError>;

    async fn delete_document(&self, document_id: &str) -> Result<(), WebhookError>;

    /// Return the corrected version of `text`.
    async fn correct_text(&self, text: &str) -> Result<String, WebhookError>;
}
