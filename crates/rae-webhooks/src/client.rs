//! `reqwest` implementation of [`Webhooks`].

use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde::Serialize;
use serde_json::json;

use rae_config::WebhookConfig;

use crate::endpoint::Endpoint;
use crate::error::WebhookError;
use crate::http::{check_response, decode_json};
use crate::types::{
    ChatReply, CorrectionResponse, SaveOutcome, SaveResponse, Suggestion, SuggestionRequest,
    SuggestionResponse, Upload,
};
use crate::Webhooks;

/// HTTP client for the automation webhooks.
pub struct WebhookClient {
    http: reqwest::Client,
    config: WebhookConfig,
}

impl WebhookClient {
    /// Build a client from configuration.
    ///
    /// # Errors
    ///
    /// Returns [`WebhookError::Http`] if the underlying client fails to build.
    pub fn new(config: &WebhookConfig) -> Result<Self, WebhookError> {
        let http = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            http,
            config: config.clone(),
        })
    }

    fn url(&self, endpoint: Endpoint) -> String {
        self.config.endpoint(endpoint.path())
    }

    /// Send a JSON body and check the status.
    async fn send_json<B: Serialize + Sync + ?Sized>(
        &self,
        endpoint: Endpoint,
        body: &B,
    ) -> Result<reqwest::Response, WebhookError> {
        let url = self.url(endpoint);
        tracing::debug!(endpoint = endpoint.path(), method = %endpoint.method(), "webhook call");
        let resp = self
            .http
            .request(endpoint.method(), &url)
            .json(body)
            .send()
            .await?;
        check_response(endpoint, resp).await
    }
}

#[async_trait]
impl Webhooks for WebhookClient {
    async fn save_document(&self, upload: &Upload) -> Result<SaveOutcome, WebhookError> {
        let endpoint = Endpoint::SaveDocument;
        let mut part = Part::bytes(upload.bytes.clone()).file_name(upload.file_name.clone());
        if let Some(mime) = &upload.mime {
            part = part.mime_str(mime)?;
        }
        let form = Form::new().part("file", part);
        tracing::debug!(file = %upload.file_name, size = upload.bytes.len(), "uploading document");
        let resp = self
            .http
            .post(self.url(endpoint))
            .multipart(form)
            .send()
            .await?;
        let resp = check_response(endpoint, resp).await?;
        let saved: SaveResponse = decode_json(endpoint, resp).await?;
        Ok(saved.into())
    }

    async fn link_documents(
        &self,
        project_id: &str,
        document_urls: &[String],
    ) -> Result<(), WebhookError> {
        self.send_json(
            Endpoint::LinkDocuments,
            &json!({ "project_id": project_id, "document_urls": document_urls }),
        )
        .await?;
        tracing::info!(project = project_id, count = document_urls.len(), "documents linked");
        Ok(())
    }

    async fn delete_project(&self, project_id: &str) -> Result<(), WebhookError> {
        self.send_json(Endpoint::DeleteProject, &json!({ "project_id": project_id }))
            .await?;
        tracing::info!(project = project_id, "project deletion requested");
        Ok(())
    }

    async fn add_report(&self, document_url: &str) -> Result<(), WebhookError> {
        self.send_json(Endpoint::AddReport, &json!({ "document_url": document_url }))
            .await?;
        Ok(())
    }

    async fn add_project_report(
        &self,
        project_id: &str,
        document_url: &str,
        title: &str,
    ) -> Result<(), WebhookError> {
        self.send_json(
            Endpoint::AddProjectReport,
            &json!({ "project_id": project_id, "document_url": document_url, "title": title }),
        )
        .await?;
        Ok(())
    }

    async fn report_chat(&self, query: &str, session_id: &str) -> Result<ChatReply, WebhookError> {
        let endpoint = Endpoint::ReportChat;
        let resp = self
            .send_json(endpoint, &json!({ "query": query, "session_id": session_id }))
            .await?;
        decode_json(endpoint, resp).await
    }

    async fn project_chat(
        &self,
        project_id: &str,
        query: &str,
        source_ids: &[String],
    ) -> Result<ChatReply, WebhookError> {
        let endpoint = Endpoint::ProjectChat;
        let body = json!({
            "project_id": project_id,
            "query": query,
            "response": "",
            "source_ids": source_ids,
        });
        let resp = self.send_json(endpoint, &body).await?;
        decode_json(endpoint, resp).await
    }

    async fn suggest_content(
        &self,
        request: &SuggestionRequest,
    ) -> Result<Vec<Suggestion>, WebhookError> {
        let endpoint = Endpoint::ContentSuggestions;
        let resp = self.send_json(endpoint, request).await?;
        let parsed: SuggestionResponse = decode_json(endpoint, resp).await?;
        Ok(parsed.suggestions)
    }

    async fn generate_parts(
        &self,
        project_id: &str,
        part_ids: &[String],
        instructions: Option<&str>,
    ) -> Result<(), WebhookError> {
        let mut body = json!({ "project_id": project_id, "part_ids": part_ids });
        if let Some(text) = instructions.filter(|t| !t.trim().is_empty()) {
            body["instructions"] = json!(text);
        }
        self.send_json(Endpoint::GenerateParts, &body).await?;
        tracing::info!(project = project_id, parts = part_ids.len(), "part generation requested");
        Ok(())
    }

    async fn delete_document(&self, document_id: &str) -> Result<(), WebhookError> {
        self.send_json(Endpoint::DeleteDocument, &json!({ "document_id": document_id }))
            .await?;
        tracing::info!(document = document_id, "document deletion requested");
        Ok(())
    }

    async fn correct_text(&self, text: &str) -> Result<String, WebhookError> {
        let endpoint = Endpoint::CorrectText;
        let resp = self.send_json(endpoint, &json!({ "text": text })).await?;
        let parsed: CorrectionResponse = decode_json(endpoint, resp).await?;
        parsed
            .correction
            .filter(|c| !c.is_empty())
            .ok_or_else(|| WebhookError::ExternalResponse {
                endpoint: endpoint.path(),
                detail: "response has no correction".to_string(),
            })
    }
}
