//! Shared fixtures for the unit tests of this crate.

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::Notify;

use rae_config::RaeConfig;
use rae_core::entities::Project;
use rae_core::enums::ProjectStatus;
use rae_store::InMemoryStore;
use rae_webhooks::{
    ChatReply, Endpoint, SaveOutcome, Suggestion, SuggestionRequest, Upload, WebhookError,
    Webhooks,
};

use crate::context::AppContext;

type Hook = Box<dyn Fn(&str) + Send + Sync>;

/// Scripted webhook gateway recording every call.
#[derive(Default)]
pub struct FakeWebhooks {
    calls: Mutex<Vec<String>>,
    failing: Mutex<HashSet<String>>,
    missing_url: Mutex<HashSet<String>>,
    chat_reply: Mutex<ChatReply>,
    chat_gate: Mutex<Option<Arc<Notify>>>,
    suggestions: Mutex<Vec<Suggestion>>,
    correction: Mutex<Option<String>>,
    delete_project_hook: Mutex<Option<Hook>>,
    delete_document_hook: Mutex<Option<Hook>>,
}

impl FakeWebhooks {
    /// Fail calls whose operation name or full call line equals `key`.
    pub fn fail(&self, key: &str) {
        self.failing.lock().unwrap().insert(key.to_string());
    }

    pub fn missing_url_for(&self, file_name: &str) {
        self.missing_url.lock().unwrap().insert(file_name.to_string());
    }

    pub fn set_chat_reply(&self, answer: Option<&str>, document_ids: &[&str]) {
        *self.chat_reply.lock().unwrap() = ChatReply {
            answer: answer.map(str::to_string),
            document_ids: document_ids.iter().map(|s| (*s).to_string()).collect(),
        };
    }

    /// Hold chat replies until the returned gate is notified.
    pub fn gate_chat(&self) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        *self.chat_gate.lock().unwrap() = Some(Arc::clone(&gate));
        gate
    }

    pub fn set_suggestions(&self, suggestions: Vec<Suggestion>) {
        *self.suggestions.lock().unwrap() = suggestions;
    }

    pub fn set_correction(&self, correction: Option<&str>) {
        *self.correction.lock().unwrap() = correction.map(str::to_string);
    }

    pub fn on_delete_project(&self, hook: impl Fn(&str) + Send + Sync + 'static) {
        *self.delete_project_hook.lock().unwrap() = Some(Box::new(hook));
    }

    pub fn on_delete_document(&self, hook: impl Fn(&str) + Send + Sync + 'static) {
        *self.delete_document_hook.lock().unwrap() = Some(Box::new(hook));
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, op: &str, endpoint: Endpoint, call: String) -> Result<(), WebhookError> {
        let failing = {
            let failing = self.failing.lock().unwrap();
            failing.contains(op) || failing.contains(&call)
        };
        self.calls.lock().unwrap().push(call);
        if failing {
            return Err(WebhookError::Api {
                endpoint: endpoint.path(),
                status: 500,
                message: "scripted failure".into(),
            });
        }
        Ok(())
    }

    async fn chat_reply(&self) -> ChatReply {
        let gate = self.chat_gate.lock().unwrap().clone();
        if let Some(gate) = gate {
            gate.notified().await;
        }
        self.chat_reply.lock().unwrap().clone()
    }
}

#[async_trait]
impl Webhooks for FakeWebhooks {
    async fn save_document(&self, upload: &Upload) -> Result<SaveOutcome, WebhookError> {
        let name = &upload.file_name;
        self.record(
            "save_document",
            Endpoint::SaveDocument,
            format!("save_document {name}"),
        )?;
        if self.missing_url.lock().unwrap().contains(name) {
            return Ok(SaveOutcome::MissingUrl);
        }
        Ok(SaveOutcome::Stored(format!("https://files.test/{name}")))
    }

    async fn link_documents(
        &self,
        project_id: &str,
        document_urls: &[String],
    ) -> Result<(), WebhookError> {
        self.record(
            "link_documents",
            Endpoint::LinkDocuments,
            format!("link_documents p={project_id} n={}", document_urls.len()),
        )
    }

    async fn delete_project(&self, project_id: &str) -> Result<(), WebhookError> {
        self.record(
            "delete_project",
            Endpoint::DeleteProject,
            format!("delete_project p={project_id}"),
        )?;
        if let Some(hook) = self.delete_project_hook.lock().unwrap().as_ref() {
            hook(project_id);
        }
        Ok(())
    }

    async fn add_report(&self, document_url: &str) -> Result<(), WebhookError> {
        self.record(
            "add_report",
            Endpoint::AddReport,
            format!("add_report {document_url}"),
        )
    }

    async fn add_project_report(
        &self,
        project_id: &str,
        document_url: &str,
        title: &str,
    ) -> Result<(), WebhookError> {
        self.record(
            "add_project_report",
            Endpoint::AddProjectReport,
            format!("add_project_report p={project_id} {title} {document_url}"),
        )
    }

    async fn report_chat(&self, query: &str, session_id: &str) -> Result<ChatReply, WebhookError> {
        self.record(
            "report_chat",
            Endpoint::ReportChat,
            format!("report_chat s={session_id} {query}"),
        )?;
        Ok(self.chat_reply().await)
    }

    async fn project_chat(
        &self,
        project_id: &str,
        query: &str,
        source_ids: &[String],
    ) -> Result<ChatReply, WebhookError> {
        self.record(
            "project_chat",
            Endpoint::ProjectChat,
            format!("project_chat p={project_id} n={} {query}", source_ids.len()),
        )?;
        Ok(self.chat_reply().await)
    }

    async fn suggest_content(
        &self,
        request: &SuggestionRequest,
    ) -> Result<Vec<Suggestion>, WebhookError> {
        self.record(
            "suggest_content",
            Endpoint::ContentSuggestions,
            format!("suggest_content r={}", request.rapport_id),
        )?;
        Ok(self.suggestions.lock().unwrap().clone())
    }

    async fn generate_parts(
        &self,
        project_id: &str,
        part_ids: &[String],
        _instructions: Option<&str>,
    ) -> Result<(), WebhookError> {
        self.record(
            "generate_parts",
            Endpoint::GenerateParts,
            format!("generate_parts p={project_id} n={}", part_ids.len()),
        )
    }

    async fn delete_document(&self, document_id: &str) -> Result<(), WebhookError> {
        self.record(
            "delete_document",
            Endpoint::DeleteDocument,
            format!("delete_document d={document_id}"),
        )?;
        if let Some(hook) = self.delete_document_hook.lock().unwrap().as_ref() {
            hook(document_id);
        }
        Ok(())
    }

    async fn correct_text(&self, _text: &str) -> Result<String, WebhookError> {
        self.record("correct_text", Endpoint::CorrectText, "correct_text".into())?;
        self.correction
            .lock()
            .unwrap()
            .clone()
            .ok_or_else(|| WebhookError::ExternalResponse {
                endpoint: Endpoint::CorrectText.path(),
                detail: "response has no correction".into(),
            })
    }
}

/// Context over an in-memory store and scripted webhooks.
pub fn context_with(store: InMemoryStore) -> (AppContext, Arc<InMemoryStore>, Arc<FakeWebhooks>) {
    let store = Arc::new(store);
    let hooks = Arc::new(FakeWebhooks::default());
    let ctx = AppContext::from_parts(RaeConfig::default(), store.clone(), hooks.clone());
    (ctx, store, hooks)
}

pub fn project(id: &str, title: &str, client: &str, status: ProjectStatus, date: &str) -> Project {
    Project {
        id: id.into(),
        title: title.into(),
        client: client.into(),
        description: String::new(),
        status,
        date: date.into(),
    }
}
