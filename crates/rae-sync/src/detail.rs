//! One project with its documents and generated report parts.

use std::sync::Arc;

use async_trait::async_trait;

use rae_core::entities::{Document, GeneratedPart, Project};
use rae_store::RemoteStore;
use rae_webhooks::{Upload, Webhooks};

use crate::context::AppContext;
use crate::error::SyncError;
use crate::notices::Notices;
use crate::orchestrator::{DocumentImport, ProgressSink};
use crate::{Freshness, Refresh};

pub struct ProjectDetail {
    store: Arc<dyn RemoteStore>,
    webhooks: Arc<dyn Webhooks>,
    notices: Arc<Notices>,
    import: DocumentImport,
    project_id: String,
    project: Option<Project>,
    documents: Vec<Document>,
    parts: Vec<GeneratedPart>,
    freshness: Freshness,
}

impl ProjectDetail {
    /// Open `project_id` and load it.
    pub async fn open(ctx: &AppContext, project_id: &str) -> Self {
        let mut detail = Self {
            store: Arc::clone(&ctx.store),
            webhooks: Arc::clone(&ctx.webhooks),
            notices: Arc::clone(&ctx.notices),
            import: DocumentImport::new(ctx),
            project_id: project_id.to_string(),
            project: None,
            documents: Vec::new(),
            parts: Vec::new(),
            freshness: Freshness::Stale,
        };
        detail.refresh().await;
        detail
    }

    pub fn project_id(&self) -> &str {
        &self.project_id
    }

    /// `None` until a load succeeds.
    pub const fn project(&self) -> Option<&Project> {
        self.project.as_ref()
    }

    /// Newest first.
    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    /// Oldest first.
    pub fn parts(&self) -> &[GeneratedPart] {
        &self.parts
    }

    pub const fn freshness(&self) -> Freshness {
        self.freshness
    }

    pub fn document_ids(&self) -> Vec<String> {
        self.documents.iter().map(|d| d.id.clone()).collect()
    }

    pub const fn import(&self) -> &DocumentImport {
        &self.import
    }

    /// Upload and link `files`, then reload.
    ///
    /// # Errors
    ///
    /// See [`DocumentImport::submit`].
    pub async fn import_documents(
        &mut self,
        files: &mut Vec<Upload>,
        progress: &mut dyn ProgressSink,
    ) -> Result<usize, SyncError> {
        let import = self.import.clone();
        let project_id = self.project_id.clone();
        import.submit(&project_id, files, progress, self).await
    }

    /// Delete a document through the webhook, then reload.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::Webhook`] if the webhook call fails.
    pub async fn delete_document(&mut self, document_id: &str) -> Result<(), SyncError> {
        if let Err(e) = self.webhooks.delete_document(document_id).await {
            self.notices
                .error("Error", format!("Unable to delete the document: {e}"));
            return Err(e.into());
        }
        self.notices
            .success("Document deleted", "The document was deleted");
        self.refresh().await;
        Ok(())
    }

    /// Ask for report parts built from the given template sections.
    ///
    /// Generation runs remotely; the new parts appear on a later reload.
    ///
    /// # Errors
    ///
    /// Validation error when `section_ids` is empty, or
    /// [`SyncError::Webhook`].
    pub async fn generate_parts(
        &self,
        section_ids: &[String],
        instructions: Option<&str>,
    ) -> Result<(), SyncError> {
        if section_ids.is_empty() {
            self.notices
                .error("Error", "Select at least one template section");
            return Err(SyncError::validation("at least one section is required"));
        }
        if let Err(e) = self
            .webhooks
            .generate_parts(&self.project_id, section_ids, instructions)
            .await
        {
            self.notices
                .error("Error", format!("Unable to generate the report parts: {e}"));
            return Err(e.into());
        }
        self.notices.success(
            "Generation started",
            format!("{} part(s) requested", section_ids.len()),
        );
        Ok(())
    }

    async fn load(&self) -> Result<(Project, Vec<Document>, Vec<GeneratedPart>), SyncError> {
        let project = self.store.get_project(&self.project_id).await?;
        let documents = self.store.project_documents(&self.project_id).await?;
        let parts = self.store.generated_parts(&self.project_id).await?;
        Ok((project, documents, parts))
    }
}

#[async_trait]
impl Refresh for ProjectDetail {
    async fn refresh(&mut self) -> Freshness {
        match self.load().await {
            Ok((project, documents, parts)) => {
                tracing::debug!(
                    project = %self.project_id,
                    documents = documents.len(),
                    parts = parts.len(),
                    "project detail refreshed"
                );
                self.project = Some(project);
                self.documents = documents;
                self.parts = parts;
                self.freshness = Freshness::Live;
            }
            Err(e) => {
                self.notices
                    .error("Error", format!("Unable to load the project: {e}"));
                self.freshness = Freshness::Stale;
            }
        }
        self.freshness
    }
}
