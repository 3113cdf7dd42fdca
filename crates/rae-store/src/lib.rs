//! # rae-store
//!
//! Remote Store Adapter for Raedificare.
//!
//! The [`RemoteStore`] trait is the single seam between the application and
//! the managed database. Two implementations ship here:
//!
//! - [`SupabaseStore`]: PostgREST over `reqwest`, configured from
//!   [`rae_config::StoreConfig`].
//! - `InMemoryStore`: a `RwLock`-backed store with failure injection, used
//!   by orchestrator and list-state tests. Enabled by the `test-support`
//!   feature.
//!
//! Implementations translate between store rows (`client_name`,
//! `last_update`, nullable everything) and the entities of `rae-core`. They
//! never delete projects or documents: those deletions go through webhooks.

pub mod error;
mod http;
#[cfg(any(test, feature = "test-support"))]
pub mod memory;
pub mod query;
pub mod rest;
pub mod rows;

pub use error::StoreError;
#[cfg(any(test, feature = "test-support"))]
pub use memory::InMemoryStore;
pub use query::{Collection, Query};
pub use rest::SupabaseStore;

use async_trait::async_trait;

use rae_core::entities::{
    Document, GeneratedPart, NewSection, Project, ProjectDraft, Report, ReportMatch, ReportSearch,
    SourceDocument, Template, TemplateSection,
};
use rae_core::enums::ProjectStatus;

/// CRUD over the `projects`, `documents`, `templates_rapports`,
/// `templates_rapports_parts` and `generated_rapport_parts` collections.
///
/// Inserts return the created entity. Callers refresh whole collections
/// after a mutation instead of patching their caches.
#[async_trait]
pub trait RemoteStore: Send + Sync {
    // ── Projects ───────────────────────────────────────────────────

    /// All projects, most recently created first.
    async fn fetch_projects(&self) -> Result<Vec<Project>, StoreError>;

    async fn get_project(&self, id: &str) -> Result<Project, StoreError>;

    /// Insert a project. Status defaults to `draft`; both timestamps are
    /// set to now.
    async fn insert_project(&self, draft: &ProjectDraft) -> Result<Project, StoreError>;

    /// Set the status and bump `last_update`.
    async fn update_project_status(
        &self,
        id: &str,
        status: ProjectStatus,
    ) -> Result<(), StoreError>;

    // ── Documents and reports ──────────────────────────────────────

    /// Documents of one project, newest first.
    async fn project_documents(&self, project_id: &str) -> Result<Vec<Document>, StoreError>;

    /// Id/title pairs for the given document ids. Unknown ids are absent.
    async fn documents_by_ids(&self, ids: &[String]) -> Result<Vec<SourceDocument>, StoreError>;

    /// Documents flagged `rapport`, joined to project title and client.
    async fn fetch_reports(&self) -> Result<Vec<Report>, StoreError>;

    /// Reports whose title, project title and client name contain the
    /// respective non-blank criteria, case-insensitively.
    async fn search_reports(&self, search: &ReportSearch) -> Result<Vec<ReportMatch>, StoreError>;

    /// Link a document to a project, or unlink it with `None`.
    async fn set_document_project(
        &self,
        document_id: &str,
        project_id: Option<&str>,
    ) -> Result<(), StoreError>;

    // ── Templates ──────────────────────────────────────────────────

    async fn fetch_templates(&self) -> Result<Vec<Template>, StoreError>;

    /// Insert a template with zero sections.
    async fn insert_template(&self, title: &str, description: &str)
    -> Result<Template, StoreError>;

    async fn update_template(
        &self,
        id: &str,
        title: &str,
        description: &str,
    ) -> Result<(), StoreError>;

    async fn set_section_count(&self, template_id: &str, count: u32) -> Result<(), StoreError>;

    async fn delete_template(&self, id: &str) -> Result<(), StoreError>;

    /// Sections of a template by ascending `order_index`.
    async fn template_sections(&self, template_id: &str)
    -> Result<Vec<TemplateSection>, StoreError>;

    async fn insert_section(
        &self,
        template_id: &str,
        section: &NewSection,
        order_index: i32,
    ) -> Result<TemplateSection, StoreError>;

    async fn set_section_order(&self, section_id: &str, order_index: i32)
    -> Result<(), StoreError>;

    async fn delete_section(&self, section_id: &str) -> Result<(), StoreError>;

    // ── Generated parts ────────────────────────────────────────────

    /// Generated report parts of a project, oldest first.
    async fn generated_parts(&self, project_id: &str) -> Result<Vec<GeneratedPart>, StoreError>;
}
