//! In-memory [`RemoteStore`] implementation for tests.
//!
//! Collections live in `Vec`s behind `std::sync::RwLock`. Any operation can
//! be made to fail by name with [`InMemoryStore::fail_on`], or all of them
//! with [`InMemoryStore::set_offline`], to exercise degraded paths.

use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use chrono::Utc;

use rae_core::dates::format_display;
use rae_core::entities::{
    Document, GeneratedPart, NewSection, Project, ProjectDraft, Report, ReportMatch, ReportSearch,
    SourceDocument, Template, TemplateSection,
};
use rae_core::enums::ProjectStatus;

use crate::error::StoreError;
use crate::query::Collection;
use crate::rows::{UNKNOWN_TITLE, UNSPECIFIED_CLIENT, UNSPECIFIED_PROJECT, UNTITLED_REPORT};
use crate::RemoteStore;

/// In-memory store. Projects are kept newest first.
#[derive(Default)]
pub struct InMemoryStore {
    projects: RwLock<Vec<Project>>,
    documents: RwLock<Vec<Document>>,
    templates: RwLock<Vec<Template>>,
    sections: RwLock<Vec<TemplateSection>>,
    parts: RwLock<Vec<GeneratedPart>>,
    failing: RwLock<HashSet<&'static str>>,
    offline: RwLock<bool>,
    next_id: AtomicU64,
}

fn read<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(PoisonError::into_inner)
}

fn write<T>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(PoisonError::into_inner)
}

fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store seeded with projects, in the given (newest-first) order.
    pub fn with_projects(projects: Vec<Project>) -> Self {
        let store = Self::new();
        *write(&store.projects) = projects;
        store
    }

    pub fn push_document(&self, document: Document) {
        write(&self.documents).push(document);
    }

    pub fn push_template(&self, template: Template) {
        write(&self.templates).push(template);
    }

    pub fn push_section(&self, section: TemplateSection) {
        write(&self.sections).push(section);
    }

    pub fn push_part(&self, part: GeneratedPart) {
        write(&self.parts).push(part);
    }

    /// Make the named operation fail with a 503 until [`Self::recover`].
    pub fn fail_on(&self, op: &'static str) {
        write(&self.failing).insert(op);
    }

    pub fn recover(&self, op: &'static str) {
        write(&self.failing).remove(op);
    }

    /// Make every operation fail, or restore them.
    pub fn set_offline(&self, offline: bool) {
        *write(&self.offline) = offline;
    }

    /// Snapshot of all documents, for assertions.
    pub fn documents(&self) -> Vec<Document> {
        read(&self.documents).clone()
    }

    /// Remove a document, standing in for the document-delete webhook.
    pub fn remove_document(&self, id: &str) {
        write(&self.documents).retain(|d| d.id != id);
    }

    /// Remove a project, standing in for the project-delete webhook.
    pub fn remove_project(&self, id: &str) {
        write(&self.projects).retain(|p| p.id != id);
    }

    fn check(&self, op: &'static str) -> Result<(), StoreError> {
        if *read(&self.offline) || read(&self.failing).contains(op) {
            return Err(StoreError::Api {
                status: 503,
                message: format!("{op} unavailable"),
            });
        }
        Ok(())
    }

    fn mint_id(&self, prefix: &str) -> String {
        let n = self.next_id.fetch_add(1, Ordering::Relaxed) + 1;
        format!("{prefix}-mem-{n}")
    }

    fn to_report(&self, doc: &Document) -> Report {
        let projects = read(&self.projects);
        let project = doc
            .project_id
            .as_deref()
            .and_then(|id| projects.iter().find(|p| p.id == id));
        Report {
            id: doc.id.clone(),
            title: if doc.title.is_empty() {
                UNTITLED_REPORT.to_string()
            } else {
                doc.title.clone()
            },
            project_id: doc.project_id.clone(),
            project_name: project.map_or_else(|| UNSPECIFIED_PROJECT.to_string(), |p| p.title.clone()),
            client_name: project.map_or_else(|| UNSPECIFIED_CLIENT.to_string(), |p| p.client.clone()),
            date: doc.date(),
            url: doc.url.clone(),
        }
    }

    fn not_found(collection: Collection, id: &str) -> StoreError {
        StoreError::NotFound {
            collection: collection.table(),
            id: id.to_string(),
        }
    }
}

#[async_trait]
impl RemoteStore for InMemoryStore {
    async fn fetch_projects(&self) -> Result<Vec<Project>, StoreError> {
        self.check("fetch_projects")?;
        Ok(read(&self.projects).clone())
    }

    async fn get_project(&self, id: &str) -> Result<Project, StoreError> {
        self.check("get_project")?;
        read(&self.projects)
            .iter()
            .find(|p| p.id == id)
            .cloned()
            .ok_or_else(|| Self::not_found(Collection::Projects, id))
    }

    async fn insert_project(&self, draft: &ProjectDraft) -> Result<Project, StoreError> {
        self.check("insert_project")?;
        let project = Project {
            id: self.mint_id("project"),
            title: draft.title.clone(),
            client: draft.client.clone(),
            description: draft.description.clone(),
            status: draft.effective_status(),
            date: format_display(Utc::now()),
        };
        write(&self.projects).insert(0, project.clone());
        Ok(project)
    }

    async fn update_project_status(
        &self,
        id: &str,
        status: ProjectStatus,
    ) -> Result<(), StoreError> {
        self.check("update_project_status")?;
        let mut projects = write(&self.projects);
        let project = projects
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| Self::not_found(Collection::Projects, id))?;
        project.status = status;
        project.date = format_display(Utc::now());
        Ok(())
    }

    async fn project_documents(&self, project_id: &str) -> Result<Vec<Document>, StoreError> {
        self.check("project_documents")?;
        let mut docs: Vec<Document> = read(&self.documents)
            .iter()
            .filter(|d| d.project_id.as_deref() == Some(project_id))
            .cloned()
            .collect();
        docs.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(docs)
    }

    async fn documents_by_ids(&self, ids: &[String]) -> Result<Vec<SourceDocument>, StoreError> {
        self.check("documents_by_ids")?;
        Ok(read(&self.documents)
            .iter()
            .filter(|d| ids.contains(&d.id))
            .map(|d| SourceDocument {
                id: d.id.clone(),
                title: if d.title.is_empty() {
                    UNKNOWN_TITLE.to_string()
                } else {
                    d.title.clone()
                },
            })
            .collect())
    }

    async fn fetch_reports(&self) -> Result<Vec<Report>, StoreError> {
        self.check("fetch_reports")?;
        let mut docs: Vec<Document> = read(&self.documents)
            .iter()
            .filter(|d| d.rapport)
            .cloned()
            .collect();
        docs.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(docs.iter().map(|d| self.to_report(d)).collect())
    }

    async fn search_reports(&self, search: &ReportSearch) -> Result<Vec<ReportMatch>, StoreError> {
        self.check("search_reports")?;
        let reports = self.fetch_reports().await?;
        let report_name = search.report_name.trim();
        let project_name = search.project_name.trim();
        let client_name = search.client_name.trim();
        Ok(reports
            .into_iter()
            .filter(|r| report_name.is_empty() || contains_ci(&r.title, report_name))
            .filter(|r| {
                project_name.is_empty()
                    || (r.project_id.is_some() && contains_ci(&r.project_name, project_name))
            })
            .filter(|r| {
                client_name.is_empty()
                    || (r.project_id.is_some() && contains_ci(&r.client_name, client_name))
            })
            .map(|r| {
                let linked = r.project_id.is_some();
                ReportMatch {
                    id: r.id,
                    name: r.title,
                    project_name: linked.then_some(r.project_name),
                    client_name: linked.then_some(r.client_name),
                }
            })
            .collect())
    }

    async fn set_document_project(
        &self,
        document_id: &str,
        project_id: Option<&str>,
    ) -> Result<(), StoreError> {
        self.check("set_document_project")?;
        let mut docs = write(&self.documents);
        let doc = docs
            .iter_mut()
            .find(|d| d.id == document_id)
            .ok_or_else(|| Self::not_found(Collection::Documents, document_id))?;
        doc.project_id = project_id.map(str::to_string);
        Ok(())
    }

    async fn fetch_templates(&self) -> Result<Vec<Template>, StoreError> {
        self.check("fetch_templates")?;
        let mut templates = read(&self.templates).clone();
        templates.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(templates)
    }

    async fn insert_template(
        &self,
        title: &str,
        description: &str,
    ) -> Result<Template, StoreError> {
        self.check("insert_template")?;
        let template = Template {
            id: self.mint_id("template"),
            title: title.to_string(),
            description: description.to_string(),
            number_of_sections: 0,
            created_at: Utc::now(),
        };
        write(&self.templates).push(template.clone());
        Ok(template)
    }

    async fn update_template(
        &self,
        id: &str,
        title: &str,
        description: &str,
    ) -> Result<(), StoreError> {
        self.check("update_template")?;
        let mut templates = write(&self.templates);
        let template = templates
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or_else(|| Self::not_found(Collection::Templates, id))?;
        template.title = title.to_string();
        template.description = description.to_string();
        Ok(())
    }

    async fn set_section_count(&self, template_id: &str, count: u32) -> Result<(), StoreError> {
        self.check("set_section_count")?;
        let mut templates = write(&self.templates);
        let template = templates
            .iter_mut()
            .find(|t| t.id == template_id)
            .ok_or_else(|| Self::not_found(Collection::Templates, template_id))?;
        template.number_of_sections = count;
        Ok(())
    }

    async fn delete_template(&self, id: &str) -> Result<(), StoreError> {
        self.check("delete_template")?;
        write(&self.templates).retain(|t| t.id != id);
        write(&self.sections).retain(|s| s.template_rapport_id != id);
        Ok(())
    }

    async fn template_sections(
        &self,
        template_id: &str,
    ) -> Result<Vec<TemplateSection>, StoreError> {
        self.check("template_sections")?;
        let mut sections: Vec<TemplateSection> = read(&self.sections)
            .iter()
            .filter(|s| s.template_rapport_id == template_id)
            .cloned()
            .collect();
        sections.sort_by_key(|s| s.order_index);
        Ok(sections)
    }

    async fn insert_section(
        &self,
        template_id: &str,
        section: &NewSection,
        order_index: i32,
    ) -> Result<TemplateSection, StoreError> {
        self.check("insert_section")?;
        let created = TemplateSection {
            id: self.mint_id("section"),
            template_rapport_id: template_id.to_string(),
            title: section.title.clone(),
            instructions: section.instructions.clone(),
            example: section.example.clone().filter(|e| !e.is_empty()),
            order_index,
        };
        write(&self.sections).push(created.clone());
        Ok(created)
    }

    async fn set_section_order(
        &self,
        section_id: &str,
        order_index: i32,
    ) -> Result<(), StoreError> {
        self.check("set_section_order")?;
        let mut sections = write(&self.sections);
        let section = sections
            .iter_mut()
            .find(|s| s.id == section_id)
            .ok_or_else(|| Self::not_found(Collection::TemplateSections, section_id))?;
        section.order_index = order_index;
        Ok(())
    }

    async fn delete_section(&self, section_id: &str) -> Result<(), StoreError> {
        self.check("delete_section")?;
        write(&self.sections).retain(|s| s.id != section_id);
        Ok(())
    }

    async fn generated_parts(&self, project_id: &str) -> Result<Vec<GeneratedPart>, StoreError> {
        self.check("generated_parts")?;
        let mut parts: Vec<GeneratedPart> = read(&self.parts)
            .iter()
            .filter(|p| p.project_id == project_id)
            .cloned()
            .collect();
        parts.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(parts)
    }
}
