//! PostgREST client for the Supabase-hosted store.
//!
//! Every table is reached at `{url}/rest/v1/{table}` with the `apikey` and
//! bearer headers set from the anon key. Reads decode into row types from
//! [`crate::rows`] and map to entities; writes filter by `id=eq.<id>`.

use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use serde::Serialize;
use serde::de::DeserializeOwned;

use rae_config::StoreConfig;
use rae_core::entities::{
    Document, GeneratedPart, NewSection, Project, ProjectDraft, Report, ReportMatch, ReportSearch,
    SourceDocument, Template, TemplateSection,
};
use rae_core::enums::ProjectStatus;

use crate::error::StoreError;
use crate::http::check_response;
use crate::query::{Collection, Query};
use crate::rows::{
    DOCUMENT_COLUMNS, DocumentRow, GENERATED_PART_COLUMNS, GeneratedPartRow, NewProjectRow,
    NewSectionRow, NewTemplateRow, OrderPatch, PROJECT_COLUMNS, ProjectLinkPatch, ProjectRow,
    REPORT_COLUMNS, ReportRow, SectionCountPatch, SectionRow, SourceRow, StatusPatch,
    TemplateDetailsPatch, TemplateRow,
};
use crate::RemoteStore;

/// Store adapter talking to a Supabase project over its REST interface.
pub struct SupabaseStore {
    http: reqwest::Client,
    rest_url: String,
}

impl SupabaseStore {
    /// Build a client from configuration.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotConfigured`] if the URL or key is missing,
    /// [`StoreError::InvalidHeader`] if the key or schema is not a valid
    /// header value, or [`StoreError::Http`] if the HTTP client cannot be built.
    pub fn new(config: &StoreConfig) -> Result<Self, StoreError> {
        if !config.is_configured() {
            return Err(StoreError::NotConfigured);
        }
        let mut headers = HeaderMap::new();
        headers.insert("apikey", header_value("anon_key", &config.anon_key)?);
        headers.insert(
            AUTHORIZATION,
            header_value("anon_key", &format!("Bearer {}", config.anon_key))?,
        );
        headers.insert("Accept-Profile", header_value("schema", &config.schema)?);
        headers.insert("Content-Profile", header_value("schema", &config.schema)?);

        let http = reqwest::Client::builder()
            .user_agent("raedificare/0.1")
            .default_headers(headers)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            rest_url: config.rest_url(),
        })
    }

    fn table_url(&self, collection: Collection) -> String {
        format!("{}/{}", self.rest_url, collection.table())
    }

    /// `GET` rows of a collection and decode them.
    async fn fetch_all<R: DeserializeOwned>(
        &self,
        collection: Collection,
        query: &Query,
    ) -> Result<Vec<R>, StoreError> {
        let url = format!("{}?{}", self.table_url(collection), query.to_query_string());
        tracing::debug!(table = collection.table(), %url, "store fetch");
        let resp = check_response(self.http.get(&url).send().await?).await?;
        let body = resp.text().await?;
        serde_json::from_str(&body).map_err(|e| StoreError::Decode {
            collection: collection.table(),
            reason: e.to_string(),
        })
    }

    /// `POST` one row and return its stored representation.
    async fn insert<B: Serialize + Sync, R: DeserializeOwned>(
        &self,
        collection: Collection,
        record: &B,
    ) -> Result<R, StoreError> {
        let url = self.table_url(collection);
        tracing::debug!(table = collection.table(), "store insert");
        let resp = check_response(
            self.http
                .post(&url)
                .header("Prefer", "return=representation")
                .json(record)
                .send()
                .await?,
        )
        .await?;
        let body = resp.text().await?;
        let rows: Vec<R> = serde_json::from_str(&body).map_err(|e| StoreError::Decode {
            collection: collection.table(),
            reason: e.to_string(),
        })?;
        rows.into_iter().next().ok_or(StoreError::EmptyInsert {
            collection: collection.table(),
        })
    }

    /// `PATCH` the row with the given id.
    async fn update<P: Serialize + Sync>(
        &self,
        collection: Collection,
        id: &str,
        patch: &P,
    ) -> Result<(), StoreError> {
        let url = format!("{}?{}", self.table_url(collection), Query::by_id(id));
        tracing::debug!(table = collection.table(), id, "store update");
        check_response(self.http.patch(&url).json(patch).send().await?).await?;
        Ok(())
    }

    /// `DELETE` the row with the given id.
    async fn delete(&self, collection: Collection, id: &str) -> Result<(), StoreError> {
        let url = format!("{}?{}", self.table_url(collection), Query::by_id(id));
        tracing::debug!(table = collection.table(), id, "store delete");
        check_response(self.http.delete(&url).send().await?).await?;
        Ok(())
    }
}

fn header_value(field: &'static str, value: &str) -> Result<HeaderValue, StoreError> {
    HeaderValue::from_str(value).map_err(|e| StoreError::InvalidHeader {
        field,
        reason: e.to_string(),
    })
}

#[async_trait]
impl RemoteStore for SupabaseStore {
    async fn fetch_projects(&self) -> Result<Vec<Project>, StoreError> {
        let query = Query::select(PROJECT_COLUMNS).order("created_at", false);
        let rows: Vec<ProjectRow> = self.fetch_all(Collection::Projects, &query).await?;
        Ok(rows.into_iter().map(ProjectRow::into_project).collect())
    }

    async fn get_project(&self, id: &str) -> Result<Project, StoreError> {
        let query = Query::select(PROJECT_COLUMNS).eq("id", id);
        let rows: Vec<ProjectRow> = self.fetch_all(Collection::Projects, &query).await?;
        rows.into_iter()
            .next()
            .map(ProjectRow::into_project)
            .ok_or_else(|| StoreError::NotFound {
                collection: Collection::Projects.table(),
                id: id.to_string(),
            })
    }

    async fn insert_project(&self, draft: &ProjectDraft) -> Result<Project, StoreError> {
        let row = NewProjectRow::from_draft(draft, Utc::now());
        let created: ProjectRow = self.insert(Collection::Projects, &row).await?;
        tracing::info!(project = %created.id, "project inserted");
        Ok(created.into_project())
    }

    async fn update_project_status(
        &self,
        id: &str,
        status: ProjectStatus,
    ) -> Result<(), StoreError> {
        let patch = StatusPatch {
            status,
            last_update: Utc::now(),
        };
        self.update(Collection::Projects, id, &patch).await?;
        tracing::info!(project = id, %status, "project status updated");
        Ok(())
    }

    async fn project_documents(&self, project_id: &str) -> Result<Vec<Document>, StoreError> {
        let query = Query::select(DOCUMENT_COLUMNS)
            .eq("project_id", project_id)
            .order("created_at", false);
        let rows: Vec<DocumentRow> = self.fetch_all(Collection::Documents, &query).await?;
        Ok(rows.into_iter().map(DocumentRow::into_document).collect())
    }

    async fn documents_by_ids(&self, ids: &[String]) -> Result<Vec<SourceDocument>, StoreError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let query = Query::select("id,title").in_list("id", ids);
        let rows: Vec<SourceRow> = self.fetch_all(Collection::Documents, &query).await?;
        Ok(rows.into_iter().map(SourceRow::into_source).collect())
    }

    async fn fetch_reports(&self) -> Result<Vec<Report>, StoreError> {
        let query = Query::select(REPORT_COLUMNS)
            .eq("rapport", true)
            .order("created_at", false);
        let rows: Vec<ReportRow> = self.fetch_all(Collection::Documents, &query).await?;
        Ok(rows.into_iter().map(ReportRow::into_report).collect())
    }

    async fn search_reports(&self, search: &ReportSearch) -> Result<Vec<ReportMatch>, StoreError> {
        let report_name = search.report_name.trim();
        let project_name = search.project_name.trim();
        let client_name = search.client_name.trim();

        // Filtering on the embedded project needs an inner join.
        let columns = if project_name.is_empty() && client_name.is_empty() {
            REPORT_COLUMNS.to_string()
        } else {
            REPORT_COLUMNS.replace("projects(", "projects!inner(")
        };
        let mut query = Query::select(&columns).eq("rapport", true);
        if !report_name.is_empty() {
            query = query.ilike("title", report_name);
        }
        if !project_name.is_empty() {
            query = query.ilike("projects.title", project_name);
        }
        if !client_name.is_empty() {
            query = query.ilike("projects.client_name", client_name);
        }
        let rows: Vec<ReportRow> = self.fetch_all(Collection::Documents, &query).await?;
        Ok(rows.into_iter().map(ReportRow::into_match).collect())
    }

    async fn set_document_project(
        &self,
        document_id: &str,
        project_id: Option<&str>,
    ) -> Result<(), StoreError> {
        self.update(
            Collection::Documents,
            document_id,
            &ProjectLinkPatch { project_id },
        )
        .await?;
        tracing::info!(document = document_id, project = ?project_id, "document link updated");
        Ok(())
    }

    async fn fetch_templates(&self) -> Result<Vec<Template>, StoreError> {
        let query = Query::default().order("created_at", false);
        let rows: Vec<TemplateRow> = self.fetch_all(Collection::Templates, &query).await?;
        Ok(rows.into_iter().map(TemplateRow::into_template).collect())
    }

    async fn insert_template(
        &self,
        title: &str,
        description: &str,
    ) -> Result<Template, StoreError> {
        let row = NewTemplateRow {
            title,
            description,
            number_of_sections: 0,
        };
        let created: TemplateRow = self.insert(Collection::Templates, &row).await?;
        tracing::info!(template = %created.id, "template inserted");
        Ok(created.into_template())
    }

    async fn update_template(
        &self,
        id: &str,
        title: &str,
        description: &str,
    ) -> Result<(), StoreError> {
        self.update(
            Collection::Templates,
            id,
            &TemplateDetailsPatch { title, description },
        )
        .await
    }

    async fn set_section_count(&self, template_id: &str, count: u32) -> Result<(), StoreError> {
        self.update(
            Collection::Templates,
            template_id,
            &SectionCountPatch {
                number_of_sections: count,
            },
        )
        .await
    }

    async fn delete_template(&self, id: &str) -> Result<(), StoreError> {
        self.delete(Collection::Templates, id).await?;
        tracing::info!(template = id, "template deleted");
        Ok(())
    }

    async fn template_sections(
        &self,
        template_id: &str,
    ) -> Result<Vec<TemplateSection>, StoreError> {
        let query = Query::default()
            .eq("template_rapport_id", template_id)
            .order("order_index", true);
        let rows: Vec<SectionRow> = self.fetch_all(Collection::TemplateSections, &query).await?;
        Ok(rows.into_iter().map(SectionRow::into_section).collect())
    }

    async fn insert_section(
        &self,
        template_id: &str,
        section: &NewSection,
        order_index: i32,
    ) -> Result<TemplateSection, StoreError> {
        let row = NewSectionRow {
            template_rapport_id: template_id,
            title: &section.title,
            instructions: &section.instructions,
            example: section.example.as_deref().filter(|e| !e.is_empty()),
            order_index,
        };
        let created: SectionRow = self.insert(Collection::TemplateSections, &row).await?;
        Ok(created.into_section())
    }

    async fn set_section_order(
        &self,
        section_id: &str,
        order_index: i32,
    ) -> Result<(), StoreError> {
        self.update(
            Collection::TemplateSections,
            section_id,
            &OrderPatch { order_index },
        )
        .await
    }

    async fn delete_section(&self, section_id: &str) -> Result<(), StoreError> {
        self.delete(Collection::TemplateSections, section_id).await
    }

    async fn generated_parts(&self, project_id: &str) -> Result<Vec<GeneratedPart>, StoreError> {
        let query = Query::select(GENERATED_PART_COLUMNS)
            .eq("project_id", project_id)
            .order("created_at", true);
        let rows: Vec<GeneratedPartRow> =
            self.fetch_all(Collection::GeneratedParts, &query).await?;
        Ok(rows.into_iter().map(GeneratedPartRow::into_part).collect())
    }
}
