//! Row shapes of the remote store and their mapping to entities.
//!
//! The store names the client column `client_name`, keeps both
//! `created_at` and `last_update`, and allows nulls almost everywhere. The
//! mapping substitutes defaults so entities never carry store nulls they
//! cannot represent.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use rae_core::dates::format_display;
use rae_core::entities::{
    Document, GeneratedPart, Project, ProjectDraft, Report, ReportMatch, SourceDocument,
    Template, TemplateSection,
};
use rae_core::enums::ProjectStatus;

pub const UNTITLED_REPORT: &str = "Untitled report";
pub const UNSPECIFIED_PROJECT: &str = "Unspecified project";
pub const UNSPECIFIED_CLIENT: &str = "Unspecified client";
pub const UNKNOWN_TITLE: &str = "Unknown title";
pub const UNTITLED_PART: &str = "Untitled part";

/// Ids are uuids in some tables and bigints in others.
fn id_string<'de, D: Deserializer<'de>>(de: D) -> Result<String, D::Error> {
    match serde_json::Value::deserialize(de)? {
        serde_json::Value::String(s) => Ok(s),
        serde_json::Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!("invalid id: {other}"))),
    }
}

fn opt_id_string<'de, D: Deserializer<'de>>(de: D) -> Result<Option<String>, D::Error> {
    match Option::<serde_json::Value>::deserialize(de)? {
        None | Some(serde_json::Value::Null) => Ok(None),
        Some(serde_json::Value::String(s)) => Ok(Some(s)),
        Some(serde_json::Value::Number(n)) => Ok(Some(n.to_string())),
        Some(other) => Err(serde::de::Error::custom(format!("invalid id: {other}"))),
    }
}

// ── Projects ───────────────────────────────────────────────────────

pub const PROJECT_COLUMNS: &str = "id,title,client_name,description,status,created_at,last_update";

#[derive(Debug, Clone, Deserialize)]
pub struct ProjectRow {
    #[serde(deserialize_with = "id_string")]
    pub id: String,
    pub title: Option<String>,
    pub client_name: Option<String>,
    pub description: Option<String>,
    pub status: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub last_update: Option<DateTime<Utc>>,
}

impl ProjectRow {
    /// A missing status reads as `in_progress`; an unknown one is logged
    /// and read the same way.
    pub fn into_project(self) -> Project {
        let status = match self.status.as_deref() {
            None => ProjectStatus::InProgress,
            Some(raw) => raw.parse().unwrap_or_else(|_| {
                tracing::warn!(project = %self.id, status = raw, "unknown project status");
                ProjectStatus::InProgress
            }),
        };
        let date = self
            .last_update
            .or(self.created_at)
            .map(format_display)
            .unwrap_or_default();
        Project {
            id: self.id,
            title: self.title.unwrap_or_default(),
            client: self.client_name.unwrap_or_default(),
            description: self.description.unwrap_or_default(),
            status,
            date,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct NewProjectRow<'a> {
    pub title: &'a str,
    pub client_name: &'a str,
    pub description: &'a str,
    pub status: ProjectStatus,
    pub created_at: DateTime<Utc>,
    pub last_update: DateTime<Utc>,
}

impl<'a> NewProjectRow<'a> {
    pub fn from_draft(draft: &'a ProjectDraft, now: DateTime<Utc>) -> Self {
        Self {
            title: &draft.title,
            client_name: &draft.client,
            description: &draft.description,
            status: draft.effective_status(),
            created_at: now,
            last_update: now,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct StatusPatch {
    pub status: ProjectStatus,
    pub last_update: DateTime<Utc>,
}

// ── Documents and reports ──────────────────────────────────────────

pub const DOCUMENT_COLUMNS: &str =
    "id,title,project_id,document_type,created_at,url,cover_url,rapport";
pub const REPORT_COLUMNS: &str = "id,title,project_id,created_at,url,projects(title,client_name)";

#[derive(Debug, Clone, Deserialize)]
pub struct DocumentRow {
    #[serde(deserialize_with = "id_string")]
    pub id: String,
    pub title: Option<String>,
    #[serde(default, deserialize_with = "opt_id_string")]
    pub project_id: Option<String>,
    pub document_type: Option<String>,
    pub created_at: DateTime<Utc>,
    pub url: Option<String>,
    pub cover_url: Option<String>,
    pub rapport: Option<bool>,
}

impl DocumentRow {
    pub fn into_document(self) -> Document {
        Document {
            id: self.id,
            title: self.title.unwrap_or_default(),
            project_id: self.project_id,
            document_type: self.document_type,
            created_at: self.created_at,
            url: self.url,
            cover_url: self.cover_url,
            rapport: self.rapport.unwrap_or(false),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SourceRow {
    #[serde(deserialize_with = "id_string")]
    pub id: String,
    pub title: Option<String>,
}

impl SourceRow {
    pub fn into_source(self) -> SourceDocument {
        SourceDocument {
            id: self.id,
            title: self.title.unwrap_or_else(|| UNKNOWN_TITLE.to_string()),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct EmbeddedProject {
    pub title: Option<String>,
    pub client_name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReportRow {
    #[serde(deserialize_with = "id_string")]
    pub id: String,
    pub title: Option<String>,
    #[serde(default, deserialize_with = "opt_id_string")]
    pub project_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub url: Option<String>,
    pub projects: Option<EmbeddedProject>,
}

impl ReportRow {
    pub fn into_report(self) -> Report {
        let (project_name, client_name) = match self.projects {
            Some(p) => (
                p.title.unwrap_or_else(|| UNSPECIFIED_PROJECT.to_string()),
                p.client_name.unwrap_or_else(|| UNSPECIFIED_CLIENT.to_string()),
            ),
            None => (UNSPECIFIED_PROJECT.to_string(), UNSPECIFIED_CLIENT.to_string()),
        };
        Report {
            id: self.id,
            title: self
                .title
                .filter(|t| !t.is_empty())
                .unwrap_or_else(|| UNTITLED_REPORT.to_string()),
            project_id: self.project_id,
            project_name,
            client_name,
            date: format_display(self.created_at),
            url: self.url,
        }
    }

    pub fn into_match(self) -> ReportMatch {
        let (project_name, client_name) = self
            .projects
            .map_or((None, None), |p| (p.title, p.client_name));
        ReportMatch {
            id: self.id,
            name: self.title.unwrap_or_else(|| UNTITLED_REPORT.to_string()),
            project_name,
            client_name,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ProjectLinkPatch<'a> {
    pub project_id: Option<&'a str>,
}

// ── Templates ──────────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
pub struct TemplateRow {
    #[serde(deserialize_with = "id_string")]
    pub id: String,
    pub title: Option<String>,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub number_of_sections: Option<i64>,
}

impl TemplateRow {
    pub fn into_template(self) -> Template {
        Template {
            id: self.id,
            title: self.title.unwrap_or_default(),
            description: self.description.unwrap_or_default(),
            number_of_sections: self
                .number_of_sections
                .and_then(|n| u32::try_from(n).ok())
                .unwrap_or(0),
            created_at: self.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct NewTemplateRow<'a> {
    pub title: &'a str,
    pub description: &'a str,
    pub number_of_sections: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct TemplateDetailsPatch<'a> {
    pub title: &'a str,
    pub description: &'a str,
}

#[derive(Debug, Clone, Serialize)]
pub struct SectionCountPatch {
    pub number_of_sections: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SectionRow {
    #[serde(deserialize_with = "id_string")]
    pub id: String,
    #[serde(deserialize_with = "id_string")]
    pub template_rapport_id: String,
    pub title: Option<String>,
    pub instructions: Option<String>,
    pub example: Option<String>,
    pub order_index: Option<i32>,
}

impl SectionRow {
    pub fn into_section(self) -> TemplateSection {
        TemplateSection {
            id: self.id,
            template_rapport_id: self.template_rapport_id,
            title: self.title.unwrap_or_default(),
            instructions: self.instructions.unwrap_or_default(),
            example: self.example.filter(|e| !e.is_empty()),
            order_index: self.order_index.unwrap_or(0),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct NewSectionRow<'a> {
    pub template_rapport_id: &'a str,
    pub title: &'a str,
    pub instructions: &'a str,
    pub example: Option<&'a str>,
    pub order_index: i32,
}

#[derive(Debug, Clone, Serialize)]
pub struct OrderPatch {
    pub order_index: i32,
}

// ── Generated report parts ─────────────────────────────────────────

pub const GENERATED_PART_COLUMNS: &str = "id,project_id,template_rapport_part_id,content,source_ids,created_at,templates_rapports_parts(title)";

#[derive(Debug, Clone, Deserialize)]
pub struct PartTitle {
    pub title: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GeneratedPartRow {
    #[serde(deserialize_with = "id_string")]
    pub id: String,
    #[serde(deserialize_with = "id_string")]
    pub project_id: String,
    #[serde(default, deserialize_with = "opt_id_string")]
    pub template_rapport_part_id: Option<String>,
    pub content: Option<String>,
    pub source_ids: Option<Vec<String>>,
    pub created_at: DateTime<Utc>,
    pub templates_rapports_parts: Option<PartTitle>,
}

impl GeneratedPartRow {
    pub fn into_part(self) -> GeneratedPart {
        GeneratedPart {
            id: self.id,
            project_id: self.project_id,
            template_rapport_part_id: self.template_rapport_part_id,
            template_part_title: self
                .templates_rapports_parts
                .and_then(|p| p.title)
                .unwrap_or_else(|| UNTITLED_PART.to_string()),
            content: self.content.unwrap_or_default(),
            source_ids: self.source_ids.unwrap_or_default(),
            created_at: self.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn project_row_maps_client_and_prefers_last_update() {
        let row: ProjectRow = serde_json::from_str(
            r#"{
                "id": 7,
                "title": "École Jules Ferry",
                "client_name": "Mairie de Paris",
                "description": null,
                "status": "pending",
                "created_at": "2025-05-01T10:00:00Z",
                "last_update": "2025-05-05T10:00:00Z"
            }"#,
        )
        .unwrap();
        let project = row.into_project();
        assert_eq!(project.id, "7");
        assert_eq!(project.client, "Mairie de Paris");
        assert_eq!(project.description, "");
        assert_eq!(project.status, ProjectStatus::Pending);
        assert_eq!(project.date, "05/05/2025");
    }

    #[test]
    fn project_row_missing_status_reads_in_progress() {
        let row: ProjectRow = serde_json::from_str(
            r#"{"id":"a","title":"t","client_name":null,"description":null,
                "status":null,"created_at":"2025-01-02T00:00:00Z","last_update":null}"#,
        )
        .unwrap();
        let project = row.into_project();
        assert_eq!(project.status, ProjectStatus::InProgress);
        assert_eq!(project.date, "02/01/2025");
    }

    #[test]
    fn new_project_row_defaults_to_draft() {
        let draft = ProjectDraft::new("Campus");
        let now = Utc::now();
        let row = NewProjectRow::from_draft(&draft, now);
        let json = serde_json::to_value(&row).unwrap();
        assert_eq!(json["status"], "draft");
        assert_eq!(json["client_name"], "");
    }

    #[test]
    fn report_row_fills_missing_join() {
        let row: ReportRow = serde_json::from_str(
            r#"{"id":"r1","title":null,"project_id":null,
                "created_at":"2025-04-28T00:00:00Z","url":null,"projects":null}"#,
        )
        .unwrap();
        let report = row.into_report();
        assert_eq!(report.title, UNTITLED_REPORT);
        assert_eq!(report.project_name, UNSPECIFIED_PROJECT);
        assert_eq!(report.client_name, UNSPECIFIED_CLIENT);
        assert_eq!(report.date, "28/04/2025");
    }

    #[test]
    fn section_row_drops_empty_example() {
        let row: SectionRow = serde_json::from_str(
            r#"{"id":"s","template_rapport_id":"t","title":"Intro",
                "instructions":null,"example":"","order_index":3}"#,
        )
        .unwrap();
        let section = row.into_section();
        assert_eq!(section.example, None);
        assert_eq!(section.instructions, "");
        assert_eq!(section.order_index, 3);
    }

    #[test]
    fn source_row_without_title() {
        let row: SourceRow = serde_json::from_str(r#"{"id":"d","title":null}"#).unwrap();
        assert_eq!(row.into_source().title, UNKNOWN_TITLE);
    }
}
