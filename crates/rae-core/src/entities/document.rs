use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::dates::format_display;

/// An uploaded document. A document flagged `rapport` is a finished report.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Document {
    pub id: String,
    pub title: String,
    pub project_id: Option<String>,
    pub document_type: Option<String>,
    pub created_at: DateTime<Utc>,
    pub url: Option<String>,
    pub cover_url: Option<String>,
    #[serde(default)]
    pub rapport: bool,
}

impl Document {
    /// Display date of the upload.
    #[must_use]
    pub fn date(&self) -> String {
        format_display(self.created_at)
    }
}

/// A report document joined with its project's title and client.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Report {
    pub id: String,
    pub title: String,
    /// `None` when the report is not linked to any project.
    pub project_id: Option<String>,
    pub project_name: String,
    pub client_name: String,
    pub date: String,
    pub url: Option<String>,
}

/// Criteria of the report search used to pick a chat scope.
///
/// Blank fields do not filter. Matching is a case-insensitive substring test.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ReportSearch {
    pub report_name: String,
    pub project_name: String,
    pub client_name: String,
}

impl ReportSearch {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.report_name.trim().is_empty()
            && self.project_name.trim().is_empty()
            && self.client_name.trim().is_empty()
    }
}

/// A report found by [`ReportSearch`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ReportMatch {
    pub id: String,
    pub name: String,
    pub project_name: Option<String>,
    pub client_name: Option<String>,
}
