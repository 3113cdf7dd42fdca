use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Report content produced by the part-generation webhook for one
/// template section of a project.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GeneratedPart {
    pub id: String,
    pub project_id: String,
    pub template_rapport_part_id: Option<String>,
    pub template_part_title: String,
    pub content: String,
    #[serde(default)]
    pub source_ids: Vec<String>,
    pub created_at: DateTime<Utc>,
}
