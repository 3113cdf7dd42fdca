use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::dates::format_display;

/// A reusable report outline.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Template {
    pub id: String,
    pub title: String,
    pub description: String,
    /// Must equal the number of child sections.
    pub number_of_sections: u32,
    pub created_at: DateTime<Utc>,
}

impl Template {
    #[must_use]
    pub fn last_updated(&self) -> String {
        format_display(self.created_at)
    }
}

/// One ordered section of a [`Template`], with generation instructions.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TemplateSection {
    pub id: String,
    pub template_rapport_id: String,
    pub title: String,
    pub instructions: String,
    pub example: Option<String>,
    pub order_index: i32,
}

/// Input for appending a section to a template.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct NewSection {
    pub title: String,
    pub instructions: String,
    pub example: Option<String>,
}
