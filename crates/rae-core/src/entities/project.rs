use serde::{Deserialize, Serialize};

use crate::enums::ProjectStatus;

/// A reuse-diagnosis project as shown in list views.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Project {
    pub id: String,
    pub title: String,
    pub client: String,
    pub description: String,
    pub status: ProjectStatus,
    /// Display-formatted last update (`dd/mm/yyyy`). Derived, not authoritative.
    pub date: String,
}

/// Input for creating a project. `status` defaults to `draft`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProjectDraft {
    pub title: String,
    pub client: String,
    pub description: String,
    pub status: Option<ProjectStatus>,
}

impl ProjectDraft {
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn effective_status(&self) -> ProjectStatus {
        self.status.unwrap_or_default()
    }
}
