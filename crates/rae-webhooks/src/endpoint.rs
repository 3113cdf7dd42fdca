//! The fixed webhook routes.

use reqwest::Method;

/// One webhook route under the configured base URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    SaveDocument,
    LinkDocuments,
    DeleteProject,
    AddReport,
    AddProjectReport,
    ProjectChat,
    ReportChat,
    ContentSuggestions,
    GenerateParts,
    DeleteDocument,
    CorrectText,
}

impl Endpoint {
    pub const ALL: [Self; 11] = [
        Self::SaveDocument,
        Self::LinkDocuments,
        Self::DeleteProject,
        Self::AddReport,
        Self::AddProjectReport,
        Self::ProjectChat,
        Self::ReportChat,
        Self::ContentSuggestions,
        Self::GenerateParts,
        Self::DeleteDocument,
        Self::CorrectText,
    ];

    /// Path relative to the webhook base URL.
    #[must_use]
    pub const fn path(self) -> &'static str {
        match self {
            Self::SaveDocument => "/documents/save",
            Self::LinkDocuments => "/project/documents/add",
            Self::DeleteProject => "/project/delete",
            Self::AddReport => "/rapport/add",
            Self::AddProjectReport => "/project/rapport/add",
            Self::ProjectChat => "/project/chat",
            Self::ReportChat => "/rapports/chat",
            Self::ContentSuggestions => "/rapport/content/suggestions",
            Self::GenerateParts => "/rapport/part/create",
            Self::DeleteDocument => "/projects/documents/delete",
            Self::CorrectText => "/paragraph/correct",
        }
    }

    #[must_use]
    pub fn method(self) -> Method {
        match self {
            Self::DeleteProject | Self::DeleteDocument => Method::DELETE,
            _ => Method::POST,
        }
    }

    /// Message used when a failed call carries no readable error body.
    #[must_use]
    pub const fn fallback_message(self) -> &'static str {
        match self {
            Self::SaveDocument => "unknown error while uploading the file",
            Self::LinkDocuments => "unknown error while linking the documents",
            Self::DeleteProject => "unknown error while deleting the project",
            Self::AddReport | Self::AddProjectReport => "unknown error while adding the report",
            Self::ProjectChat | Self::ReportChat => "unknown error from the assistant",
            Self::ContentSuggestions => "unknown error while generating suggestions",
            Self::GenerateParts => "unknown error while generating report parts",
            Self::DeleteDocument => "unknown error while deleting the document",
            Self::CorrectText => "unknown server error",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn paths_are_unique() {
        let paths: HashSet<_> = Endpoint::ALL.iter().map(|e| e.path()).collect();
        assert_eq!(paths.len(), Endpoint::ALL.len());
    }

    #[test]
    fn only_deletions_use_delete() {
        for endpoint in Endpoint::ALL {
            let is_delete = endpoint.method() == Method::DELETE;
            assert_eq!(is_delete, endpoint.path().contains("delete"), "{endpoint:?}");
        }
    }
}
