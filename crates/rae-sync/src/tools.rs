//! Content suggestions and spell-checking.

use std::sync::Arc;

use rae_webhooks::{Suggestion, SuggestionRequest, Webhooks};

use crate::context::AppContext;
use crate::error::SyncError;
use crate::notices::Notices;
use crate::orchestrator::InFlight;

/// Channels the suggestion service writes for.
pub const CONTENT_TYPES: [&str; 4] = ["blog", "instagram", "linkedin", "facebook"];

#[derive(Clone)]
pub struct ContentTools {
    webhooks: Arc<dyn Webhooks>,
    notices: Arc<Notices>,
    generating: InFlight,
}

impl ContentTools {
    pub fn new(ctx: &AppContext) -> Self {
        Self {
            webhooks: Arc::clone(&ctx.webhooks),
            notices: Arc::clone(&ctx.notices),
            generating: InFlight::new("content generation"),
        }
    }

    /// Ask for publication drafts derived from a report.
    ///
    /// An empty result is returned as-is with an info notice.
    ///
    /// # Errors
    ///
    /// Validation error without a report or content type,
    /// [`SyncError::Busy`], or [`SyncError::Webhook`].
    pub async fn suggest_content(
        &self,
        rapport_id: &str,
        content_types: &[String],
        instructions: Option<&str>,
    ) -> Result<Vec<Suggestion>, SyncError> {
        if rapport_id.trim().is_empty() {
            self.notices.error("Error", "Select a report");
            return Err(SyncError::validation("a report is required"));
        }
        if content_types.is_empty() {
            self.notices
                .error("Error", "Select at least one content type");
            return Err(SyncError::validation("at least one content type is required"));
        }
        let _guard = self.generating.try_start()?;

        let request = SuggestionRequest {
            rapport_id: rapport_id.to_string(),
            content_types: content_types.to_vec(),
            instructions: instructions
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string),
        };
        let suggestions = self.webhooks.suggest_content(&request).await.map_err(|e| {
            self.notices
                .error("Error", format!("Unable to generate the content: {e}"));
            SyncError::from(e)
        })?;
        if suggestions.is_empty() {
            self.notices.info(
                "No suggestion",
                "No suggestion was generated for this selection",
            );
        }
        Ok(suggestions)
    }

    /// Spell-check and correct a paragraph.
    ///
    /// # Errors
    ///
    /// Validation error for blank text, or [`SyncError::Webhook`] (an
    /// answer without a correction is an external response error).
    pub async fn correct_text(&self, text: &str) -> Result<String, SyncError> {
        if text.trim().is_empty() {
            self.notices.error("Error", "Enter some text to correct");
            return Err(SyncError::validation("text is empty"));
        }
        self.webhooks.correct_text(text).await.map_err(|e| {
            self.notices
                .error("Error", format!("Unable to correct the text: {e}"));
            SyncError::from(e)
        })
    }
}
