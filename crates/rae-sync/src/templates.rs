//! Template list state and the section editor.

use std::sync::Arc;

use async_trait::async_trait;

use rae_core::entities::{NewSection, Template, TemplateSection};
use rae_core::enums::SortOrder;
use rae_store::RemoteStore;

use crate::context::AppContext;
use crate::error::SyncError;
use crate::list::{contains_ci, locale_cmp};
use crate::notices::Notices;
use crate::{Freshness, Refresh};

pub struct TemplatesState {
    store: Arc<dyn RemoteStore>,
    notices: Arc<Notices>,
    raw: Vec<Template>,
    search_term: String,
    sort: SortOrder,
    view: Vec<Template>,
    freshness: Freshness,
}

impl TemplatesState {
    pub fn new(ctx: &AppContext) -> Self {
        Self {
            store: Arc::clone(&ctx.store),
            notices: Arc::clone(&ctx.notices),
            raw: Vec::new(),
            search_term: String::new(),
            sort: ctx.config.general.default_sort,
            view: Vec::new(),
            freshness: Freshness::Stale,
        }
    }

    pub fn set_search_term(&mut self, term: impl Into<String>) {
        self.search_term = term.into();
        self.recompute_view();
    }

    pub fn set_sort_order(&mut self, sort: SortOrder) {
        self.sort = sort;
        self.recompute_view();
    }

    pub fn templates(&self) -> &[Template] {
        &self.view
    }

    pub fn raw(&self) -> &[Template] {
        &self.raw
    }

    pub const fn freshness(&self) -> Freshness {
        self.freshness
    }

    pub fn set_raw(&mut self, templates: Vec<Template>) {
        self.raw = templates;
        self.recompute_view();
    }

    /// Search on title and description, then sort. Chronological orders
    /// compare creation timestamps.
    fn recompute_view(&mut self) {
        let term = self.search_term.as_str();
        let mut view: Vec<Template> = self
            .raw
            .iter()
            .filter(|t| contains_ci(&t.title, term) || contains_ci(&t.description, term))
            .cloned()
            .collect();
        match self.sort {
            SortOrder::Newest => view.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
            SortOrder::Oldest => view.sort_by(|a, b| a.created_at.cmp(&b.created_at)),
            SortOrder::AlphaAsc => view.sort_by(|a, b| locale_cmp(&a.title, &b.title)),
            SortOrder::AlphaDesc => view.sort_by(|a, b| locale_cmp(&b.title, &a.title)),
        }
        self.view = view;
    }

    /// Create an empty template, then refresh.
    ///
    /// # Errors
    ///
    /// Validation error for a blank title, or [`SyncError::Store`].
    pub async fn create(&mut self, title: &str, description: &str) -> Result<Template, SyncError> {
        let title = title.trim();
        if title.is_empty() {
            self.notices.error("Error", "A template title is required");
            return Err(SyncError::validation("template title is required"));
        }
        let template = match self.store.insert_template(title, description.trim()).await {
            Ok(t) => t,
            Err(e) => {
                self.notices
                    .error("Error", format!("Unable to create the template: {e}"));
                return Err(e.into());
            }
        };
        self.notices
            .success("Template created", format!("{} was created", template.title));
        self.refresh().await;
        Ok(template)
    }

    /// Change title and description, then refresh.
    ///
    /// # Errors
    ///
    /// Validation error for a blank title, or [`SyncError::Store`].
    pub async fn update(
        &mut self,
        id: &str,
        title: &str,
        description: &str,
    ) -> Result<(), SyncError> {
        let title = title.trim();
        if title.is_empty() {
            self.notices.error("Error", "A template title is required");
            return Err(SyncError::validation("template title is required"));
        }
        if let Err(e) = self.store.update_template(id, title, description.trim()).await {
            self.notices
                .error("Error", format!("Unable to update the template: {e}"));
            return Err(e.into());
        }
        self.notices.success("Template updated", title.to_string());
        self.refresh().await;
        Ok(())
    }

    /// # Errors
    ///
    /// Returns [`SyncError::Store`] if the deletion fails.
    pub async fn delete(&mut self, id: &str) -> Result<(), SyncError> {
        if let Err(e) = self.store.delete_template(id).await {
            self.notices
                .error("Error", format!("Unable to delete the template: {e}"));
            return Err(e.into());
        }
        self.notices.success("Template deleted", "The template was deleted");
        self.refresh().await;
        Ok(())
    }
}

#[async_trait]
impl Refresh for TemplatesState {
    async fn refresh(&mut self) -> Freshness {
        match self.store.fetch_templates().await {
            Ok(templates) => {
                self.set_raw(templates);
                self.freshness = Freshness::Live;
            }
            Err(e) => {
                self.notices
                    .error("Error", format!("Unable to load templates: {e}"));
                self.freshness = Freshness::Stale;
            }
        }
        self.freshness
    }
}

// ── Section editor ─────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
}

/// Ordered sections of one template.
///
/// After every mutation the parent's `number_of_sections` equals the child
/// count, and `order_index` values are `0..n` after a deletion.
pub struct TemplateEditor {
    store: Arc<dyn RemoteStore>,
    notices: Arc<Notices>,
    template_id: String,
    sections: Vec<TemplateSection>,
}

impl TemplateEditor {
    /// Load the sections of `template_id`.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::Store`] if the sections cannot be fetched.
    pub async fn open(ctx: &AppContext, template_id: &str) -> Result<Self, SyncError> {
        let mut editor = Self {
            store: Arc::clone(&ctx.store),
            notices: Arc::clone(&ctx.notices),
            template_id: template_id.to_string(),
            sections: Vec::new(),
        };
        editor.reload().await?;
        Ok(editor)
    }

    pub fn template_id(&self) -> &str {
        &self.template_id
    }

    /// Sections by ascending `order_index`.
    pub fn sections(&self) -> &[TemplateSection] {
        &self.sections
    }

    async fn reload(&mut self) -> Result<(), SyncError> {
        let mut sections = self.store.template_sections(&self.template_id).await?;
        sections.sort_by_key(|s| s.order_index);
        self.sections = sections;
        Ok(())
    }

    async fn sync_count(&self, count: usize) -> Result<(), SyncError> {
        let count = u32::try_from(count).unwrap_or(u32::MAX);
        self.store
            .set_section_count(&self.template_id, count)
            .await?;
        Ok(())
    }

    fn fail(&self, what: &str, e: SyncError) -> SyncError {
        self.notices.error("Error", format!("Unable to {what}: {e}"));
        e
    }

    /// Append a section at position `n` (the current count).
    ///
    /// # Errors
    ///
    /// Validation error for a blank title, or [`SyncError::Store`].
    pub async fn add_section(&mut self, section: NewSection) -> Result<TemplateSection, SyncError> {
        if section.title.trim().is_empty() {
            self.notices.error("Error", "A section title is required");
            return Err(SyncError::validation("section title is required"));
        }
        let count = self.sections.len();
        let order = i32::try_from(count).unwrap_or(i32::MAX);
        let result = async {
            let created = self
                .store
                .insert_section(&self.template_id, &section, order)
                .await?;
            self.sync_count(count + 1).await?;
            Ok::<_, SyncError>(created)
        }
        .await;
        let created = result.map_err(|e| self.fail("add the section", e))?;
        self.reload().await?;
        self.notices.success("Section added", created.title.clone());
        Ok(created)
    }

    /// Swap a section with its neighbour. Returns `false` at either end.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::Store`] if either update fails.
    pub async fn move_section(
        &mut self,
        section_id: &str,
        direction: Direction,
    ) -> Result<bool, SyncError> {
        let Some(index) = self.sections.iter().position(|s| s.id == section_id) else {
            return Err(SyncError::Core(rae_core::errors::CoreError::NotFound {
                entity_type: "section".into(),
                id: section_id.to_string(),
            }));
        };
        let neighbour = match direction {
            Direction::Up if index > 0 => index - 1,
            Direction::Down if index + 1 < self.sections.len() => index + 1,
            _ => return Ok(false),
        };
        let (current, other) = (&self.sections[index], &self.sections[neighbour]);
        let result = async {
            self.store
                .set_section_order(&current.id, other.order_index)
                .await?;
            self.store
                .set_section_order(&other.id, current.order_index)
                .await?;
            Ok::<_, SyncError>(())
        }
        .await;
        result.map_err(|e| self.fail("move the section", e))?;
        self.reload().await?;
        Ok(true)
    }

    /// Delete a section, renumber the rest to `0..n`, update the count.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::Store`] if any write fails.
    pub async fn delete_section(&mut self, section_id: &str) -> Result<(), SyncError> {
        let remaining: Vec<TemplateSection> = self
            .sections
            .iter()
            .filter(|s| s.id != section_id)
            .cloned()
            .collect();
        let result = async {
            self.store.delete_section(section_id).await?;
            for (i, section) in remaining.iter().enumerate() {
                let wanted = i32::try_from(i).unwrap_or(i32::MAX);
                if section.order_index != wanted {
                    self.store.set_section_order(&section.id, wanted).await?;
                }
            }
            self.sync_count(remaining.len()).await
        }
        .await;
        result.map_err(|e| self.fail("delete the section", e))?;
        self.reload().await?;
        self.notices.success("Section deleted", "The section was deleted");
        Ok(())
    }
}
