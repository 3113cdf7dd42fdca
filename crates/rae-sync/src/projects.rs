//! Project list state.
//!
//! Holds the raw project collection and three independent parameters
//! (search term, status filter, sort order). Changing any of them recomputes
//! the visible projection from the raw list: search, then status, then sort.
//! Status counts are tallied over the raw list only, and only when it
//! changes.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;

use rae_config::FallbackPolicy;
use rae_core::entities::Project;
use rae_core::enums::{ProjectStatus, SortOrder, StatusFilter};
use rae_store::RemoteStore;
use rae_webhooks::Webhooks;

use crate::context::AppContext;
use crate::error::SyncError;
use crate::fallback::sample_projects;
use crate::list::{contains_ci, sort_by_order};
use crate::notices::Notices;
use crate::{Freshness, Refresh};

/// Number of projects per status, over the unfiltered list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusCounts(BTreeMap<ProjectStatus, usize>);

impl StatusCounts {
    pub fn tally(projects: &[Project]) -> Self {
        let mut counts: BTreeMap<ProjectStatus, usize> =
            ProjectStatus::ALL.into_iter().map(|s| (s, 0)).collect();
        for project in projects {
            *counts.entry(project.status).or_default() += 1;
        }
        Self(counts)
    }

    pub fn get(&self, status: ProjectStatus) -> usize {
        self.0.get(&status).copied().unwrap_or(0)
    }

    pub fn total(&self) -> usize {
        self.0.values().sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (ProjectStatus, usize)> + '_ {
        self.0.iter().map(|(s, n)| (*s, *n))
    }
}

pub struct ProjectsState {
    store: Arc<dyn RemoteStore>,
    webhooks: Arc<dyn Webhooks>,
    notices: Arc<Notices>,
    fallback: FallbackPolicy,
    raw: Vec<Project>,
    counts: StatusCounts,
    search_term: String,
    status_filter: StatusFilter,
    sort: SortOrder,
    view: Vec<Project>,
    freshness: Freshness,
}

impl ProjectsState {
    pub fn new(ctx: &AppContext) -> Self {
        Self {
            store: Arc::clone(&ctx.store),
            webhooks: Arc::clone(&ctx.webhooks),
            notices: Arc::clone(&ctx.notices),
            fallback: ctx.config.general.project_fallback,
            raw: Vec::new(),
            counts: StatusCounts::tally(&[]),
            search_term: String::new(),
            status_filter: StatusFilter::All,
            sort: ctx.config.general.default_sort,
            view: Vec::new(),
            freshness: Freshness::Stale,
        }
    }

    // ── Projection ─────────────────────────────────────────────────

    pub fn set_search_term(&mut self, term: impl Into<String>) {
        self.search_term = term.into();
        self.recompute_view();
    }

    pub fn set_status_filter(&mut self, filter: StatusFilter) {
        self.status_filter = filter;
        self.recompute_view();
    }

    pub fn set_sort_order(&mut self, sort: SortOrder) {
        self.sort = sort;
        self.recompute_view();
    }

    /// The filtered and sorted projection.
    pub fn projects(&self) -> &[Project] {
        &self.view
    }

    /// The unfiltered collection.
    pub fn raw(&self) -> &[Project] {
        &self.raw
    }

    pub const fn counts(&self) -> &StatusCounts {
        &self.counts
    }

    pub const fn freshness(&self) -> Freshness {
        self.freshness
    }

    pub fn get(&self, id: &str) -> Option<&Project> {
        self.raw.iter().find(|p| p.id == id)
    }

    /// Replace the raw collection, recomputing counts and the projection.
    pub fn set_raw(&mut self, projects: Vec<Project>) {
        self.counts = StatusCounts::tally(&projects);
        self.raw = projects;
        self.recompute_view();
    }

    fn recompute_view(&mut self) {
        let term = self.search_term.as_str();
        let mut view: Vec<Project> = self
            .raw
            .iter()
            .filter(|p| {
                contains_ci(&p.title, term)
                    || contains_ci(&p.client, term)
                    || contains_ci(&p.description, term)
            })
            .filter(|p| self.status_filter.matches(p.status))
            .cloned()
            .collect();
        sort_by_order(&mut view, self.sort, |p| p.date.as_str(), |p| p.title.as_str());
        self.view = view;
    }

    // ── Mutations ──────────────────────────────────────────────────

    /// Change a project's status, then refresh.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::Store`] if the update fails. An error notice is
    /// recorded as well.
    pub async fn update_status(
        &mut self,
        id: &str,
        status: ProjectStatus,
    ) -> Result<(), SyncError> {
        if let Err(e) = self.store.update_project_status(id, status).await {
            self.notices
                .error("Error", format!("Unable to update the project status: {e}"));
            return Err(e.into());
        }
        self.notices
            .success("Status updated", format!("Project status is now {status}"));
        self.refresh().await;
        Ok(())
    }

    /// Delete a project through the deletion webhook, then refresh.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::Webhook`] if the webhook call fails.
    pub async fn delete(&mut self, id: &str) -> Result<(), SyncError> {
        if let Err(e) = self.webhooks.delete_project(id).await {
            self.notices
                .error("Error", format!("Unable to delete the project: {e}"));
            return Err(e.into());
        }
        self.notices.success("Project deleted", "The project was deleted");
        self.refresh().await;
        Ok(())
    }
}

#[async_trait]
impl Refresh for ProjectsState {
    /// Refetch every project. On failure the last good list is kept; an
    /// empty list is replaced by the samples when the policy allows it.
    async fn refresh(&mut self) -> Freshness {
        match self.store.fetch_projects().await {
            Ok(projects) => {
                tracing::debug!(count = projects.len(), "projects refreshed");
                self.set_raw(projects);
                self.freshness = Freshness::Live;
            }
            Err(e) => {
                self.notices
                    .error("Error", format!("Unable to load projects: {e}"));
                if self.raw.is_empty() && self.fallback == FallbackPolicy::Sample {
                    tracing::warn!("showing sample projects");
                    self.set_raw(sample_projects());
                    self.freshness = Freshness::Sample;
                } else if self.freshness != Freshness::Sample {
                    self.freshness = Freshness::Stale;
                }
            }
        }
        self.freshness
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{context_with, project};
    use pretty_assertions::assert_eq;
    use rae_store::InMemoryStore;

    fn seeded() -> Vec<Project> {
        vec![
            project("1", "Rénovation Immeuble", "ABC Construction", ProjectStatus::InProgress, "12/05/2025"),
            project("2", "Déconstruction Usine", "Groupe Vinci", ProjectStatus::Completed, "08/05/2025"),
            project("3", "École Jules Ferry", "Mairie de Paris", ProjectStatus::Pending, "05/05/2025"),
            project("4", "Extension Centre", "Carrefour", ProjectStatus::InProgress, "02/05/2025"),
        ]
    }

    #[test]
    fn search_matches_title_client_or_description() {
        let (ctx, _, _) = context_with(InMemoryStore::new());
        let mut state = ProjectsState::new(&ctx);
        let mut projects = seeded();
        projects[3].description = "Parking souterrain".into();
        state.set_raw(projects);

        state.set_search_term("VINCI");
        assert_eq!(ids(&state), vec!["2"]);
        state.set_search_term("parking");
        assert_eq!(ids(&state), vec!["4"]);
        state.set_search_term("r");
        state.set_status_filter(StatusFilter::Only(ProjectStatus::InProgress));
        assert_eq!(ids(&state), vec!["1", "4"]);
    }

    #[test]
    fn search_term_is_matched_as_typed() {
        let (ctx, _, _) = context_with(InMemoryStore::new());
        let mut state = ProjectsState::new(&ctx);
        state.set_raw(seeded());

        state.set_search_term("ferry ");
        assert!(state.projects().is_empty());
        state.set_search_term("  ");
        assert!(state.projects().is_empty());
        state.set_search_term("jules ferry");
        assert_eq!(ids(&state), vec!["3"]);
    }

    #[test]
    fn counts_ignore_filters() {
        let (ctx, _, _) = context_with(InMemoryStore::new());
        let mut state = ProjectsState::new(&ctx);
        state.set_raw(seeded());
        let before = state.counts().clone();
        state.set_status_filter(StatusFilter::Only(ProjectStatus::Completed));
        state.set_search_term("zzz");
        state.set_sort_order(SortOrder::AlphaDesc);
        assert!(state.projects().is_empty());
        assert_eq!(state.counts(), &before);
        assert_eq!(before.get(ProjectStatus::InProgress), 2);
        assert_eq!(before.get(ProjectStatus::Draft), 0);
        assert_eq!(before.total(), 4);
    }

    #[test]
    fn alpha_sort_ignores_accents() {
        let (ctx, _, _) = context_with(InMemoryStore::new());
        let mut state = ProjectsState::new(&ctx);
        state.set_raw(seeded());
        state.set_sort_order(SortOrder::AlphaAsc);
        assert_eq!(ids(&state), vec!["2", "3", "4", "1"]);
    }

    #[tokio::test]
    async fn failed_first_fetch_shows_samples() {
        let store = InMemoryStore::new();
        store.set_offline(true);
        let (ctx, _, _) = context_with(store);
        let mut state = ProjectsState::new(&ctx);
        assert_eq!(state.refresh().await, Freshness::Sample);
        assert_eq!(state.raw().len(), 5);
        assert!(ctx.notices.has_errors());
    }

    #[tokio::test]
    async fn failed_later_fetch_keeps_cache() {
        let (ctx, store, _) = context_with(InMemoryStore::with_projects(seeded()));
        let mut state = ProjectsState::new(&ctx);
        assert_eq!(state.refresh().await, Freshness::Live);
        store.set_offline(true);
        assert_eq!(state.refresh().await, Freshness::Stale);
        assert_eq!(state.raw(), seeded().as_slice());
    }

    #[tokio::test]
    async fn no_samples_when_policy_is_none() {
        let store = InMemoryStore::new();
        store.set_offline(true);
        let (mut ctx, _, _) = context_with(store);
        ctx.config.general.project_fallback = FallbackPolicy::None;
        let mut state = ProjectsState::new(&ctx);
        assert_eq!(state.refresh().await, Freshness::Stale);
        assert!(state.raw().is_empty());
    }

    #[tokio::test]
    async fn delete_goes_through_webhook_then_refreshes() {
        let (ctx, store, hooks) = context_with(InMemoryStore::with_projects(seeded()));
        let mut state = ProjectsState::new(&ctx);
        state.refresh().await;
        hooks.on_delete_project({
            let store = Arc::clone(&store);
            move |id| store.remove_project(id)
        });
        state.delete("2").await.unwrap();
        assert_eq!(hooks.calls(), vec!["delete_project p=2"]);
        assert_eq!(state.raw().len(), 3);
        assert_eq!(state.counts().get(ProjectStatus::Completed), 0);
    }

    #[tokio::test]
    async fn status_update_refreshes() {
        let (ctx, _, _) = context_with(InMemoryStore::with_projects(seeded()));
        let mut state = ProjectsState::new(&ctx);
        state.refresh().await;
        state
            .update_status("3", ProjectStatus::Archived)
            .await
            .unwrap();
        assert_eq!(state.get("3").unwrap().status, ProjectStatus::Archived);
        assert_eq!(state.counts().get(ProjectStatus::Pending), 0);
    }

    fn ids(state: &ProjectsState) -> Vec<&str> {
        state.projects().iter().map(|p| p.id.as_str()).collect()
    }
}
