//! Report list state.
//!
//! Reports are documents flagged `rapport`. The view filters by project id
//! and exact client name, then sorts.

use std::collections::BTreeSet;
use std::sync::Arc;

use async_trait::async_trait;

use rae_core::entities::Report;
use rae_core::enums::SortOrder;
use rae_store::RemoteStore;
use rae_webhooks::{Upload, Webhooks};

use crate::context::AppContext;
use crate::error::SyncError;
use crate::list::{locale_cmp, sort_by_order};
use crate::notices::Notices;
use crate::orchestrator::ReportImport;
use crate::{Freshness, Refresh};

pub struct ReportsState {
    store: Arc<dyn RemoteStore>,
    webhooks: Arc<dyn Webhooks>,
    notices: Arc<Notices>,
    import: ReportImport,
    raw: Vec<Report>,
    project_filter: Option<String>,
    client_filter: Option<String>,
    sort: SortOrder,
    view: Vec<Report>,
    freshness: Freshness,
}

impl ReportsState {
    pub fn new(ctx: &AppContext) -> Self {
        Self {
            store: Arc::clone(&ctx.store),
            webhooks: Arc::clone(&ctx.webhooks),
            notices: Arc::clone(&ctx.notices),
            import: ReportImport::new(ctx),
            raw: Vec::new(),
            project_filter: None,
            client_filter: None,
            sort: ctx.config.general.default_sort,
            view: Vec::new(),
            freshness: Freshness::Stale,
        }
    }

    /// Keep only reports linked to this project id. `None` shows all.
    pub fn set_project_filter(&mut self, project_id: Option<String>) {
        self.project_filter = project_id;
        self.recompute_view();
    }

    /// Keep only reports whose client name is exactly this. `None` shows all.
    pub fn set_client_filter(&mut self, client: Option<String>) {
        self.client_filter = client;
        self.recompute_view();
    }

    pub fn set_sort_order(&mut self, sort: SortOrder) {
        self.sort = sort;
        self.recompute_view();
    }

    pub fn reports(&self) -> &[Report] {
        &self.view
    }

    pub fn raw(&self) -> &[Report] {
        &self.raw
    }

    pub const fn freshness(&self) -> Freshness {
        self.freshness
    }

    /// Distinct `(project id, project name)` pairs of linked reports.
    pub fn project_options(&self) -> Vec<(String, String)> {
        let mut options: Vec<(String, String)> = self
            .raw
            .iter()
            .filter_map(|r| r.project_id.clone().map(|id| (id, r.project_name.clone())))
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        options.sort_by(|a, b| locale_cmp(&a.1, &b.1));
        options
    }

    /// Distinct client names.
    pub fn client_options(&self) -> Vec<String> {
        let mut options: Vec<String> = self
            .raw
            .iter()
            .map(|r| r.client_name.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        options.sort_by(|a, b| locale_cmp(a, b));
        options
    }

    pub fn set_raw(&mut self, reports: Vec<Report>) {
        self.raw = reports;
        self.recompute_view();
    }

    fn recompute_view(&mut self) {
        let mut view: Vec<Report> = self
            .raw
            .iter()
            .filter(|r| {
                self.project_filter
                    .as_deref()
                    .is_none_or(|id| r.project_id.as_deref() == Some(id))
            })
            .filter(|r| {
                self.client_filter
                    .as_deref()
                    .is_none_or(|client| r.client_name == client)
            })
            .cloned()
            .collect();
        sort_by_order(&mut view, self.sort, |r| r.date.as_str(), |r| r.title.as_str());
        self.view = view;
    }

    /// Upload a report file, register it, then refresh.
    ///
    /// # Errors
    ///
    /// Returns the failing step's error. See [`ReportImport::run`].
    pub async fn add_report(&mut self, upload: &Upload) -> Result<(), SyncError> {
        let import = self.import.clone();
        import.run(upload, self).await
    }

    /// Delete a report through the document-delete webhook, then refresh.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::Webhook`] if the webhook call fails.
    pub async fn delete_report(&mut self, report_id: &str) -> Result<(), SyncError> {
        if let Err(e) = self.webhooks.delete_document(report_id).await {
            self.notices
                .error("Error", format!("Unable to delete the report: {e}"));
            return Err(e.into());
        }
        self.notices.success("Report deleted", "The report was deleted");
        self.refresh().await;
        Ok(())
    }

    /// Link a report to a project, then refresh.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::Store`] if the update fails.
    pub async fn link_to_project(
        &mut self,
        report_id: &str,
        project_id: &str,
    ) -> Result<(), SyncError> {
        self.set_link(report_id, Some(project_id)).await
    }

    /// Detach a report from its project, then refresh.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::Store`] if the update fails.
    pub async fn unlink(&mut self, report_id: &str) -> Result<(), SyncError> {
        self.set_link(report_id, None).await
    }

    async fn set_link(&mut self, report_id: &str, project_id: Option<&str>) -> Result<(), SyncError> {
        if let Err(e) = self.store.set_document_project(report_id, project_id).await {
            self.notices
                .error("Error", format!("Unable to link the report to the project: {e}"));
            return Err(e.into());
        }
        let verb = if project_id.is_some() {
            "linked to"
        } else {
            "unlinked from"
        };
        self.notices
            .success("Report updated", format!("Report {verb} the project"));
        self.refresh().await;
        Ok(())
    }

    /// Whether an import is currently running.
    pub fn is_importing(&self) -> bool {
        self.import.in_flight().is_running()
    }
}

#[async_trait]
impl Refresh for ReportsState {
    async fn refresh(&mut self) -> Freshness {
        match self.store.fetch_reports().await {
            Ok(reports) => {
                tracing::debug!(count = reports.len(), "reports refreshed");
                self.set_raw(reports);
                self.freshness = Freshness::Live;
            }
            Err(e) => {
                self.notices
                    .error("Error", format!("Unable to load reports: {e}"));
                self.freshness = Freshness::Stale;
            }
        }
        self.freshness
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{context_with, project};
    use chrono::{TimeZone, Utc};
    use pretty_assertions::assert_eq;
    use rae_core::entities::Document;
    use rae_core::enums::ProjectStatus;
    use rae_store::InMemoryStore;

    fn report(id: &str, project: Option<(&str, &str)>, client: &str, date: &str) -> Report {
        Report {
            id: id.into(),
            title: format!("Rapport {id}"),
            project_id: project.map(|(id, _)| id.to_string()),
            project_name: project.map_or("Unspecified project", |(_, name)| name).into(),
            client_name: client.into(),
            date: date.into(),
            url: None,
        }
    }

    fn seeded() -> Vec<Report> {
        vec![
            report("r1", Some(("p1", "Usine")), "Vinci", "08/05/2025"),
            report("r2", Some(("p2", "Campus")), "Vinci", "02/05/2025"),
            report("r3", Some(("p2", "Campus")), "Mairie de Paris", "05/05/2025"),
            report("r4", None, "Unspecified client", "10/05/2025"),
        ]
    }

    fn ids(state: &ReportsState) -> Vec<&str> {
        state.reports().iter().map(|r| r.id.as_str()).collect()
    }

    fn stored_report(id: &str, project_id: Option<&str>, day: u32) -> Document {
        Document {
            id: id.into(),
            title: format!("Rapport {id}"),
            project_id: project_id.map(str::to_string),
            document_type: Some("pdf".into()),
            created_at: Utc.with_ymd_and_hms(2025, 5, day, 8, 0, 0).unwrap(),
            url: None,
            cover_url: None,
            rapport: true,
        }
    }

    fn store_with_reports() -> InMemoryStore {
        let store = InMemoryStore::with_projects(vec![project(
            "p1",
            "Usine",
            "Vinci",
            ProjectStatus::InProgress,
            "01/05/2025",
        )]);
        store.push_document(stored_report("r1", Some("p1"), 2));
        store.push_document(stored_report("r2", None, 6));
        store
    }

    #[test]
    fn project_and_client_filters_combine() {
        let (ctx, _, _) = context_with(InMemoryStore::new());
        let mut state = ReportsState::new(&ctx);
        state.set_raw(seeded());
        assert_eq!(ids(&state), vec!["r4", "r1", "r3", "r2"]);

        state.set_project_filter(Some("p2".into()));
        assert_eq!(ids(&state), vec!["r3", "r2"]);
        state.set_client_filter(Some("Vinci".into()));
        assert_eq!(ids(&state), vec!["r2"]);
        state.set_client_filter(Some("vinci".into()));
        assert!(ids(&state).is_empty());
        state.set_project_filter(None);
        state.set_client_filter(Some("Vinci".into()));
        assert_eq!(ids(&state), vec!["r1", "r2"]);
    }

    #[test]
    fn oldest_reverses_newest() {
        let (ctx, _, _) = context_with(InMemoryStore::new());
        let mut state = ReportsState::new(&ctx);
        state.set_raw(seeded());
        let newest: Vec<String> = ids(&state).into_iter().map(str::to_string).collect();
        state.set_sort_order(SortOrder::Oldest);
        let mut oldest: Vec<String> = ids(&state).into_iter().map(str::to_string).collect();
        oldest.reverse();
        assert_eq!(newest, oldest);
    }

    #[test]
    fn options_come_from_the_raw_list() {
        let (ctx, _, _) = context_with(InMemoryStore::new());
        let mut state = ReportsState::new(&ctx);
        state.set_raw(seeded());
        state.set_client_filter(Some("Mairie de Paris".into()));

        assert_eq!(
            state.project_options(),
            vec![
                ("p2".to_string(), "Campus".to_string()),
                ("p1".to_string(), "Usine".to_string()),
            ]
        );
        assert_eq!(
            state.client_options(),
            vec!["Mairie de Paris", "Unspecified client", "Vinci"]
        );
    }

    #[tokio::test]
    async fn link_and_unlink_refresh_the_list() {
        let (ctx, store, _) = context_with(store_with_reports());
        let mut state = ReportsState::new(&ctx);
        state.refresh().await;
        assert_eq!(state.raw()[0].project_name, "Unspecified project");

        state.link_to_project("r2", "p1").await.unwrap();
        assert_eq!(state.raw()[0].project_id.as_deref(), Some("p1"));
        assert_eq!(state.raw()[0].client_name, "Vinci");

        state.unlink("r1").await.unwrap();
        assert_eq!(state.raw()[1].project_id, None);
        assert!(store.documents().iter().all(|d| d.project_id.is_none() || d.id == "r2"));
        assert_eq!(state.freshness(), Freshness::Live);
    }

    #[tokio::test]
    async fn failed_link_keeps_the_cache() {
        let (ctx, store, _) = context_with(store_with_reports());
        let mut state = ReportsState::new(&ctx);
        state.refresh().await;
        store.fail_on("set_document_project");

        assert!(state.link_to_project("r2", "p1").await.is_err());
        assert_eq!(state.raw()[0].project_id, None);
        assert!(ctx.notices.has_errors());
    }

    #[tokio::test]
    async fn delete_goes_through_the_webhook() {
        let (ctx, store, hooks) = context_with(store_with_reports());
        let mem = Arc::clone(&store);
        hooks.on_delete_document(move |id| mem.remove_document(id));
        let mut state = ReportsState::new(&ctx);
        state.refresh().await;

        state.delete_report("r2").await.unwrap();
        assert_eq!(hooks.calls(), vec!["delete_document d=r2"]);
        assert_eq!(ids(&state), vec!["r1"]);
    }

    #[tokio::test]
    async fn failed_delete_leaves_the_list() {
        let (ctx, _, hooks) = context_with(store_with_reports());
        hooks.fail("delete_document");
        let mut state = ReportsState::new(&ctx);
        state.refresh().await;

        assert!(state.delete_report("r2").await.is_err());
        assert_eq!(ids(&state), vec!["r2", "r1"]);
        assert!(ctx.notices.has_errors());
    }
}
