//! Multi-step mutation orchestrators.
//!
//! Each flow runs dependent remote steps in order: a later step needs ids or
//! URLs produced by an earlier one. Nothing is transactional. The first
//! failing step aborts the flow with [`SyncError::Step`] and an error
//! notice; steps that already succeeded are not undone and the caller's
//! input is left in place for a retry. File uploads run one at a time so
//! progress is deterministic.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use rae_core::entities::{Project, ProjectDraft};
use rae_store::RemoteStore;
use rae_webhooks::{SaveOutcome, Upload, Webhooks};

use crate::context::AppContext;
use crate::error::{FlowStep, SyncError};
use crate::notices::Notices;
use crate::Refresh;

// ── Re-entrancy guard ──────────────────────────────────────────────

/// "Is this flow running" flag, shared by clones of an orchestrator.
#[derive(Debug, Clone)]
pub struct InFlight {
    running: Arc<AtomicBool>,
    operation: &'static str,
}

impl InFlight {
    pub fn new(operation: &'static str) -> Self {
        Self {
            running: Arc::new(AtomicBool::new(false)),
            operation,
        }
    }

    /// Mark the flow as running until the guard drops.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::Busy`] if the flow is already running.
    pub fn try_start(&self) -> Result<InFlightGuard, SyncError> {
        self.running
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| SyncError::Busy {
                operation: self.operation,
            })?;
        Ok(InFlightGuard {
            running: Arc::clone(&self.running),
        })
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }
}

#[must_use = "the flow is only marked as running while the guard lives"]
pub struct InFlightGuard {
    running: Arc<AtomicBool>,
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.running.store(false, Ordering::Release);
    }
}

// ── Progress ───────────────────────────────────────────────────────

/// Receives a completion percentage (0-100) as a flow advances.
pub trait ProgressSink: Send {
    fn set(&mut self, percent: u8);
}

/// Discards progress.
pub struct NoProgress;

impl ProgressSink for NoProgress {
    fn set(&mut self, _percent: u8) {}
}

/// Records every reported value.
impl ProgressSink for Vec<u8> {
    fn set(&mut self, percent: u8) {
        self.push(percent);
    }
}

/// Upload files sequentially, reporting progress from 0 to 50.
///
/// A file saved without a URL is skipped with a warning.
async fn upload_batch(
    webhooks: &dyn Webhooks,
    files: &[Upload],
    progress: &mut dyn ProgressSink,
) -> Result<Vec<String>, SyncError> {
    let total = files.len();
    let mut urls = Vec::with_capacity(total);
    for (i, file) in files.iter().enumerate() {
        let outcome = webhooks.save_document(file).await.map_err(|e| {
            SyncError::at(FlowStep::Upload {
                index: i + 1,
                total,
                file_name: file.file_name.clone(),
            })(e.into())
        })?;
        match outcome {
            SaveOutcome::Stored(url) => urls.push(url),
            SaveOutcome::MissingUrl => {
                tracing::warn!(file = %file.file_name, "upload returned no document URL; skipping");
            }
        }
        progress.set(half_percent(i + 1, total));
    }
    Ok(urls)
}

/// `done / total` of the first half of a flow, in whole percent.
fn half_percent(done: usize, total: usize) -> u8 {
    u8::try_from(done * 50 / total.max(1)).unwrap_or(50)
}

// ── Project creation ───────────────────────────────────────────────

/// Input of the project creation dialog.
#[derive(Debug, Clone, Default)]
pub struct ProjectForm {
    pub draft: ProjectDraft,
    pub files: Vec<Upload>,
}

impl ProjectForm {
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// Insert project → upload files → link them → refresh.
#[derive(Clone)]
pub struct ProjectCreation {
    store: Arc<dyn RemoteStore>,
    webhooks: Arc<dyn Webhooks>,
    notices: Arc<Notices>,
    in_flight: InFlight,
}

impl ProjectCreation {
    pub fn new(ctx: &AppContext) -> Self {
        Self {
            store: Arc::clone(&ctx.store),
            webhooks: Arc::clone(&ctx.webhooks),
            notices: Arc::clone(&ctx.notices),
            in_flight: InFlight::new("project creation"),
        }
    }

    pub const fn in_flight(&self) -> &InFlight {
        &self.in_flight
    }

    /// Run the creation flow. On success the form is cleared and
    /// `on_success` is refreshed; on failure the form is left untouched.
    ///
    /// Progress: each upload adds its share of 50%; 50% right after the
    /// insert when there are no files; 100% once linking is done or skipped.
    ///
    /// # Errors
    ///
    /// - Validation error when the title is blank (no remote call made).
    /// - [`SyncError::Busy`] when a creation is already running.
    /// - [`SyncError::Step`] naming the insert, upload or link that failed.
    pub async fn submit(
        &self,
        form: &mut ProjectForm,
        progress: &mut dyn ProgressSink,
        on_success: &mut dyn Refresh,
    ) -> Result<Project, SyncError> {
        let _guard = self.in_flight.try_start()?;
        if form.draft.title.trim().is_empty() {
            self.notices.error("Error", "A project title is required");
            return Err(SyncError::validation("project title is required"));
        }

        match self.run(form, progress).await {
            Ok(project) => {
                on_success.refresh().await;
                let uploaded = form.files.len();
                form.clear();
                self.notices.success(
                    "Project created",
                    format!("{} created with {uploaded} document(s)", project.title),
                );
                Ok(project)
            }
            Err(e) => {
                self.notices
                    .error("Error", format!("Unable to create the project: {e}"));
                Err(e)
            }
        }
    }

    async fn run(
        &self,
        form: &ProjectForm,
        progress: &mut dyn ProgressSink,
    ) -> Result<Project, SyncError> {
        let project = self
            .store
            .insert_project(&form.draft)
            .await
            .map_err(|e| SyncError::at(FlowStep::InsertProject)(e.into()))?;
        tracing::info!(project = %project.id, files = form.files.len(), "project inserted");

        let urls = if form.files.is_empty() {
            progress.set(50);
            Vec::new()
        } else {
            upload_batch(self.webhooks.as_ref(), &form.files, progress).await?
        };

        if !urls.is_empty() {
            self.webhooks
                .link_documents(&project.id, &urls)
                .await
                .map_err(|e| SyncError::at(FlowStep::LinkDocuments)(e.into()))?;
        }
        progress.set(100);
        Ok(project)
    }
}

// ── Document import ────────────────────────────────────────────────

/// Upload files → link them to an existing project → refresh.
#[derive(Clone)]
pub struct DocumentImport {
    webhooks: Arc<dyn Webhooks>,
    notices: Arc<Notices>,
    in_flight: InFlight,
}

impl DocumentImport {
    pub fn new(ctx: &AppContext) -> Self {
        Self {
            webhooks: Arc::clone(&ctx.webhooks),
            notices: Arc::clone(&ctx.notices),
            in_flight: InFlight::new("document import"),
        }
    }

    pub const fn in_flight(&self) -> &InFlight {
        &self.in_flight
    }

    /// Import `files` into `project_id`. The link call is made even when no
    /// upload returned a URL. `files` is cleared on success.
    ///
    /// # Errors
    ///
    /// Validation error when `files` is empty, [`SyncError::Busy`], or the
    /// failing [`SyncError::Step`].
    pub async fn submit(
        &self,
        project_id: &str,
        files: &mut Vec<Upload>,
        progress: &mut dyn ProgressSink,
        on_success: &mut dyn Refresh,
    ) -> Result<usize, SyncError> {
        let _guard = self.in_flight.try_start()?;
        if files.is_empty() {
            self.notices.error("Error", "Select at least one file");
            return Err(SyncError::validation("at least one file is required"));
        }

        let result = async {
            let urls = upload_batch(self.webhooks.as_ref(), files, progress).await?;
            self.webhooks
                .link_documents(project_id, &urls)
                .await
                .map_err(|e| SyncError::at(FlowStep::LinkDocuments)(e.into()))?;
            progress.set(100);
            Ok::<_, SyncError>(())
        }
        .await;

        match result {
            Ok(()) => {
                on_success.refresh().await;
                let count = files.len();
                files.clear();
                self.notices
                    .success("Documents imported", format!("{count} document(s) imported"));
                Ok(count)
            }
            Err(e) => {
                self.notices
                    .error("Error", format!("Unable to import the documents: {e}"));
                Err(e)
            }
        }
    }
}

// ── Report import ──────────────────────────────────────────────────

/// Upload one report file → register it as a report → refresh.
#[derive(Clone)]
pub struct ReportImport {
    webhooks: Arc<dyn Webhooks>,
    notices: Arc<Notices>,
    in_flight: InFlight,
}

impl ReportImport {
    pub fn new(ctx: &AppContext) -> Self {
        Self {
            webhooks: Arc::clone(&ctx.webhooks),
            notices: Arc::clone(&ctx.notices),
            in_flight: InFlight::new("report import"),
        }
    }

    pub const fn in_flight(&self) -> &InFlight {
        &self.in_flight
    }

    /// # Errors
    ///
    /// [`SyncError::Busy`], or the failing [`SyncError::Step`]. A save
    /// without a URL fails the upload step.
    pub async fn run(&self, upload: &Upload, on_success: &mut dyn Refresh) -> Result<(), SyncError> {
        let _guard = self.in_flight.try_start()?;
        let result = async {
            let url = save_required(self.webhooks.as_ref(), upload).await?;
            self.webhooks
                .add_report(&url)
                .await
                .map_err(|e| SyncError::at(FlowStep::RegisterReport)(e.into()))
        }
        .await;

        match result {
            Ok(()) => {
                on_success.refresh().await;
                self.notices
                    .success("Report added", format!("{} was added", upload.file_name));
                Ok(())
            }
            Err(e) => {
                self.notices
                    .error("Error", format!("Unable to add the report: {e}"));
                Err(e)
            }
        }
    }
}

/// Save one file whose URL the next step needs.
async fn save_required(webhooks: &dyn Webhooks, upload: &Upload) -> Result<String, SyncError> {
    let step = || FlowStep::Upload {
        index: 1,
        total: 1,
        file_name: upload.file_name.clone(),
    };
    webhooks
        .save_document(upload)
        .await
        .and_then(SaveOutcome::require_url)
        .map_err(|e| SyncError::at(step())(e.into()))
}

// ── Titled report import ───────────────────────────────────────────

/// Input of the "add a report to a project" dialog.
#[derive(Debug, Clone, Default)]
pub struct TitledReportForm {
    pub file: Option<Upload>,
    pub title: String,
    pub project_id: Option<String>,
}

/// Upload one file → register it as a titled report of a project → refresh.
#[derive(Clone)]
pub struct TitledReportImport {
    webhooks: Arc<dyn Webhooks>,
    notices: Arc<Notices>,
    in_flight: InFlight,
}

impl TitledReportImport {
    pub fn new(ctx: &AppContext) -> Self {
        Self {
            webhooks: Arc::clone(&ctx.webhooks),
            notices: Arc::clone(&ctx.notices),
            in_flight: InFlight::new("report upload"),
        }
    }

    /// File, title and project are all required. The form is cleared on
    /// success.
    ///
    /// # Errors
    ///
    /// Validation error for a missing input, [`SyncError::Busy`], or the
    /// failing [`SyncError::Step`].
    pub async fn submit(
        &self,
        form: &mut TitledReportForm,
        on_success: &mut dyn Refresh,
    ) -> Result<(), SyncError> {
        let _guard = self.in_flight.try_start()?;
        let title = form.title.trim();
        let (Some(file), Some(project_id), false) =
            (form.file.as_ref(), form.project_id.as_deref(), title.is_empty())
        else {
            self.notices
                .error("Error", "A file, a title and a project are required");
            return Err(SyncError::validation(
                "file, title and project are required",
            ));
        };

        let result = async {
            let url = save_required(self.webhooks.as_ref(), file).await?;
            self.webhooks
                .add_project_report(project_id, &url, title)
                .await
                .map_err(|e| SyncError::at(FlowStep::RegisterReport)(e.into()))
        }
        .await;

        match result {
            Ok(()) => {
                on_success.refresh().await;
                self.notices
                    .success("Report added", format!("{title} was added to the project"));
                form.file = None;
                form.title.clear();
                form.project_id = None;
                Ok(())
            }
            Err(e) => {
                self.notices
                    .error("Error", format!("Unable to add the report: {e}"));
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::projects::ProjectsState;
    use crate::reports::ReportsState;
    use crate::testing::context_with;
    use pretty_assertions::assert_eq;
    use rae_store::InMemoryStore;

    fn files(names: &[&str]) -> Vec<Upload> {
        names.iter().map(|n| Upload::new(*n, b"data".to_vec())).collect()
    }

    fn form(title: &str, names: &[&str]) -> ProjectForm {
        ProjectForm {
            draft: ProjectDraft::new(title),
            files: files(names),
        }
    }

    #[tokio::test]
    async fn creation_with_files_uploads_in_order_then_links_once() {
        let (ctx, _, hooks) = context_with(InMemoryStore::new());
        let flow = ProjectCreation::new(&ctx);
        let mut list = ProjectsState::new(&ctx);
        let mut form = form("Campus", &["a.pdf", "b.pdf", "c.pdf"]);
        let mut progress = Vec::new();

        let project = flow.submit(&mut form, &mut progress, &mut list).await.unwrap();

        assert_eq!(progress, vec![16, 33, 50, 100]);
        assert_eq!(
            hooks.calls(),
            vec![
                "save_document a.pdf".to_string(),
                "save_document b.pdf".to_string(),
                "save_document c.pdf".to_string(),
                format!("link_documents p={} n=3", project.id),
            ]
        );
        assert!(form.draft.title.is_empty());
        assert!(form.files.is_empty());
        assert_eq!(list.raw().len(), 1);
        assert!(!flow.in_flight().is_running());
    }

    #[tokio::test]
    async fn failing_second_upload_aborts_without_link_or_rollback() {
        let (ctx, store, hooks) = context_with(InMemoryStore::new());
        hooks.fail("save_document b.pdf");
        let flow = ProjectCreation::new(&ctx);
        let mut list = ProjectsState::new(&ctx);
        let mut form = form("Usine", &["a.pdf", "b.pdf", "c.pdf"]);
        let mut progress = Vec::new();

        let err = flow
            .submit(&mut form, &mut progress, &mut list)
            .await
            .unwrap_err();

        assert!(matches!(
            err.failed_step(),
            Some(FlowStep::Upload { index: 2, total: 3, .. })
        ));
        assert!(!progress.contains(&100));
        assert!(hooks.calls().iter().all(|c| !c.starts_with("link_documents")));
        assert!(!hooks.calls().contains(&"save_document c.pdf".to_string()));
        assert_eq!(store.fetch_projects().await.unwrap().len(), 1);
        assert_eq!(form.draft.title, "Usine");
        assert_eq!(form.files.len(), 3);
        assert!(ctx.notices.has_errors());
    }

    #[tokio::test]
    async fn creation_without_files_jumps_to_half_then_done() {
        let (ctx, _, hooks) = context_with(InMemoryStore::new());
        let flow = ProjectCreation::new(&ctx);
        let mut list = ProjectsState::new(&ctx);
        let mut form = form("Extension", &[]);
        let mut progress = Vec::new();

        flow.submit(&mut form, &mut progress, &mut list).await.unwrap();

        assert_eq!(progress, vec![50, 100]);
        assert!(hooks.calls().is_empty());
    }

    #[tokio::test]
    async fn failed_insert_stops_everything() {
        let store = InMemoryStore::new();
        store.fail_on("insert_project");
        let (ctx, _, hooks) = context_with(store);
        let flow = ProjectCreation::new(&ctx);
        let mut list = ProjectsState::new(&ctx);
        let mut form = form("Campus", &["a.pdf"]);

        let err = flow
            .submit(&mut form, &mut NoProgress, &mut list)
            .await
            .unwrap_err();

        assert_eq!(err.failed_step(), Some(&FlowStep::InsertProject));
        assert!(hooks.calls().is_empty());
        assert_eq!(form.files.len(), 1);
    }

    #[tokio::test]
    async fn blank_title_makes_no_remote_call() {
        let (ctx, store, hooks) = context_with(InMemoryStore::new());
        let flow = ProjectCreation::new(&ctx);
        let mut list = ProjectsState::new(&ctx);
        let mut form = form("  ", &["a.pdf"]);

        let err = flow
            .submit(&mut form, &mut NoProgress, &mut list)
            .await
            .unwrap_err();

        assert!(err.is_validation());
        assert!(hooks.calls().is_empty());
        assert!(store.fetch_projects().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn uploads_without_url_are_skipped() {
        let (ctx, _, hooks) = context_with(InMemoryStore::new());
        hooks.missing_url_for("b.pdf");
        let flow = ProjectCreation::new(&ctx);
        let mut list = ProjectsState::new(&ctx);
        let mut form = form("Campus", &["a.pdf", "b.pdf"]);

        let project = flow
            .submit(&mut form, &mut NoProgress, &mut list)
            .await
            .unwrap();

        assert!(hooks
            .calls()
            .contains(&format!("link_documents p={} n=1", project.id)));
    }

    #[test]
    fn second_start_is_rejected_until_guard_drops() {
        let flag = InFlight::new("project creation");
        let guard = flag.try_start().unwrap();
        assert!(matches!(flag.try_start(), Err(SyncError::Busy { .. })));
        assert!(flag.clone().is_running());
        drop(guard);
        assert!(flag.try_start().is_ok());
    }

    #[tokio::test]
    async fn document_import_requires_files_and_always_links() {
        let (ctx, _, hooks) = context_with(InMemoryStore::new());
        hooks.missing_url_for("a.pdf");
        let flow = DocumentImport::new(&ctx);
        let mut list = ProjectsState::new(&ctx);

        let mut none = Vec::new();
        let err = flow
            .submit("p1", &mut none, &mut NoProgress, &mut list)
            .await
            .unwrap_err();
        assert!(err.is_validation());

        let mut some = files(&["a.pdf"]);
        let count = flow
            .submit("p1", &mut some, &mut NoProgress, &mut list)
            .await
            .unwrap();
        assert_eq!(count, 1);
        assert!(some.is_empty());
        assert_eq!(
            hooks.calls(),
            vec!["save_document a.pdf", "link_documents p=p1 n=0"]
        );
    }

    #[tokio::test]
    async fn report_import_needs_the_saved_url() {
        let (ctx, _, hooks) = context_with(InMemoryStore::new());
        hooks.missing_url_for("r.pdf");
        let flow = ReportImport::new(&ctx);
        let mut reports = ReportsState::new(&ctx);

        let err = flow
            .run(&Upload::new("r.pdf", b"x".to_vec()), &mut reports)
            .await
            .unwrap_err();
        assert!(matches!(err.failed_step(), Some(FlowStep::Upload { .. })));
        assert_eq!(hooks.calls(), vec!["save_document r.pdf"]);
    }

    #[tokio::test]
    async fn report_import_registers_the_url() {
        let (ctx, _, hooks) = context_with(InMemoryStore::new());
        let mut reports = ReportsState::new(&ctx);
        reports
            .add_report(&Upload::new("r.pdf", b"x".to_vec()))
            .await
            .unwrap();
        assert_eq!(
            hooks.calls(),
            vec!["save_document r.pdf", "add_report https://files.test/r.pdf"]
        );
        assert!(!reports.is_importing());
    }

    #[tokio::test]
    async fn titled_import_validates_then_registers() {
        let (ctx, _, hooks) = context_with(InMemoryStore::new());
        let flow = TitledReportImport::new(&ctx);
        let mut reports = ReportsState::new(&ctx);
        let mut form = TitledReportForm {
            file: Some(Upload::new("final.pdf", b"x".to_vec())),
            title: "Rapport final".into(),
            project_id: None,
        };

        let err = flow.submit(&mut form, &mut reports).await.unwrap_err();
        assert!(err.is_validation());
        assert!(hooks.calls().is_empty());

        form.project_id = Some("p1".into());
        flow.submit(&mut form, &mut reports).await.unwrap();
        assert_eq!(
            hooks.calls(),
            vec![
                "save_document final.pdf",
                "add_project_report p=p1 Rapport final https://files.test/final.pdf"
            ]
        );
        assert!(form.file.is_none());
        assert!(form.title.is_empty());
    }
}
