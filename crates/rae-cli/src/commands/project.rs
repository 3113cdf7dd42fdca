use anyhow::Context;
use serde::Serialize;
use serde_json::json;

use rae_core::entities::{Document, GeneratedPart, Project, ProjectDraft};
use rae_sync::orchestrator::{ProjectCreation, ProjectForm};
use rae_sync::{AppContext, ProjectDetail, ProjectsState, Refresh};

use crate::cli::subcommands::ProjectCommands;
use crate::cli::{GlobalFlags, OutputFormat};
use crate::commands::shared::{note_freshness, read_uploads};
use crate::output::{output, output_list};
use crate::progress::Progress;

pub const PROJECT_COLUMNS: &[&str] = &["id", "title", "client", "status", "date"];
const DOCUMENT_COLUMNS: &[&str] = &["id", "title", "document_type", "rapport", "url"];
const PART_COLUMNS: &[&str] = &["id", "template_part_title", "created_at"];

#[derive(Serialize)]
struct ProjectView<'a> {
    project: &'a Project,
    documents: &'a [Document],
    parts: &'a [GeneratedPart],
}

/// Handle `rae project`.
pub async fn handle(
    action: &ProjectCommands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match action {
        ProjectCommands::List {
            search,
            status,
            sort,
        } => {
            let mut state = ProjectsState::new(ctx);
            if let Some(search) = search {
                state.set_search_term(search.as_str());
            }
            if let Some(status) = status {
                state.set_status_filter(*status);
            }
            if let Some(sort) = sort {
                state.set_sort_order(*sort);
            }
            note_freshness(state.refresh().await, "projects");
            output_list(state.projects(), PROJECT_COLUMNS, flags.format)
        }
        ProjectCommands::Show { id } => show(id, ctx, flags).await,
        ProjectCommands::Create {
            title,
            client,
            description,
            status,
            files,
        } => {
            let mut form = ProjectForm {
                draft: ProjectDraft {
                    title: title.clone(),
                    client: client.clone(),
                    description: description.clone(),
                    status: *status,
                },
                files: read_uploads(files).await?,
            };
            let mut state = ProjectsState::new(ctx);
            let mut progress = Progress::percent("creating project");
            let result = ProjectCreation::new(ctx)
                .submit(&mut form, &mut progress, &mut state)
                .await;
            progress.finish_with(result.is_ok(), "");
            let project = result?;
            output(&project, flags.format)
        }
        ProjectCommands::Status { id, status } => {
            let mut state = ProjectsState::new(ctx);
            state.update_status(id, *status).await?;
            match state.get(id) {
                Some(project) => output(project, flags.format),
                None => Ok(()),
            }
        }
        ProjectCommands::Delete { id } => {
            let mut state = ProjectsState::new(ctx);
            state.delete(id).await?;
            Ok(())
        }
        ProjectCommands::Import { id, files } => {
            let mut uploads = read_uploads(files).await?;
            let mut detail = open(id, ctx).await?;
            let mut progress = Progress::percent("importing documents");
            let result = detail.import_documents(&mut uploads, &mut progress).await;
            progress.finish_with(result.is_ok(), "");
            let imported = result?;
            output(&json!({ "project_id": id, "imported": imported }), flags.format)
        }
        ProjectCommands::DeleteDocument { id, document } => {
            let mut detail = open(id, ctx).await?;
            detail.delete_document(document).await?;
            output_list(detail.documents(), DOCUMENT_COLUMNS, flags.format)
        }
    }
}

/// Open a project, failing when it cannot be loaded.
pub async fn open(id: &str, ctx: &AppContext) -> anyhow::Result<ProjectDetail> {
    let detail = ProjectDetail::open(ctx, id).await;
    detail
        .project()
        .with_context(|| format!("project {id} could not be loaded"))?;
    Ok(detail)
}

async fn show(id: &str, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let detail = open(id, ctx).await?;
    let project = detail
        .project()
        .with_context(|| format!("project {id} could not be loaded"))?;
    if flags.format == OutputFormat::Table {
        output(project, flags.format)?;
        println!();
        output_list(detail.documents(), DOCUMENT_COLUMNS, flags.format)?;
        println!();
        return output_list(detail.parts(), PART_COLUMNS, flags.format);
    }
    output(
        &ProjectView {
            project,
            documents: detail.documents(),
            parts: detail.parts(),
        },
        flags.format,
    )
}
