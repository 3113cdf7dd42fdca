use rae_core::entities::ReportSearch;
use rae_store::RemoteStore;
use rae_sync::orchestrator::{TitledReportForm, TitledReportImport};
use rae_sync::{AppContext, Refresh, ReportsState};
use rae_webhooks::Upload;

use crate::cli::{GlobalFlags, OutputFormat};
use crate::cli::subcommands::ReportCommands;
use crate::commands::shared::note_freshness;
use crate::output::output_list;

const REPORT_COLUMNS: &[&str] = &["id", "title", "project_name", "client_name", "date"];
const MATCH_COLUMNS: &[&str] = &["id", "name", "project_name", "client_name"];

/// Handle `rae report`.
pub async fn handle(
    action: &ReportCommands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let mut state = ReportsState::new(ctx);
    match action {
        ReportCommands::List {
            project,
            client,
            sort,
        } => {
            state.set_project_filter(project.clone());
            state.set_client_filter(client.clone());
            if let Some(sort) = sort {
                state.set_sort_order(*sort);
            }
            note_freshness(state.refresh().await, "reports");
            output_list(state.reports(), REPORT_COLUMNS, flags.format)?;
            if flags.format == OutputFormat::Table && !flags.quiet {
                println!();
                for line in filter_choices(&state.project_options(), &state.client_options()) {
                    println!("{line}");
                }
            }
            return Ok(());
        }
        ReportCommands::Add { file } => {
            let upload = Upload::from_path(file).await?;
            state.add_report(&upload).await?;
        }
        ReportCommands::Attach {
            file,
            title,
            project,
        } => {
            let mut form = TitledReportForm {
                file: Some(Upload::from_path(file).await?),
                title: title.clone(),
                project_id: Some(project.clone()),
            };
            TitledReportImport::new(ctx)
                .submit(&mut form, &mut state)
                .await?;
        }
        ReportCommands::Link { id, project } => state.link_to_project(id, project).await?,
        ReportCommands::Unlink { id } => state.unlink(id).await?,
        ReportCommands::Delete { id } => state.delete_report(id).await?,
        ReportCommands::Search {
            name,
            project,
            client,
        } => {
            let search = ReportSearch {
                report_name: name.clone(),
                project_name: project.clone(),
                client_name: client.clone(),
            };
            let found = ctx.store.search_reports(&search).await.inspect_err(|e| {
                ctx.notices
                    .error("Error", format!("The report search failed: {e}"));
            })?;
            if found.is_empty() {
                ctx.notices
                    .info("Search", "No report matches these criteria");
            }
            return output_list(&found, MATCH_COLUMNS, flags.format);
        }
    }
    output_list(state.reports(), REPORT_COLUMNS, flags.format)
}

/// The `--project` and `--client` values available in the whole list.
fn filter_choices(projects: &[(String, String)], clients: &[String]) -> Vec<String> {
    let projects = if projects.is_empty() {
        "-".to_string()
    } else {
        projects
            .iter()
            .map(|(id, name)| format!("{name} ({id})"))
            .collect::<Vec<_>>()
            .join(", ")
    };
    let clients = if clients.is_empty() {
        "-".to_string()
    } else {
        clients.join(", ")
    };
    vec![
        format!("--project: {projects}"),
        format!("--client: {clients}"),
    ]
}
