use rae_sync::{AppContext, Dashboard};
use serde_json::json;

use crate::cli::{GlobalFlags, OutputFormat};
use crate::commands::project::PROJECT_COLUMNS;
use crate::commands::shared::note_freshness;
use crate::output::{output, output_list};

const ACTIVITY_COLUMNS: &[&str] = &["date", "kind", "title", "link"];

/// Handle `rae dashboard`.
pub async fn handle(ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let (dashboard, projects, reports) = Dashboard::load(ctx).await;
    note_freshness(projects, "projects");
    note_freshness(reports, "reports");

    if flags.format != OutputFormat::Table {
        return output(&dashboard, flags.format);
    }

    output(
        &json!({
            "total_projects": dashboard.total_projects,
            "projects_in_progress": dashboard.projects_in_progress,
            "total_reports": dashboard.total_reports,
            "reports_this_month": dashboard.reports_this_month,
        }),
        flags.format,
    )?;
    println!();
    output(&dashboard.status_breakdown, flags.format)?;
    println!();
    output_list(&dashboard.recent_projects, PROJECT_COLUMNS, flags.format)?;
    println!();
    output_list(&dashboard.activity, ACTIVITY_COLUMNS, flags.format)
}
