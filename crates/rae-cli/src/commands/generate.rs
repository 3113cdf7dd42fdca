use rae_store::RemoteStore;
use rae_sync::AppContext;
use rae_sync::tools::ContentTools;
use serde_json::json;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::GenerateCommands;
use crate::commands::project;
use crate::output::{output, output_list};
use crate::progress::Progress;

const PART_COLUMNS: &[&str] = &["template_part_title", "content", "created_at"];
const SUGGESTION_COLUMNS: &[&str] = &["content_type", "generated_content", "generated_image_url"];

/// Handle `rae generate`.
pub async fn handle(
    action: &GenerateCommands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match action {
        GenerateCommands::Parts {
            project,
            sections,
            instructions,
        } => {
            let detail = project::open(project, ctx).await?;
            detail
                .generate_parts(sections, instructions.as_deref())
                .await?;
            output(
                &json!({ "project_id": project, "requested": sections.len() }),
                flags.format,
            )
        }
        GenerateCommands::Suggest {
            report,
            types,
            instructions,
        } => {
            let spinner = Progress::spinner("generating content");
            let result = ContentTools::new(ctx)
                .suggest_content(report, types, instructions.as_deref())
                .await;
            spinner.finish_clear();
            output_list(&result?, SUGGESTION_COLUMNS, flags.format)
        }
    }
}

/// Handle `rae parts`.
pub async fn parts(project_id: &str, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let parts = ctx.store.generated_parts(project_id).await.inspect_err(|e| {
        ctx.notices
            .error("Error", format!("Unable to load the generated parts: {e}"));
    })?;
    output_list(&parts, PART_COLUMNS, flags.format)
}
