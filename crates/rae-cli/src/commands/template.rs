use rae_core::entities::NewSection;
use rae_sync::{AppContext, Refresh, TemplateEditor, TemplatesState};

use crate::cli::GlobalFlags;
use crate::cli::subcommands::TemplateCommands;
use crate::commands::shared::note_freshness;
use crate::output::{output, output_list};

const TEMPLATE_COLUMNS: &[&str] = &["id", "title", "number_of_sections", "created_at"];
const SECTION_COLUMNS: &[&str] = &["order_index", "id", "title", "instructions"];

/// Handle `rae template`.
pub async fn handle(
    action: &TemplateCommands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match action {
        TemplateCommands::List { search, sort } => {
            let mut state = TemplatesState::new(ctx);
            if let Some(search) = search {
                state.set_search_term(search.as_str());
            }
            if let Some(sort) = sort {
                state.set_sort_order(*sort);
            }
            note_freshness(state.refresh().await, "templates");
            output_list(state.templates(), TEMPLATE_COLUMNS, flags.format)
        }
        TemplateCommands::Create { title, description } => {
            let template = TemplatesState::new(ctx).create(title, description).await?;
            output(&template, flags.format)
        }
        TemplateCommands::Update {
            id,
            title,
            description,
        } => {
            let mut state = TemplatesState::new(ctx);
            state.update(id, title, description).await?;
            output_list(state.templates(), TEMPLATE_COLUMNS, flags.format)
        }
        TemplateCommands::Delete { id } => {
            let mut state = TemplatesState::new(ctx);
            state.delete(id).await?;
            output_list(state.templates(), TEMPLATE_COLUMNS, flags.format)
        }
        TemplateCommands::Sections { id } => {
            let editor = TemplateEditor::open(ctx, id).await?;
            output_list(editor.sections(), SECTION_COLUMNS, flags.format)
        }
        TemplateCommands::SectionAdd {
            template,
            title,
            instructions,
            example,
        } => {
            let mut editor = TemplateEditor::open(ctx, template).await?;
            editor
                .add_section(NewSection {
                    title: title.clone(),
                    instructions: instructions.clone(),
                    example: example.clone(),
                })
                .await?;
            output_list(editor.sections(), SECTION_COLUMNS, flags.format)
        }
        TemplateCommands::SectionMove {
            template,
            section,
            direction,
        } => {
            let mut editor = TemplateEditor::open(ctx, template).await?;
            if !editor.move_section(section, (*direction).into()).await? {
                tracing::warn!(section = %section, "section is already at that end");
            }
            output_list(editor.sections(), SECTION_COLUMNS, flags.format)
        }
        TemplateCommands::SectionDelete { template, section } => {
            let mut editor = TemplateEditor::open(ctx, template).await?;
            editor.delete_section(section).await?;
            output_list(editor.sections(), SECTION_COLUMNS, flags.format)
        }
    }
}
