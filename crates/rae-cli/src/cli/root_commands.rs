use std::path::PathBuf;

use clap::{Args, Subcommand};

use crate::cli::subcommands::{
    GenerateCommands, ProjectCommands, ReportCommands, TemplateCommands,
};

/// Top-level command tree.
#[derive(Clone, Debug, Subcommand)]
pub enum Commands {
    /// Projects and their documents.
    Project {
        #[command(subcommand)]
        action: ProjectCommands,
    },
    /// Finished reuse reports.
    Report {
        #[command(subcommand)]
        action: ReportCommands,
    },
    /// Report templates and their sections.
    Template {
        #[command(subcommand)]
        action: TemplateCommands,
    },
    /// Chat with the report assistant.
    Chat(ChatArgs),
    /// Ask for AI-generated content.
    Generate {
        #[command(subcommand)]
        action: GenerateCommands,
    },
    /// Generated report parts of a project.
    Parts(PartsArgs),
    /// Spell-check a paragraph.
    Spellcheck(SpellcheckArgs),
    /// Key figures and recent activity.
    Dashboard,
}

#[derive(Clone, Debug, Args)]
pub struct ChatArgs {
    /// Narrow the conversation to one report (by id).
    #[arg(long, conflicts_with = "project")]
    pub report: Option<String>,

    /// Chat about one project's documents instead.
    #[arg(long)]
    pub project: Option<String>,

    /// Ask a single question and exit. Without it, lines are read from stdin.
    #[arg(long)]
    pub query: Option<String>,
}

#[derive(Clone, Debug, Args)]
pub struct PartsArgs {
    pub project: String,
}

#[derive(Clone, Debug, Args)]
pub struct SpellcheckArgs {
    /// Text to correct. Read from `--file` or stdin when absent.
    pub text: Option<String>,

    #[arg(long, conflicts_with = "text")]
    pub file: Option<PathBuf>,
}
