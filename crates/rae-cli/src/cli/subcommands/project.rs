use std::path::PathBuf;

use clap::Subcommand;
use rae_core::enums::{ProjectStatus, SortOrder, StatusFilter};

/// Project commands.
#[derive(Clone, Debug, Subcommand)]
pub enum ProjectCommands {
    /// List projects.
    List {
        /// Substring of title, client or description.
        #[arg(long)]
        search: Option<String>,
        /// `all` or a status.
        #[arg(long)]
        status: Option<StatusFilter>,
        #[arg(long)]
        sort: Option<SortOrder>,
    },
    /// Show a project with its documents and generated parts.
    Show { id: String },
    /// Create a project, uploading and linking documents.
    Create {
        #[arg(long)]
        title: String,
        #[arg(long, default_value = "")]
        client: String,
        #[arg(long, default_value = "")]
        description: String,
        #[arg(long)]
        status: Option<ProjectStatus>,
        /// Documents to upload.
        #[arg(long = "file")]
        files: Vec<PathBuf>,
    },
    /// Change a project's status.
    Status { id: String, status: ProjectStatus },
    /// Delete a project.
    Delete { id: String },
    /// Upload documents into an existing project.
    Import {
        id: String,
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
    /// Delete one document of a project.
    DeleteDocument { id: String, document: String },
}
