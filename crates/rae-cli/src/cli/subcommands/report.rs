use std::path::PathBuf;

use clap::Subcommand;
use rae_core::enums::SortOrder;

/// Report commands.
#[derive(Clone, Debug, Subcommand)]
pub enum ReportCommands {
    /// List reports.
    List {
        /// Only reports linked to this project id.
        #[arg(long)]
        project: Option<String>,
        /// Only reports of this client.
        #[arg(long)]
        client: Option<String>,
        #[arg(long)]
        sort: Option<SortOrder>,
    },
    /// Upload a report file.
    Add { file: PathBuf },
    /// Upload a report file into a project under a title.
    Attach {
        file: PathBuf,
        #[arg(long)]
        title: String,
        #[arg(long)]
        project: String,
    },
    /// Link a report to a project.
    Link { id: String, project: String },
    /// Detach a report from its project.
    Unlink { id: String },
    /// Delete a report.
    Delete { id: String },
    /// Search reports by name, project and client.
    Search {
        #[arg(long, default_value = "")]
        name: String,
        #[arg(long, default_value = "")]
        project: String,
        #[arg(long, default_value = "")]
        client: String,
    },
}
