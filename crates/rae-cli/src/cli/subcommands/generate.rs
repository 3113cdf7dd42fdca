use clap::Subcommand;

/// Generation commands.
#[derive(Clone, Debug, Subcommand)]
pub enum GenerateCommands {
    /// Generate report parts of a project from template sections.
    Parts {
        project: String,
        /// Template section ids.
        #[arg(long = "section", required = true)]
        sections: Vec<String>,
        #[arg(long)]
        instructions: Option<String>,
    },
    /// Draft publications derived from a report.
    Suggest {
        report: String,
        /// blog, instagram, linkedin or facebook.
        #[arg(long = "type", default_value = "blog")]
        types: Vec<String>,
        #[arg(long)]
        instructions: Option<String>,
    },
}
