use clap::Parser;

pub mod global;
pub mod root_commands;
pub mod subcommands;

pub use global::{GlobalFlags, OutputFormat};
pub use root_commands::Commands;

/// Top-level CLI parser for the `rae` binary.
#[derive(Debug, Parser)]
#[command(name = "rae", version, about = "Raedificare - projects, reuse reports and templates")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output format: json, table, raw
    #[arg(short, long, global = true, default_value = "table")]
    pub format: OutputFormat,

    /// Quiet mode (only errors on stderr)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Verbose mode (debug logging)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Directory holding `.env` and `.raedificare/config.toml`
    #[arg(long, global = true)]
    pub project_dir: Option<String>,
}

impl Cli {
    #[must_use]
    pub fn global_flags(&self) -> GlobalFlags {
        GlobalFlags {
            format: self.format,
            quiet: self.quiet,
            verbose: self.verbose,
            project_dir: self.project_dir.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::{CommandFactory, Parser};
    use rae_core::enums::{ProjectStatus, SortOrder, StatusFilter};

    use super::subcommands::{ProjectCommands, TemplateCommands};
    use super::{Cli, Commands, OutputFormat};

    #[test]
    fn clap_command_tree_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn global_flags_parse_before_and_after_subcommand() {
        let cli = Cli::try_parse_from(["rae", "--format", "json", "dashboard", "--quiet"])
            .expect("cli should parse");
        assert_eq!(cli.format, OutputFormat::Json);
        assert!(cli.quiet);
        assert!(matches!(cli.command, Commands::Dashboard));
    }

    #[test]
    fn output_format_rejects_invalid_value() {
        assert!(Cli::try_parse_from(["rae", "--format", "xml", "dashboard"]).is_err());
    }

    #[test]
    fn project_list_parses_domain_values() {
        let cli = Cli::try_parse_from([
            "rae", "project", "list", "--status", "in_progress", "--sort", "alpha-asc",
            "--search", "usine",
        ])
        .expect("cli should parse");
        let Commands::Project {
            action: ProjectCommands::List {
                search,
                status,
                sort,
            },
        } = cli.command
        else {
            panic!("expected project list");
        };
        assert_eq!(search.as_deref(), Some("usine"));
        assert_eq!(status, Some(StatusFilter::Only(ProjectStatus::InProgress)));
        assert_eq!(sort, Some(SortOrder::AlphaAsc));
    }

    #[test]
    fn unknown_status_is_rejected() {
        assert!(Cli::try_parse_from(["rae", "project", "status", "p1", "done"]).is_err());
    }

    #[test]
    fn section_move_takes_a_direction() {
        let cli = Cli::try_parse_from(["rae", "template", "section-move", "t1", "s2", "up"])
            .expect("cli should parse");
        assert!(matches!(
            cli.command,
            Commands::Template {
                action: TemplateCommands::SectionMove { .. }
            }
        ));
    }

    #[test]
    fn project_dir_is_copied_to_flags() {
        let cli = Cli::try_parse_from(["rae", "--project-dir", "/tmp/site", "dashboard"])
            .expect("cli should parse");
        assert_eq!(cli.global_flags().project_dir.as_deref(), Some("/tmp/site"));
    }
}
