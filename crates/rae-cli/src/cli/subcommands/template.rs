use clap::{Subcommand, ValueEnum};
use rae_core::enums::SortOrder;
use rae_sync::Direction;

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum MoveDirection {
    Up,
    Down,
}

impl From<MoveDirection> for Direction {
    fn from(value: MoveDirection) -> Self {
        match value {
            MoveDirection::Up => Self::Up,
            MoveDirection::Down => Self::Down,
        }
    }
}

/// Template commands.
#[derive(Clone, Debug, Subcommand)]
pub enum TemplateCommands {
    /// List templates.
    List {
        /// Substring of title or description.
        #[arg(long)]
        search: Option<String>,
        #[arg(long)]
        sort: Option<SortOrder>,
    },
    /// Create an empty template.
    Create {
        #[arg(long)]
        title: String,
        #[arg(long, default_value = "")]
        description: String,
    },
    /// Change a template's title and description.
    Update {
        id: String,
        #[arg(long)]
        title: String,
        #[arg(long, default_value = "")]
        description: String,
    },
    /// Delete a template.
    Delete { id: String },
    /// List the sections of a template in order.
    Sections { id: String },
    /// Append a section.
    SectionAdd {
        template: String,
        #[arg(long)]
        title: String,
        #[arg(long, default_value = "")]
        instructions: String,
        #[arg(long)]
        example: Option<String>,
    },
    /// Swap a section with its neighbour.
    SectionMove {
        template: String,
        section: String,
        direction: MoveDirection,
    },
    /// Delete a section and renumber the rest.
    SectionDelete { template: String, section: String },
}
