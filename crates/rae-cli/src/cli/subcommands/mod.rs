mod generate;
mod project;
mod report;
mod template;

pub use generate::GenerateCommands;
pub use project::ProjectCommands;
pub use report::ReportCommands;
pub use template::{MoveDirection, TemplateCommands};
