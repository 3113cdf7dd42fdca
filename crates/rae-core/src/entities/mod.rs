//! Entity structs for all Raedificare domain objects.
//!
//! Entities are the UI-facing shapes. The remote store has its own row
//! shapes (`client_name`, `last_update`, ...); `rae-store` translates
//! between the two.

mod chat;
mod document;
mod generated;
mod project;
mod template;

pub use chat::{ChatMessage, SourceDocument};
pub use document::{Document, Report, ReportMatch, ReportSearch};
pub use generated::GeneratedPart;
pub use project::{Project, ProjectDraft};
pub use template::{NewSection, Template, TemplateSection};
