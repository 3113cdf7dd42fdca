//! # rae-sync
//!
//! Keeps local state consistent with the remote store and sequences the
//! multi-step remote operations of Raedificare.
//!
//! - List states ([`ProjectsState`], [`ReportsState`], [`TemplatesState`])
//!   hold a raw collection plus filter, search and sort parameters, and
//!   derive a projection whenever any of them changes.
//! - Orchestrators ([`orchestrator`]) run insert → upload → link sequences
//!   with no compensation: a failed step stops the flow and is reported, and
//!   earlier side effects stay in place.
//! - [`ChatSession`] and [`ProjectChat`] keep a transcript, allow one turn
//!   in flight, and resolve cited documents to titles.
//!
//! Every component receives its collaborators from an [`AppContext`].

pub mod chat;
pub mod context;
pub mod dashboard;
pub mod detail;
pub mod error;
pub mod fallback;
pub mod list;
pub mod notices;
pub mod orchestrator;
pub mod projects;
pub mod reports;
pub mod templates;
pub mod tools;

#[cfg(test)]
pub(crate) mod testing;

pub use chat::{ChatSession, ProjectChat};
pub use context::AppContext;
pub use dashboard::{Activity, ActivityKind, Dashboard};
pub use detail::ProjectDetail;
pub use error::{FlowStep, SyncError};
pub use notices::{Notice, NoticeLevel, Notices};
pub use projects::{ProjectsState, StatusCounts};
pub use reports::ReportsState;
pub use templates::{Direction, TemplateEditor, TemplatesState};
pub use tools::ContentTools;

use async_trait::async_trait;

/// How current a list state's raw collection is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Freshness {
    /// Loaded by the last fetch.
    Live,
    /// The last fetch failed; the previous collection is kept.
    Stale,
    /// The fetch failed on an empty cache and sample data is shown.
    Sample,
}

/// A state holder that can refetch its collection wholesale.
///
/// Orchestrators call this as their success callback. Fetch failures never
/// propagate: they are recorded as notices and the previous collection is
/// kept.
#[async_trait]
pub trait Refresh: Send {
    async fn refresh(&mut self) -> Freshness;
}
