//! Error type of the synchronization layer.

use std::fmt;

use thiserror::Error;

use rae_core::errors::CoreError;
use rae_store::StoreError;
use rae_webhooks::WebhookError;

/// One step of a multi-step mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlowStep {
    InsertProject,
    /// Upload of file `index` (1-based) out of `total`.
    Upload {
        index: usize,
        total: usize,
        file_name: String,
    },
    LinkDocuments,
    RegisterReport,
}

impl fmt::Display for FlowStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InsertProject => f.write_str("creating the project"),
            Self::Upload {
                index,
                total,
                file_name,
            } => write!(f, "uploading {file_name} ({index}/{total})"),
            Self::LinkDocuments => f.write_str("linking the documents"),
            Self::RegisterReport => f.write_str("registering the report"),
        }
    }
}

#[derive(Debug, Error)]
pub enum SyncError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Webhook(#[from] WebhookError),

    #[error(transparent)]
    Core(#[from] CoreError),

    /// A multi-step mutation stopped at `step`. Earlier steps are not undone.
    #[error("{step} failed: {source}")]
    Step {
        step: FlowStep,
        #[source]
        source: Box<Self>,
    },

    /// The same operation is already running.
    #[error("{operation} is already in progress")]
    Busy { operation: &'static str },
}

impl SyncError {
    pub(crate) fn validation(message: impl Into<String>) -> Self {
        Self::Core(CoreError::Validation(message.into()))
    }

    pub(crate) fn at(step: FlowStep) -> impl FnOnce(Self) -> Self {
        move |source| Self::Step {
            step,
            source: Box::new(source),
        }
    }

    /// Whether this is an input validation failure raised before any remote call.
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(self, Self::Core(CoreError::Validation(_)))
    }

    /// The step a multi-step mutation stopped at, if any.
    #[must_use]
    pub const fn failed_step(&self) -> Option<&FlowStep> {
        match self {
            Self::Step { step, .. } => Some(step),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn step_errors_name_the_step() {
        let err = SyncError::at(FlowStep::Upload {
            index: 2,
            total: 3,
            file_name: "plan.pdf".into(),
        })(SyncError::validation("boom"));
        assert_eq!(
            err.to_string(),
            "uploading plan.pdf (2/3) failed: Validation error: boom"
        );
        assert!(matches!(err.failed_step(), Some(FlowStep::Upload { index: 2, .. })));
    }
}
