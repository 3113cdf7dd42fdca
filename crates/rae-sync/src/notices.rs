//! Transient user notifications.
//!
//! Every user-visible outcome (success, information, failure) is pushed to a
//! shared [`Notices`] sink. Front-ends drain it after each operation. Notices
//! are never fatal and carry free text only.

use std::sync::{Mutex, PoisonError};

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Success,
    Info,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub title: String,
    pub message: String,
}

/// Append-only notice queue shared by every state holder and orchestrator.
#[derive(Debug, Default)]
pub struct Notices {
    queue: Mutex<Vec<Notice>>,
}

impl Notices {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn success(&self, title: &str, message: impl Into<String>) {
        self.push(NoticeLevel::Success, title, message.into());
    }

    pub fn info(&self, title: &str, message: impl Into<String>) {
        self.push(NoticeLevel::Info, title, message.into());
    }

    pub fn error(&self, title: &str, message: impl Into<String>) {
        let message = message.into();
        tracing::error!(title, %message, "operation failed");
        self.push(NoticeLevel::Error, title, message);
    }

    /// Take every pending notice.
    pub fn drain(&self) -> Vec<Notice> {
        std::mem::take(&mut *self.lock())
    }

    /// Copy of the pending notices, leaving them queued.
    pub fn snapshot(&self) -> Vec<Notice> {
        self.lock().clone()
    }

    pub fn has_errors(&self) -> bool {
        self.lock().iter().any(|n| n.level == NoticeLevel::Error)
    }

    fn push(&self, level: NoticeLevel, title: &str, message: String) {
        self.lock().push(Notice {
            level,
            title: title.to_string(),
            message,
        });
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<Notice>> {
        self.queue.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drain_empties_the_queue() {
        let notices = Notices::new();
        notices.success("Project created", "Campus");
        notices.error("Error", "store unavailable");
        assert!(notices.has_errors());
        let drained = notices.drain();
        assert_eq!(drained.len(), 2);
        assert_eq!(drained[0].level, NoticeLevel::Success);
        assert!(notices.drain().is_empty());
    }
}
