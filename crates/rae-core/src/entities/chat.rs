use serde::{Deserialize, Serialize};

use crate::enums::Sender;

/// A document cited by a bot answer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SourceDocument {
    pub id: String,
    pub title: String,
}

/// One transcript entry. Held in memory only.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChatMessage {
    pub id: String,
    pub sender: Sender,
    pub text: String,
    /// `HH:MM` wall-clock stamp.
    pub time: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_documents: Option<Vec<SourceDocument>>,
}
