//! Conversation log entries

use serde::{Deserialize, Serialize};

/// One question and the response shown for it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatTurn {
    /// What the user typed
    pub question: String,
    /// What the assistant replied
    pub response: String,
}

impl ChatTurn {
    /// Create a new turn
    pub fn new(question: impl Into<String>, response: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            response: response.into(),
        }
    }
}
