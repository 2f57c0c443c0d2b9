//! Chat session handler

use crate::types::{ChatTurn, DocumentContext};

use super::composer::ResponseComposer;

/// Handles question submissions and clears for one chat widget.
///
/// The conversation log is owned by the caller and passed through each call.
#[derive(Clone)]
pub struct ChatSession {
    composer: ResponseComposer,
}

impl ChatSession {
    /// Create a session handler
    pub fn new(composer: ResponseComposer) -> Self {
        Self { composer }
    }

    /// Response composer
    pub fn composer(&self) -> &ResponseComposer {
        &self.composer
    }

    /// Answer `message` and append the turn to `history`.
    ///
    /// Returns the new input box value (always empty) and the updated log.
    pub async fn submit(
        &self,
        message: String,
        mut history: Vec<ChatTurn>,
        document: &DocumentContext,
    ) -> (String, Vec<ChatTurn>) {
        let response = self.composer.compose(&message, document).await;
        history.push(ChatTurn::new(message, response));
        (String::new(), history)
    }

    /// Empty conversation log
    pub fn clear(&self) -> Vec<ChatTurn> {
        Vec::new()
    }
}
