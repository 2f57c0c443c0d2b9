//! Question and clear endpoints

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::server::state::AppState;
use crate::types::ChatTurn;

/// A submitted question with the page's current log
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    /// Text in the question box
    pub message: String,
    /// Conversation so far
    #[serde(default)]
    pub history: Vec<ChatTurn>,
}

/// New question box value and log
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatResponse {
    /// Question box value (always empty)
    pub message: String,
    /// Conversation including the new turn
    pub history: Vec<ChatTurn>,
}

/// Log after a clear
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClearResponse {
    /// Always empty
    pub history: Vec<ChatTurn>,
}

/// POST /api/chat - Answer a question
pub async fn submit_question(
    State(state): State<AppState>,
    Json(request): Json<ChatRequest>,
) -> Json<ChatResponse> {
    tracing::info!("Question: \"{}\"", request.message);

    let document = state.document().read().await;
    let (message, history) = state
        .session()
        .submit(request.message, request.history, &document)
        .await;

    Json(ChatResponse { message, history })
}

/// POST /api/clear - Empty the conversation log
pub async fn clear_chat(State(state): State<AppState>) -> Json<ClearResponse> {
    Json(ClearResponse {
        history: state.session().clear(),
    })
}
