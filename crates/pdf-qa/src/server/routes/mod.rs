//! API routes, one per UI event

pub mod chat;
pub mod upload;

use axum::{
    extract::{DefaultBodyLimit, State},
    routing::{get, post},
    Json, Router,
};

use crate::server::state::AppState;

/// Build all API routes
pub fn api_routes(max_upload_size: usize) -> Router<AppState> {
    Router::new()
        // Upload changed: file -> status text
        .route(
            "/upload",
            post(upload::upload_pdf).layer(DefaultBodyLimit::max(max_upload_size)),
        )
        // Question submitted: (message, history) -> ("", history)
        .route("/chat", post(chat::submit_question))
        // Clear clicked: -> empty history
        .route("/clear", post(chat::clear_chat))
        // Info
        .route("/info", get(info))
}

/// API info endpoint
async fn info(State(state): State<AppState>) -> Json<serde_json::Value> {
    let service = state.answer_service();
    let document = state.document().read().await;

    Json(serde_json::json!({
        "name": "pdf-qa",
        "version": env!("CARGO_PKG_VERSION"),
        "description": "Ask questions about an uploaded PDF",
        "backend": service.name(),
        "model": service.model(),
        "document": {
            "loaded": document.is_loaded(),
            "source": document.source(),
            "pages": document.page_count(),
            "words": document.word_count(),
        },
        "endpoints": {
            "GET /": "Chat page",
            "POST /api/upload": "Upload a PDF (multipart, field 'file')",
            "POST /api/chat": "Ask a question",
            "POST /api/clear": "Clear the conversation",
        }
    }))
}
