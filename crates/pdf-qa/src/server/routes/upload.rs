//! PDF upload endpoint

use axum::{
    extract::{multipart::MultipartError, Multipart, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::server::state::AppState;

/// Response to an upload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadResponse {
    /// Status line for the status box
    pub status: String,
    /// Whether a usable document is now loaded
    pub loaded: bool,
    /// Pages in the loaded document
    pub pages: usize,
    /// Words in the loaded document
    pub words: usize,
}

/// Only `.pdf` files are accepted
fn is_pdf(filename: &str) -> bool {
    filename
        .rsplit_once('.')
        .map(|(_, ext)| ext.eq_ignore_ascii_case("pdf"))
        .unwrap_or(false)
}

/// Body-limit failures surface as multipart errors; keep them distinct
fn upload_error(context: &str, e: MultipartError) -> Error {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        Error::PayloadTooLarge(e.body_text())
    } else {
        Error::Upload(format!("{}: {}", context, e))
    }
}

/// POST /api/upload - Load a PDF, replacing the current document
pub async fn upload_pdf(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| upload_error("Failed to read multipart field", e))?
    {
        let Some(filename) = field.file_name().map(|s| s.to_string()) else {
            continue;
        };

        if !is_pdf(&filename) {
            return Err(Error::UnsupportedFileType(filename));
        }

        let data = field
            .bytes()
            .await
            .map_err(|e| upload_error("Failed to read file", e))?;

        tracing::info!("Processing upload: {} ({} bytes)", filename, data.len());

        let mut document = state.document().write().await;
        let status = state
            .extractor()
            .load(data.to_vec(), Some(filename), &mut document)
            .await;

        return Ok(Json(UploadResponse {
            status: status.to_string(),
            loaded: status.is_loaded(),
            pages: document.page_count(),
            words: document.word_count(),
        }));
    }

    Err(Error::MissingFile)
}
