//! Error types for the PDF Q&A server

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Result type alias for PDF Q&A operations
pub type Result<T> = std::result::Result<T, Error>;

/// PDF Q&A errors
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// PDF could not be parsed
    #[error("{0}")]
    PdfParse(String),

    /// Uploaded file is not a PDF
    #[error("Unsupported file type: {0}")]
    UnsupportedFileType(String),

    /// Upload request carried no file
    #[error("No file uploaded")]
    MissingFile,

    /// Multipart body could not be read
    #[error("Invalid upload: {0}")]
    Upload(String),

    /// Upload exceeds the configured size limit
    #[error("Upload too large: {0}")]
    PayloadTooLarge(String),

    /// Question answering model error
    #[error("Model error: {0}")]
    Model(String),

    /// HTTP request error
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Create a PDF parse error
    pub fn pdf_parse(message: impl Into<String>) -> Self {
        Self::PdfParse(message.into())
    }

    /// Create a model error
    pub fn model(message: impl Into<String>) -> Self {
        Self::Model(message.into())
    }

    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let (status, error_type, message) = match &self {
            Error::Config(msg) => (StatusCode::BAD_REQUEST, "config_error", msg.clone()),
            Error::PdfParse(msg) => (StatusCode::BAD_REQUEST, "parse_error", msg.clone()),
            Error::UnsupportedFileType(name) => (
                StatusCode::BAD_REQUEST,
                "unsupported_type",
                format!("Unsupported file type: {} (only .pdf is accepted)", name),
            ),
            Error::MissingFile => (
                StatusCode::BAD_REQUEST,
                "missing_file",
                "No file uploaded".to_string(),
            ),
            Error::Upload(msg) => (StatusCode::BAD_REQUEST, "upload_error", msg.clone()),
            Error::PayloadTooLarge(msg) => {
                (StatusCode::PAYLOAD_TOO_LARGE, "payload_too_large", msg.clone())
            }
            Error::Model(msg) => (StatusCode::SERVICE_UNAVAILABLE, "model_error", msg.clone()),
            Error::Http(err) => (StatusCode::BAD_GATEWAY, "http_error", err.to_string()),
            Error::Internal(msg) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "internal_error", msg.clone())
            }
        };

        let body = Json(json!({
            "error": {
                "type": error_type,
                "message": message,
            }
        }));

        (status, body).into_response()
    }
}
