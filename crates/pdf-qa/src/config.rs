//! Configuration for the PDF Q&A server

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,
    /// Question answering configuration
    #[serde(default)]
    pub qa: QaConfig,
    /// PDF extraction configuration
    #[serde(default)]
    pub extraction: ExtractionConfig,
}

impl AppConfig {
    /// Load configuration from a TOML file
    ///
    /// Missing sections and fields fall back to their defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Self::from_toml(&raw)
    }

    /// Parse configuration from a TOML string
    pub fn from_toml(raw: &str) -> Result<Self> {
        toml::from_str(raw).map_err(|e| Error::Config(format!("Invalid configuration: {}", e)))
    }
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Host address
    pub host: String,
    /// Port number
    pub port: u16,
    /// Enable CORS
    pub enable_cors: bool,
    /// Maximum upload size in bytes (default: 20MB)
    pub max_upload_size: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 7860,
            enable_cors: true,
            max_upload_size: 20 * 1024 * 1024,
        }
    }
}

/// Which question-answering backend to run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QaBackend {
    /// Local ONNX Runtime session
    #[default]
    Onnx,
    /// Remote inference endpoint over HTTP
    Http,
}

/// Question answering configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct QaConfig {
    /// Backend used to run the model
    pub backend: QaBackend,
    /// Hugging Face model id
    pub model: String,
    /// Directory holding model.onnx and tokenizer.json
    pub cache_dir: PathBuf,
    /// Whether the exported graph takes token_type_ids (BERT yes, RoBERTa no)
    pub use_token_type_ids: bool,
    /// Maximum tokens per model window
    pub max_seq_len: usize,
    /// Token overlap between consecutive context windows
    pub doc_stride: usize,
    /// Number of ranked candidates requested from the model
    pub top_k: usize,
    /// Longest answer span the model may return, in tokens
    pub max_answer_len: usize,
    /// Let the model answer "no answer" when the context does not contain one
    pub handle_impossible_answer: bool,
    /// A candidate is only used when its score is strictly above this
    pub min_confidence: f32,
    /// Documents with fewer words than this are not sent to the model
    pub min_context_words: usize,
    /// Inference endpoint for the HTTP backend
    pub endpoint: String,
    /// Bearer token for the HTTP backend
    pub api_token: Option<String>,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Number of retries for failed requests
    pub max_retries: u32,
}

impl Default for QaConfig {
    fn default() -> Self {
        Self {
            backend: QaBackend::Onnx,
            model: "deepset/roberta-base-squad2".to_string(),
            cache_dir: dirs::cache_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("pdf-qa")
                .join("models"),
            use_token_type_ids: false,
            max_seq_len: 384,
            doc_stride: 128,
            top_k: 3,
            max_answer_len: 150,
            handle_impossible_answer: true,
            min_confidence: 0.4,
            min_context_words: 20,
            endpoint: "https://api-inference.huggingface.co/models/deepset/roberta-base-squad2"
                .to_string(),
            api_token: None,
            timeout_secs: 120,
            max_retries: 2,
        }
    }
}

/// PDF extraction configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Give up on a PDF after this many seconds
    pub timeout_secs: u64,
    /// Retry with the whole-document engine when per-page extraction finds nothing
    pub whole_document_fallback: bool,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 60,
            whole_document_fallback: true,
        }
    }
}
