//! Question answering over the loaded document
//!
//! The model itself is an external collaborator behind [`AnswerService`];
//! [`AnswerAdapter`] applies the context and confidence policy on top of it.

mod adapter;
pub mod http;
pub mod onnx;
mod service;
pub mod span;

#[cfg(test)]
pub(crate) mod stub;

pub use adapter::{select_candidate, AnswerAdapter};
pub use http::HttpQaClient;
pub use onnx::OnnxQaModel;
pub use service::{AnswerParams, AnswerService};

use std::sync::Arc;

use crate::config::{QaBackend, QaConfig};
use crate::error::Result;

/// Build the answer service selected by `config.backend`
pub async fn build_service(config: &QaConfig) -> Result<Arc<dyn AnswerService>> {
    match config.backend {
        QaBackend::Onnx => {
            tracing::info!("Using local ONNX backend ({})", config.model);
            Ok(Arc::new(OnnxQaModel::new(config).await?))
        }
        QaBackend::Http => {
            tracing::info!("Using HTTP backend ({})", config.endpoint);
            Ok(Arc::new(HttpQaClient::new(config)?))
        }
    }
}
