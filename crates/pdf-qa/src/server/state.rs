//! Application state for the PDF Q&A server

use std::sync::Arc;

use crate::chat::{ChatSession, ResponseComposer};
use crate::config::AppConfig;
use crate::error::Result;
use crate::extraction::TextExtractor;
use crate::qa::{self, AnswerAdapter, AnswerService};
use crate::types::{DocumentContext, SharedDocument};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    /// Configuration
    config: AppConfig,
    /// Most recently uploaded document, shared by every page
    document: SharedDocument,
    /// Upload handler
    extractor: TextExtractor,
    /// Question handler
    session: ChatSession,
}

impl AppState {
    /// Create new application state, loading the configured model
    pub async fn new(config: AppConfig) -> Result<Self> {
        tracing::info!(
            "Initializing application state (backend: {:?})...",
            config.qa.backend
        );

        let service = qa::build_service(&config.qa).await?;
        tracing::info!("Answer service initialized ({} / {})", service.name(), service.model());

        Ok(Self::with_service(config, service))
    }

    /// Create state around an already constructed answer service
    pub fn with_service(config: AppConfig, service: Arc<dyn AnswerService>) -> Self {
        let adapter = AnswerAdapter::new(service, &config.qa);
        let session = ChatSession::new(ResponseComposer::new(adapter));
        let extractor = TextExtractor::new(config.extraction.clone());

        Self {
            inner: Arc::new(AppStateInner {
                config,
                document: DocumentContext::new().into_shared(),
                extractor,
                session,
            }),
        }
    }

    /// Get configuration
    pub fn config(&self) -> &AppConfig {
        &self.inner.config
    }

    /// Get the shared document
    pub fn document(&self) -> &SharedDocument {
        &self.inner.document
    }

    /// Get the PDF extractor
    pub fn extractor(&self) -> &TextExtractor {
        &self.inner.extractor
    }

    /// Get the chat session handler
    pub fn session(&self) -> &ChatSession {
        &self.inner.session
    }

    /// Get the answer service
    pub fn answer_service(&self) -> &Arc<dyn AnswerService> {
        self.inner.session.composer().adapter().service()
    }

    /// Ready once the answer service reports healthy
    pub async fn is_ready(&self) -> bool {
        match self.answer_service().health_check().await {
            Ok(healthy) => healthy,
            Err(e) => {
                tracing::warn!("Answer service health check failed: {}", e);
                false
            }
        }
    }
}
