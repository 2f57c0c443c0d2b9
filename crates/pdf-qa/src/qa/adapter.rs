//! Context and confidence policy around the answer service

use std::sync::Arc;

use crate::config::QaConfig;
use crate::types::{AnswerOutcome, CandidateAnswer, DocumentContext};

use super::service::{AnswerParams, AnswerService};

/// Asks the loaded document a question and decides whether the answer is usable
#[derive(Clone)]
pub struct AnswerAdapter {
    service: Arc<dyn AnswerService>,
    params: AnswerParams,
    min_confidence: f32,
    min_context_words: usize,
}

impl AnswerAdapter {
    /// Create an adapter with the thresholds from `config`
    pub fn new(service: Arc<dyn AnswerService>, config: &QaConfig) -> Self {
        Self {
            service,
            params: AnswerParams::from(config),
            min_confidence: config.min_confidence,
            min_context_words: config.min_context_words,
        }
    }

    /// Underlying answer service
    pub fn service(&self) -> &Arc<dyn AnswerService> {
        &self.service
    }

    /// Answer `question` from `document`.
    ///
    /// Documents that are missing or shorter than the word threshold never
    /// reach the model. Model errors become [`AnswerOutcome::ServiceFailure`].
    pub async fn answer(&self, question: &str, document: &DocumentContext) -> AnswerOutcome {
        if !document.is_loaded() {
            return AnswerOutcome::NoDocument;
        }

        let words = document.word_count();
        if words < self.min_context_words {
            tracing::debug!(
                "Document has {} words (< {}), not asking the model",
                words,
                self.min_context_words
            );
            return AnswerOutcome::InsufficientContext { words };
        }

        let candidates = match self
            .service
            .answer(question, document.text(), &self.params)
            .await
        {
            Ok(candidates) => candidates,
            Err(e) => {
                tracing::warn!("{} model call failed: {}", self.service.name(), e);
                return AnswerOutcome::ServiceFailure(e.to_string());
            }
        };

        match select_candidate(candidates, self.min_confidence) {
            Some(candidate) => AnswerOutcome::Answered(candidate),
            None => AnswerOutcome::LowConfidence,
        }
    }
}

/// First candidate, in rank order, scoring strictly above `min_confidence`
/// with non-blank text
pub fn select_candidate(
    candidates: Vec<CandidateAnswer>,
    min_confidence: f32,
) -> Option<CandidateAnswer> {
    candidates
        .into_iter()
        .find(|c| c.score > min_confidence && !c.is_blank())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::qa::stub::StubAnswerService;

    const LONG_TEXT: &str = "The annual report covers revenue growth across all regions. \
        Revenue grew by twelve percent while operating costs stayed flat for the year.";

    fn build_adapter(stub: StubAnswerService) -> (AnswerAdapter, Arc<StubAnswerService>) {
        let stub = Arc::new(stub);
        let adapter = AnswerAdapter::new(stub.clone(), &QaConfig::default());
        (adapter, stub)
    }

    #[tokio::test]
    async fn test_no_document_skips_model() {
        let (adapter, stub) = build_adapter(StubAnswerService::fixed(vec![CandidateAnswer::new("x", 0.9)]));

        let outcome = adapter.answer("anything?", &DocumentContext::new()).await;

        assert_eq!(outcome, AnswerOutcome::NoDocument);
        assert_eq!(stub.calls(), 0);
    }

    #[tokio::test]
    async fn test_short_document_skips_model() {
        let (adapter, stub) = build_adapter(StubAnswerService::fixed(vec![CandidateAnswer::new("x", 0.99)]));
        let nineteen = vec!["word"; 19].join(" ");

        let outcome = adapter
            .answer("what?", &DocumentContext::with_text(nineteen))
            .await;

        assert_eq!(outcome, AnswerOutcome::InsufficientContext { words: 19 });
        assert_eq!(outcome.confidence(), 0.0);
        assert_eq!(stub.calls(), 0);
    }

    #[tokio::test]
    async fn test_twenty_words_reaches_model() {
        let (adapter, stub) = build_adapter(StubAnswerService::fixed(vec![CandidateAnswer::new("word", 0.8)]));
        let twenty = vec!["word"; 20].join(" ");

        let outcome = adapter
            .answer("what?", &DocumentContext::with_text(twenty))
            .await;

        assert_eq!(stub.calls(), 1);
        assert_eq!(outcome.into_pair(), ("word".to_string(), 0.8));
    }

    #[tokio::test]
    async fn test_threshold_is_strict() {
        let (adapter, _) = build_adapter(StubAnswerService::fixed(vec![
            CandidateAnswer::new("exactly at threshold", 0.4),
            CandidateAnswer::new("below", 0.39),
        ]));

        let outcome = adapter
            .answer("how much?", &DocumentContext::with_text(LONG_TEXT))
            .await;

        assert_eq!(outcome, AnswerOutcome::LowConfidence);
    }

    #[tokio::test]
    async fn test_skips_blank_and_takes_first_qualifying_in_rank_order() {
        let (adapter, _) = build_adapter(StubAnswerService::fixed(vec![
            CandidateAnswer::new("", 0.95),
            CandidateAnswer::new("   ", 0.9),
            CandidateAnswer::new("twelve percent", 0.6),
            CandidateAnswer::new("higher score but later", 0.8),
        ]));

        let outcome = adapter
            .answer("how much did revenue grow?", &DocumentContext::with_text(LONG_TEXT))
            .await;

        assert_eq!(outcome.into_pair(), ("twelve percent".to_string(), 0.6));
    }

    #[tokio::test]
    async fn test_service_failure_is_swallowed() {
        let (adapter, stub) = build_adapter(StubAnswerService::failing());

        let outcome = adapter
            .answer("how much?", &DocumentContext::with_text(LONG_TEXT))
            .await;

        assert!(matches!(outcome, AnswerOutcome::ServiceFailure(_)));
        assert_eq!(outcome.confidence(), 0.0);
        assert_eq!(stub.calls(), 1);
    }

    #[test]
    fn test_select_candidate_empty() {
        assert_eq!(select_candidate(Vec::new(), 0.4), None);
    }
}
