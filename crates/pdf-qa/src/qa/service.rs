//! Answer service trait

use async_trait::async_trait;

use crate::config::QaConfig;
use crate::error::Result;
use crate::types::CandidateAnswer;

/// Parameters passed to the model on every question
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnswerParams {
    /// Ranked candidates to return
    pub top_k: usize,
    /// Longest answer span, in tokens
    pub max_answer_len: usize,
    /// Allow an empty "no answer" candidate
    pub handle_impossible_answer: bool,
}

impl Default for AnswerParams {
    fn default() -> Self {
        Self {
            top_k: 3,
            max_answer_len: 150,
            handle_impossible_answer: true,
        }
    }
}

impl From<&QaConfig> for AnswerParams {
    fn from(config: &QaConfig) -> Self {
        Self {
            top_k: config.top_k,
            max_answer_len: config.max_answer_len,
            handle_impossible_answer: config.handle_impossible_answer,
        }
    }
}

/// Extractive question answering model
///
/// Implementations:
/// - `OnnxQaModel`: local ONNX Runtime session
/// - `HttpQaClient`: Hugging Face compatible inference endpoint
#[async_trait]
pub trait AnswerService: Send + Sync {
    /// Rank candidate answers to `question` drawn from `context`, best first
    async fn answer(
        &self,
        question: &str,
        context: &str,
        params: &AnswerParams,
    ) -> Result<Vec<CandidateAnswer>>;

    /// Check if the model is loaded and reachable
    async fn health_check(&self) -> Result<bool>;

    /// Backend name for logging
    fn name(&self) -> &str;

    /// Model being used
    fn model(&self) -> &str;
}
