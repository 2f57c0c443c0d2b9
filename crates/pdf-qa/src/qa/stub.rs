//! Deterministic answer service for tests

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::error::{Error, Result};
use crate::types::CandidateAnswer;

use super::service::{AnswerParams, AnswerService};

enum Behavior {
    Fixed(Vec<CandidateAnswer>),
    Grounded(Vec<(String, CandidateAnswer)>),
    Failing,
}

/// Answer service with canned behavior that counts its calls
pub(crate) struct StubAnswerService {
    behavior: Behavior,
    calls: AtomicUsize,
}

impl StubAnswerService {
    /// Always return `candidates`
    pub(crate) fn fixed(candidates: Vec<CandidateAnswer>) -> Self {
        Self::with(Behavior::Fixed(candidates))
    }

    /// Return the candidate of every rule whose phrase occurs in the context
    pub(crate) fn grounded(rules: Vec<(&str, CandidateAnswer)>) -> Self {
        Self::with(Behavior::Grounded(
            rules
                .into_iter()
                .map(|(phrase, candidate)| (phrase.to_string(), candidate))
                .collect(),
        ))
    }

    /// Always fail
    pub(crate) fn failing() -> Self {
        Self::with(Behavior::Failing)
    }

    fn with(behavior: Behavior) -> Self {
        Self {
            behavior,
            calls: AtomicUsize::new(0),
        }
    }

    /// Number of times the model was invoked
    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AnswerService for StubAnswerService {
    async fn answer(
        &self,
        _question: &str,
        context: &str,
        params: &AnswerParams,
    ) -> Result<Vec<CandidateAnswer>> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        let mut candidates = match &self.behavior {
            Behavior::Fixed(candidates) => candidates.clone(),
            Behavior::Grounded(rules) => rules
                .iter()
                .filter(|(phrase, _)| context.contains(phrase.as_str()))
                .map(|(_, candidate)| candidate.clone())
                .collect(),
            Behavior::Failing => return Err(Error::model("stub model unavailable")),
        };
        candidates.truncate(params.top_k);
        Ok(candidates)
    }

    async fn health_check(&self) -> Result<bool> {
        Ok(!matches!(self.behavior, Behavior::Failing))
    }

    fn name(&self) -> &str {
        "stub"
    }

    fn model(&self) -> &str {
        "stub-model"
    }
}
