//! Candidate answers and the outcome of asking the document a question

use serde::{Deserialize, Serialize};

/// One ranked answer from the question-answering model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateAnswer {
    /// Answer text as it appears in the context (empty for "no answer")
    #[serde(rename = "answer")]
    pub text: String,
    /// Model confidence in [0, 1]
    pub score: f32,
    /// Start of the span in the context
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<usize>,
    /// End of the span in the context (exclusive)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<usize>,
}

impl CandidateAnswer {
    /// Create a candidate without span information
    pub fn new(text: impl Into<String>, score: f32) -> Self {
        Self {
            text: text.into(),
            score,
            start: None,
            end: None,
        }
    }

    /// Attach the context span the answer was drawn from
    pub fn with_span(mut self, start: usize, end: usize) -> Self {
        self.start = Some(start);
        self.end = Some(end);
        self
    }

    /// True when the model declared the question unanswerable
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}

/// Result of asking the loaded document a question
#[derive(Debug, Clone, PartialEq)]
pub enum AnswerOutcome {
    /// A candidate passed the selection policy
    Answered(CandidateAnswer),
    /// No document is loaded
    NoDocument,
    /// The document is too short to trust the model
    InsufficientContext {
        /// Words in the loaded document
        words: usize,
    },
    /// The model answered, but nothing was confident and non-empty
    LowConfidence,
    /// The model call failed
    ServiceFailure(String),
}

impl AnswerOutcome {
    /// Collapse into `(answer, confidence)`; every miss becomes `("", 0.0)`
    pub fn into_pair(self) -> (String, f32) {
        match self {
            AnswerOutcome::Answered(candidate) => (candidate.text, candidate.score),
            _ => (String::new(), 0.0),
        }
    }

    /// Confidence of the selected answer, zero on a miss
    pub fn confidence(&self) -> f32 {
        match self {
            AnswerOutcome::Answered(candidate) => candidate.score,
            _ => 0.0,
        }
    }

    /// Short label for logs
    pub fn kind(&self) -> &'static str {
        match self {
            AnswerOutcome::Answered(_) => "answered",
            AnswerOutcome::NoDocument => "no_document",
            AnswerOutcome::InsufficientContext { .. } => "insufficient_context",
            AnswerOutcome::LowConfidence => "low_confidence",
            AnswerOutcome::ServiceFailure(_) => "service_failure",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_misses_collapse_to_zero() {
        let misses = [
            AnswerOutcome::NoDocument,
            AnswerOutcome::InsufficientContext { words: 3 },
            AnswerOutcome::LowConfidence,
            AnswerOutcome::ServiceFailure("boom".to_string()),
        ];
        for outcome in misses {
            assert_eq!(outcome.confidence(), 0.0);
            assert_eq!(outcome.into_pair(), (String::new(), 0.0));
        }
    }

    #[test]
    fn test_answered_pair() {
        let outcome = AnswerOutcome::Answered(CandidateAnswer::new("Paris", 0.9));
        assert_eq!(outcome.kind(), "answered");
        assert_eq!(outcome.into_pair(), ("Paris".to_string(), 0.9));
    }

    #[test]
    fn test_deserialize_inference_shape() {
        let candidate: CandidateAnswer =
            serde_json::from_str(r#"{"answer":"42","score":0.7,"start":10,"end":12}"#).unwrap();
        assert_eq!(candidate.text, "42");
        assert_eq!(candidate.start, Some(10));
        assert!(!candidate.is_blank());
    }
}
