//! Answer span scoring for extractive question answering
//!
//! The model scores every token as a possible answer start and end. A span's
//! score is `p_start[s] * p_end[e]` after a softmax over the tokens that may
//! take part in an answer (context tokens plus the leading CLS token, which
//! stands for "no answer").

use std::cmp::Ordering;
use std::collections::HashMap;

use crate::types::CandidateAnswer;

use super::service::AnswerParams;

const MASKED_LOGIT: f32 = -10_000.0;

/// Model output for one window of the (question, context) pair
#[derive(Debug, Clone, Copy)]
pub struct WindowLogits<'a> {
    /// Start logits, one per token
    pub start_logits: &'a [f32],
    /// End logits, one per token
    pub end_logits: &'a [f32],
    /// Whether each token belongs to the context
    pub context_mask: &'a [bool],
    /// Byte offsets of each token into the context string
    pub offsets: &'a [(usize, usize)],
}

/// Numerically stable softmax
pub fn softmax(logits: &[f32]) -> Vec<f32> {
    let max = logits.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    if !max.is_finite() {
        return vec![0.0; logits.len()];
    }
    let exps: Vec<f32> = logits.iter().map(|&x| (x - max).exp()).collect();
    let sum: f32 = exps.iter().sum();
    exps.into_iter().map(|x| x / sum).collect()
}

/// Collects the best spans over all windows of one question
#[derive(Debug)]
pub struct SpanRanker {
    params: AnswerParams,
    spans: HashMap<(usize, usize), f32>,
    min_null_score: Option<f32>,
}

impl SpanRanker {
    /// Create a ranker
    pub fn new(params: AnswerParams) -> Self {
        Self {
            params,
            spans: HashMap::new(),
            min_null_score: None,
        }
    }

    /// Score one window and keep its `top_k` spans
    pub fn add_window(&mut self, window: &WindowLogits<'_>) {
        let len = window
            .start_logits
            .len()
            .min(window.end_logits.len())
            .min(window.context_mask.len())
            .min(window.offsets.len());
        if len == 0 {
            return;
        }

        let keep = |i: usize| i == 0 || window.context_mask[i];
        let masked = |logits: &[f32]| -> Vec<f32> {
            (0..len)
                .map(|i| if keep(i) { logits[i] } else { MASKED_LOGIT })
                .collect()
        };
        let start_probs = softmax(&masked(window.start_logits));
        let end_probs = softmax(&masked(window.end_logits));

        let null_score = start_probs[0] * end_probs[0];
        self.min_null_score = Some(match self.min_null_score {
            Some(current) => current.min(null_score),
            None => null_score,
        });

        let max_len = self.params.max_answer_len.max(1);
        let mut scored: Vec<(f32, usize, usize)> = Vec::new();

        for start in (0..len).filter(|&i| window.context_mask[i]) {
            let last = (start + max_len).min(len);
            for end in (start..last).filter(|&i| window.context_mask[i]) {
                let (byte_start, _) = window.offsets[start];
                let (_, byte_end) = window.offsets[end];
                if byte_end <= byte_start {
                    continue;
                }
                scored.push((start_probs[start] * end_probs[end], byte_start, byte_end));
            }
        }

        let top_k = self.params.top_k.max(1);
        if scored.len() > top_k {
            scored.select_nth_unstable_by(top_k - 1, |a, b| {
                b.0.partial_cmp(&a.0).unwrap_or(Ordering::Equal)
            });
            scored.truncate(top_k);
        }

        for (score, byte_start, byte_end) in scored {
            let best = self.spans.entry((byte_start, byte_end)).or_insert(score);
            if score > *best {
                *best = score;
            }
        }
    }

    /// Turn the collected spans into ranked candidates, best first
    pub fn finish(self, context: &str) -> Vec<CandidateAnswer> {
        let mut candidates: Vec<CandidateAnswer> = self
            .spans
            .into_iter()
            .filter_map(|((start, end), score)| {
                context
                    .get(start..end)
                    .map(|text| CandidateAnswer::new(text.trim(), score).with_span(start, end))
            })
            .collect();

        if self.params.handle_impossible_answer {
            if let Some(null_score) = self.min_null_score {
                candidates.push(CandidateAnswer::new("", null_score).with_span(0, 0));
            }
        }

        candidates.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.start.cmp(&b.start))
        });
        candidates.truncate(self.params.top_k);
        candidates
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // [CLS] question [SEP] hello world [SEP]
    const CONTEXT: &str = "hello world";
    const MASK: [bool; 6] = [false, false, false, true, true, false];
    const OFFSETS: [(usize, usize); 6] = [(0, 0), (0, 8), (0, 0), (0, 5), (6, 11), (0, 0)];

    fn rank(start: &[f32], end: &[f32], params: AnswerParams) -> Vec<CandidateAnswer> {
        let mut ranker = SpanRanker::new(params);
        ranker.add_window(&WindowLogits {
            start_logits: start,
            end_logits: end,
            context_mask: &MASK,
            offsets: &OFFSETS,
        });
        ranker.finish(CONTEXT)
    }

    #[test]
    fn test_softmax_sums_to_one() {
        let probs = softmax(&[1.0, 2.0, 3.0]);
        let sum: f32 = probs.iter().sum();
        assert!((sum - 1.0).abs() < 1e-5);
        assert!(probs[2] > probs[1] && probs[1] > probs[0]);
    }

    #[test]
    fn test_best_span_wins() {
        let start = [0.0, 9.0, 0.0, 1.0, 8.0, 0.0];
        let end = [0.0, 9.0, 0.0, 1.0, 8.0, 0.0];

        let candidates = rank(&start, &end, AnswerParams::default());

        assert_eq!(candidates[0].text, "world");
        assert_eq!(candidates[0].start, Some(6));
        assert_eq!(candidates[0].end, Some(11));
        assert!(candidates.len() <= 3);
    }

    #[test]
    fn test_question_tokens_are_never_answers() {
        // The question token has the highest logits but is masked out
        let start = [0.0, 50.0, 0.0, 2.0, 1.0, 0.0];
        let end = [0.0, 50.0, 0.0, 1.0, 2.0, 0.0];

        let candidates = rank(&start, &end, AnswerParams::default());

        assert!(candidates.iter().all(|c| c.end != Some(8)));
        assert_eq!(candidates[0].text, "hello world");
    }

    #[test]
    fn test_null_answer_competes_when_enabled() {
        let start = [10.0, 0.0, 0.0, 0.0, 0.0, 0.0];
        let end = [10.0, 0.0, 0.0, 0.0, 0.0, 0.0];

        let with_null = rank(&start, &end, AnswerParams::default());
        assert!(with_null[0].is_blank());

        let without_null = rank(
            &start,
            &end,
            AnswerParams {
                handle_impossible_answer: false,
                ..AnswerParams::default()
            },
        );
        assert!(without_null.iter().all(|c| !c.is_blank()));
    }

    #[test]
    fn test_max_answer_len_limits_span() {
        let start = [0.0, 0.0, 0.0, 5.0, 0.0, 0.0];
        let end = [0.0, 0.0, 0.0, 0.0, 5.0, 0.0];

        let candidates = rank(
            &start,
            &end,
            AnswerParams {
                max_answer_len: 1,
                ..AnswerParams::default()
            },
        );

        assert!(candidates.iter().all(|c| c.text != "hello world"));
    }

    #[test]
    fn test_overlapping_windows_deduplicate() {
        let start = [0.0, 0.0, 0.0, 0.0, 6.0, 0.0];
        let end = [0.0, 0.0, 0.0, 0.0, 6.0, 0.0];
        let window = WindowLogits {
            start_logits: &start,
            end_logits: &end,
            context_mask: &MASK,
            offsets: &OFFSETS,
        };

        let mut ranker = SpanRanker::new(AnswerParams::default());
        ranker.add_window(&window);
        ranker.add_window(&window);
        let candidates = ranker.finish(CONTEXT);

        let worlds = candidates.iter().filter(|c| c.text == "world").count();
        assert_eq!(worlds, 1);
    }
}
