//! Response composition: document answer, then canned reply, then fallback

use crate::qa::AnswerAdapter;
use crate::types::DocumentContext;

/// Reply to an empty question
pub const EMPTY_QUESTION_REPLY: &str = "Please ask a question about the PDF";

/// Reply when neither the document nor the canned table has an answer
pub const NO_ANSWER_REPLY: &str = "I couldn't find a specific answer in the PDF. \
    Try asking differently or check if the PDF contains relevant information.";

/// Trigger phrase and reply, scanned in order; the first phrase found
/// anywhere in the lowered question wins.
///
/// Matching is plain substring search, so short phrases also fire inside
/// longer words ("hi" in "this") and earlier entries shadow later ones
/// ("help" before "can you help me").
pub const CANNED_REPLIES: &[(&str, &str)] = &[
    ("hello", "Hello! Ask me about the PDF you uploaded."),
    ("hi", "Hi there! How can I help you with the PDF?"),
    ("thank you", "You're welcome!"),
    ("what can you do", "I can answer questions about PDF documents you upload."),
    ("who are you", "I'm your PDF analysis assistant."),
    ("help", "I can help you with questions about the PDF. Just ask!"),
    ("bye", "Goodbye! Feel free to return if you have more questions."),
    ("thanks", "No problem! Let me know if you have more questions."),
    ("goodbye", "Goodbye! I'm here if you need help with the PDF."),
    ("what is your name", "I'm your PDF assistant. You can call me PDF Bot."),
    (
        "how are you",
        "I'm just a program, but thanks for asking! How can I assist you today?",
    ),
    (
        "what is this",
        "This is a PDF question-answering assistant. Upload a PDF and ask questions about it.",
    ),
    (
        "what is pdf",
        "PDF stands for Portable Document Format. It's a file format used to present documents \
         in a manner independent of application software, hardware, and operating systems.",
    ),
    (
        "what is your purpose",
        "My purpose is to help you find information in PDF documents by answering your questions.",
    ),
    ("can you help me", "Of course! Just ask your question about the PDF."),
    (
        "can you answer questions",
        "Yes, I can answer questions about the PDF you uploaded.",
    ),
    (
        "can you read pdf",
        "Yes, I can read and extract information from PDF documents.",
    ),
    (
        "can you summarize",
        "I can help summarize information from the PDF if you ask specific questions.",
    ),
];

/// First canned reply whose trigger phrase occurs in `question`
pub fn canned_reply(question: &str) -> Option<&'static str> {
    let lowered = question.to_lowercase();
    CANNED_REPLIES
        .iter()
        .find(|(phrase, _)| lowered.contains(phrase))
        .map(|(_, reply)| *reply)
}

/// Display string for an answer drawn from the document
pub fn format_document_answer(answer: &str, confidence: f32) -> String {
    format!(
        "📄 Answer (confidence: {:.0}%): {}",
        confidence * 100.0,
        answer
    )
}

/// Builds the reply to one question
#[derive(Clone)]
pub struct ResponseComposer {
    adapter: AnswerAdapter,
}

impl ResponseComposer {
    /// Create a composer on top of an answer adapter
    pub fn new(adapter: AnswerAdapter) -> Self {
        Self { adapter }
    }

    /// Answer adapter used for document answers
    pub fn adapter(&self) -> &AnswerAdapter {
        &self.adapter
    }

    /// Compose the reply to `question` against `document`
    pub async fn compose(&self, question: &str, document: &DocumentContext) -> String {
        let question = question.trim();
        if question.is_empty() {
            return EMPTY_QUESTION_REPLY.to_string();
        }

        let outcome = self.adapter.answer(question, document).await;
        tracing::debug!("Answer outcome: {}", outcome.kind());

        let (answer, confidence) = outcome.into_pair();
        if confidence > 0.0 {
            return format_document_answer(&answer, confidence);
        }

        canned_reply(question)
            .map(str::to_string)
            .unwrap_or_else(|| NO_ANSWER_REPLY.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::QaConfig;
    use crate::qa::stub::StubAnswerService;
    use crate::types::CandidateAnswer;
    use std::sync::Arc;

    const REPORT: &str = "The committee met on Tuesday to review the budget. \
        After a long discussion the members approved a total budget of four million dollars \
        for the coming fiscal year.";

    fn build_composer(stub: StubAnswerService) -> (ResponseComposer, Arc<StubAnswerService>) {
        let stub = Arc::new(stub);
        let adapter = AnswerAdapter::new(stub.clone(), &QaConfig::default());
        (ResponseComposer::new(adapter), stub)
    }

    fn reply_for(phrase: &str) -> &'static str {
        CANNED_REPLIES
            .iter()
            .find(|(p, _)| *p == phrase)
            .map(|(_, r)| *r)
            .unwrap()
    }

    #[test]
    fn test_table_has_eighteen_entries_in_order() {
        assert_eq!(CANNED_REPLIES.len(), 18);
        assert_eq!(CANNED_REPLIES[0].0, "hello");
        assert_eq!(CANNED_REPLIES[2].0, "thank you");
        assert_eq!(CANNED_REPLIES[7].0, "thanks");
        assert_eq!(CANNED_REPLIES[17].0, "can you summarize");
    }

    #[test]
    fn test_format_document_answer() {
        assert_eq!(
            format_document_answer("four million dollars", 0.873),
            "📄 Answer (confidence: 87%): four million dollars"
        );
    }

    #[test]
    fn test_canned_reply_is_case_insensitive() {
        assert_eq!(canned_reply("WHAT IS PDF"), Some(reply_for("what is pdf")));
        assert_eq!(canned_reply("xyz qqq"), None);
    }

    // Both "hello" and "can you help me" occur; "hello" is earlier in the table.
    #[test]
    fn test_earlier_entry_wins_over_later() {
        assert_eq!(
            canned_reply("hello, can you help me?"),
            Some(reply_for("hello"))
        );
    }

    // "thank you" precedes "thanks", so a question with both gets the first.
    #[test]
    fn test_thank_you_precedes_thanks() {
        assert_eq!(canned_reply("thanks, thank you!"), Some(reply_for("thank you")));
        assert_eq!(canned_reply("thanks a lot"), Some(reply_for("thanks")));
    }

    // Substring matching lets short phrases fire inside longer words and
    // shadow the more specific entries further down the table.
    #[test]
    fn test_order_dependent_matches_are_preserved() {
        assert_eq!(canned_reply("what is this?"), Some(reply_for("hi")));
        assert_eq!(canned_reply("can you help me"), Some(reply_for("help")));
        assert_eq!(canned_reply("goodbye"), Some(reply_for("bye")));
    }

    #[tokio::test]
    async fn test_empty_question_prompts_user() {
        let (composer, stub) = build_composer(StubAnswerService::fixed(vec![]));
        let reply = composer
            .compose("   ", &DocumentContext::with_text(REPORT))
            .await;

        assert_eq!(reply, EMPTY_QUESTION_REPLY);
        assert_eq!(stub.calls(), 0);
    }

    #[tokio::test]
    async fn test_document_answer_first() {
        let (composer, _) = build_composer(StubAnswerService::fixed(vec![CandidateAnswer::new(
            "four million dollars",
            0.85,
        )]));

        let reply = composer
            .compose("hello, what budget was approved?", &DocumentContext::with_text(REPORT))
            .await;

        assert_eq!(reply, "📄 Answer (confidence: 85%): four million dollars");
    }

    #[tokio::test]
    async fn test_threshold_confidence_falls_through_to_table() {
        let (composer, _) = build_composer(StubAnswerService::fixed(vec![CandidateAnswer::new(
            "Tuesday",
            0.4,
        )]));

        let reply = composer
            .compose("hello there", &DocumentContext::with_text(REPORT))
            .await;

        assert_eq!(reply, reply_for("hello"));
    }

    #[tokio::test]
    async fn test_model_failure_reads_like_normal_reply() {
        let (composer, _) = build_composer(StubAnswerService::failing());

        let reply = composer
            .compose("xyz qqq", &DocumentContext::with_text(REPORT))
            .await;

        assert_eq!(reply, NO_ANSWER_REPLY);
    }

    #[tokio::test]
    async fn test_short_document_gets_fallback_regardless_of_question() {
        let (composer, stub) = build_composer(StubAnswerService::fixed(vec![CandidateAnswer::new(
            "budget", 0.99,
        )]));

        let reply = composer
            .compose("what was approved?", &DocumentContext::with_text("a short note"))
            .await;

        assert_eq!(reply, NO_ANSWER_REPLY);
        assert_eq!(stub.calls(), 0);
    }
}
