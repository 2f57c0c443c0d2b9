//! The currently loaded document

use std::sync::Arc;
use tokio::sync::RwLock;

/// Document context shared by every handler in the process.
///
/// Every browser session sees the same document: an upload from one page
/// replaces the text another page is asking about.
pub type SharedDocument = Arc<RwLock<DocumentContext>>;

/// Text of the most recently uploaded PDF
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentContext {
    text: String,
    page_count: usize,
    source: Option<String>,
}

impl DocumentContext {
    /// Create an empty context (no document loaded)
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a context holding `text`
    pub fn with_text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    /// Wrap this context for sharing between handlers
    pub fn into_shared(self) -> SharedDocument {
        Arc::new(RwLock::new(self))
    }

    /// Replace the stored document, discarding the previous one
    pub fn replace(&mut self, text: String, page_count: usize, source: Option<String>) {
        self.text = text;
        self.page_count = page_count;
        self.source = source;
    }

    /// Full document text
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Whitespace-only text counts as no document
    pub fn is_loaded(&self) -> bool {
        !self.text.trim().is_empty()
    }

    /// Number of whitespace-delimited words
    pub fn word_count(&self) -> usize {
        self.text.split_whitespace().count()
    }

    /// Page count of the uploaded PDF
    pub fn page_count(&self) -> usize {
        self.page_count
    }

    /// File name of the uploaded PDF, if the client sent one
    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }
}
