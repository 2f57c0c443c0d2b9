//! Upload handling: parse the PDF and replace the loaded document

use std::fmt;
use std::time::{Duration, Instant};

use crate::config::ExtractionConfig;
use crate::error::{Error, Result};
use crate::types::DocumentContext;

use super::parser::{ParsedPdf, PdfParser};

/// Outcome of loading a PDF, shown to the user in the status box
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtractionStatus {
    /// Text was recovered
    Loaded {
        /// Pages in the PDF
        pages: usize,
        /// Whitespace-delimited words in the document text
        words: usize,
    },
    /// The PDF parsed but no text could be recovered
    Empty,
    /// The PDF could not be parsed
    Failed(String),
}

impl ExtractionStatus {
    /// Whether the upload produced a usable document
    pub fn is_loaded(&self) -> bool {
        matches!(self, ExtractionStatus::Loaded { .. })
    }
}

impl fmt::Display for ExtractionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExtractionStatus::Loaded { pages, words } => {
                write!(f, "✅ PDF loaded ({} pages, {} words)", pages, words)
            }
            ExtractionStatus::Empty => write!(f, "⚠️ PDF loaded but no text could be extracted"),
            ExtractionStatus::Failed(message) => write!(f, "❌ Error loading PDF: {}", message),
        }
    }
}

/// Loads uploaded PDFs into a [`DocumentContext`]
#[derive(Debug, Clone)]
pub struct TextExtractor {
    config: ExtractionConfig,
}

impl TextExtractor {
    /// Create a new extractor
    pub fn new(config: ExtractionConfig) -> Self {
        Self { config }
    }

    /// Parse `data` and replace the document held by `document`.
    ///
    /// Any PDF that parses replaces the previous document, even one without
    /// text. A file that fails to parse leaves `document` as it was.
    pub async fn load(
        &self,
        data: Vec<u8>,
        filename: Option<String>,
        document: &mut DocumentContext,
    ) -> ExtractionStatus {
        let start = Instant::now();
        let size = data.len();

        match self.parse(data).await {
            Ok(parsed) => {
                let pages = parsed.page_count;
                let words = parsed.word_count();
                let parsed_with_fallback = parsed.used_fallback;
                document.replace(parsed.text, pages, filename.clone());

                let status = if document.is_loaded() {
                    ExtractionStatus::Loaded { pages, words }
                } else {
                    ExtractionStatus::Empty
                };

                tracing::info!(
                    "Loaded {} ({} bytes): {} pages, {} words in {:.1}s{}",
                    filename.as_deref().unwrap_or("upload"),
                    size,
                    pages,
                    words,
                    start.elapsed().as_secs_f64(),
                    if parsed_with_fallback { " (pdf-extract)" } else { "" }
                );
                status
            }
            Err(e) => {
                tracing::warn!(
                    "Failed to load {} ({} bytes): {}",
                    filename.as_deref().unwrap_or("upload"),
                    size,
                    e
                );
                ExtractionStatus::Failed(e.to_string())
            }
        }
    }

    /// Run the parser on the blocking pool, bounded by the configured timeout
    async fn parse(&self, data: Vec<u8>) -> Result<ParsedPdf> {
        let fallback = self.config.whole_document_fallback;
        let limit = Duration::from_secs(self.config.timeout_secs);

        let task = tokio::task::spawn_blocking(move || PdfParser::parse(&data, fallback));

        match tokio::time::timeout(limit, task).await {
            Ok(Ok(result)) => result,
            Ok(Err(join_error)) => Err(Error::pdf_parse(format!(
                "PDF parser crashed: {}",
                join_error
            ))),
            Err(_) => {
                tracing::error!("PDF extraction timeout after {}s", limit.as_secs());
                Err(Error::pdf_parse(format!(
                    "Timed out after {}s reading the PDF",
                    limit.as_secs()
                )))
            }
        }
    }
}

impl Default for TextExtractor {
    fn default() -> Self {
        Self::new(ExtractionConfig::default())
    }
}
