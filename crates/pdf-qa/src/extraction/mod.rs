//! PDF text extraction
//!
//! Turns uploaded PDF bytes into the cleaned single-string document text the
//! question-answering model reads, and reports a user-facing status line.

mod cleaner;
mod extractor;
mod parser;

pub use cleaner::{clean_page_text, join_pages};
pub use extractor::{ExtractionStatus, TextExtractor};
pub use parser::{ParsedPdf, PdfParser};

#[cfg(test)]
pub(crate) use parser::build_test_pdf;
