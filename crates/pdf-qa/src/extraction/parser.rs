//! Page-by-page PDF text extraction

use crate::error::{Error, Result};

use super::cleaner::{clean_page_text, join_pages};

/// Text recovered from a PDF
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedPdf {
    /// Pages in the page tree
    pub page_count: usize,
    /// Cleaned text of every page, joined with single spaces
    pub text: String,
    /// Whether the whole-document engine produced `text`
    pub used_fallback: bool,
}

impl ParsedPdf {
    /// Number of whitespace-delimited words
    pub fn word_count(&self) -> usize {
        self.text.split_whitespace().count()
    }
}

/// PDF parser backed by lopdf, with pdf-extract as a second engine
pub struct PdfParser;

impl PdfParser {
    /// Parse `data` and extract cleaned text.
    ///
    /// A page whose text cannot be decoded counts as empty. Only a file that
    /// fails to load at all is an error.
    pub fn parse(data: &[u8], whole_document_fallback: bool) -> Result<ParsedPdf> {
        let doc = lopdf::Document::load_mem(data)
            .map_err(|e| Error::pdf_parse(format!("Failed to load PDF: {}", e)))?;

        let pages = doc.get_pages();
        let page_count = pages.len();

        let cleaned: Vec<String> = pages
            .keys()
            .map(|&page_number| match doc.extract_text(&[page_number]) {
                Ok(raw) => clean_page_text(&raw),
                Err(e) => {
                    tracing::debug!("No text on page {}: {}", page_number, e);
                    String::new()
                }
            })
            .collect();

        let text = join_pages(&cleaned);

        if text.trim().is_empty() && whole_document_fallback && page_count > 0 {
            if let Some(fallback) = Self::extract_whole_document(data) {
                tracing::info!("Page extraction found no text, recovered it with pdf-extract");
                return Ok(ParsedPdf {
                    page_count,
                    text: fallback,
                    used_fallback: true,
                });
            }
        }

        Ok(ParsedPdf {
            page_count,
            text,
            used_fallback: false,
        })
    }

    /// Whole-document extraction with pdf-extract; `None` when it finds nothing
    fn extract_whole_document(data: &[u8]) -> Option<String> {
        // pdf-extract panics on some malformed font programs
        let result = std::panic::catch_unwind(|| pdf_extract::extract_text_from_mem(data));

        let raw = match result {
            Ok(Ok(raw)) => raw,
            Ok(Err(e)) => {
                tracing::warn!("pdf-extract failed: {}", e);
                return None;
            }
            Err(_) => {
                tracing::warn!("pdf-extract panicked while reading the document");
                return None;
            }
        };

        // pdf-extract separates pages with form feeds
        let pages: Vec<String> = raw.split('\u{000C}').map(clean_page_text).collect();
        let text = join_pages(&pages);

        if text.trim().is_empty() {
            None
        } else {
            Some(text)
        }
    }
}

/// Build a small PDF in memory, one text line per page (empty string = blank page)
#[cfg(test)]
pub(crate) fn build_test_pdf(pages: &[&str]) -> Vec<u8> {
    use lopdf::content::{Content, Operation};
    use lopdf::{dictionary, Document, Object, Stream};

    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Courier",
        "Encoding" => "WinAnsiEncoding",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            "F1" => font_id,
        },
    });

    let mut kids = Vec::new();
    for text in pages {
        let operations = if text.is_empty() {
            Vec::new()
        } else {
            vec![
                Operation::new("BT", vec![]),
                Operation::new("Tf", vec!["F1".into(), 12.into()]),
                Operation::new("Td", vec![50.into(), 700.into()]),
                Operation::new("Tj", vec![Object::string_literal(*text)]),
                Operation::new("ET", vec![]),
            ]
        };
        let content = Content { operations };
        let content_id = doc.add_object(Stream::new(
            dictionary! {},
            content.encode().expect("encode content"),
        ));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        kids.push(Object::from(page_id));
    }

    let page_tree = dictionary! {
        "Type" => "Pages",
        "Kids" => kids,
        "Count" => pages.len() as i64,
        "Resources" => resources_id,
        "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
    };
    doc.objects.insert(pages_id, Object::Dictionary(page_tree));

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut buffer = Vec::new();
    doc.save_to(&mut buffer).expect("save pdf");
    buffer
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_and_word_counts() {
        let data = build_test_pdf(&["The quick brown fox", "jumps over the lazy dog"]);
        let parsed = PdfParser::parse(&data, false).unwrap();

        assert_eq!(parsed.page_count, 2);
        assert_eq!(parsed.word_count(), 9);
        assert!(parsed.text.contains("quick brown fox"));
        assert!(parsed.text.contains("lazy dog"));
        assert!(!parsed.used_fallback);
    }

    #[test]
    fn test_blank_pages_are_empty_not_errors() {
        let data = build_test_pdf(&["", "only text here", ""]);
        let parsed = PdfParser::parse(&data, false).unwrap();

        assert_eq!(parsed.page_count, 3);
        assert_eq!(parsed.word_count(), 3);
    }

    #[test]
    fn test_no_text_anywhere() {
        let data = build_test_pdf(&["", ""]);
        let parsed = PdfParser::parse(&data, false).unwrap();

        assert_eq!(parsed.page_count, 2);
        assert!(parsed.text.trim().is_empty());
    }

    #[test]
    fn test_fallback_on_textless_pdf_stays_empty() {
        let data = build_test_pdf(&["", ""]);
        let parsed = PdfParser::parse(&data, true).unwrap();

        assert_eq!(parsed.page_count, 2);
        assert!(parsed.text.trim().is_empty());
        assert!(!parsed.used_fallback);
    }

    #[test]
    fn test_fallback_not_used_when_pages_have_text() {
        let data = build_test_pdf(&["some words on the page"]);
        let parsed = PdfParser::parse(&data, true).unwrap();

        assert_eq!(parsed.word_count(), 5);
        assert!(!parsed.used_fallback);
    }

    #[test]
    fn test_garbage_is_an_error() {
        let err = PdfParser::parse(b"definitely not a pdf", true).unwrap_err();
        assert!(matches!(err, Error::PdfParse(_)));
    }
}
