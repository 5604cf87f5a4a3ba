//! PDF text extraction.
//!
//! Pages are extracted in page order and joined with newlines. A document
//! that parses but yields no text produces the fixed [`NO_TEXT_FOUND`]
//! string so the profile panel always has something to show.

use concierge_core::error::IngestError;
use lopdf::Document;
use tracing::debug;

/// Returned when a PDF parses cleanly but contains no extractable text.
pub const NO_TEXT_FOUND: &str = "No text found in PDF.";

/// Extract the concatenated page text from a PDF byte buffer.
pub fn extract_text(bytes: &[u8]) -> Result<String, IngestError> {
    let doc = Document::load_mem(bytes).map_err(|e| IngestError::Parse(e.to_string()))?;

    let mut pages_text = Vec::new();
    for page_number in doc.get_pages().keys() {
        // A page that fails extraction contributes nothing; the rest of
        // the document is still used.
        match doc.extract_text(&[*page_number]) {
            Ok(text) => pages_text.push(text),
            Err(e) => {
                debug!(page = page_number, error = %e, "Skipping unextractable page");
                pages_text.push(String::new());
            }
        }
    }

    let text = pages_text.join("\n").trim().to_string();
    if text.is_empty() {
        return Ok(NO_TEXT_FOUND.to_string());
    }

    debug!(chars = text.len(), pages = pages_text.len(), "Extracted resume text");
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use lopdf::content::{Content, Operation};
    use lopdf::{Object, Stream, dictionary};

    /// Build a one-page PDF containing the given text operations.
    fn pdf_with_operations(operations: Vec<Operation>) -> Vec<u8> {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();

        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Courier",
        });
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! { "F1" => font_id },
        });

        let content = Content { operations };
        let content_id = doc.add_object(Stream::new(
            dictionary! {},
            content.encode().unwrap(),
        ));

        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
        });

        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => vec![page_id.into()],
                "Count" => 1,
            }),
        );

        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let mut buf = Vec::new();
        doc.save_to(&mut buf).unwrap();
        buf
    }

    fn text_operations(text: &str) -> Vec<Operation> {
        vec![
            Operation::new("BT", vec![]),
            Operation::new("Tf", vec!["F1".into(), 12.into()]),
            Operation::new("Td", vec![72.into(), 720.into()]),
            Operation::new("Tj", vec![Object::string_literal(text)]),
            Operation::new("ET", vec![]),
        ]
    }

    #[test]
    fn extracts_page_text() {
        let bytes = pdf_with_operations(text_operations("Systems engineer, ten years Rust"));
        let text = extract_text(&bytes).unwrap();
        assert!(text.contains("Systems engineer"));
    }

    #[test]
    fn empty_page_yields_no_text_message() {
        let bytes = pdf_with_operations(vec![]);
        assert_eq!(extract_text(&bytes).unwrap(), NO_TEXT_FOUND);
    }

    #[test]
    fn garbage_bytes_are_a_parse_error() {
        let result = extract_text(b"this is not a pdf at all");
        assert!(matches!(result, Err(IngestError::Parse(_))));
    }

    #[test]
    fn parse_error_display_is_benign() {
        let err = extract_text(&[0u8; 16]).unwrap_err();
        let msg = err.display_message();
        assert!(msg.starts_with("Error reading PDF:"));
    }
}
