//! PDF page text reader.

use lopdf::Document;
use qbank_core::{Error, LogSink, Result};
use std::path::Path;

/// Reader that concatenates page text from a PDF.
pub struct PdfReader;

impl PdfReader {
    /// Create a new PDF reader.
    pub fn new() -> Self {
        Self
    }

    /// Load a PDF from disk and extract its text.
    pub fn read_path(&self, path: &Path, sink: &dyn LogSink) -> Result<String> {
        let document = Document::load(path)
            .map_err(|e| Error::PdfError(format!("Failed to open {}: {}", path.display(), e)))?;
        Ok(self.extract(&document, sink))
    }

    /// Load a PDF from memory and extract its text.
    pub fn read_bytes(&self, data: &[u8], sink: &dyn LogSink) -> Result<String> {
        let document = Document::load_mem(data)
            .map_err(|e| Error::PdfError(format!("Failed to open PDF: {}", e)))?;
        Ok(self.extract(&document, sink))
    }

    /// Extract text page by page, joining pages with newlines.
    ///
    /// A page that fails to extract is reported and skipped.
    fn extract(&self, document: &Document, sink: &dyn LogSink) -> String {
        let pages: Vec<u32> = document.get_pages().keys().copied().collect();
        let total = pages.len();
        let mut text = String::new();

        for (idx, page_number) in pages.into_iter().enumerate() {
            sink.append(&format!("Reading PDF page {}/{}", idx + 1, total));

            match document.extract_text(&[page_number]) {
                Ok(page_text) => push_page(&mut text, &page_text),
                Err(e) => {
                    log::warn!("PDF page {} extraction failed: {}", page_number, e);
                    sink.append(&format!("Skipping unreadable PDF page {}: {}", page_number, e));
                }
            }
        }

        text
    }
}

impl Default for PdfReader {
    fn default() -> Self {
        Self::new()
    }
}

/// Append a page's text followed by a newline, skipping blank pages.
fn push_page(text: &mut String, page_text: &str) {
    if page_text.trim().is_empty() {
        return;
    }
    text.push_str(page_text);
    if !page_text.ends_with('\n') {
        text.push('\n');
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lopdf::content::{Content, Operation};
    use lopdf::{dictionary, Object, Stream};
    use qbank_core::MemorySink;

    /// One page per entry; `None` writes a page whose content cannot be read.
    fn build_pdf(pages: &[Option<&str>]) -> Vec<u8> {
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

        let mut kids: Vec<Object> = Vec::new();
        for page in pages {
            let operations = match page {
                Some(text) => vec![
                    Operation::new("BT", vec![]),
                    Operation::new("Tf", vec!["F1".into(), 12.into()]),
                    Operation::new("Td", vec![72.into(), 720.into()]),
                    Operation::new("Tj", vec![Object::string_literal(*text)]),
                    Operation::new("ET", vec![]),
                ],
                // A font operator with no operands fails text extraction.
                None => vec![
                    Operation::new("BT", vec![]),
                    Operation::new("Tf", vec![]),
                    Operation::new("ET", vec![]),
                ],
            };
            let content = Content { operations };
            let stream = Stream::new(dictionary! {}, content.encode().unwrap());
            let content_id = doc.add_object(stream);
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
            });
            kids.push(page_id.into());
        }

        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => pages.len() as i64,
                "Resources" => resources_id,
                "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let mut bytes = Vec::new();
        doc.save_to(&mut bytes).unwrap();
        bytes
    }

    #[test]
    fn test_pages_are_joined_in_order() {
        let data = build_pdf(&[Some("1. First question"), Some("2. Second question")]);
        let sink = MemorySink::new();

        let text = PdfReader::new().read_bytes(&data, &sink).unwrap();

        assert_eq!(text, "1. First question\n2. Second question\n");
        assert_eq!(
            sink.lines(),
            vec!["Reading PDF page 1/2", "Reading PDF page 2/2"]
        );
    }

    #[test]
    fn test_unreadable_page_is_skipped() {
        let data = build_pdf(&[Some("1. First question"), None, Some("3. Third question")]);
        let sink = MemorySink::new();

        let text = PdfReader::new().read_bytes(&data, &sink).unwrap();

        assert_eq!(text, "1. First question\n3. Third question\n");
        let lines = sink.lines();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[1], "Reading PDF page 2/3");
        assert!(lines[2].starts_with("Skipping unreadable PDF page 2:"));
        assert_eq!(lines[3], "Reading PDF page 3/3");
    }

    #[test]
    fn test_read_path_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bank.pdf");
        std::fs::write(&path, build_pdf(&[Some("1. Only question")])).unwrap();

        let text = PdfReader::new().read_path(&path, &MemorySink::new()).unwrap();
        assert_eq!(text, "1. Only question\n");
    }

    #[test]
    fn test_push_page_joins_with_newlines() {
        let mut text = String::new();
        push_page(&mut text, "1. 第一题");
        push_page(&mut text, "   ");
        push_page(&mut text, "2. 第二题\n");

        assert_eq!(text, "1. 第一题\n2. 第二题\n");
    }

    #[test]
    fn test_read_bytes_rejects_garbage() {
        let sink = MemorySink::new();
        let result = PdfReader::new().read_bytes(b"not a pdf at all", &sink);

        assert!(matches!(result, Err(Error::PdfError(_))));
        assert!(sink.lines().is_empty());
    }

    #[test]
    fn test_read_path_missing_file() {
        let sink = MemorySink::new();
        let result = PdfReader::new().read_path(Path::new("/nonexistent/bank.pdf"), &sink);

        assert!(result.is_err());
    }
}
