//! DOCX paragraph reader.

use qbank_core::{Error, Result};
use quick_xml::events::Event;
use quick_xml::Reader;
use std::fs::File;
use std::io::{BufReader, Read, Seek};
use std::path::Path;
use zip::ZipArchive;

/// Main document part inside the package.
const DOCUMENT_PART: &str = "word/document.xml";

/// Reader for the body paragraphs of a DOCX file.
pub struct DocxReader;

impl DocxReader {
    /// Create a new DOCX reader.
    pub fn new() -> Self {
        Self
    }

    /// Open a DOCX file and return its paragraphs joined by newlines.
    pub fn read_path(&self, path: &Path) -> Result<String> {
        let file = File::open(path)?;
        Ok(self.paragraphs(BufReader::new(file))?.join("\n"))
    }

    /// Extract the text of each body-level paragraph, in document order.
    ///
    /// Paragraphs nested in tables are not body paragraphs and are skipped.
    pub fn paragraphs<R: Read + Seek>(&self, reader: R) -> Result<Vec<String>> {
        let mut archive = ZipArchive::new(reader)
            .map_err(|e| Error::ZipError(format!("Failed to open ZIP: {}", e)))?;

        let content = read_file_from_archive(&mut archive, DOCUMENT_PART)?;
        Ok(extract_paragraphs_from_xml(&content))
    }
}

impl Default for DocxReader {
    fn default() -> Self {
        Self::new()
    }
}

/// Walk `w:body` and collect paragraph text.
///
/// Tables and text boxes hold paragraphs of their own; their contents are
/// skipped without interrupting the enclosing body paragraph. Malformed XML
/// stops the walk; paragraphs read up to that point are kept.
fn extract_paragraphs_from_xml(xml_content: &str) -> Vec<String> {
    let mut paragraphs = Vec::new();
    let mut reader = Reader::from_str(xml_content);

    let mut nested_depth = 0usize;
    let mut current: Option<String> = None;
    let mut in_run = false;
    let mut in_text = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) => match local_name(e.name().as_ref()) {
                name if is_nested_container(name) => nested_depth += 1,
                _ if nested_depth > 0 => {}
                b"p" => current = Some(String::new()),
                b"r" => in_run = true,
                b"t" => in_text = true,
                _ => {}
            },
            Ok(Event::Empty(ref e)) => match local_name(e.name().as_ref()) {
                _ if nested_depth > 0 => {}
                b"p" => paragraphs.push(String::new()),
                b"tab" if in_run => push_to(&mut current, "\t"),
                b"br" | b"cr" if in_run => push_to(&mut current, "\n"),
                _ => {}
            },
            Ok(Event::Text(ref e)) => {
                if in_text && nested_depth == 0 {
                    let value = e.unescape().unwrap_or_default();
                    push_to(&mut current, &value);
                }
            }
            Ok(Event::End(ref e)) => match local_name(e.name().as_ref()) {
                name if is_nested_container(name) => {
                    nested_depth = nested_depth.saturating_sub(1)
                }
                _ if nested_depth > 0 => {}
                b"p" => {
                    if let Some(text) = current.take() {
                        paragraphs.push(text);
                    }
                }
                b"r" => in_run = false,
                b"t" => in_text = false,
                _ => {}
            },
            Ok(Event::Eof) => break,
            Err(e) => {
                log::warn!(
                    "XML parsing error after {} paragraphs (stopping): {}",
                    paragraphs.len(),
                    e
                );
                break;
            }
            _ => {}
        }
    }

    paragraphs
}

/// Elements whose paragraphs are not body paragraphs: tables and text boxes.
fn is_nested_container(name: &[u8]) -> bool {
    matches!(name, b"tbl" | b"txbxContent")
}

fn push_to(current: &mut Option<String>, value: &str) {
    if let Some(text) = current {
        text.push_str(value);
    }
}

/// Read a file from the ZIP archive.
fn read_file_from_archive<R: Read + Seek>(
    archive: &mut ZipArchive<R>,
    path: &str,
) -> Result<String> {
    let mut file = archive
        .by_name(path)
        .map_err(|e| Error::DocxError(format!("Part '{}' missing from package: {}", path, e)))?;

    let mut content = String::new();
    file.read_to_string(&mut content)
        .map_err(|e| Error::ZipError(format!("Failed to read '{}': {}", path, e)))?;

    Ok(content)
}

/// Extract the local name from a potentially namespaced XML element name.
pub(crate) fn local_name(name: &[u8]) -> &[u8] {
    if let Some(pos) = name.iter().position(|&b| b == b':') {
        &name[pos + 1..]
    } else {
        name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn body(inner: &str) -> String {
        format!(
            r#"<?xml version="1.0" encoding="UTF-8"?><w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body>{}</w:body></w:document>"#,
            inner
        )
    }

    #[test]
    fn test_paragraph_runs_are_joined() {
        let xml = body(
            "<w:p><w:r><w:t>1. 苹果</w:t></w:r><w:r><w:t xml:space=\"preserve\"> 答案：A</w:t></w:r></w:p>\
             <w:p><w:r><w:t>2. 香蕉</w:t></w:r></w:p>",
        );

        assert_eq!(
            extract_paragraphs_from_xml(&xml),
            vec!["1. 苹果 答案：A", "2. 香蕉"]
        );
    }

    #[test]
    fn test_tabs_breaks_and_empty_paragraphs() {
        let xml = body(
            "<w:p><w:r><w:t>a</w:t><w:tab/><w:t>b</w:t><w:br/><w:t>c</w:t></w:r></w:p>\
             <w:p/><w:p><w:pPr><w:tabs><w:tab w:val=\"left\" w:pos=\"720\"/></w:tabs></w:pPr></w:p>",
        );

        assert_eq!(extract_paragraphs_from_xml(&xml), vec!["a\tb\nc", "", ""]);
    }

    #[test]
    fn test_table_paragraphs_are_skipped() {
        let xml = body(
            "<w:p><w:r><w:t>before</w:t></w:r></w:p>\
             <w:tbl><w:tr><w:tc><w:p><w:r><w:t>cell</w:t></w:r></w:p></w:tc></w:tr></w:tbl>\
             <w:p><w:r><w:t>after</w:t></w:r></w:p>",
        );

        assert_eq!(extract_paragraphs_from_xml(&xml), vec!["before", "after"]);
    }

    #[test]
    fn test_text_box_keeps_enclosing_paragraph() {
        let xml = body(
            "<w:p><w:r><w:t>1. 苹果 答案：A</w:t></w:r>\
             <w:r><w:pict><v:shape xmlns:v=\"urn:schemas-microsoft-com:vml\"><v:textbox>\
             <w:txbxContent><w:p><w:r><w:t>box</w:t></w:r></w:p><w:p/></w:txbxContent>\
             </v:textbox></v:shape></w:pict></w:r>\
             <w:r><w:t xml:space=\"preserve\"> tail</w:t><w:tab/></w:r></w:p>\
             <w:p><w:r><w:t>2. 香蕉</w:t></w:r></w:p>",
        );

        assert_eq!(
            extract_paragraphs_from_xml(&xml),
            vec!["1. 苹果 答案：A tail\t", "2. 香蕉"]
        );
    }

    #[test]
    fn test_escaped_text() {
        let xml = body("<w:p><w:r><w:t>a &lt; b &amp; c</w:t></w:r></w:p>");
        assert_eq!(extract_paragraphs_from_xml(&xml), vec!["a < b & c"]);
    }

    #[test]
    fn test_malformed_xml_keeps_recovered_paragraphs() {
        let xml = body("<w:p><w:r><w:t>kept</w:t></w:r></w:p><w:p><w:r></w:x>");
        assert_eq!(extract_paragraphs_from_xml(&xml), vec!["kept"]);
    }

    #[test]
    fn test_not_a_zip() {
        let result = DocxReader::new().paragraphs(std::io::Cursor::new(b"plain bytes".to_vec()));
        assert!(matches!(result, Err(Error::ZipError(_))));
    }

    #[test]
    fn test_local_name() {
        assert_eq!(local_name(b"w:p"), b"p");
        assert_eq!(local_name(b"w:t"), b"t");
        assert_eq!(local_name(b"p"), b"p");
    }
}
