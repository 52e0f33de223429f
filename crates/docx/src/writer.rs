//! Sorted question bank as a Word document.

use crate::package::{write_package, XmlBuilder};
use qbank_core::{
    sections, LogSink, OutputFormat, Progress, Record, Renderer, Result, ANSWER_LABEL,
    DEFAULT_TITLE,
};
use std::fs::File;
use std::io::{BufWriter, Cursor, Seek, Write};
use std::path::Path;

const WORD_NS: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";

/// Dark blue used for answer lines.
const ANSWER_COLOR: &str = "000080";

/// A progress line is logged after this many questions.
const PROGRESS_INTERVAL: usize = 50;

const CONTENT_TYPES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/><Override PartName="/word/styles.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.styles+xml"/></Types>"#;

const PACKAGE_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="word/document.xml"/></Relationships>"#;

const DOCUMENT_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles" Target="styles.xml"/></Relationships>"#;

/// Normal is 宋体 12pt; sizes are in half-points.
const STYLES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:styles xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:style w:type="paragraph" w:default="1" w:styleId="Normal"><w:name w:val="Normal"/><w:qFormat/><w:rPr><w:rFonts w:ascii="宋体" w:hAnsi="宋体" w:eastAsia="宋体"/><w:sz w:val="24"/><w:szCs w:val="24"/></w:rPr></w:style><w:style w:type="paragraph" w:styleId="Title"><w:name w:val="Title"/><w:basedOn w:val="Normal"/><w:next w:val="Normal"/><w:qFormat/><w:pPr><w:spacing w:after="300"/></w:pPr><w:rPr><w:sz w:val="56"/><w:szCs w:val="56"/></w:rPr></w:style><w:style w:type="paragraph" w:styleId="Heading1"><w:name w:val="heading 1"/><w:basedOn w:val="Normal"/><w:next w:val="Normal"/><w:qFormat/><w:pPr><w:keepNext/><w:spacing w:before="480"/><w:outlineLvl w:val="0"/></w:pPr><w:rPr><w:b/><w:color w:val="365F91"/><w:sz w:val="28"/><w:szCs w:val="28"/></w:rPr></w:style></w:styles>"#;

/// Renderer producing a `.docx` question bank.
#[derive(Debug, Clone)]
pub struct DocxRenderer {
    title: String,
}

impl Default for DocxRenderer {
    fn default() -> Self {
        Self {
            title: DEFAULT_TITLE.to_string(),
        }
    }
}

impl DocxRenderer {
    /// Create a renderer with the default title.
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a custom document title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Build the whole package in memory.
    pub fn render_bytes(&self, records: &[Record]) -> Result<Vec<u8>> {
        let cursor = self.write_to(Cursor::new(Vec::new()), records, Progress::silent())?;
        Ok(cursor.into_inner())
    }

    fn write_to<W: Write + Seek>(
        &self,
        writer: W,
        records: &[Record],
        progress: Progress<'_>,
    ) -> Result<W> {
        let document = self.document_xml(records, progress)?;

        write_package(
            writer,
            &[
                ("[Content_Types].xml", CONTENT_TYPES.as_bytes()),
                ("_rels/.rels", PACKAGE_RELS.as_bytes()),
                ("word/_rels/document.xml.rels", DOCUMENT_RELS.as_bytes()),
                ("word/styles.xml", STYLES.as_bytes()),
                ("word/document.xml", document.as_slice()),
            ],
        )
    }

    /// Build `word/document.xml`.
    fn document_xml(&self, records: &[Record], progress: Progress<'_>) -> Result<Vec<u8>> {
        let mut xml = XmlBuilder::new()?;
        xml.start("w:document", &[("xmlns:w", WORD_NS)])?;
        xml.start("w:body", &[])?;

        styled_paragraph(&mut xml, "Title", "center", &self.title)?;

        for section in sections(records) {
            styled_paragraph(&mut xml, "Heading1", "left", &section.heading())?;

            for entry in &section.entries {
                let question = format!("{}. {}", entry.number, entry.record.text);
                run_paragraph(&mut xml, RunStyle::Bold, &question)?;

                if entry.record.has_answer() {
                    let answer = format!("{}: {}", ANSWER_LABEL, entry.record.answer);
                    run_paragraph(&mut xml, RunStyle::Color(ANSWER_COLOR), &answer)?;
                }

                xml.empty("w:p", &[])?;
                progress.tick(entry.number);
            }
        }

        xml.end("w:body")?;
        xml.end("w:document")?;
        Ok(xml.finish())
    }
}

impl Renderer for DocxRenderer {
    fn format(&self) -> OutputFormat {
        OutputFormat::Word
    }

    fn render_to(&self, records: &[Record], path: &Path, sink: &dyn LogSink) -> Result<()> {
        let progress =
            Progress::new(sink, "Processed", "questions", PROGRESS_INTERVAL, records.len());
        let file = File::create(path)?;
        let mut writer = self.write_to(BufWriter::new(file), records, progress)?;
        writer.flush()?;

        log::debug!("Wrote {} questions to {}", records.len(), path.display());
        Ok(())
    }
}

#[derive(Debug, Clone, Copy)]
enum RunStyle {
    Bold,
    Color(&'static str),
}

/// A paragraph in a named style with the given alignment.
fn styled_paragraph(xml: &mut XmlBuilder, style: &str, align: &str, text: &str) -> Result<()> {
    xml.start("w:p", &[])?;
    xml.start("w:pPr", &[])?;
    xml.empty("w:pStyle", &[("w:val", style)])?;
    xml.empty("w:jc", &[("w:val", align)])?;
    xml.end("w:pPr")?;
    run(xml, None, text)?;
    xml.end("w:p")
}

/// A plain paragraph holding a single formatted run.
fn run_paragraph(xml: &mut XmlBuilder, style: RunStyle, text: &str) -> Result<()> {
    xml.start("w:p", &[])?;
    run(xml, Some(style), text)?;
    xml.end("w:p")
}

/// One run, with newlines as breaks and tabs as tab characters.
fn run(xml: &mut XmlBuilder, style: Option<RunStyle>, text: &str) -> Result<()> {
    xml.start("w:r", &[])?;

    if let Some(style) = style {
        xml.start("w:rPr", &[])?;
        match style {
            RunStyle::Bold => xml.empty("w:b", &[])?,
            RunStyle::Color(color) => xml.empty("w:color", &[("w:val", color)])?,
        }
        xml.end("w:rPr")?;
    }

    let mut segment = String::new();
    for c in text.chars() {
        match c {
            '\n' | '\t' => {
                text_element(xml, &segment)?;
                segment.clear();
                xml.empty(if c == '\n' { "w:br" } else { "w:tab" }, &[])?;
            }
            '\r' => {}
            _ => segment.push(c),
        }
    }
    text_element(xml, &segment)?;

    xml.end("w:r")
}

fn text_element(xml: &mut XmlBuilder, text: &str) -> Result<()> {
    if text.is_empty() {
        return Ok(());
    }
    xml.start("w:t", &[("xml:space", "preserve")])?;
    xml.text(text)?;
    xml.end("w:t")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DocxReader;
    use qbank_core::{MemorySink, QuestionNormalizer, SortKey};

    fn record(text: &str, answer: &str, key: Option<&str>) -> Record {
        let key = key
            .map(|k| SortKey::Reading(k.to_string()))
            .unwrap_or(SortKey::Unread);
        Record::new(text, answer, key)
    }

    #[test]
    fn test_document_reads_back_in_order() {
        let records = vec![
            record("苹果", "A", Some("ping")),
            record("平安", "", Some("ping")),
            record("香蕉", "B", Some("xiang")),
        ];

        let bytes = DocxRenderer::new().render_bytes(&records).unwrap();
        let paragraphs = DocxReader::new()
            .paragraphs(Cursor::new(bytes))
            .unwrap();

        assert_eq!(
            paragraphs,
            vec![
                DEFAULT_TITLE,
                "P 部分",
                "1. 苹果",
                "答案: A",
                "",
                "2. 平安",
                "",
                "X 部分",
                "3. 香蕉",
                "答案: B",
                "",
            ]
        );
    }

    #[test]
    fn test_document_styles_and_escaping() {
        let records = vec![record("a < b & c\n第二行", "正确", None)];
        let renderer = DocxRenderer::new().with_title("测试");

        let xml = String::from_utf8(renderer.document_xml(&records, Progress::silent()).unwrap()).unwrap();
        assert!(xml.contains(r#"<w:pStyle w:val="Title"/><w:jc w:val="center"/>"#));
        assert!(xml.contains(r#"<w:pStyle w:val="Heading1"/>"#));
        assert!(xml.contains("<w:b/>"));
        assert!(xml.contains(r#"<w:color w:val="000080"/>"#));
        assert!(xml.contains("1. a &lt; b &amp; c</w:t><w:br/>"));
        assert!(xml.contains(">测试</w:t>"));
    }

    #[test]
    fn test_empty_collection_has_only_title() {
        let bytes = DocxRenderer::new().render_bytes(&[]).unwrap();
        let paragraphs = DocxReader::new()
            .paragraphs(Cursor::new(bytes))
            .unwrap();

        assert_eq!(paragraphs, vec![DEFAULT_TITLE]);
    }

    #[test]
    fn test_render_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bank.docx");

        DocxRenderer::new()
            .render_to(&[record("苹果", "A", Some("ping"))], &path, &MemorySink::new())
            .unwrap();

        let text = DocxReader::new().read_path(&path).unwrap();
        assert!(text.contains("1. 苹果\n答案: A"));
    }

    #[test]
    fn test_control_characters_are_dropped() {
        let records = QuestionNormalizer::new().records_from_text("1. 苹果\u{0c}续\u{0b} 答案：A");
        assert_eq!(records.len(), 1);

        let xml = String::from_utf8(
            DocxRenderer::new()
                .document_xml(&records, Progress::silent())
                .unwrap(),
        )
        .unwrap();
        assert!(!xml.contains('\u{0c}'));
        assert!(!xml.contains('\u{0b}'));
        assert!(xml.contains(">1. 苹果续 答案：A</w:t>"));

        let bytes = DocxRenderer::new().render_bytes(&records).unwrap();
        let paragraphs = DocxReader::new().paragraphs(Cursor::new(bytes)).unwrap();
        assert_eq!(paragraphs[2], "1. 苹果续 答案：A");
    }

    #[test]
    fn test_render_to_logs_progress_every_fifty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bank.docx");
        let records: Vec<_> = (0..120)
            .map(|i| record(&format!("题{}", i), "", Some("ti")))
            .collect();
        let sink = MemorySink::new();

        DocxRenderer::new().render_to(&records, &path, &sink).unwrap();

        assert_eq!(
            sink.lines(),
            vec!["Processed 50/120 questions", "Processed 100/120 questions"]
        );
    }
}
