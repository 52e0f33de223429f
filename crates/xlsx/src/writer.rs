//! Sorted question bank as a single-sheet workbook.

use qbank_docx::package::{write_package, XmlBuilder};
use qbank_core::{LogSink, OutputFormat, Progress, Record, Renderer, Result};
use std::fs::File;
use std::io::{BufWriter, Cursor, Seek, Write};
use std::path::Path;

const SHEET_NS: &str = "http://schemas.openxmlformats.org/spreadsheetml/2006/main";
const REL_NS: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";

/// Default worksheet name.
pub const DEFAULT_SHEET_NAME: &str = "题库";

/// Longest worksheet name Excel accepts, in characters.
const MAX_SHEET_NAME_CHARS: usize = 31;

/// Characters Excel forbids in worksheet names.
const FORBIDDEN_SHEET_CHARS: [char; 7] = ['[', ']', ':', '*', '?', '/', '\\'];

/// A progress line is logged after this many rows.
const PROGRESS_INTERVAL: usize = 100;

/// Header row: number, pinyin initial, question, answer.
const HEADERS: [&str; 4] = ["题号", "拼音首字母", "题目", "答案"];

const COLUMNS: [char; 4] = ['A', 'B', 'C', 'D'];

/// Style index of the bold header cells in `STYLES`.
const HEADER_STYLE: &str = "1";

const CONTENT_TYPES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/><Override PartName="/xl/worksheets/sheet1.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/><Override PartName="/xl/styles.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.styles+xml"/></Types>"#;

const PACKAGE_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="xl/workbook.xml"/></Relationships>"#;

const WORKBOOK_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet1.xml"/><Relationship Id="rId2" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles" Target="styles.xml"/></Relationships>"#;

const STYLES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<styleSheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><fonts count="2"><font><sz val="11"/><name val="Calibri"/></font><font><b/><sz val="11"/><name val="Calibri"/></font></fonts><fills count="2"><fill><patternFill patternType="none"/></fill><fill><patternFill patternType="gray125"/></fill></fills><borders count="1"><border><left/><right/><top/><bottom/><diagonal/></border></borders><cellStyleXfs count="1"><xf numFmtId="0" fontId="0" fillId="0" borderId="0"/></cellStyleXfs><cellXfs count="2"><xf numFmtId="0" fontId="0" fillId="0" borderId="0" xfId="0"/><xf numFmtId="0" fontId="1" fillId="0" borderId="0" xfId="0" applyFont="1"/></cellXfs></styleSheet>"#;

/// Renderer producing a `.xlsx` question table.
///
/// One header row, then one row per record in the given order, with no
/// section grouping.
#[derive(Debug, Clone)]
pub struct XlsxRenderer {
    sheet_name: String,
}

impl Default for XlsxRenderer {
    fn default() -> Self {
        Self {
            sheet_name: DEFAULT_SHEET_NAME.to_string(),
        }
    }
}

impl XlsxRenderer {
    /// Create a renderer using the default sheet name.
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a custom worksheet name, adjusted to what Excel accepts.
    pub fn with_sheet_name(mut self, name: impl Into<String>) -> Self {
        self.sheet_name = sanitize_sheet_name(&name.into());
        self
    }

    pub fn sheet_name(&self) -> &str {
        &self.sheet_name
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
        let workbook = self.workbook_xml()?;
        let sheet = sheet_xml(records, progress)?;

        write_package(
            writer,
            &[
                ("[Content_Types].xml", CONTENT_TYPES.as_bytes()),
                ("_rels/.rels", PACKAGE_RELS.as_bytes()),
                ("xl/workbook.xml", workbook.as_slice()),
                ("xl/_rels/workbook.xml.rels", WORKBOOK_RELS.as_bytes()),
                ("xl/styles.xml", STYLES.as_bytes()),
                ("xl/worksheets/sheet1.xml", sheet.as_slice()),
            ],
        )
    }

    fn workbook_xml(&self) -> Result<Vec<u8>> {
        let mut xml = XmlBuilder::new()?;
        xml.start("workbook", &[("xmlns", SHEET_NS), ("xmlns:r", REL_NS)])?;
        xml.start("sheets", &[])?;
        xml.empty(
            "sheet",
            &[
                ("name", self.sheet_name.as_str()),
                ("sheetId", "1"),
                ("r:id", "rId1"),
            ],
        )?;
        xml.end("sheets")?;
        xml.end("workbook")?;
        Ok(xml.finish())
    }
}

impl Renderer for XlsxRenderer {
    fn format(&self) -> OutputFormat {
        OutputFormat::Excel
    }

    fn render_to(&self, records: &[Record], path: &Path, sink: &dyn LogSink) -> Result<()> {
        let progress = Progress::new(sink, "Wrote", "rows", PROGRESS_INTERVAL, records.len());
        let file = File::create(path)?;
        let mut writer = self.write_to(BufWriter::new(file), records, progress)?;
        writer.flush()?;

        log::debug!("Wrote {} rows to {}", records.len(), path.display());
        Ok(())
    }
}

/// Drop forbidden characters, quotes at either end, and anything past 31
/// characters. Falls back to the default name when nothing is left.
pub fn sanitize_sheet_name(name: &str) -> String {
    let kept: String = name
        .chars()
        .filter(|c| !FORBIDDEN_SHEET_CHARS.contains(c) && !c.is_control())
        .collect();
    let cleaned: String = kept
        .trim()
        .trim_matches('\'')
        .chars()
        .take(MAX_SHEET_NAME_CHARS)
        .collect();
    let cleaned = cleaned.trim_end_matches('\'').trim_end().to_string();

    if cleaned.is_empty() {
        log::warn!("Sheet name '{}' is unusable, using '{}'", name, DEFAULT_SHEET_NAME);
        return DEFAULT_SHEET_NAME.to_string();
    }
    if cleaned != name {
        log::warn!("Sheet name '{}' adjusted to '{}'", name, cleaned);
    }
    cleaned
}

/// Build `xl/worksheets/sheet1.xml`.
fn sheet_xml(records: &[Record], progress: Progress<'_>) -> Result<Vec<u8>> {
    let mut xml = XmlBuilder::new()?;
    xml.start("worksheet", &[("xmlns", SHEET_NS)])?;

    let dimension = format!("A1:D{}", records.len() + 1);
    xml.empty("dimension", &[("ref", dimension.as_str())])?;
    xml.start("sheetData", &[])?;

    xml.start("row", &[("r", "1")])?;
    for (col, header) in COLUMNS.iter().zip(HEADERS) {
        string_cell(&mut xml, *col, 1, header, Some(HEADER_STYLE))?;
    }
    xml.end("row")?;

    for (idx, record) in records.iter().enumerate() {
        let row = idx + 2;
        let row_ref = row.to_string();
        xml.start("row", &[("r", row_ref.as_str())])?;
        number_cell(&mut xml, COLUMNS[0], row, idx + 1)?;
        string_cell(&mut xml, COLUMNS[1], row, &record.group_letter().to_string(), None)?;
        string_cell(&mut xml, COLUMNS[2], row, &record.text, None)?;
        string_cell(&mut xml, COLUMNS[3], row, &record.answer, None)?;
        xml.end("row")?;
        progress.tick(idx + 1);
    }

    xml.end("sheetData")?;
    xml.end("worksheet")?;
    Ok(xml.finish())
}

fn number_cell(xml: &mut XmlBuilder, col: char, row: usize, value: usize) -> Result<()> {
    let reference = format!("{}{}", col, row);
    xml.start("c", &[("r", reference.as_str())])?;
    xml.start("v", &[])?;
    xml.text(&value.to_string())?;
    xml.end("v")?;
    xml.end("c")
}

/// An inline string cell; empty values produce no cell at all.
fn string_cell(
    xml: &mut XmlBuilder,
    col: char,
    row: usize,
    value: &str,
    style: Option<&str>,
) -> Result<()> {
    if value.is_empty() {
        return Ok(());
    }

    let reference = format!("{}{}", col, row);
    let mut attrs = vec![("r", reference.as_str()), ("t", "inlineStr")];
    if let Some(style) = style {
        attrs.push(("s", style));
    }

    xml.start("c", &attrs)?;
    xml.start("is", &[])?;
    xml.start("t", &[("xml:space", "preserve")])?;
    xml.text(value)?;
    xml.end("t")?;
    xml.end("is")?;
    xml.end("c")
}
