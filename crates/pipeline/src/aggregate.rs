//! Per-file extraction and aggregation across input files.

use qbank_core::{LogSink, QuestionNormalizer, Record, Result, SourceFormat};
use qbank_docx::DocxReader;
use qbank_pdf::PdfReader;
use qbank_xlsx::XlsxReader;
use std::fs;
use std::path::Path;

/// Runs the matching extractor for each file and concatenates the records.
#[derive(Default)]
pub struct Aggregator {
    normalizer: QuestionNormalizer,
    pdf: PdfReader,
    docx: DocxReader,
    xlsx: XlsxReader,
}

impl Aggregator {
    /// Create an aggregator with default extractors.
    pub fn new() -> Self {
        Self::default()
    }

    /// Extract records from every file, strictly in the given order.
    ///
    /// Files that cannot be read, or whose extension is not supported,
    /// contribute no records; the run always continues with the next file.
    pub fn collect<P: AsRef<Path>>(&self, paths: &[P], sink: &dyn LogSink) -> Vec<Record> {
        let total = paths.len();
        let mut records = Vec::new();

        sink.append(&format!("Processing {} files...", total));

        for (idx, path) in paths.iter().enumerate() {
            let path = path.as_ref();
            let name = display_name(path);
            sink.append(&format!("Processing file {}/{}: {}", idx + 1, total, name));

            let extracted = self.extract_file(path, sink);
            sink.append(&format!(
                "Finished {}: extracted {} questions",
                name,
                extracted.len()
            ));
            records.extend(extracted);
        }

        records
    }

    /// Extract one file, reporting failures instead of returning them.
    pub fn extract_file(&self, path: &Path, sink: &dyn LogSink) -> Vec<Record> {
        let Some(format) = SourceFormat::from_path(path) else {
            let ext = path
                .extension()
                .map(|e| e.to_string_lossy().to_lowercase())
                .unwrap_or_default();
            log::warn!("Skipping {}: unsupported extension '{}'", path.display(), ext);
            sink.append(&format!("Unsupported file format: .{}", ext));
            return Vec::new();
        };

        sink.append(&format!(
            "Reading {} file: {}",
            format.label(),
            display_name(path)
        ));

        match self.extract(path, format, sink) {
            Ok(records) => {
                sink.append(&format!(
                    "Extracted {} questions from {} file",
                    records.len(),
                    format.label()
                ));
                records
            }
            Err(e) => {
                log::warn!("Failed to extract {}: {}", path.display(), e);
                sink.append(&format!("Error reading {} file: {}", format.label(), e));
                Vec::new()
            }
        }
    }

    fn extract(&self, path: &Path, format: SourceFormat, sink: &dyn LogSink) -> Result<Vec<Record>> {
        let text = match format {
            SourceFormat::Pdf => self.pdf.read_path(path, sink)?,
            SourceFormat::Docx => self.docx.read_path(path)?,
            SourceFormat::Text => read_text(path)?,
            SourceFormat::Spreadsheet => {
                let table = self.xlsx.read_path(path, sink)?;
                return Ok(table.records(&self.normalizer));
            }
        };

        let blocks: Vec<&str> = qbank_core::segment(&text).collect();
        sink.append(&format!("Found {} candidate questions", blocks.len()));

        Ok(blocks
            .into_iter()
            .filter_map(|block| self.normalizer.record_from_block(block))
            .collect())
    }
}

/// Read a text file as UTF-8, dropping invalid byte sequences.
fn read_text(path: &Path) -> Result<String> {
    let bytes = fs::read(path)?;
    let text = String::from_utf8_lossy(&bytes);
    Ok(text.chars().filter(|&c| c != char::REPLACEMENT_CHARACTER).collect())
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
