//! Plain-text question bank output.
//!
//! Each letter section opens with a banner between two separator rules,
//! followed by numbered questions and their answers.

use crate::error::Result;
use crate::render::{Progress, Renderer, ANSWER_LABEL};
use crate::sections::sections;
use crate::sink::LogSink;
use crate::types::{OutputFormat, Record};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

/// A progress line is logged after this many written questions.
const PROGRESS_INTERVAL: usize = 100;

/// Formatter for plain-text output.
#[derive(Debug, Clone)]
pub struct TextRenderer {
    /// Width of the `=` rule around section banners.
    rule_width: usize,
}

impl Default for TextRenderer {
    fn default() -> Self {
        Self { rule_width: 50 }
    }
}

impl TextRenderer {
    /// Create a renderer with the default 50-character rule.
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a custom rule width.
    pub fn with_rule_width(mut self, width: usize) -> Self {
        self.rule_width = width.max(1);
        self
    }

    /// Format sorted records as text.
    ///
    /// # Example output
    /// ```text
    ///
    /// ==================================================
    /// P 部分
    /// ==================================================
    ///
    /// 1. 苹果是什么颜色
    /// 答案: A
    ///
    /// ```
    pub fn format_records(&self, records: &[Record]) -> String {
        let mut out = Vec::new();
        // Writing into a Vec<u8> cannot fail.
        let _ = self.write_records(&mut out, records, Progress::silent());
        String::from_utf8_lossy(&out).into_owned()
    }

    /// Stream formatted records into `writer`, ticking `progress` per record.
    fn write_records<W: Write>(
        &self,
        writer: &mut W,
        records: &[Record],
        progress: Progress<'_>,
    ) -> io::Result<()> {
        let rule = "=".repeat(self.rule_width);

        for section in sections(records) {
            write!(writer, "\n{}\n{}\n{}\n\n", rule, section.heading(), rule)?;

            for entry in &section.entries {
                writeln!(writer, "{}. {}", entry.number, entry.record.text)?;
                if entry.record.has_answer() {
                    writeln!(writer, "{}: {}", ANSWER_LABEL, entry.record.answer)?;
                }
                writeln!(writer)?;
                progress.tick(entry.number);
            }
        }

        Ok(())
    }
}

impl Renderer for TextRenderer {
    fn format(&self) -> OutputFormat {
        OutputFormat::Text
    }

    fn render_to(&self, records: &[Record], path: &Path, sink: &dyn LogSink) -> Result<()> {
        let mut writer = BufWriter::new(File::create(path)?);
        let progress =
            Progress::new(sink, "Wrote", "questions", PROGRESS_INTERVAL, records.len());
        self.write_records(&mut writer, records, progress)?;
        writer.flush()?;

        log::debug!("Wrote {} questions to {}", records.len(), path.display());
        Ok(())
    }
}
