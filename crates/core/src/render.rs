//! Output seam shared by the three question bank formats.

use crate::error::Result;
use crate::sink::LogSink;
use crate::types::{OutputFormat, Record};
use std::path::Path;

/// Title placed at the top of structured output.
pub const DEFAULT_TITLE: &str = "题库 - 按拼音排序";

/// Label placed before an answer.
pub const ANSWER_LABEL: &str = "答案";

/// Writes a sorted collection to one output artifact.
///
/// Renderers never reorder or regroup; they present the slice as given,
/// using [`crate::sections`] when they group at all.
pub trait Renderer {
    /// Which artifact this renderer produces.
    fn format(&self) -> OutputFormat;

    /// Write `records` to `path`, replacing any existing file.
    ///
    /// Periodic progress lines go to `sink`.
    fn render_to(&self, records: &[Record], path: &Path, sink: &dyn LogSink) -> Result<()>;
}

/// Emits `<verb> i/n <unit>` every `interval` records.
#[derive(Clone, Copy)]
pub struct Progress<'a> {
    sink: Option<&'a dyn LogSink>,
    verb: &'static str,
    unit: &'static str,
    interval: usize,
    total: usize,
}

impl<'a> Progress<'a> {
    pub fn new(
        sink: &'a dyn LogSink,
        verb: &'static str,
        unit: &'static str,
        interval: usize,
        total: usize,
    ) -> Self {
        Self {
            sink: Some(sink),
            verb,
            unit,
            interval: interval.max(1),
            total,
        }
    }

    /// Progress that reports nothing.
    pub fn silent() -> Self {
        Self {
            sink: None,
            verb: "",
            unit: "",
            interval: 1,
            total: 0,
        }
    }

    /// Report that `done` records (1-based) have been rendered.
    pub fn tick(&self, done: usize) {
        if let Some(sink) = self.sink {
            if done % self.interval == 0 {
                sink.append(&format!("{} {}/{} {}", self.verb, done, self.total, self.unit));
            }
        }
    }
}
