//! Domain types for extracted questions and output formats.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::path::Path;

/// Displayed key for records whose text has no ideograph with a reading.
pub const UNREAD_KEY: &str = "z";

/// A single extracted question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// Question body with the enumeration marker removed.
    pub text: String,

    /// Upper-cased answer token, or empty when none was found.
    pub answer: String,

    /// Pinyin-derived key used for ordering and grouping.
    pub sort_key: SortKey,
}

impl Record {
    /// Create a new record.
    pub fn new(text: impl Into<String>, answer: impl Into<String>, sort_key: SortKey) -> Self {
        Self {
            text: text.into(),
            answer: answer.into(),
            sort_key,
        }
    }

    /// Upper-cased first letter of the sort key, used as the section label.
    pub fn group_letter(&self) -> char {
        self.sort_key.letter().to_ascii_uppercase()
    }

    /// Whether an answer was extracted for this record.
    pub fn has_answer(&self) -> bool {
        !self.answer.is_empty()
    }
}

/// Sort key derived from the first ideograph of a question.
///
/// Readings compare by byte order; `Unread` compares after every reading,
/// including readings that start with `z`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SortKey {
    /// Lowercase tone-less pinyin of the first ideograph.
    Reading(String),
    /// No ideograph with a known reading was found.
    Unread,
}

impl SortKey {
    /// The key as displayed and grouped. Never empty.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Reading(reading) => reading,
            Self::Unread => UNREAD_KEY,
        }
    }

    /// First character of the key.
    pub fn letter(&self) -> char {
        self.as_str().chars().next().unwrap_or('z')
    }
}

impl Ord for SortKey {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Reading(a), Self::Reading(b)) => a.as_bytes().cmp(b.as_bytes()),
            (Self::Reading(_), Self::Unread) => Ordering::Less,
            (Self::Unread, Self::Reading(_)) => Ordering::Greater,
            (Self::Unread, Self::Unread) => Ordering::Equal,
        }
    }
}

impl PartialOrd for SortKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The format of an input document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SourceFormat {
    /// PDF, read page by page.
    Pdf,
    /// Word document (.docx, and .doc routed through the same reader).
    Docx,
    /// Plain UTF-8 text.
    Text,
    /// Excel workbook (.xlsx or .xls).
    Spreadsheet,
}

impl SourceFormat {
    /// Detect format from file extension.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "pdf" => Some(Self::Pdf),
            "docx" | "doc" => Some(Self::Docx),
            "txt" => Some(Self::Text),
            "xlsx" | "xls" => Some(Self::Spreadsheet),
            _ => None,
        }
    }

    /// Detect format from a path's extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|e| e.to_str())
            .and_then(Self::from_extension)
    }

    /// Short human-readable name for log lines.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Pdf => "PDF",
            Self::Docx => "Word",
            Self::Text => "text",
            Self::Spreadsheet => "Excel",
        }
    }
}

/// One of the three output artifacts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum OutputFormat {
    /// Structured Word document.
    Word,
    /// Single-sheet Excel table.
    Excel,
    /// Plain text.
    Text,
}

impl OutputFormat {
    /// All output formats, in the order they are written.
    pub const ALL: [OutputFormat; 3] = [Self::Word, Self::Excel, Self::Text];

    /// File extension for this format, without the dot.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Word => "docx",
            Self::Excel => "xlsx",
            Self::Text => "txt",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Word => "Word",
            Self::Excel => "Excel",
            Self::Text => "Text",
        };
        f.write_str(name)
    }
}
