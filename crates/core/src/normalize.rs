//! Question text cleanup and pinyin sort keys.
//!
//! Handles enumeration-marker removal and converts the first CJK ideograph
//! of a question into its tone-less pinyin reading.

use crate::segment::{find_answer, marker_end, segment};
use crate::types::{Record, SortKey};
use pinyin::ToPinyin;
use std::ops::RangeInclusive;

/// CJK Unified Ideographs block.
const IDEOGRAPH_RANGE: RangeInclusive<char> = '\u{4e00}'..='\u{9fff}';

/// Whether `c` is a CJK unified ideograph.
pub fn is_ideograph(c: char) -> bool {
    IDEOGRAPH_RANGE.contains(&c)
}

/// Tone-less, lowercase reading of a single ideograph.
///
/// `ü` is written as `v` so that readings stay ASCII and order by byte.
fn plain_reading(c: char) -> Option<String> {
    let reading = c.to_pinyin()?.plain();
    let reading = reading.to_lowercase().replace('ü', "v");
    reading.split_whitespace().next().map(str::to_string)
}

/// Normalizer turning raw question blocks into records.
#[derive(Debug, Clone, Copy, Default)]
pub struct QuestionNormalizer;

impl QuestionNormalizer {
    /// Create a new normalizer.
    pub fn new() -> Self {
        Self
    }

    /// Remove a leading enumeration marker and surrounding whitespace.
    pub fn strip_marker<'a>(&self, text: &'a str) -> &'a str {
        let trimmed = text.trim();
        match marker_end(trimmed, 0) {
            Some(end) => trimmed[end..].trim(),
            None => trimmed,
        }
    }

    /// Compute the sort key from the first ideograph in `text`.
    ///
    /// Only the first ideograph is transliterated. Text with no ideograph,
    /// or whose first ideograph has no known reading, gets `SortKey::Unread`.
    pub fn sort_key(&self, text: &str) -> SortKey {
        text.chars()
            .find(|&c| is_ideograph(c))
            .and_then(plain_reading)
            .map(SortKey::Reading)
            .unwrap_or(SortKey::Unread)
    }

    /// Build a record from cleaned question text and an already-known answer.
    ///
    /// Returns `None` when nothing is left after removing the marker.
    pub fn record(&self, text: &str, answer: impl Into<String>) -> Option<Record> {
        let cleaned = self.strip_marker(text);
        if cleaned.is_empty() {
            return None;
        }

        Some(Record::new(cleaned, answer, self.sort_key(cleaned)))
    }

    /// Build a record from one segmented block, searching it for an answer.
    pub fn record_from_block(&self, block: &str) -> Option<Record> {
        let answer = find_answer(block).unwrap_or_default();
        self.record(block, answer)
    }

    /// Segment a whole document's text and normalize every block.
    pub fn records_from_text(&self, text: &str) -> Vec<Record> {
        segment(text)
            .filter_map(|block| self.record_from_block(block))
            .collect()
    }
}
