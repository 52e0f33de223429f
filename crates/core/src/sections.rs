//! Ordering and letter grouping shared by every output format.

use crate::types::Record;

/// Stable sort of records by sort key; equal keys keep extraction order.
pub fn sort_records(records: &mut [Record]) {
    records.sort_by(|a, b| a.sort_key.cmp(&b.sort_key));
}

/// A record paired with its 1-based position in the whole collection.
#[derive(Debug, Clone, Copy)]
pub struct Numbered<'a> {
    /// Position across all sections, starting at 1.
    pub number: usize,
    /// The record itself.
    pub record: &'a Record,
}

/// A run of consecutive records sharing the same leading key letter.
#[derive(Debug, Clone)]
pub struct Section<'a> {
    /// Upper-cased group letter.
    pub letter: char,
    /// Records in this run, numbered globally.
    pub entries: Vec<Numbered<'a>>,
}

impl Section<'_> {
    /// Heading text, e.g. `P 部分`.
    pub fn heading(&self) -> String {
        format!("{} 部分", self.letter)
    }
}

/// Split an already-sorted slice into letter sections.
///
/// A new section starts whenever the leading key letter differs from the
/// previous record's, so the first record always opens one.
pub fn sections(records: &[Record]) -> Vec<Section<'_>> {
    let mut sections: Vec<Section<'_>> = Vec::new();

    for (idx, record) in records.iter().enumerate() {
        let letter = record.group_letter();
        let entry = Numbered {
            number: idx + 1,
            record,
        };

        match sections.last_mut() {
            Some(section) if section.letter == letter => section.entries.push(entry),
            _ => sections.push(Section {
                letter,
                entries: vec![entry],
            }),
        }
    }

    sections
}
