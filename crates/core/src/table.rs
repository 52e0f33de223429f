//! Row-oriented question input from spreadsheets.

use crate::normalize::QuestionNormalizer;
use crate::segment::{find_answer, is_answer_token};
use crate::types::Record;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

/// Header labels that mark the question column.
static QUESTION_HEADER_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)题|question").unwrap());

/// Header labels that mark the answer column.
static ANSWER_HEADER_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)答案|answer").unwrap());

/// Which columns hold the question and the answer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnRoles {
    /// Column labelled as the question, if any.
    pub question: Option<usize>,
    /// Column labelled as the answer, if any.
    pub answer: Option<usize>,
}

impl ColumnRoles {
    /// Infer column roles from header labels.
    ///
    /// A header matching the question pattern is taken as the question
    /// column even if it also mentions the answer. When several headers
    /// match the same role, the last one wins.
    pub fn infer<S: AsRef<str>>(headers: &[S]) -> Self {
        let mut roles = Self::default();

        for (idx, header) in headers.iter().enumerate() {
            let header = header.as_ref();
            if QUESTION_HEADER_REGEX.is_match(header) {
                roles.question = Some(idx);
            } else if ANSWER_HEADER_REGEX.is_match(header) {
                roles.answer = Some(idx);
            }
        }

        roles
    }

    /// Column to read questions from, falling back to the first column.
    pub fn question_column(&self) -> usize {
        self.question.unwrap_or(0)
    }
}

/// A sheet of string cells with its header row split off.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Table {
    /// Header labels from the first row.
    pub headers: Vec<String>,
    /// Data rows, in sheet order.
    pub rows: Vec<Vec<String>>,
    /// Inferred column roles.
    pub roles: ColumnRoles,
}

impl Table {
    /// Build a table from a header row and data rows, inferring column roles.
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        let roles = ColumnRoles::infer(&headers);
        Self {
            headers,
            rows,
            roles,
        }
    }

    /// Convert every row into a record, skipping rows with no question text.
    pub fn records(&self, normalizer: &QuestionNormalizer) -> Vec<Record> {
        self.rows
            .iter()
            .filter_map(|row| self.record_from_row(row, normalizer))
            .collect()
    }

    fn record_from_row(&self, row: &[String], normalizer: &QuestionNormalizer) -> Option<Record> {
        let question = cell(row, self.roles.question_column());
        let answer = match self.roles.answer {
            Some(col) => answer_from_cell(cell(row, col)).or_else(|| find_answer(question)),
            None => find_answer(question),
        };

        normalizer.record(question, answer.unwrap_or_default())
    }
}

fn cell(row: &[String], col: usize) -> &str {
    row.get(col).map(String::as_str).unwrap_or("")
}

/// Read an answer cell: a bare token like `b` or `正确`, or a phrase like `答案：B`.
fn answer_from_cell(value: &str) -> Option<String> {
    let token = value.trim().to_uppercase();
    if is_answer_token(&token) {
        return Some(token);
    }

    let found = find_answer(value);
    if found.is_none() && !token.is_empty() {
        log::debug!("Ignoring unrecognized answer cell: {}", value);
    }
    found
}
