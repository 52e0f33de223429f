//! Question block segmentation and answer detection.
//!
//! Source text is split into blocks at enumeration markers: a run of
//! decimal digits followed by at least one `.`, whitespace, or `、`. A block
//! starts after a marker (or at the very start of the text) and runs,
//! taking at least one character, up to the next marker or the end of the
//! text. Scanning is a single forward pass with no backtracking.

use regex::Regex;
use std::sync::LazyLock;

/// Any Unicode decimal digit (general category Nd).
static DECIMAL_DIGIT_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\p{Nd}$").unwrap());

/// Ideographic enumeration delimiter.
const IDEOGRAPHIC_COMMA: char = '、';

/// Answer tokens that are whole words rather than choice letters.
const ANSWER_WORDS: &[&str] = &["正确", "错误"];

/// Lead-ins that introduce an answer, tried in order at each position.
#[derive(Debug, Clone, Copy)]
enum LeadIn {
    /// `标准答案`
    Standard,
    /// `答案`
    Plain,
    /// `(答案)` with ASCII or full-width brackets.
    Bracketed,
}

const LEAD_INS: [LeadIn; 3] = [LeadIn::Standard, LeadIn::Plain, LeadIn::Bracketed];

fn is_marker_digit(c: char) -> bool {
    if c.is_ascii() {
        return c.is_ascii_digit();
    }
    let mut buf = [0u8; 4];
    DECIMAL_DIGIT_REGEX.is_match(c.encode_utf8(&mut buf))
}

fn is_marker_separator(c: char) -> bool {
    c == '.' || c == IDEOGRAPHIC_COMMA || c.is_whitespace()
}

/// Byte offset just past an enumeration marker starting at `start`, if any.
///
/// Both the digit run and the separator run are consumed greedily.
pub(crate) fn marker_end(text: &str, start: usize) -> Option<usize> {
    let rest = &text[start..];
    let digits = rest
        .char_indices()
        .find(|&(_, c)| !is_marker_digit(c))
        .map(|(i, _)| i)
        .unwrap_or(rest.len());
    if digits == 0 {
        return None;
    }

    let after_digits = &rest[digits..];
    let separators = after_digits
        .char_indices()
        .find(|&(_, c)| !is_marker_separator(c))
        .map(|(i, _)| i)
        .unwrap_or(after_digits.len());
    if separators == 0 {
        return None;
    }

    Some(start + digits + separators)
}

/// Lazy iterator over trimmed, non-empty question blocks.
#[derive(Debug, Clone)]
pub struct Blocks<'a> {
    text: &'a str,
    pos: usize,
}

impl<'a> Blocks<'a> {
    fn new(text: &'a str) -> Self {
        Self { text, pos: 0 }
    }

    /// Find where the block body starting at `body_start` ends.
    fn body_end(&self, body_start: usize) -> usize {
        let text = self.text;
        // The body always holds at least one character.
        let mut at = body_start
            + text[body_start..]
                .chars()
                .next()
                .map(char::len_utf8)
                .unwrap_or(0);

        while let Some(c) = text[at..].chars().next() {
            if !is_marker_digit(c) {
                at += c.len_utf8();
                continue;
            }

            // Every position inside a digit run shares the run's terminator,
            // so the run is checked once and skipped if it is not a marker.
            let run_end = text[at..]
                .char_indices()
                .find(|&(_, c)| !is_marker_digit(c))
                .map(|(i, _)| at + i)
                .unwrap_or(text.len());
            match text[run_end..].chars().next() {
                Some(next) if is_marker_separator(next) => return at,
                _ => at = run_end,
            }
        }

        text.len()
    }
}

impl<'a> Iterator for Blocks<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<Self::Item> {
        while self.pos < self.text.len() {
            let body_start = match marker_end(self.text, self.pos) {
                Some(end) => end,
                None if self.pos == 0 => 0,
                None => {
                    let step = self.text[self.pos..]
                        .chars()
                        .next()
                        .map(char::len_utf8)
                        .unwrap_or(1);
                    self.pos += step;
                    continue;
                }
            };

            if body_start >= self.text.len() {
                // A trailing marker with nothing after it
                self.pos = self.text.len();
                return None;
            }

            let end = self.body_end(body_start);
            self.pos = end;

            let block = self.text[body_start..end].trim();
            if !block.is_empty() {
                return Some(block);
            }
        }

        None
    }
}

/// Split raw document text into candidate question blocks.
pub fn segment(text: &str) -> Blocks<'_> {
    Blocks::new(text)
}

/// Search a block for the first answer phrase and return its token, upper-cased.
///
/// Recognized lead-ins are `标准答案`, `答案`, and `(答案)`, each optionally
/// followed by a colon and whitespace. The token is a choice letter `A`-`D`
/// (either case) or one of `正确`/`错误`.
pub fn find_answer(block: &str) -> Option<String> {
    block
        .char_indices()
        .find_map(|(at, _)| LEAD_INS.iter().find_map(|lead| answer_at(&block[at..], *lead)))
}

fn answer_at(text: &str, lead: LeadIn) -> Option<String> {
    let rest = match lead {
        LeadIn::Standard => text.strip_prefix("标准答案")?,
        LeadIn::Plain => text.strip_prefix("答案")?,
        LeadIn::Bracketed => text
            .strip_prefix(['(', '（'])?
            .strip_prefix("答案")?
            .strip_prefix([')', '）'])?,
    };

    let rest = rest.strip_prefix([':', '：']).unwrap_or(rest);
    let rest = rest.trim_start();

    answer_token(rest)
}

fn answer_token(text: &str) -> Option<String> {
    let first = text.chars().next()?;
    if matches!(first.to_ascii_lowercase(), 'a'..='d') {
        return Some(first.to_ascii_uppercase().to_string());
    }

    ANSWER_WORDS
        .iter()
        .find(|word| text.starts_with(*word))
        .map(|word| word.to_string())
}

/// Whether `answer` is an accepted, already-normalized answer token.
pub fn is_answer_token(answer: &str) -> bool {
    matches!(answer, "A" | "B" | "C" | "D") || ANSWER_WORDS.contains(&answer)
}
