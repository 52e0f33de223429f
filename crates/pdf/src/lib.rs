//! PDF backend for question bank extraction.
//!
//! Pulls text out of each page in document order.

pub mod reader;

pub use reader::PdfReader;
