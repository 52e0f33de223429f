//! DOCX (Office Open XML) backend for question banks.
//!
//! Reads body paragraphs out of `.docx` packages and writes the sorted
//! question bank back out as a styled Word document. The [`package`]
//! helpers are shared with the workbook writer.

pub mod package;
pub mod reader;
pub mod writer;

pub use reader::DocxReader;
pub use writer::DocxRenderer;
