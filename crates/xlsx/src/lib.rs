//! Spreadsheet backend for question banks.
//!
//! Reads question rows from `.xlsx`/`.xls` workbooks and writes the sorted
//! question bank as a single-sheet `.xlsx` table.

pub mod reader;
pub mod writer;

pub use reader::XlsxReader;
pub use writer::XlsxRenderer;
