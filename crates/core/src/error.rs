//! Error types for question bank extraction and output.

use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while extracting or writing a question bank.
#[derive(Error, Debug)]
pub enum Error {
    /// Failed to open, read, or write a file.
    #[error("Failed to access file: {0}")]
    IoError(#[from] std::io::Error),

    /// The file extension is not one we know how to read.
    #[error("Unsupported file format: {0}")]
    UnsupportedFormat(String),

    /// Failed to load a PDF or pull text out of it.
    #[error("PDF error: {0}")]
    PdfError(String),

    /// Failed to read or build a DOCX package.
    #[error("DOCX error: {0}")]
    DocxError(String),

    /// Failed to open or read a spreadsheet.
    #[error("Spreadsheet error: {0}")]
    SpreadsheetError(String),

    /// ZIP archive error (for DOCX/XLSX).
    #[error("ZIP error: {0}")]
    ZipError(String),

    /// XML parsing or writing error (for DOCX/XLSX).
    #[error("XML error: {0}")]
    XmlError(String),
}
