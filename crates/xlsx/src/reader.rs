//! Spreadsheet question reader.

use calamine::{open_workbook_auto, Data, Reader};
use qbank_core::{Error, LogSink, Result, Table};
use std::path::Path;

/// Rows between progress lines.
const PROGRESS_EVERY: usize = 100;

/// Reader for the first worksheet of a workbook.
///
/// The first row is the header; it is used to infer which columns hold the
/// question and the answer.
pub struct XlsxReader;

impl XlsxReader {
    /// Create a new spreadsheet reader.
    pub fn new() -> Self {
        Self
    }

    /// Open a workbook and read its first worksheet as a table.
    pub fn read_path(&self, path: &Path, sink: &dyn LogSink) -> Result<Table> {
        let mut workbook = open_workbook_auto(path).map_err(|e| {
            Error::SpreadsheetError(format!("Failed to open {}: {}", path.display(), e))
        })?;

        let sheet_name = workbook
            .sheet_names()
            .first()
            .cloned()
            .ok_or_else(|| Error::SpreadsheetError("Workbook has no worksheets".to_string()))?;

        let range = workbook.worksheet_range(&sheet_name).map_err(|e| {
            Error::SpreadsheetError(format!("Failed to read sheet '{}': {}", sheet_name, e))
        })?;

        let mut rows = range.rows();
        let headers = rows.next().map(row_to_strings).unwrap_or_default();

        let total = range.height().saturating_sub(1);
        sink.append(&format!("Spreadsheet has {} data rows", total));

        let mut data = Vec::with_capacity(total);
        for (idx, row) in rows.enumerate() {
            if idx % PROGRESS_EVERY == 0 {
                sink.append(&format!("Reading spreadsheet row {}/{}", idx + 1, total));
            }
            data.push(row_to_strings(row));
        }

        let table = Table::new(headers, data);
        log::debug!(
            "Sheet '{}' column roles: question={:?} answer={:?}",
            sheet_name,
            table.roles.question,
            table.roles.answer
        );

        Ok(table)
    }
}

impl Default for XlsxReader {
    fn default() -> Self {
        Self::new()
    }
}

fn row_to_strings(row: &[Data]) -> Vec<String> {
    row.iter().map(cell_to_string).collect()
}

/// Render a cell as text; whole-number floats drop their `.0`.
fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Float(f) if f.fract() == 0.0 && f.abs() < 1e15 => format!("{}", *f as i64),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use qbank_core::MemorySink;

    #[test]
    fn test_cell_to_string() {
        assert_eq!(cell_to_string(&Data::Empty), "");
        assert_eq!(cell_to_string(&Data::String("题目".to_string())), "题目");
        assert_eq!(cell_to_string(&Data::Float(3.0)), "3");
        assert_eq!(cell_to_string(&Data::Float(2.5)), "2.5");
        assert_eq!(cell_to_string(&Data::Int(7)), "7");
        assert_eq!(cell_to_string(&Data::Bool(true)), "true");
    }

    #[test]
    fn test_read_missing_workbook() {
        let sink = MemorySink::new();
        let result = XlsxReader::new().read_path(Path::new("/nonexistent/bank.xlsx"), &sink);

        assert!(matches!(result, Err(Error::SpreadsheetError(_))));
    }
}
