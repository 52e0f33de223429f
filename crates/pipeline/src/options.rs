//! Options for a pipeline run.

use qbank_core::DEFAULT_TITLE;
use qbank_xlsx::writer::DEFAULT_SHEET_NAME;
use serde::{Deserialize, Serialize};

/// Presentation options shared by the output formats.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessOptions {
    /// Title at the top of the Word document.
    pub title: String,

    /// Name of the worksheet in the Excel output.
    pub sheet_name: String,
}

impl Default for ProcessOptions {
    fn default() -> Self {
        Self {
            title: DEFAULT_TITLE.to_string(),
            sheet_name: DEFAULT_SHEET_NAME.to_string(),
        }
    }
}

impl ProcessOptions {
    /// Options with the default title and sheet name.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the Word document title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Set the Excel worksheet name.
    pub fn with_sheet_name(mut self, name: impl Into<String>) -> Self {
        self.sheet_name = name.into();
        self
    }
}
