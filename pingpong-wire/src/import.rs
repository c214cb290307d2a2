//! Bulk player import results.

use serde::{Deserialize, Serialize};

/// Number of row errors listed before the remainder is summarized as "+N more".
pub const VISIBLE_IMPORT_ERRORS: usize = 5;

/// Response of `POST /players/import`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct BulkImportResult {
    pub total_rows: u32,
    pub created: u32,
    pub skipped: u32,
    #[serde(default)]
    pub errors: Vec<String>,
}

impl BulkImportResult {
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// The import only counts as failed when nothing was created despite errors.
    pub fn is_failure(&self) -> bool {
        self.has_errors() && self.created == 0
    }

    /// `"Processed 10 rows: 7 added, 3 skipped."`
    pub fn summary_line(&self) -> String {
        format!(
            "Processed {} row{}: {} added, {} skipped.",
            self.total_rows,
            if self.total_rows == 1 { "" } else { "s" },
            self.created,
            self.skipped
        )
    }

    pub fn visible_errors(&self) -> &[String] {
        let end = self.errors.len().min(VISIBLE_IMPORT_ERRORS);
        &self.errors[..end]
    }

    pub fn hidden_error_count(&self) -> usize {
        self.errors.len().saturating_sub(VISIBLE_IMPORT_ERRORS)
    }
}
