use pingpong_wire::BulkImportResult;
use std::fmt;

use crate::error::HubError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedbackVariant {
    Success,
    Error,
}

impl fmt::Display for FeedbackVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Success => f.write_str("success"),
            Self::Error => f.write_str("error"),
        }
    }
}

/// Dismissible inline message shown after an admin action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Feedback {
    pub variant: FeedbackVariant,
    pub message: String,
}

impl Feedback {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            variant: FeedbackVariant::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            variant: FeedbackVariant::Error,
            message: message.into(),
        }
    }

    pub fn from_error(err: &HubError) -> Self {
        Self::error(err.to_string())
    }

    /// Import banner: an error only when nothing was created despite row errors.
    pub fn for_import(result: &BulkImportResult) -> Self {
        let summary = result.summary_line();
        let message = if result.has_errors() {
            format!(
                "{} Some rows were skipped. Review the import notes below.",
                summary
            )
        } else {
            summary
        };
        if result.is_failure() {
            Self::error(message)
        } else {
            Self::success(message)
        }
    }

    pub fn is_success(&self) -> bool {
        self.variant == FeedbackVariant::Success
    }
}
