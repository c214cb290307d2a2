//! Feedback banner and import notes.

use pingpong_wire::BulkImportResult;

use crate::admin::{Feedback, FeedbackVariant};

pub fn feedback_banner(feedback: &Feedback) -> String {
    let mark = match feedback.variant {
        FeedbackVariant::Success => "✓",
        FeedbackVariant::Error => "✗",
    };
    format!("{} {}", mark, feedback.message)
}

/// Per-row notes: the first few errors, then `+N more`.
pub fn import_summary(result: &BulkImportResult) -> String {
    let mut lines = vec![format!(
        "Processed {} row{} • {} added • {} skipped",
        result.total_rows,
        if result.total_rows == 1 { "" } else { "s" },
        result.created,
        result.skipped
    )];
    if result.has_errors() {
        for error in result.visible_errors() {
            lines.push(format!("  - {}", error));
        }
        let hidden = result.hidden_error_count();
        if hidden > 0 {
            lines.push(format!("  +{} more", hidden));
        }
    } else {
        lines.push("  All rows imported successfully.".to_string());
    }
    lines.join("\n")
}
