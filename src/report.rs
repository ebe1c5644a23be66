//! Console summaries of extraction results.

use crate::extract::{BatchResult, ExtractionResult, IssueRecord};

/// Records shown in a preview.
pub const PREVIEW_ROWS: usize = 3;

/// Characters of each field shown in a preview.
const PREVIEW_WIDTH: usize = 100;

/// Cut `text` to `width` characters, appending `...` if anything was cut.
pub fn truncate(text: &str, width: usize) -> String {
    match text.char_indices().nth(width) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}

/// Preview of the first `rows` records.
pub fn preview(records: &[IssueRecord], rows: usize) -> String {
    if records.is_empty() {
        return "No data to preview".to_string();
    }

    let mut out = format!("\n--- Preview of first {} rows ---\n", rows);
    for (idx, record) in records.iter().take(rows).enumerate() {
        out.push_str(&format!("\nIssue {}: {}\n", idx + 1, record.key));
        out.push_str(&format!("Summary: {}\n", truncate(&record.summary, PREVIEW_WIDTH)));
        out.push_str(&format!(
            "Root Cause: {}\n",
            truncate(&record.root_cause, PREVIEW_WIDTH)
        ));
        out.push_str(&format!(
            "Corrective Action: {}\n",
            truncate(&record.corrective_action, PREVIEW_WIDTH)
        ));
        out.push_str(&"-".repeat(80));
        out.push('\n');
    }
    out
}

/// Totals for one extraction.
pub fn summary(result: &ExtractionResult) -> String {
    let mut out = format!(
        "\nSummary:\n- Total issues: {}\n- Issues with root cause: {}\n- Issues with corrective action: {}",
        result.len(),
        result.with_root_cause(),
        result.with_corrective_action()
    );
    if result.is_truncated() {
        out.push_str(&format!(
            "\nWarning: server reported {} matching issues; only the first {} were retrieved",
            result.total_available,
            result.len()
        ));
    }
    out
}

/// One line per component plus a total.
pub fn batch_summary(batch: &BatchResult) -> String {
    let mut out = String::from("\n--- Batch Summary ---");
    for (component, outcome) in &batch.entries {
        let line = match outcome {
            Ok(result) if result.is_truncated() => format!(
                "\n{}: {} issues (truncated from {}) -> {}",
                component,
                result.len(),
                result.total_available,
                result.output_path.display()
            ),
            Ok(result) => format!(
                "\n{}: {} issues -> {}",
                component,
                result.len(),
                result.output_path.display()
            ),
            Err(e) => format!("\n{}: FAILED ({}): {}", component, e.kind(), e),
        };
        out.push_str(&line);
    }
    out.push_str(&format!(
        "\nTotal: {} issues from {} of {} components",
        batch.total_records(),
        batch.succeeded().count(),
        batch.entries.len()
    ));
    out
}
