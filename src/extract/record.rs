//! Extracted rows and their provenance.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::query::Query;

/// One normalized issue row. Field order is the CSV column order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueRecord {
    pub key: String,
    pub summary: String,
    pub description: String,
    pub root_cause: String,
    pub corrective_action: String,
}

impl IssueRecord {
    /// CSV header row.
    pub const HEADERS: [&'static str; 5] = [
        "key",
        "summary",
        "description",
        "root_cause",
        "corrective_action",
    ];

    /// Field values in column order.
    pub fn as_row(&self) -> [&str; 5] {
        [
            &self.key,
            &self.summary,
            &self.description,
            &self.root_cause,
            &self.corrective_action,
        ]
    }
}

/// The rows returned by one query, plus where they came from and went to.
///
/// An empty `records` list is a successful zero-match extraction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionResult {
    pub query: Query,
    pub output_path: PathBuf,
    pub records: Vec<IssueRecord>,
    /// Matches the server reported, which may exceed `records.len()`.
    pub total_available: u32,
}

impl ExtractionResult {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Whether the server had more matches than the request bound allowed.
    pub fn is_truncated(&self) -> bool {
        self.total_available as usize > self.records.len()
    }

    pub fn output_path(&self) -> &Path {
        &self.output_path
    }

    /// Number of records with a non-empty root cause.
    pub fn with_root_cause(&self) -> usize {
        self.records.iter().filter(|r| !r.root_cause.is_empty()).count()
    }

    /// Number of records with a non-empty corrective action.
    pub fn with_corrective_action(&self) -> usize {
        self.records
            .iter()
            .filter(|r| !r.corrective_action.is_empty())
            .count()
    }
}
