//! Error types for the extraction pipeline.

use std::path::PathBuf;

use thiserror::Error;

use super::record::ExtractionResult;
use crate::api::ApiError;

/// Invalid input to query construction. Nothing has been fetched or written.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum QueryError {
    /// No components were selected.
    #[error("at least one component must be selected")]
    EmptySelection,

    /// A component name was empty or whitespace.
    #[error("component names cannot be empty")]
    EmptyComponentName,

    /// The project key was empty.
    #[error("project key cannot be empty")]
    EmptyProject,

    /// The project key contains characters JQL would need quoted.
    #[error("project key '{0}' may only contain letters, digits and '_'")]
    InvalidProject(String),
}

/// A failed extraction.
///
/// Every variant except [`ExtractError::Write`] means no file was written.
#[derive(Debug, Error)]
pub enum ExtractError {
    /// The project or component selection was rejected.
    #[error("Invalid input: {0}")]
    Query(#[from] QueryError),

    /// The search request failed or returned something unusable.
    #[error("Fetch failed: {0}")]
    Fetch(#[from] ApiError),

    /// Issues were fetched but the CSV file could not be written.
    #[error("Failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: csv::Error,
        /// What was fetched before the write failed.
        result: Box<ExtractionResult>,
    },

    /// The batch output directory could not be created.
    #[error("Failed to create output directory {}: {source}", path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Another component in the same batch already claimed this output file.
    #[error("Output file {} is already used by component '{other}'", path.display())]
    OutputCollision { path: PathBuf, other: String },
}

impl ExtractError {
    /// The in-memory rows, if the fetch succeeded before the failure.
    pub fn fetched(&self) -> Option<&ExtractionResult> {
        match self {
            ExtractError::Write { result, .. } => Some(result),
            _ => None,
        }
    }

    /// Short label for per-component reporting.
    pub fn kind(&self) -> &'static str {
        match self {
            ExtractError::Query(_) => "input",
            ExtractError::Fetch(e) if e.is_transport() => "transport",
            ExtractError::Fetch(_) => "parse",
            ExtractError::Write { .. } => "write",
            ExtractError::CreateDir { .. } => "write",
            ExtractError::OutputCollision { .. } => "collision",
        }
    }
}
