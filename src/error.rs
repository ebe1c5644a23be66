//! Centralized error types for jira-extract.
//!
//! This module aggregates every layer's errors into [`AppError`] and maps
//! them to messages suitable for the console.

use thiserror::Error;

use crate::api::ApiError;
use crate::cli::PromptError;
use crate::config::ConfigError;
use crate::extract::{ExtractError, QueryError};
use crate::selection::SelectionError;

/// The main application error type.
#[derive(Debug, Error)]
pub enum AppError {
    /// Configuration-related errors.
    #[error("{0}")]
    Config(#[from] ConfigError),

    /// API errors outside an extraction (client setup).
    #[error("{0}")]
    Api(#[from] ApiError),

    /// A failed extraction.
    #[error("{0}")]
    Extract(#[from] ExtractError),

    /// The component choice was invalid.
    #[error("{0}")]
    Selection(#[from] SelectionError),

    /// Interactive prompting failed.
    #[error("{0}")]
    Prompt(#[from] PromptError),

    /// No token from flags, environment or prompt.
    #[error("PAT token is required")]
    MissingCredential,

    /// The user declined the confirmation prompt.
    #[error("Extraction cancelled")]
    Cancelled,

    /// Some components in a batch failed.
    #[error("{failed} of {total} components failed")]
    BatchIncomplete { failed: usize, total: usize },

    /// IO errors (console, file system).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<QueryError> for AppError {
    fn from(err: QueryError) -> Self {
        AppError::Extract(ExtractError::Query(err))
    }
}

impl AppError {
    /// Whether this is a user cancellation rather than a failure.
    pub fn is_cancellation(&self) -> bool {
        matches!(self, AppError::Cancelled)
    }

    /// Get a user-friendly message for display.
    pub fn user_message(&self) -> String {
        match self {
            AppError::Api(e) | AppError::Extract(ExtractError::Fetch(e)) => match e {
                ApiError::Unauthorized => {
                    "Authentication failed. Please check your PAT token.".to_string()
                }
                ApiError::Forbidden => {
                    "Access denied. You don't have permission to read these issues.".to_string()
                }
                ApiError::NotFound(resource) => format!("'{}' was not found.", resource),
                ApiError::RateLimited => {
                    "Too many requests. Please wait a moment and try again.".to_string()
                }
                ApiError::ServerError(msg) => format!("API request failed: {}", msg),
                ApiError::Network(_) => {
                    "Connection failed. Please check your network and JIRA URL.".to_string()
                }
                ApiError::InvalidResponse(msg) => {
                    format!("Failed to parse JSON response: {}", msg)
                }
            },
            AppError::Extract(ExtractError::Write { path, .. }) => format!(
                "Could not write {}. Please check the path and file permissions.",
                path.display()
            ),
            AppError::Selection(SelectionError::UnknownComponent { name }) => {
                format!("Warning: Component '{}' not found.", name)
            }
            AppError::MissingCredential => "Error: PAT token is required".to_string(),
            other => other.to_string(),
        }
    }

    /// Get a suggested action for the user.
    pub fn suggested_action(&self) -> Option<&'static str> {
        match self {
            AppError::MissingCredential
            | AppError::Api(ApiError::Unauthorized)
            | AppError::Extract(ExtractError::Fetch(ApiError::Unauthorized)) => {
                Some("Pass --token, or set JIRA_PAT_TOKEN in the environment or a .env file.")
            }
            AppError::Selection(SelectionError::UnknownComponent { .. }) => {
                Some("Run with --list-components to see the available components.")
            }
            AppError::Api(ApiError::Network(_))
            | AppError::Extract(ExtractError::Fetch(ApiError::Network(_))) => {
                Some("Check your network connection and the --url value.")
            }
            AppError::Config(_) => Some("Check the settings file and command-line flags."),
            _ => None,
        }
    }
}

/// Result type for application operations.
pub type Result<T> = std::result::Result<T, AppError>;
