//! JIRA API client and types.
//!
//! This module provides the interface for communicating with the JIRA REST API.

mod auth;
mod client;
pub mod error;
pub mod types;

pub use auth::{Auth, Credential};
pub use client::{JiraClient, DEFAULT_TIMEOUT_SECS};
pub use error::ApiError;
pub use types::{Component, RawIssue, SearchResponse};
