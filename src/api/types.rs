//! JIRA API response types.
//!
//! These model just the parts of the REST API v2 payloads the extractor reads.
//! Field values are kept as raw JSON because custom fields may hold anything.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Search result from a JQL query.
///
/// Returned by `GET /rest/api/2/search`. The `issues` list is required;
/// a body without it is rejected as an invalid response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    /// Total number of matching issues on the server.
    #[serde(default)]
    pub total: Option<u32>,
    /// The returned page of issues.
    pub issues: Vec<RawIssue>,
}

impl SearchResponse {
    /// Total matches reported by the server, or the page size if it omitted one.
    pub fn total_available(&self) -> u32 {
        self.total.unwrap_or(self.issues.len() as u32)
    }
}

/// A JIRA issue as returned in search results.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawIssue {
    /// The issue key (e.g., "SPRLL-123").
    pub key: String,
    /// Requested fields. Any of them may be absent or null.
    #[serde(default)]
    pub fields: Map<String, Value>,
}

impl RawIssue {
    /// Look up a field value, treating JSON null as absent.
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.fields.get(name).filter(|v| !v.is_null())
    }
}

/// A project component.
///
/// Returned by `GET /rest/api/2/project/{key}/components`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Component {
    /// The component name.
    pub name: String,
    /// The component ID.
    #[serde(default)]
    pub id: Option<String>,
}
