//! Issue search and row mapping.

use tracing::{debug, info, instrument, warn};

use super::normalize::normalize;
use super::query::Query;
use super::record::IssueRecord;
use crate::api::error::Result;
use crate::api::{JiraClient, RawIssue, SearchResponse};

/// Default upper bound on issues returned by one search.
pub const DEFAULT_MAX_RESULTS: u32 = 1000;

/// Default custom field holding the root cause text.
pub const DEFAULT_ROOT_CAUSE_FIELD: &str = "customfield_10606";

/// Default custom field holding the corrective action text.
pub const DEFAULT_CORRECTIVE_ACTION_FIELD: &str = "customfield_11222";

/// Which server fields feed which output columns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldMap {
    pub root_cause: String,
    pub corrective_action: String,
}

impl Default for FieldMap {
    fn default() -> Self {
        Self {
            root_cause: DEFAULT_ROOT_CAUSE_FIELD.to_string(),
            corrective_action: DEFAULT_CORRECTIVE_ACTION_FIELD.to_string(),
        }
    }
}

impl FieldMap {
    /// The `fields` list sent with each search.
    pub fn requested(&self) -> [&str; 4] {
        [
            "summary",
            "description",
            &self.root_cause,
            &self.corrective_action,
        ]
    }

    /// Map one raw issue to a normalized row. Missing fields become `""`.
    pub fn to_record(&self, issue: &RawIssue) -> IssueRecord {
        IssueRecord {
            key: issue.key.clone(),
            summary: normalize(issue.field("summary")),
            description: normalize(issue.field("description")),
            root_cause: normalize(issue.field(&self.root_cause)),
            corrective_action: normalize(issue.field(&self.corrective_action)),
        }
    }
}

/// Rows from one search plus the server's reported total.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedIssues {
    pub records: Vec<IssueRecord>,
    pub total_available: u32,
}

impl FetchedIssues {
    fn from_response(response: &SearchResponse, fields: &FieldMap) -> Self {
        Self {
            records: response.issues.iter().map(|i| fields.to_record(i)).collect(),
            total_available: response.total_available(),
        }
    }
}

/// Runs bounded searches and maps the results into rows.
#[derive(Debug)]
pub struct IssueFetcher<'a> {
    client: &'a JiraClient,
    fields: FieldMap,
    max_results: u32,
}

impl<'a> IssueFetcher<'a> {
    pub fn new(client: &'a JiraClient, fields: FieldMap, max_results: u32) -> Self {
        Self {
            client,
            fields,
            max_results,
        }
    }

    /// Fetch the issues matching `query`.
    ///
    /// Only the first `max_results` matches are retrieved; compare
    /// `total_available` against the row count to detect truncation.
    #[instrument(skip(self), fields(jql = %query))]
    pub async fn fetch(&self, query: &Query) -> Result<FetchedIssues> {
        let response = self
            .client
            .search(query.as_str(), &self.fields.requested(), self.max_results)
            .await?;

        let fetched = FetchedIssues::from_response(&response, &self.fields);
        info!(
            returned = fetched.records.len(),
            total = fetched.total_available,
            "Fetched issues"
        );
        if fetched.total_available as usize > fetched.records.len() {
            warn!(
                "Server reported {} matches but only {} were returned",
                fetched.total_available,
                fetched.records.len()
            );
        }
        debug!("Mapped {} records", fetched.records.len());

        Ok(fetched)
    }
}
