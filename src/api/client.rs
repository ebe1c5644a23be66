//! JIRA API client implementation.
//!
//! This module provides the client for the JIRA Server REST API v2 endpoints the
//! extractor needs: issue search and the project component list. Each call is a
//! single request with a timeout; there is no retry.

use std::time::Duration;

use reqwest::{header, Client, Response, StatusCode};
use tracing::{debug, instrument, warn};

use super::auth::{Auth, Credential};
use super::error::{ApiError, Result};
use super::types::{Component, SearchResponse};

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// The JIRA API client.
#[derive(Debug)]
pub struct JiraClient {
    /// The HTTP client.
    client: Client,
    /// The base URL for the JIRA instance.
    base_url: String,
    /// Authentication credentials.
    auth: Auth,
}

impl JiraClient {
    /// Create a client for `base_url` authenticating with a bearer credential.
    ///
    /// Does not contact the server.
    pub fn new(base_url: &str, credential: &Credential, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(ApiError::Network)?;

        Ok(Self {
            client,
            base_url: normalize_base_url(base_url),
            auth: Auth::bearer(credential),
        })
    }

    /// Search for issues using JQL.
    ///
    /// Issues one `GET /rest/api/2/search` request bounded by `max_results`.
    /// Matches beyond the bound are not fetched.
    #[instrument(skip(self, field_names), fields(jql = %jql))]
    pub async fn search(
        &self,
        jql: &str,
        field_names: &[&str],
        max_results: u32,
    ) -> Result<SearchResponse> {
        let url = format!(
            "{}/rest/api/2/search?jql={}&fields={}&maxResults={}",
            self.base_url,
            urlencoding::encode(jql),
            urlencoding::encode(&field_names.join(",")),
            max_results
        );

        let result: SearchResponse = self.get(&url).await?;
        debug!(
            "Search returned {} issues (total: {})",
            result.issues.len(),
            result.total_available()
        );
        Ok(result)
    }

    /// List the components defined for a project.
    ///
    /// Calls `GET /rest/api/2/project/{project}/components`.
    #[instrument(skip(self))]
    pub async fn project_components(&self, project: &str) -> Result<Vec<Component>> {
        let url = format!(
            "{}/rest/api/2/project/{}/components",
            self.base_url,
            urlencoding::encode(project)
        );

        let components: Vec<Component> = self.get(&url).await.map_err(|e| {
            if matches!(e, ApiError::NotFound(_)) {
                ApiError::NotFound(format!("Project '{}' not found", project))
            } else {
                e
            }
        })?;

        debug!("Project has {} components", components.len());
        Ok(components)
    }

    /// Perform a single authenticated GET request.
    async fn get<T: serde::de::DeserializeOwned>(&self, url: &str) -> Result<T> {
        let response = self
            .client
            .get(url)
            .header(header::AUTHORIZATION, self.auth.header_value())
            .header(header::ACCEPT, "application/json")
            .header(header::CONTENT_TYPE, "application/json")
            .send()
            .await?;

        self.handle_response(response).await
    }

    /// Handle the HTTP response, checking for errors and parsing JSON.
    async fn handle_response<T: serde::de::DeserializeOwned>(
        &self,
        response: Response,
    ) -> Result<T> {
        let status = response.status();
        let url = response.url().path().to_string();

        if status.is_success() {
            let body = response.text().await?;
            serde_json::from_str::<T>(&body)
                .map_err(|e| ApiError::InvalidResponse(format!("Failed to parse response: {}", e)))
        } else {
            let error_body = response.text().await.unwrap_or_default();
            debug!("Error response body: {}", error_body);

            Err(Self::error_from_response(status, &url, &error_body))
        }
    }

    /// Create an appropriate error from an HTTP response.
    fn error_from_response(status: StatusCode, url: &str, body: &str) -> ApiError {
        if let Ok(json) = serde_json::from_str::<serde_json::Value>(body) {
            // JIRA reports JQL and permission problems in errorMessages
            if let Some(arr) = json.get("errorMessages").and_then(|m| m.as_array()) {
                let messages: Vec<&str> = arr.iter().filter_map(|v| v.as_str()).collect();
                if !messages.is_empty() {
                    return ApiError::from_status(status, &messages.join(", "));
                }
            }
            if let Some(obj) = json.get("errors").and_then(|e| e.as_object()) {
                let error_strings: Vec<String> =
                    obj.iter().map(|(k, v)| format!("{}: {}", k, v)).collect();
                if !error_strings.is_empty() {
                    return ApiError::from_status(status, &error_strings.join(", "));
                }
            }
        }

        ApiError::from_status(status, url)
    }
}

/// Normalize the base URL by removing trailing slashes.
fn normalize_base_url(url: &str) -> String {
    let url = url.trim_end_matches('/');

    // Warn if not HTTPS (but don't enforce for localhost/testing)
    if !url.starts_with("https://") && !url.contains("localhost") && !url.contains("127.0.0.1") {
        warn!("URL does not use HTTPS: {}. This is insecure for production use.", url);
    }

    url.to_string()
}
