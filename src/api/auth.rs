//! Authentication handling for JIRA API.
//!
//! JIRA Server/Data Center accepts personal access tokens as bearer
//! credentials. The token is opaque to us and must never reach the logs.

use std::fmt;

/// An opaque, pre-issued access token.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    /// Wrap a token, rejecting blank input.
    pub fn new(token: impl Into<String>) -> Option<Self> {
        let token = token.into();
        let trimmed = token.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    /// Expose the raw token. Only the auth header should need this.
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(<redacted>)")
    }
}

/// Authentication credentials for JIRA.
#[derive(Clone)]
pub struct Auth {
    /// The complete "Bearer ..." header value.
    auth_header: String,
}

impl Auth {
    /// Create bearer authentication from a credential.
    pub fn bearer(credential: &Credential) -> Self {
        Self {
            auth_header: build_auth_header(credential.expose()),
        }
    }

    /// Get the authorization header value for HTTP requests.
    pub fn header_value(&self) -> &str {
        &self.auth_header
    }
}

impl fmt::Debug for Auth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Auth").field("scheme", &"Bearer").finish()
    }
}

/// Build the bearer header value.
fn build_auth_header(token: &str) -> String {
    format!("Bearer {}", token)
}
