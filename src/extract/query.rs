//! JQL construction from a project key and a component selection.

use std::fmt;

use super::error::QueryError;

/// An ordered, non-empty list of component names.
///
/// Exact duplicates are dropped, keeping the first occurrence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComponentSelection(Vec<String>);

impl ComponentSelection {
    /// Build a selection, rejecting an empty list or blank names.
    pub fn new<I, S>(names: I) -> Result<Self, QueryError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut out: Vec<String> = Vec::new();
        for name in names {
            let name = name.into();
            if name.trim().is_empty() {
                return Err(QueryError::EmptyComponentName);
            }
            if !out.contains(&name) {
                out.push(name);
            }
        }

        if out.is_empty() {
            return Err(QueryError::EmptySelection);
        }
        Ok(Self(out))
    }

    /// A selection holding exactly one component.
    pub fn single(name: impl Into<String>) -> Result<Self, QueryError> {
        Self::new([name.into()])
    }

    pub fn names(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

impl fmt::Display for ComponentSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.join(", "))
    }
}

/// A JQL query string, fully determined by project and selection.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Query(String);

impl Query {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Validate a project key for unquoted use in JQL.
pub fn validate_project(project: &str) -> Result<(), QueryError> {
    if project.is_empty() {
        return Err(QueryError::EmptyProject);
    }
    if !project.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(QueryError::InvalidProject(project.to_string()));
    }
    Ok(())
}

/// Build the JQL for a project and component selection.
///
/// One component yields an equality clause; several yield an `IN` clause
/// listing the components in selection order.
pub fn build(project: &str, components: &ComponentSelection) -> Result<Query, QueryError> {
    validate_project(project)?;

    let jql = match components.names() {
        [single] => format!("project = {} AND component = {}", project, quote(single)),
        many => {
            let list: Vec<String> = many.iter().map(|c| quote(c)).collect();
            format!("project = {} AND component IN ({})", project, list.join(", "))
        }
    };

    Ok(Query(jql))
}

/// Quote a JQL string literal, escaping backslashes and double quotes.
fn quote(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        if c == '"' || c == '\\' {
            out.push('\\');
        }
        out.push(c);
    }
    out.push('"');
    out
}
