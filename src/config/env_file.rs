//! `.env` file support and credential resolution.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::api::Credential;

/// Environment variables checked for a token, in order.
pub const TOKEN_ENV_VARS: [&str; 3] = ["JIRA_PAT_TOKEN", "JIRA_TOKEN", "PAT_TOKEN"];

/// `KEY=VALUE` pairs read from a `.env` file.
///
/// Values here shadow the process environment on lookup. Nothing is
/// written back to the environment.
#[derive(Debug, Clone, Default)]
pub struct EnvFile {
    path: Option<PathBuf>,
    vars: HashMap<String, String>,
}

impl EnvFile {
    /// Read `path`. A missing file yields an empty set.
    ///
    /// Lines dotenvy cannot parse are skipped with a warning, and an
    /// unreadable file is treated as empty. Unquoted and double-quoted
    /// values expand `$VAR`; wrap a value in single quotes to keep a
    /// literal `$`.
    pub fn load(path: &Path) -> Self {
        if !path.exists() {
            debug!(path = %path.display(), "No .env file");
            return Self::default();
        }

        let iter = match dotenvy::from_path_iter(path) {
            Ok(iter) => iter,
            Err(e) => {
                warn!("Could not read {}: {}", path.display(), e);
                return Self::default();
            }
        };

        let mut vars = HashMap::new();
        for item in iter {
            match item {
                Ok((key, value)) => {
                    vars.insert(key, value);
                }
                Err(dotenvy::Error::Io(e)) => {
                    warn!("Stopped reading {}: {}", path.display(), e);
                    break;
                }
                Err(e) => warn!("Skipping line in {}: {}", path.display(), e),
            }
        }

        info!("Loaded {} variables from {}", vars.len(), path.display());
        Self {
            path: Some(path.to_path_buf()),
            vars,
        }
    }

    /// The file these values came from, if one was read.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// A value from the file only.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.vars.get(key).map(String::as_str)
    }

    /// A value from the file, falling back to the process environment.
    pub fn lookup(&self, key: &str) -> Option<String> {
        self.get(key)
            .map(str::to_string)
            .or_else(|| std::env::var(key).ok())
    }

    /// Merge another file's values over this one's.
    pub fn overlay(mut self, other: EnvFile) -> Self {
        if other.path.is_some() {
            self.path = other.path;
        }
        self.vars.extend(other.vars);
        self
    }
}

/// Resolve the access token from an explicit flag or the environment.
///
/// Checks `flag`, then each of [`TOKEN_ENV_VARS`] via `lookup`. Blank values
/// are skipped. Returns `None` when the caller should prompt.
pub fn resolve_credential<F>(flag: Option<&str>, lookup: F) -> Option<Credential>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(cred) = flag.and_then(Credential::new) {
        debug!("Using token from command line");
        return Some(cred);
    }

    TOKEN_ENV_VARS.iter().find_map(|&name| {
        let cred = lookup(name).and_then(Credential::new)?;
        debug!(source = name, "Using token from environment");
        Some(cred)
    })
}
