//! Application settings configuration.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{ConfigError, Result};
use crate::api::DEFAULT_TIMEOUT_SECS;
use crate::extract::fetcher::{
    FieldMap, DEFAULT_CORRECTIVE_ACTION_FIELD, DEFAULT_MAX_RESULTS, DEFAULT_ROOT_CAUSE_FIELD,
};
use crate::extract::query::validate_project;

/// File name of the settings file inside the config directory.
const SETTINGS_FILE: &str = "config.toml";

/// Extraction settings.
///
/// Every field is optional in the TOML file; missing ones take defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// The JIRA server URL.
    pub url: String,
    /// The project key to extract from.
    pub project: String,
    /// Custom field holding the root cause.
    pub root_cause_field: String,
    /// Custom field holding the corrective action.
    pub corrective_action_field: String,
    /// Upper bound on issues fetched per query.
    pub max_results: u32,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
    /// Directory for batch output files.
    pub output_dir: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            url: "https://jira.zebra.com".to_string(),
            project: "SPRLL".to_string(),
            root_cause_field: DEFAULT_ROOT_CAUSE_FIELD.to_string(),
            corrective_action_field: DEFAULT_CORRECTIVE_ACTION_FIELD.to_string(),
            max_results: DEFAULT_MAX_RESULTS,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            output_dir: PathBuf::from("output"),
        }
    }
}

impl Settings {
    /// Default location: `<config dir>/jira-extract/config.toml`.
    pub fn default_path() -> Result<PathBuf> {
        let base = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
        Ok(base.join("jira-extract").join(SETTINGS_FILE))
    }

    /// Load settings from `path`, or defaults if the file does not exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!(path = %path.display(), "No settings file, using defaults");
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::ReadError {
            path: path.to_path_buf(),
            source,
        })?;
        let settings: Settings =
            toml::from_str(&contents).map_err(|source| ConfigError::ParseError {
                path: path.to_path_buf(),
                source,
            })?;

        debug!(path = %path.display(), "Loaded settings file");
        Ok(settings)
    }

    /// Load settings from the default location.
    ///
    /// A platform without a config directory just gets defaults.
    pub fn load() -> Result<Self> {
        match Self::default_path() {
            Ok(path) => Self::load_from(&path),
            Err(ConfigError::NoConfigDir) => Ok(Self::default()),
            Err(e) => Err(e),
        }
    }

    /// Check the settings are usable.
    pub fn validate(&self) -> Result<()> {
        if self.url.is_empty() {
            return Err(ConfigError::ValidationError(
                "server URL cannot be empty".to_string(),
            ));
        }

        if !self.url.starts_with("https://") && !self.url.starts_with("http://") {
            return Err(ConfigError::ValidationError(format!(
                "server URL '{}' must start with http:// or https://",
                self.url
            )));
        }

        validate_project(&self.project)
            .map_err(|e| ConfigError::ValidationError(e.to_string()))?;

        if self.max_results == 0 {
            return Err(ConfigError::ValidationError(
                "max_results must be greater than zero".to_string(),
            ));
        }

        if self.root_cause_field.is_empty() || self.corrective_action_field.is_empty() {
            return Err(ConfigError::ValidationError(
                "custom field ids cannot be empty".to_string(),
            ));
        }

        Ok(())
    }

    /// The field mapping used for searches.
    pub fn field_map(&self) -> FieldMap {
        FieldMap {
            root_cause: self.root_cause_field.clone(),
            corrective_action: self.corrective_action_field.clone(),
        }
    }
}
