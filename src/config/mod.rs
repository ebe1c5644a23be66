//! Configuration management.
//!
//! Settings come from an optional TOML file, an optional `.env` file and
//! command-line flags. Everything is collected into explicit values at
//! startup; the process environment is only ever read.

mod env_file;
mod settings;

use std::path::PathBuf;

use thiserror::Error;

pub use env_file::{resolve_credential, EnvFile, TOKEN_ENV_VARS};
pub use settings::Settings;

/// Errors that can occur while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The platform config directory could not be determined.
    #[error("could not determine configuration directory")]
    NoConfigDir,

    /// A configuration file could not be read.
    #[error("failed to read {}: {source}", path.display())]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The settings file is not valid TOML for [`Settings`].
    #[error("failed to parse {}: {source}", path.display())]
    ParseError {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// A setting has an unusable value.
    #[error("invalid configuration: {0}")]
    ValidationError(String),
}

/// Result type for configuration operations.
pub type Result<T> = std::result::Result<T, ConfigError>;
