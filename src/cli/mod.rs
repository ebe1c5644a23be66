//! Command-line interface.

mod console;

use std::path::PathBuf;

use clap::Parser;

pub use console::{Console, PromptError, MAX_PROMPT_ATTEMPTS};

use crate::config::Settings;

/// Default `.env` file name.
pub const DEFAULT_ENV_FILE: &str = ".env";

/// Extract JIRA issues by component into CSV files.
#[derive(Debug, Clone, Parser)]
#[command(name = "jira-extract", version, about)]
pub struct Cli {
    /// Personal access token (or set JIRA_PAT_TOKEN in the environment or .env file)
    #[arg(long)]
    pub token: Option<String>,

    /// JIRA server URL
    #[arg(long)]
    pub url: Option<String>,

    /// Project key
    #[arg(long)]
    pub project: Option<String>,

    /// Component names (space-separated)
    #[arg(long, num_args = 1..)]
    pub components: Vec<String>,

    /// Output CSV filename
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// Output directory for batch mode
    #[arg(long)]
    pub output_dir: Option<PathBuf>,

    /// Write one CSV file per component
    #[arg(long)]
    pub batch: bool,

    /// Choose components from a menu
    #[arg(long)]
    pub interactive: bool,

    /// Path to .env file
    #[arg(long, default_value = DEFAULT_ENV_FILE)]
    pub env_file: PathBuf,

    /// Path to settings file
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Skip the confirmation prompt
    #[arg(short, long)]
    pub yes: bool,

    /// Print the project's components and exit
    #[arg(long)]
    pub list_components: bool,
}

impl Cli {
    /// Apply flag overrides on top of file settings.
    pub fn apply(&self, mut settings: Settings) -> Settings {
        if let Some(url) = &self.url {
            settings.url = url.clone();
        }
        if let Some(project) = &self.project {
            settings.project = project.clone();
        }
        if let Some(dir) = &self.output_dir {
            settings.output_dir = dir.clone();
        }
        settings
    }

    /// Whether components should be chosen from the menu.
    pub fn wants_menu(&self) -> bool {
        self.interactive || self.components.is_empty()
    }
}
