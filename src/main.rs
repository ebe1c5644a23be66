//! jira-extract - extract JIRA issues by component into CSV files.

use std::process::ExitCode;

use clap::Parser;

use jira_extract::app;
use jira_extract::cli::{Cli, Console};
use jira_extract::logging;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Logging is best effort; extraction works without it.
    let _guard = match logging::init() {
        Ok(guard) => Some(guard),
        Err(e) => {
            eprintln!("Warning: logging disabled: {}", e);
            None
        }
    };

    let mut console = Console::stdio();
    let result = app::run(&cli, &mut console).await;

    match result {
        Ok(()) => {
            tracing::info!("jira-extract finished");
            ExitCode::SUCCESS
        }
        Err(e) if e.is_cancellation() => {
            println!("{}", e.user_message());
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!("Run failed: {}", e);
            eprintln!("{}", e.user_message());
            if let Some(action) = e.suggested_action() {
                eprintln!("{}", action);
            }
            if let Some(dir) = logging::log_directory() {
                eprintln!("See logs in {}", dir.display());
            }
            ExitCode::FAILURE
        }
    }
}
