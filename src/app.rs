//! Top-level extraction flow.
//!
//! Resolves configuration and the token, picks components, confirms with the
//! user, then runs either a single extraction or a per-component batch.

use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

use tracing::{info, instrument};

use crate::api::{Credential, JiraClient};
use crate::cli::{Cli, Console, DEFAULT_ENV_FILE};
use crate::config::{resolve_credential, EnvFile, Settings};
use crate::error::{AppError, Result};
use crate::extract::catalog::{self, CatalogSource};
use crate::extract::filename::{output_filename, single_component_filename};
use crate::extract::query::build;
use crate::extract::{BatchRunner, ComponentSelection, ExtractionPipeline, IssueFetcher};
use crate::report;
use crate::selection::{resolve_named, SelectionError};

/// Everything needed to talk to the server, resolved once at startup.
#[derive(Debug)]
pub struct RunConfig {
    pub settings: Settings,
    pub credential: Credential,
}

/// Load `.env` and then the custom env file, if one was named.
pub fn load_env(cli: &Cli) -> EnvFile {
    let env = EnvFile::load(Path::new(DEFAULT_ENV_FILE));
    if cli.env_file != Path::new(DEFAULT_ENV_FILE) {
        return env.overlay(EnvFile::load(&cli.env_file));
    }
    env
}

/// Load settings from `--config` or the default location, then apply flags.
pub fn load_settings(cli: &Cli) -> Result<Settings> {
    let base = match &cli.config {
        Some(path) => Settings::load_from(path)?,
        None => Settings::load()?,
    };
    let settings = cli.apply(base);
    settings.validate()?;
    Ok(settings)
}

/// Resolve the token from flags and environment, prompting as a last resort.
pub fn resolve_config<R, W, F>(
    cli: &Cli,
    lookup: F,
    settings: Settings,
    console: &mut Console<R, W>,
) -> Result<RunConfig>
where
    R: BufRead,
    W: Write,
    F: Fn(&str) -> Option<String>,
{
    let credential = match resolve_credential(cli.token.as_deref(), lookup) {
        Some(credential) => {
            console.say("✅ PAT token loaded successfully")?;
            credential
        }
        None => {
            console.say("PAT token not found in:")?;
            console.say("  - Command line argument (--token)")?;
            console.say("  - Environment variable JIRA_PAT_TOKEN")?;
            console.say("  - .env file")?;
            console.ask_token()?.ok_or(AppError::MissingCredential)?
        }
    };

    Ok(RunConfig {
        settings,
        credential,
    })
}

/// Run the whole flow against `console`.
pub async fn run<R: BufRead, W: Write>(cli: &Cli, console: &mut Console<R, W>) -> Result<()> {
    let env = load_env(cli);
    let settings = load_settings(cli)?;
    let config = resolve_config(cli, |k| env.lookup(k), settings, console)?;
    extract(cli, &config, console).await
}

/// Connect, select components and extract.
#[instrument(skip_all, fields(project = %config.settings.project, batch = cli.batch))]
pub async fn extract<R: BufRead, W: Write>(
    cli: &Cli,
    config: &RunConfig,
    console: &mut Console<R, W>,
) -> Result<()> {
    let settings = &config.settings;
    console.say(format!("Connecting to: {}", settings.url))?;
    console.say(format!("Project: {}", settings.project))?;

    let client = JiraClient::new(
        &settings.url,
        &config.credential,
        Duration::from_secs(settings.timeout_secs),
    )?;

    console.say("Fetching available components...")?;
    let catalog = catalog::resolve(&client, &settings.project).await;
    if let CatalogSource::Fallback { reason } = &catalog.source {
        console.say(format!("Failed to get components: {}", reason))?;
        console.say("Using the built-in component list instead")?;
    }

    if cli.list_components {
        for name in &catalog.names {
            console.say(format!("  - {}", name))?;
        }
        return Ok(());
    }

    let names = if cli.wants_menu() {
        console.choose_components(&catalog.names)?
    } else {
        match resolve_named(&cli.components, &catalog.names) {
            Ok(names) => names,
            Err(e @ SelectionError::UnknownComponent { .. }) => {
                console.say(format!("{}. Available components:", e))?;
                for name in &catalog.names {
                    console.say(format!("  - {}", name))?;
                }
                return Err(e.into());
            }
            Err(e) => return Err(e.into()),
        }
    };

    let selection = ComponentSelection::new(names)?;
    console.say(format!("\nSelected components: {}", selection))?;

    let fetcher = IssueFetcher::new(&client, settings.field_map(), settings.max_results);
    let pipeline = ExtractionPipeline::new(fetcher);

    if cli.batch {
        run_batch(cli, settings, &selection, pipeline, console).await
    } else {
        run_single(cli, settings, &selection, pipeline, console).await
    }
}

async fn run_single<R: BufRead, W: Write>(
    cli: &Cli,
    settings: &Settings,
    selection: &ComponentSelection,
    pipeline: ExtractionPipeline<'_>,
    console: &mut Console<R, W>,
) -> Result<()> {
    let query = build(&settings.project, selection)?;
    console.say(format!("JQL Query: {}", query))?;

    let output = cli
        .output
        .clone()
        .unwrap_or_else(|| PathBuf::from(output_filename(selection, &settings.project)));
    console.say(format!("Output file: {}", output.display()))?;

    confirm(cli, console)?;

    console.say(format!("Making API request to: {}/rest/api/2/search", settings.url))?;
    let result = pipeline.run_query(query, &output).await?;
    console.say(format!("Found {} issues", result.total_available))?;
    console.say(format!("Data saved to {}", output.display()))?;
    console.say(report::summary(&result))?;

    if !result.is_empty() {
        console.say(report::preview(&result.records, report::PREVIEW_ROWS))?;

        if selection.len() > 1 {
            console.say("\n--- Component Breakdown ---")?;
            console.say(format!(
                "Total issues across {} components: {}",
                selection.len(),
                result.len()
            ))?;
        }

        console.say("\n--- Export Complete ---")?;
        console.say(format!("File saved: {}", output.display()))?;
        console.say(format!("Total records: {}", result.len()))?;
    }

    info!(records = result.len(), "Extraction complete");
    Ok(())
}

async fn run_batch<R: BufRead, W: Write>(
    cli: &Cli,
    settings: &Settings,
    selection: &ComponentSelection,
    pipeline: ExtractionPipeline<'_>,
    console: &mut Console<R, W>,
) -> Result<()> {
    console.say(format!("Output directory: {}", settings.output_dir.display()))?;
    for component in selection.iter() {
        console.say(format!(
            "  {} -> {}",
            component,
            single_component_filename(&settings.project, component)
        ))?;
    }

    confirm(cli, console)?;

    let runner = BatchRunner::new(pipeline);
    let batch = runner
        .run_all(&settings.project, selection, &settings.output_dir)
        .await?;
    console.say(report::batch_summary(&batch))?;

    let failed = batch.failed().count();
    info!(
        succeeded = batch.entries.len() - failed,
        failed,
        "Batch complete"
    );
    if failed > 0 {
        return Err(AppError::BatchIncomplete {
            failed,
            total: batch.entries.len(),
        });
    }
    Ok(())
}

fn confirm<R: BufRead, W: Write>(cli: &Cli, console: &mut Console<R, W>) -> Result<()> {
    if cli.yes || console.confirm("\nProceed with extraction?")? {
        Ok(())
    } else {
        Err(AppError::Cancelled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use serde_json::json;
    use std::io::Cursor;
    use tempfile::tempdir;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn console(input: &str) -> Console<Cursor<Vec<u8>>, Vec<u8>> {
        Console::new(Cursor::new(input.as_bytes().to_vec()), Vec::new())
    }

    fn run_config(server: &MockServer, output_dir: &Path) -> RunConfig {
        RunConfig {
            settings: Settings {
                url: server.uri(),
                output_dir: output_dir.to_path_buf(),
                ..Settings::default()
            },
            credential: Credential::new("tok").unwrap(),
        }
    }

    async fn mount_catalog(server: &MockServer) {
        Mock::given(method("GET"))
            .and(path("/rest/api/2/project/SPRLL/components"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"name": "Battery"},
                {"name": "Camera"}
            ])))
            .mount(server)
            .await;
    }

    #[test]
    fn test_resolve_config_prompts_when_no_token() {
        let cli = Cli::try_parse_from(["jira-extract"]).unwrap();
        let mut c = console("typed-token\n");
        let config = resolve_config(&cli, |_| None, Settings::default(), &mut c).unwrap();
        assert_eq!(config.credential.expose(), "typed-token");

        let text = String::from_utf8(c.into_output()).unwrap();
        assert!(text.contains("PAT token not found in:"));
    }

    #[test]
    fn test_resolve_config_blank_prompt_is_missing() {
        let cli = Cli::try_parse_from(["jira-extract"]).unwrap();
        let mut c = console("\n");
        let err = resolve_config(&cli, |_| None, Settings::default(), &mut c).unwrap_err();
        assert!(matches!(err, AppError::MissingCredential));
    }

    #[test]
    fn test_resolve_config_uses_env_file_value() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(".env");
        std::fs::write(&path, "JIRA_PAT_TOKEN=from-file\n").unwrap();
        let env = EnvFile::load(&path);

        let cli = Cli::try_parse_from(["jira-extract"]).unwrap();
        let mut c = console("");
        let config =
            resolve_config(&cli, |k| env.get(k).map(str::to_string), Settings::default(), &mut c)
                .unwrap();
        assert_eq!(config.credential.expose(), "from-file");
    }

    #[test]
    fn test_resolve_config_uses_flag() {
        let cli = Cli::try_parse_from(["jira-extract", "--token", "flag-token"]).unwrap();
        let mut c = console("");
        let config = resolve_config(&cli, |_| None, Settings::default(), &mut c).unwrap();
        assert_eq!(config.credential.expose(), "flag-token");
    }

    #[test]
    fn test_load_settings_applies_flags() {
        let dir = tempdir().unwrap();
        let cfg = dir.path().join("config.toml");
        std::fs::write(&cfg, "project = \"HW\"\n").unwrap();

        let cli = Cli::try_parse_from([
            "jira-extract",
            "--config",
            cfg.to_str().unwrap(),
            "--url",
            "https://jira.example.com",
        ])
        .unwrap();

        let settings = load_settings(&cli).unwrap();
        assert_eq!(settings.project, "HW");
        assert_eq!(settings.url, "https://jira.example.com");
    }

    #[test]
    fn test_load_settings_rejects_bad_url() {
        let dir = tempdir().unwrap();
        let cli = Cli::try_parse_from([
            "jira-extract",
            "--config",
            dir.path().join("none.toml").to_str().unwrap(),
            "--url",
            "ftp://jira",
        ])
        .unwrap();
        assert!(matches!(load_settings(&cli), Err(AppError::Config(_))));
    }

    #[test]
    fn test_load_settings_rejects_bad_project_key() {
        let dir = tempdir().unwrap();
        let cli = Cli::try_parse_from([
            "jira-extract",
            "--config",
            dir.path().join("none.toml").to_str().unwrap(),
            "--project",
            "SP RLL",
        ])
        .unwrap();
        assert!(matches!(load_settings(&cli), Err(AppError::Config(_))));
    }

    #[tokio::test]
    async fn test_single_extraction_from_named_components() {
        let server = MockServer::start().await;
        mount_catalog(&server).await;
        Mock::given(method("GET"))
            .and(path("/rest/api/2/search"))
            .and(query_param(
                "jql",
                r#"project = SPRLL AND component IN ("Battery", "Camera")"#,
            ))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "total": 1,
                "issues": [{"key": "SPRLL-1", "fields": {"summary": "Crack"}}]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let dir = tempdir().unwrap();
        let out = dir.path().join("out.csv");
        let cli = Cli::try_parse_from([
            "jira-extract",
            "--components",
            "battery",
            "CAMERA",
            "--output",
            out.to_str().unwrap(),
        ])
        .unwrap();

        let mut c = console("y\n");
        extract(&cli, &run_config(&server, dir.path()), &mut c)
            .await
            .unwrap();

        assert!(out.exists());
        let text = String::from_utf8(c.into_output()).unwrap();
        assert!(text.contains("Selected components: Battery, Camera"));
        assert!(text.contains("Total issues across 2 components: 1"));
    }

    #[tokio::test]
    async fn test_declined_confirmation_writes_nothing() {
        let server = MockServer::start().await;
        mount_catalog(&server).await;
        Mock::given(method("GET"))
            .and(path("/rest/api/2/search"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let dir = tempdir().unwrap();
        let out = dir.path().join("out.csv");
        let cli = Cli::try_parse_from([
            "jira-extract",
            "--components",
            "Battery",
            "--output",
            out.to_str().unwrap(),
        ])
        .unwrap();

        let mut c = console("n\n");
        let err = extract(&cli, &run_config(&server, dir.path()), &mut c)
            .await
            .unwrap_err();
        assert!(err.is_cancellation());
        assert!(!out.exists());
    }

    #[tokio::test]
    async fn test_unknown_component_lists_catalog() {
        let server = MockServer::start().await;
        mount_catalog(&server).await;

        let dir = tempdir().unwrap();
        let cli = Cli::try_parse_from(["jira-extract", "--components", "Laser"]).unwrap();

        let mut c = console("");
        let err = extract(&cli, &run_config(&server, dir.path()), &mut c)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            AppError::Selection(SelectionError::UnknownComponent { .. })
        ));

        let text = String::from_utf8(c.into_output()).unwrap();
        assert!(text.contains("  - Battery"));
        assert!(text.contains("  - Camera"));
    }

    #[tokio::test]
    async fn test_interactive_batch_with_fallback_catalog() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rest/api/2/project/SPRLL/components"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/rest/api/2/search"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"total": 0, "issues": []})),
            )
            .expect(2)
            .mount(&server)
            .await;

        let dir = tempdir().unwrap();
        let out_dir = dir.path().join("batch");
        let cli = Cli::try_parse_from(["jira-extract", "--batch", "--yes"]).unwrap();

        // Fallback list: 1 = Display, 3 = Battery
        let mut c = console("1,3\n");
        extract(&cli, &run_config(&server, &out_dir), &mut c)
            .await
            .unwrap();

        assert!(out_dir.join("sprll_display_issues.csv").exists());
        assert!(out_dir.join("sprll_battery_issues.csv").exists());
        let text = String::from_utf8(c.into_output()).unwrap();
        assert!(text.contains("Using the built-in component list instead"));
        assert!(text.contains("Total: 0 issues from 2 of 2 components"));
    }

    #[tokio::test]
    async fn test_batch_reports_failed_components() {
        let server = MockServer::start().await;
        mount_catalog(&server).await;
        Mock::given(method("GET"))
            .and(path("/rest/api/2/search"))
            .and(query_param("jql", r#"project = SPRLL AND component = "Camera""#))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/rest/api/2/search"))
            .and(query_param("jql", r#"project = SPRLL AND component = "Battery""#))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"total": 0, "issues": []})),
            )
            .mount(&server)
            .await;

        let dir = tempdir().unwrap();
        let cli = Cli::try_parse_from([
            "jira-extract",
            "--batch",
            "--yes",
            "--components",
            "Battery",
            "Camera",
        ])
        .unwrap();

        let mut c = console("");
        let err = extract(&cli, &run_config(&server, dir.path()), &mut c)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            AppError::BatchIncomplete {
                failed: 1,
                total: 2
            }
        ));
        assert!(dir.path().join("sprll_battery_issues.csv").exists());
    }
}
