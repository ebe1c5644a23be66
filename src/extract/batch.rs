//! Per-component batch extraction.

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

use tracing::{info, instrument, warn};

use super::error::ExtractError;
use super::filename::single_component_filename;
use super::pipeline::ExtractionPipeline;
use super::query::{build, validate_project, ComponentSelection};
use super::record::ExtractionResult;

/// Outcome of one component's extraction.
pub type ComponentOutcome = Result<ExtractionResult, ExtractError>;

/// One outcome per requested component.
#[derive(Debug)]
pub struct BatchResult {
    pub output_dir: PathBuf,
    pub entries: BTreeMap<String, ComponentOutcome>,
}

impl BatchResult {
    pub fn get(&self, component: &str) -> Option<&ComponentOutcome> {
        self.entries.get(component)
    }

    pub fn succeeded(&self) -> impl Iterator<Item = (&str, &ExtractionResult)> {
        self.entries
            .iter()
            .filter_map(|(name, outcome)| outcome.as_ref().ok().map(|r| (name.as_str(), r)))
    }

    pub fn failed(&self) -> impl Iterator<Item = (&str, &ExtractError)> {
        self.entries
            .iter()
            .filter_map(|(name, outcome)| outcome.as_ref().err().map(|e| (name.as_str(), e)))
    }

    /// Rows written across all successful components.
    pub fn total_records(&self) -> usize {
        self.succeeded().map(|(_, r)| r.len()).sum()
    }
}

/// Repeats the pipeline once per component, one file each.
#[derive(Debug)]
pub struct BatchRunner<'a> {
    pipeline: ExtractionPipeline<'a>,
}

impl<'a> BatchRunner<'a> {
    pub fn new(pipeline: ExtractionPipeline<'a>) -> Self {
        Self { pipeline }
    }

    /// Extract each component separately into `output_dir`.
    ///
    /// Fails up front on an invalid project key, before `output_dir` is
    /// created, or if `output_dir` cannot be created. A failure for one
    /// component is recorded in its entry and the rest still run.
    #[instrument(skip(self, components), fields(count = components.len()))]
    pub async fn run_all(
        &self,
        project: &str,
        components: &ComponentSelection,
        output_dir: &Path,
    ) -> Result<BatchResult, ExtractError> {
        validate_project(project)?;

        std::fs::create_dir_all(output_dir).map_err(|source| ExtractError::CreateDir {
            path: output_dir.to_path_buf(),
            source,
        })?;

        let mut claimed: HashMap<PathBuf, String> = HashMap::new();
        let mut entries = BTreeMap::new();

        for component in components.iter() {
            info!("Processing {}", component);
            let output_path = output_dir.join(single_component_filename(project, component));

            let outcome = match claimed.get(&output_path) {
                Some(other) => Err(ExtractError::OutputCollision {
                    path: output_path.clone(),
                    other: other.clone(),
                }),
                None => {
                    claimed.insert(output_path.clone(), component.to_string());
                    self.extract_one(project, component, &output_path).await
                }
            };

            if let Err(e) = &outcome {
                warn!("Extraction failed for {}: {}", component, e);
            }
            entries.insert(component.to_string(), outcome);
        }

        Ok(BatchResult {
            output_dir: output_dir.to_path_buf(),
            entries,
        })
    }

    async fn extract_one(
        &self,
        project: &str,
        component: &str,
        output_path: &Path,
    ) -> ComponentOutcome {
        let selection = ComponentSelection::single(component)?;
        let query = build(project, &selection)?;
        self.pipeline.run_query(query, output_path).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{ApiError, Credential, JiraClient};
    use crate::extract::fetcher::{FieldMap, IssueFetcher};
    use serde_json::json;
    use std::time::Duration;
    use tempfile::tempdir;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_client(server: &MockServer) -> JiraClient {
        let cred = Credential::new("tok").unwrap();
        JiraClient::new(&server.uri(), &cred, Duration::from_secs(5)).unwrap()
    }

    async fn mount_component(server: &MockServer, component: &str, template: ResponseTemplate) {
        Mock::given(method("GET"))
            .and(path("/rest/api/2/search"))
            .and(query_param(
                "jql",
                format!("project = SPRLL AND component = \"{}\"", component).as_str(),
            ))
            .respond_with(template)
            .expect(1)
            .mount(server)
            .await;
    }

    fn issues(keys: &[&str]) -> ResponseTemplate {
        let issues: Vec<_> = keys
            .iter()
            .map(|k| json!({"key": k, "fields": {"summary": format!("issue {}", k)}}))
            .collect();
        ResponseTemplate::new(200).set_body_json(json!({"total": keys.len(), "issues": issues}))
    }

    #[tokio::test]
    async fn test_failure_is_isolated_per_component() {
        let server = MockServer::start().await;
        mount_component(&server, "Battery", issues(&["SPRLL-1", "SPRLL-2"])).await;
        mount_component(&server, "Camera", ResponseTemplate::new(502)).await;
        mount_component(&server, "Touch panel", issues(&["SPRLL-3"])).await;

        let dir = tempdir().unwrap();
        let out_dir = dir.path().join("output");
        let client = test_client(&server);
        let runner = BatchRunner::new(ExtractionPipeline::new(IssueFetcher::new(
            &client,
            FieldMap::default(),
            100,
        )));

        let selection = ComponentSelection::new(["Battery", "Camera", "Touch panel"]).unwrap();
        let batch = runner.run_all("SPRLL", &selection, &out_dir).await.unwrap();

        assert_eq!(batch.entries.len(), 3);
        assert_eq!(batch.failed().count(), 1);
        assert!(matches!(batch.get("Camera"), Some(Err(ExtractError::Fetch(_)))));

        let battery = batch.get("Battery").unwrap().as_ref().unwrap();
        assert_eq!(battery.len(), 2);
        assert_eq!(battery.output_path, out_dir.join("sprll_battery_issues.csv"));
        assert!(battery.output_path.exists());

        let touch = batch.get("Touch panel").unwrap().as_ref().unwrap();
        assert_eq!(touch.records[0].key, "SPRLL-3");
        assert!(out_dir.join("sprll_touch_panel_issues.csv").exists());

        assert!(!out_dir.join("sprll_camera_issues.csv").exists());
        assert_eq!(batch.total_records(), 3);
    }

    #[tokio::test]
    async fn test_creates_output_dir_before_extracting() {
        let server = MockServer::start().await;
        mount_component(&server, "GPS", issues(&[])).await;

        let dir = tempdir().unwrap();
        let out_dir = dir.path().join("nested").join("out");
        let client = test_client(&server);
        let runner = BatchRunner::new(ExtractionPipeline::new(IssueFetcher::new(
            &client,
            FieldMap::default(),
            100,
        )));

        let batch = runner
            .run_all("SPRLL", &ComponentSelection::single("GPS").unwrap(), &out_dir)
            .await
            .unwrap();

        assert!(out_dir.is_dir());
        let gps = batch.get("GPS").unwrap().as_ref().unwrap();
        assert!(gps.is_empty());
        assert!(gps.output_path.exists());
    }

    #[tokio::test]
    async fn test_colliding_file_names_do_not_overwrite() {
        let server = MockServer::start().await;
        mount_component(&server, "I/O", issues(&["SPRLL-5"])).await;

        let dir = tempdir().unwrap();
        let client = test_client(&server);
        let runner = BatchRunner::new(ExtractionPipeline::new(IssueFetcher::new(
            &client,
            FieldMap::default(),
            100,
        )));

        let selection = ComponentSelection::new(["I/O", "I O"]).unwrap();
        let batch = runner.run_all("SPRLL", &selection, dir.path()).await.unwrap();

        assert!(batch.get("I/O").unwrap().is_ok());
        match batch.get("I O") {
            Some(Err(ExtractError::OutputCollision { other, .. })) => assert_eq!(other, "I/O"),
            other => panic!("expected collision, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_invalid_project_rejected_before_any_work() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let dir = tempdir().unwrap();
        let out_dir = dir.path().join("output");
        let client = test_client(&server);
        let runner = BatchRunner::new(ExtractionPipeline::new(IssueFetcher::new(
            &client,
            FieldMap::default(),
            100,
        )));

        let selection = ComponentSelection::new(["Battery", "Camera"]).unwrap();
        let err = runner
            .run_all("SP RLL", &selection, &out_dir)
            .await
            .unwrap_err();

        assert!(matches!(err, ExtractError::Query(_)));
        assert!(!out_dir.exists());
    }

    #[tokio::test]
    async fn test_unreachable_server_is_transport_failure() {
        let dir = tempdir().unwrap();
        let cred = Credential::new("tok").unwrap();
        let client = JiraClient::new("http://127.0.0.1:9", &cred, Duration::from_secs(5)).unwrap();
        let runner = BatchRunner::new(ExtractionPipeline::new(IssueFetcher::new(
            &client,
            FieldMap::default(),
            100,
        )));

        let selection = ComponentSelection::new(["Battery", "Camera"]).unwrap();
        let batch = runner.run_all("SPRLL", &selection, dir.path()).await.unwrap();

        assert_eq!(batch.failed().count(), 2);
        for (name, err) in batch.failed() {
            assert!(matches!(err, ExtractError::Fetch(ApiError::Network(_))), "{}", name);
            assert_eq!(err.kind(), "transport");
        }
        assert!(!dir.path().join("sprll_battery_issues.csv").exists());
        assert!(!dir.path().join("sprll_camera_issues.csv").exists());
    }

    #[tokio::test]
    async fn test_timed_out_component_does_not_stop_siblings() {
        let server = MockServer::start().await;
        mount_component(&server, "Battery", issues(&["SPRLL-1"])).await;
        mount_component(
            &server,
            "Camera",
            issues(&["SPRLL-2"]).set_delay(Duration::from_secs(3)),
        )
        .await;

        let dir = tempdir().unwrap();
        let cred = Credential::new("tok").unwrap();
        let client = JiraClient::new(&server.uri(), &cred, Duration::from_millis(500)).unwrap();
        let runner = BatchRunner::new(ExtractionPipeline::new(IssueFetcher::new(
            &client,
            FieldMap::default(),
            100,
        )));

        let selection = ComponentSelection::new(["Battery", "Camera"]).unwrap();
        let batch = runner.run_all("SPRLL", &selection, dir.path()).await.unwrap();

        let battery = batch.get("Battery").unwrap().as_ref().unwrap();
        assert_eq!(battery.records[0].key, "SPRLL-1");
        assert!(battery.output_path.exists());

        let camera = batch.get("Camera").unwrap().as_ref().unwrap_err();
        assert!(matches!(camera, ExtractError::Fetch(ApiError::Network(_))));
        assert_eq!(camera.kind(), "transport");
        assert!(!dir.path().join("sprll_camera_issues.csv").exists());
    }
}
