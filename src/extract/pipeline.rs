//! One extraction: query, fetch, normalize, write CSV.

use std::path::Path;

use tracing::{error, info, instrument};

use super::error::ExtractError;
use super::fetcher::IssueFetcher;
use super::query::{build, ComponentSelection, Query};
use super::record::{ExtractionResult, IssueRecord};

/// Runs a single query end to end and persists the rows.
#[derive(Debug)]
pub struct ExtractionPipeline<'a> {
    fetcher: IssueFetcher<'a>,
}

impl<'a> ExtractionPipeline<'a> {
    pub fn new(fetcher: IssueFetcher<'a>) -> Self {
        Self { fetcher }
    }

    /// Extract the issues for `components` in `project` into `output_path`.
    ///
    /// A failed fetch writes nothing. A failed write returns
    /// [`ExtractError::Write`] carrying the fetched rows.
    pub async fn run(
        &self,
        project: &str,
        components: &ComponentSelection,
        output_path: &Path,
    ) -> Result<ExtractionResult, ExtractError> {
        let query = build(project, components)?;
        self.run_query(query, output_path).await
    }

    /// Extract the issues for an already built query.
    #[instrument(skip(self, query), fields(jql = %query, output = %output_path.display()))]
    pub async fn run_query(
        &self,
        query: Query,
        output_path: &Path,
    ) -> Result<ExtractionResult, ExtractError> {
        let fetched = self.fetcher.fetch(&query).await.map_err(|e| {
            error!("API request failed: {}", e);
            ExtractError::Fetch(e)
        })?;

        let result = ExtractionResult {
            query,
            output_path: output_path.to_path_buf(),
            records: fetched.records,
            total_available: fetched.total_available,
        };

        if let Err(source) = write_csv(output_path, &result.records) {
            error!("Failed to write {}: {}", output_path.display(), source);
            return Err(ExtractError::Write {
                path: output_path.to_path_buf(),
                source,
                result: Box::new(result),
            });
        }

        info!(records = result.len(), "Data saved to {}", output_path.display());
        Ok(result)
    }
}

/// Write rows as UTF-8 CSV with a header row, even when there are no rows.
pub fn write_csv(path: &Path, records: &[IssueRecord]) -> Result<(), csv::Error> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(IssueRecord::HEADERS)?;
    for record in records {
        writer.write_record(record.as_row())?;
    }
    writer.flush()?;
    Ok(())
}
