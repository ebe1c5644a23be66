//! The extraction pipeline.
//!
//! Builds JQL from a project and component selection, fetches one bounded page
//! of issues, normalizes the text fields and writes them as CSV. The batch
//! runner repeats this per component.

pub mod batch;
pub mod catalog;
pub mod error;
pub mod fetcher;
pub mod filename;
pub mod normalize;
pub mod pipeline;
pub mod query;
pub mod record;

pub use batch::{BatchResult, BatchRunner};
pub use catalog::{Catalog, CatalogSource};
pub use error::{ExtractError, QueryError};
pub use fetcher::{FieldMap, IssueFetcher};
pub use pipeline::ExtractionPipeline;
pub use query::{ComponentSelection, Query};
pub use record::{ExtractionResult, IssueRecord};
