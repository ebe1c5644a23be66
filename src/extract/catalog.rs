//! Resolving the list of components a project offers.

use tracing::{info, instrument, warn};

use crate::api::JiraClient;

/// Used when the server's component list cannot be retrieved.
pub const FALLBACK_COMPONENTS: [&str; 20] = [
    "Display",
    "Touch panel",
    "Battery",
    "Enclosure",
    "Antenna",
    "Camera",
    "Scanner",
    "Audio",
    "Keypad",
    "USB",
    "WiFi",
    "Bluetooth",
    "GPS",
    "Sensor",
    "Power",
    "Memory",
    "Processor",
    "I/O",
    "Charging",
    "Accessories",
];

/// Where a catalog's names came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogSource {
    /// Retrieved from the server.
    Live,
    /// The server lookup failed; the static list was substituted.
    Fallback { reason: String },
}

/// Component names available for selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    pub names: Vec<String>,
    pub source: CatalogSource,
}

impl Catalog {
    /// The static fallback catalog.
    pub fn fallback(reason: impl Into<String>) -> Self {
        Self {
            names: FALLBACK_COMPONENTS.iter().map(|s| s.to_string()).collect(),
            source: CatalogSource::Fallback {
                reason: reason.into(),
            },
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self.source, CatalogSource::Fallback { .. })
    }
}

/// Fetch the project's components, substituting the static list on any failure.
///
/// Never fails; check [`Catalog::source`] to see whether the list is live.
#[instrument(skip(client))]
pub async fn resolve(client: &JiraClient, project: &str) -> Catalog {
    match client.project_components(project).await {
        Ok(components) => {
            info!(count = components.len(), "Loaded component catalog");
            Catalog {
                names: components.into_iter().map(|c| c.name).collect(),
                source: CatalogSource::Live,
            }
        }
        Err(e) => {
            warn!("Failed to get components, using fallback list: {}", e);
            Catalog::fallback(e.to_string())
        }
    }
}
