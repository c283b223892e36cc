use std::sync::Arc;

use tokio::sync::OnceCell;
use tracing::{info, warn};

use crate::feature::GeoCollection;
use crate::graticule::placeholder_collection;
use crate::source::GeographySource;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GeographyOrigin {
    /// Loaded from the named source.
    Source(String),
    /// Every source failed; synthetic sphere + graticule.
    Placeholder,
}

/// Loaded geography, shared read-only by every view.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedGeography {
    pub collection: GeoCollection,
    pub origin: GeographyOrigin,
}

impl LoadedGeography {
    pub fn is_placeholder(&self) -> bool {
        self.origin == GeographyOrigin::Placeholder
    }
}

/// Runs the source fallback chain at most once and caches the result.
///
/// Sources are tried one after another in the given order, each exactly once,
/// with no retry. When all of them fail the placeholder geography is used, so
/// loading itself never fails.
pub struct GeographyStore {
    sources: Vec<Arc<dyn GeographySource>>,
    cell: OnceCell<Arc<LoadedGeography>>,
}

impl GeographyStore {
    pub fn new(sources: Vec<Arc<dyn GeographySource>>) -> Self {
        Self {
            sources,
            cell: OnceCell::new(),
        }
    }


    /// Loads (or returns the cached) geography.
    pub async fn load(&self) -> Arc<LoadedGeography> {
        self.cell
            .get_or_init(|| self.run_chain())
            .await
            .clone()
    }

    /// The cached geography, if loading already finished.
    pub fn cached(&self) -> Option<Arc<LoadedGeography>> {
        self.cell.get().cloned()
    }

    async fn run_chain(&self) -> Arc<LoadedGeography> {
        for source in &self.sources {
            match source.fetch().await {
                Ok(collection) => {
                    info!(
                        source = source.name(),
                        features = collection.len(),
                        "geography loaded"
                    );
                    return Arc::new(LoadedGeography {
                        collection,
                        origin: GeographyOrigin::Source(source.name().to_string()),
                    });
                }
                Err(e) => {
                    warn!(source = source.name(), error = %e, "geography source failed");
                }
            }
        }

        info!("all geography sources failed; using sphere and graticule placeholder");
        Arc::new(LoadedGeography {
            collection: placeholder_collection(),
            origin: GeographyOrigin::Placeholder,
        })
    }
}
