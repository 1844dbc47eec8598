//! Shared application state.

use std::sync::Arc;

use parking_lot::RwLock;
use remedy_core::RemedyConfig;
use remedy_infer::DiseaseOracle;
use remedy_runtime::{Catalog, Pipeline};
use tracing::info;

/// Shared application state accessible from all route handlers.
pub struct AppState {
    pub config: RemedyConfig,
    pub pipeline: Pipeline,
    catalog: RwLock<Arc<Catalog>>,
}

impl AppState {
    pub fn new(config: RemedyConfig, catalog: Catalog, oracle: Arc<dyn DiseaseOracle>) -> Self {
        let pipeline = Pipeline::new(config.matching, oracle);
        Self {
            config,
            pipeline,
            catalog: RwLock::new(Arc::new(catalog)),
        }
    }

    /// The currently published catalog. Requests keep their snapshot even if a reload lands.
    pub fn catalog(&self) -> Arc<Catalog> {
        self.catalog.read().clone()
    }

    /// Publish a new catalog, returning the one it replaced.
    pub fn swap_catalog(&self, catalog: Catalog) -> Arc<Catalog> {
        std::mem::replace(&mut *self.catalog.write(), Arc::new(catalog))
    }

    /// Rebuild the catalog from the data directory and publish it.
    /// On failure the current catalog stays in place.
    pub fn reload_catalog(&self) -> remedy_core::Result<Arc<Catalog>> {
        let fresh = Catalog::load(&self.config.data_paths)?;
        self.swap_catalog(fresh);
        info!("Catalog reloaded from {}", self.config.data_paths.root.display());
        Ok(self.catalog())
    }
}
