//! Lazily-built, process-wide location index.
//!
//! The loader runs at most once. Callers that arrive while it is running
//! block on the same initialization instead of starting their own. A loader
//! error is logged and replaced by an empty index, so every later lookup is a
//! miss rather than a failure.

use crate::index::reader::LocationIndex;
use crate::index::types::IndexConfig;
use anyhow::Result;
use std::path::PathBuf;
use std::sync::OnceLock;
use tracing::{info, warn};

type Loader = Box<dyn Fn() -> Result<LocationIndex> + Send + Sync>;

pub struct SharedIndex {
    cell: OnceLock<LocationIndex>,
    loader: Loader,
    config: IndexConfig,
}

impl SharedIndex {
    /// Wrap a loader; it is not called until the first [`get`](Self::get)
    pub fn new<F>(config: IndexConfig, loader: F) -> Self
    where
        F: Fn() -> Result<LocationIndex> + Send + Sync + 'static,
    {
        Self {
            cell: OnceLock::new(),
            loader: Box::new(loader),
            config,
        }
    }

    /// Index loaded from a CSV file on first access
    pub fn from_csv(path: impl Into<PathBuf>, config: IndexConfig) -> Self {
        let path = path.into();
        let loader_config = config.clone();
        Self::new(config, move || LocationIndex::open(&path, &loader_config))
    }

    /// Wrap an index that is already built
    pub fn ready(index: LocationIndex) -> Self {
        let config = index.config().clone();
        let shared = Self::new(config, || Ok(LocationIndex::default()));
        // A fresh cell cannot already be set
        let _ = shared.cell.set(index);
        shared
    }

    /// The index, building it first if needed
    pub fn get(&self) -> &LocationIndex {
        self.cell.get_or_init(|| match (self.loader)() {
            Ok(index) => {
                info!(records = index.len(), "location index ready");
                index
            }
            Err(err) => {
                warn!(error = %format!("{:#}", err), "location index unavailable, serving empty index");
                LocationIndex::empty_with_config(&self.config)
            }
        })
    }

    pub fn is_loaded(&self) -> bool {
        self.cell.get().is_some()
    }
}
