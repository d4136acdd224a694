//! Catalog store: resolves the catalog source and loads it once.
//!
//! Source path resolution:
//! 1) `ROSTER_CATALOG_PATH` if set
//! 2) `data/pokemon_clean.csv` (relative)
//!
//! Paths ending in `.lz4` or `.msgpack` are read as binary caches built by
//! `catalog_builder`; anything else is parsed as CSV.

use once_cell::sync::OnceCell;
use std::env;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;

use super::catalog::Catalog;
use crate::error::Result;

/// Env var overriding the catalog source path.
pub const CATALOG_PATH_ENV: &str = "ROSTER_CATALOG_PATH";

/// Default relative path used when `ROSTER_CATALOG_PATH` is not set.
pub const DEFAULT_CATALOG_REL_PATH: &str = "data/pokemon_clean.csv";

/// Where a catalog comes from.
#[derive(Debug, Clone)]
pub enum CatalogSource {
    Csv(PathBuf),
    Cache(PathBuf),
    /// Already materialized (tests, embedding callers)
    Preloaded(Arc<Catalog>),
}

impl CatalogSource {
    /// Pick the reader from the file extension.
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let is_cache = matches!(
            path.extension().and_then(|e| e.to_str()).map(str::to_ascii_lowercase).as_deref(),
            Some("lz4") | Some("msgpack")
        );
        if is_cache {
            CatalogSource::Cache(path)
        } else {
            CatalogSource::Csv(path)
        }
    }

    /// Resolve from `ROSTER_CATALOG_PATH`, falling back to the default path.
    pub fn from_env() -> Self {
        Self::from_path(resolve_catalog_path())
    }

    pub fn path(&self) -> Option<&Path> {
        match self {
            CatalogSource::Csv(path) | CatalogSource::Cache(path) => Some(path),
            CatalogSource::Preloaded(_) => None,
        }
    }

    fn read(&self) -> Result<Arc<Catalog>> {
        match self {
            CatalogSource::Csv(path) => {
                let (catalog, stats) = Catalog::from_csv_path(path)?;
                info!(
                    "Loaded catalog from CSV '{}': {} members ({} rows, {} duplicates)",
                    path.display(),
                    catalog.len(),
                    stats.total_rows,
                    stats.duplicates
                );
                Ok(Arc::new(catalog))
            }
            CatalogSource::Cache(path) => {
                let catalog = Catalog::from_cache_path(path)?;
                info!(
                    "Loaded catalog cache '{}': {} members (schema {})",
                    path.display(),
                    catalog.len(),
                    catalog.schema_version
                );
                Ok(Arc::new(catalog))
            }
            CatalogSource::Preloaded(catalog) => Ok(Arc::clone(catalog)),
        }
    }
}

/// Path from `ROSTER_CATALOG_PATH`, or the default relative path.
pub fn resolve_catalog_path() -> PathBuf {
    if let Ok(path) = env::var(CATALOG_PATH_ENV) {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return PathBuf::from(trimmed);
        }
    }
    PathBuf::from(DEFAULT_CATALOG_REL_PATH)
}

/// Lazily loaded, memoized catalog.
///
/// Construct one per process and pass it by reference. The first
/// [`CatalogStore::load`] reads the source; every later call returns the same
/// `Arc`. Concurrent first calls are serialized by the cell, so the source is
/// read at most once on success. A failed load leaves the cell empty.
#[derive(Debug)]
pub struct CatalogStore {
    source: CatalogSource,
    cell: OnceCell<Arc<Catalog>>,
}

impl CatalogStore {
    pub fn new(source: CatalogSource) -> Self {
        Self { source, cell: OnceCell::new() }
    }

    pub fn from_env() -> Self {
        Self::new(CatalogSource::from_env())
    }

    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        Self::new(CatalogSource::from_path(path))
    }

    /// Store around an already built catalog.
    pub fn preloaded(catalog: Catalog) -> Self {
        let catalog = Arc::new(catalog);
        let cell = OnceCell::new();
        let _ = cell.set(Arc::clone(&catalog));
        Self { source: CatalogSource::Preloaded(catalog), cell }
    }

    pub fn source(&self) -> &CatalogSource {
        &self.source
    }

    /// Load (or return cached) catalog.
    pub fn load(&self) -> Result<Arc<Catalog>> {
        self.cell.get_or_try_init(|| self.source.read()).map(Arc::clone)
    }

    pub fn is_loaded(&self) -> bool {
        self.cell.get().is_some()
    }

    /// Cached catalog without triggering a load.
    pub fn get(&self) -> Option<Arc<Catalog>> {
        self.cell.get().cloned()
    }
}

impl Default for CatalogStore {
    fn default() -> Self {
        Self::from_env()
    }
}
