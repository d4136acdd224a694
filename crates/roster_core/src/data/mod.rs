//! Catalog data: CSV/cache parsing and the memoized store.

pub mod catalog;
pub mod store;

pub use catalog::{Catalog, ParseStats, CATALOG_SCHEMA_VERSION};
pub use store::{
    resolve_catalog_path, CatalogSource, CatalogStore, CATALOG_PATH_ENV, DEFAULT_CATALOG_REL_PATH,
};
