//! Catalog Builder Library
//!
//! CSV → Catalog → MessagePack → LZ4 → SHA256 checksum
//!
//! The resulting `.msgpack.lz4` file can be pointed at with
//! `ROSTER_CATALOG_PATH` and is decoded by `roster_core::CatalogStore`.

use anyhow::{Context, Result};
use roster_core::Catalog;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fs;
use std::path::Path;
use tracing::info;

/// Cache metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheMetadata {
    /// Schema version (e.g. "v1")
    pub schema_version: String,
    /// SHA256 checksum of the written file (hex)
    pub checksum: String,
    /// Creation time (RFC3339)
    pub created_at: String,
    pub member_count: usize,
    /// MessagePack size before compression (bytes)
    pub original_size: u64,
    /// Size on disk (bytes)
    pub compressed_size: u64,
    /// compressed / original
    pub compression_ratio: f64,
}

/// Parse a catalog CSV and write it as an LZ4-compressed MessagePack cache.
///
/// # Arguments
///
/// * `csv_path` - Source CSV
/// * `output_msgpack_lz4` - Output cache path
/// * `schema_version` - Version tag stored in the cache
///
/// # Returns
///
/// Metadata of the written cache
pub fn build_catalog_cache(
    csv_path: &Path,
    output_msgpack_lz4: &Path,
    schema_version: &str,
) -> Result<CacheMetadata> {
    // 1. CSV → Catalog (roles and totals derived here)
    let (mut catalog, stats) = Catalog::from_csv_path(csv_path)
        .with_context(|| format!("Failed to parse catalog CSV: {}", csv_path.display()))?;
    catalog.schema_version = schema_version.to_string();

    info!(
        "Parsed {} members ({} rows, {} duplicates, {} computed totals)",
        catalog.len(),
        stats.total_rows,
        stats.duplicates,
        stats.computed_totals
    );

    // 2. MessagePack
    let msgpack_bytes = catalog.to_msgpack().context("Failed to serialize catalog")?;
    let original_size = msgpack_bytes.len() as u64;

    // 3. LZ4 (size-prepended)
    let compressed = lz4_flex::compress_prepend_size(&msgpack_bytes);
    let compressed_size = compressed.len() as u64;

    // 4. Checksum
    let checksum = sha256_hex(&compressed);

    // 5. Write
    if let Some(parent) = output_msgpack_lz4.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create output directory: {}", parent.display()))?;
    }

    fs::write(output_msgpack_lz4, &compressed).with_context(|| {
        format!("Failed to write output file: {}", output_msgpack_lz4.display())
    })?;

    let compression_ratio =
        if original_size == 0 { 1.0 } else { compressed_size as f64 / original_size as f64 };

    info!(
        "Cache built: {} → {} (ratio: {:.2}%)",
        human_bytes(original_size),
        human_bytes(compressed_size),
        compression_ratio * 100.0
    );

    Ok(CacheMetadata {
        schema_version: schema_version.to_string(),
        checksum,
        created_at: chrono::Utc::now().to_rfc3339(),
        member_count: catalog.len(),
        original_size,
        compressed_size,
        compression_ratio,
    })
}

/// Check a cache file against an expected SHA256 checksum.
pub fn verify_cache(cache_file: &Path, expected_checksum: &str) -> Result<bool> {
    let bytes = fs::read(cache_file)
        .with_context(|| format!("Failed to read cache file: {}", cache_file.display()))?;

    Ok(sha256_hex(&bytes) == expected_checksum.trim().to_ascii_lowercase())
}

/// Decode a cache file back into a catalog.
pub fn load_catalog_cache(cache_file: &Path) -> Result<Catalog> {
    Catalog::from_cache_path(cache_file)
        .with_context(|| format!("Failed to load catalog cache: {}", cache_file.display()))
}

fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    format!("{:x}", hasher.finalize())
}

pub fn human_bytes(bytes: u64) -> String {
    const UNITS: &[&str] = &["B", "KB", "MB", "GB"];
    let mut size = bytes as f64;
    let mut unit_idx = 0;

    while size >= 1024.0 && unit_idx < UNITS.len() - 1 {
        size /= 1024.0;
        unit_idx += 1;
    }

    format!("{:.2} {}", size, UNITS[unit_idx])
}
