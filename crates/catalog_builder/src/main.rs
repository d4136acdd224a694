//! Catalog Builder CLI
//!
//! CSV → MessagePack+LZ4 catalog cache, plus team requests and health checks
//! against a catalog from the command line.

#[cfg(feature = "cli")]
use anyhow::{Context, Result};
#[cfg(feature = "cli")]
use clap::{Parser, Subcommand};
#[cfg(feature = "cli")]
use roster_core::{CatalogStore, Role, StatKind, TeamRequest};
#[cfg(feature = "cli")]
use std::path::{Path, PathBuf};
#[cfg(feature = "cli")]
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[cfg(feature = "cli")]
#[derive(Parser)]
#[command(name = "catalog_builder")]
#[command(about = "Build catalog caches and assemble teams", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[cfg(feature = "cli")]
#[derive(Subcommand)]
enum Commands {
    /// Build catalog cache from CSV file
    Build {
        /// Input CSV file path
        #[arg(long)]
        csv: PathBuf,

        /// Output MsgPack+LZ4 file path
        #[arg(long)]
        out: PathBuf,

        /// Schema version (e.g., "v1")
        #[arg(long, default_value = "v1")]
        schema_version: String,

        /// Verify cache after building
        #[arg(long, default_value = "false")]
        verify: bool,

        /// Output metadata JSON file
        #[arg(long)]
        metadata: Option<PathBuf>,
    },

    /// Assemble a team and print the JSON response
    Team {
        /// Catalog CSV or cache (defaults to ROSTER_CATALOG_PATH)
        #[arg(long)]
        catalog: Option<PathBuf>,

        /// Request JSON file; the flags below are ignored when set
        #[arg(long)]
        request: Option<PathBuf>,

        /// Starter names, comma separated
        #[arg(long, value_delimiter = ',')]
        starters: Vec<String>,

        #[arg(long, default_value_t = 0)]
        hp_floor: i32,

        #[arg(long, default_value_t = 0)]
        atk_floor: i32,

        #[arg(long, default_value_t = 0)]
        def_floor: i32,

        #[arg(long, default_value_t = 0)]
        spatk_floor: i32,

        #[arg(long, default_value_t = 0)]
        spdef_floor: i32,

        #[arg(long, default_value_t = 0)]
        spd_floor: i32,

        #[arg(long)]
        team_size: Option<i32>,

        /// Required roles, comma separated (e.g. "tank,support")
        #[arg(long, value_delimiter = ',')]
        roles: Vec<Role>,

        /// Pretty-print the response
        #[arg(long, default_value = "false")]
        pretty: bool,
    },

    /// Load the catalog and report member and role counts
    Health {
        #[arg(long)]
        catalog: Option<PathBuf>,
    },

    /// Print the team request JSON Schema
    Schema,
}

#[cfg(feature = "cli")]
fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG")
                .unwrap_or_else(|_| "catalog_builder=info,roster_core=info".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Build { csv, out, schema_version, verify, metadata } => {
            println!("🔨 Building catalog cache from CSV...");
            println!("   CSV Input: {}", csv.display());
            println!("   Output:    {}", out.display());
            println!("   Schema:    {}", schema_version);

            let meta = catalog_builder::build_catalog_cache(&csv, &out, &schema_version)?;

            print_metadata(&meta);

            if verify {
                verify_cache_integrity(&out, &meta.checksum)?;
            }

            if let Some(metadata_path) = metadata {
                save_metadata(&metadata_path, &meta)?;
            }
        }

        Commands::Team {
            catalog,
            request,
            starters,
            hp_floor,
            atk_floor,
            def_floor,
            spatk_floor,
            spdef_floor,
            spd_floor,
            team_size,
            roles,
            pretty,
        } => {
            let request_json = match request {
                Some(path) => std::fs::read_to_string(&path)
                    .with_context(|| format!("Failed to read request file: {}", path.display()))?,
                None => {
                    let mut request = TeamRequest::new()
                        .with_starters(starters)
                        .with_floor(StatKind::Hp, hp_floor)
                        .with_floor(StatKind::Attack, atk_floor)
                        .with_floor(StatKind::Defense, def_floor)
                        .with_floor(StatKind::SpecialAttack, spatk_floor)
                        .with_floor(StatKind::SpecialDefense, spdef_floor)
                        .with_floor(StatKind::Speed, spd_floor);
                    if let Some(size) = team_size {
                        request = request.with_team_size(size);
                    }
                    if !roles.is_empty() {
                        request = request.with_required_roles(roles);
                    }
                    serde_json::to_string(&request)?
                }
            };

            let store = open_store(catalog);
            let response = roster_core::build_team_json(&store, &request_json);
            print_response(&response, pretty)?;
        }

        Commands::Health { catalog } => {
            let store = open_store(catalog);
            let response = roster_core::catalog_health_json(&store);
            print_response(&response, true)?;
        }

        Commands::Schema => {
            println!("{}", roster_core::request_schema_json());
        }
    }

    Ok(())
}

#[cfg(feature = "cli")]
fn open_store(catalog: Option<PathBuf>) -> CatalogStore {
    match catalog {
        Some(path) => CatalogStore::from_path(path),
        None => CatalogStore::from_env(),
    }
}

/// Print an API response and fail the process if it reports an error.
#[cfg(feature = "cli")]
fn print_response(response: &str, pretty: bool) -> Result<()> {
    let value: serde_json::Value =
        serde_json::from_str(response).context("API returned invalid JSON")?;

    if pretty {
        println!("{}", serde_json::to_string_pretty(&value)?);
    } else {
        println!("{}", response);
    }

    if value["success"] == true {
        Ok(())
    } else {
        anyhow::bail!(
            "Request failed: {}",
            value["error"]["code"].as_str().unwrap_or("UNKNOWN")
        )
    }
}

#[cfg(feature = "cli")]
fn print_metadata(meta: &catalog_builder::CacheMetadata) {
    println!("\n✅ Cache built successfully!");
    println!("   Members:         {}", meta.member_count);
    println!(
        "   Original size:   {} ({})",
        meta.original_size,
        catalog_builder::human_bytes(meta.original_size)
    );
    println!(
        "   Compressed size: {} ({})",
        meta.compressed_size,
        catalog_builder::human_bytes(meta.compressed_size)
    );
    println!("   Compression:     {:.1}%", meta.compression_ratio * 100.0);
    println!("   Checksum:        {}", meta.checksum);
    println!("   Created:         {}", meta.created_at);
}

#[cfg(feature = "cli")]
fn verify_cache_integrity(cache_path: &Path, checksum: &str) -> Result<()> {
    println!("\n🔍 Verifying cache integrity...");
    let is_valid = catalog_builder::verify_cache(cache_path, checksum)?;

    if is_valid {
        println!("✅ Cache verification passed");
        Ok(())
    } else {
        anyhow::bail!("❌ Cache verification failed - checksum mismatch!")
    }
}

#[cfg(feature = "cli")]
fn save_metadata(path: &Path, meta: &catalog_builder::CacheMetadata) -> Result<()> {
    let metadata_json = serde_json::to_string_pretty(meta)?;
    std::fs::write(path, metadata_json)?;
    println!("\n📄 Metadata saved to: {}", path.display());
    Ok(())
}

#[cfg(not(feature = "cli"))]
fn main() {
    eprintln!("catalog_builder CLI is not available. Enable the 'cli' feature to use it.");
    std::process::exit(1);
}
