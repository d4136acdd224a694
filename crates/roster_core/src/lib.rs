//! # roster_core - Deterministic Greedy Team Assembly
//!
//! Picks a team from a static member catalog under per-stat floors and a
//! short list of mandatory starters, trying to cover every role while keeping
//! shared weaknesses low.
//!
//! ## Features
//! - Lazy, memoized catalog loading from CSV or a compressed binary cache
//! - Pure role classifier (Physical Sweeper, Special Sweeper, Tank, Support)
//! - Greedy assembly: role coverage, zero-overlap fill, overlap-tolerant backfill
//! - Same request and catalog always give the same ordered team
//! - JSON API for easy integration

pub mod api;
pub mod assembler;
pub mod data;
pub mod error;
pub mod format;
pub mod models;

#[cfg(test)]
pub(crate) mod test_fixtures;

// Re-export main API functions
pub use api::{
    build_team, build_team_json, build_team_response, catalog_health, catalog_health_json,
    load_catalog, request_schema_json, ApiError, ApiResponse, BuildTeamResponse, CatalogHealth,
};
pub use assembler::{assemble, SelectionPass, TeamRequest, TeamResult};
pub use data::{Catalog, CatalogSource, CatalogStore};
pub use error::{Result, RosterError};
pub use format::{render_weaknesses, MemberRecord, TeamSummary};
pub use models::{classify, BaseStats, Member, Role, StatKind};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const SCHEMA_VERSION: u8 = 1;
