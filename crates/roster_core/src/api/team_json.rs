//! Team building and catalog health over JSON strings.

use serde::{Deserialize, Serialize};
use serde_json::error::Category;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{error, info, warn};

use super::{ApiError, ApiResponse};
use crate::assembler::{assemble, TeamRequest};
use crate::data::{Catalog, CatalogStore};
use crate::error::Result;
use crate::format::{member_records, MemberRecord, TeamSummary};
use crate::models::Role;

/// Team building response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildTeamResponse {
    pub team: Vec<MemberRecord>,
    pub summary: TeamSummary,
}

/// Catalog health report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogHealth {
    pub schema_version: String,
    pub member_count: usize,
    pub role_counts: BTreeMap<Role, usize>,
    /// Source path, absent for preloaded catalogs
    pub source: Option<String>,
}

/// Load (or return the already loaded) catalog.
pub fn load_catalog(store: &CatalogStore) -> Result<Arc<Catalog>> {
    store.load()
}

/// Assemble a team and return it as ordered member records.
pub fn build_team(catalog: &Catalog, request: &TeamRequest) -> Result<Vec<MemberRecord>> {
    let team = assemble(catalog, request)?;
    Ok(member_records(&team))
}

/// Assemble a team and return the records with a summary.
pub fn build_team_response(catalog: &Catalog, request: &TeamRequest) -> Result<BuildTeamResponse> {
    let team = assemble(catalog, request)?;
    Ok(BuildTeamResponse { team: member_records(&team), summary: TeamSummary::from_team(&team) })
}

/// Build a team from a JSON request string
///
/// # Arguments
/// * `store` - Catalog store, loaded on first use
/// * `request_json` - JSON string containing a TeamRequest
///
/// # Returns
/// JSON string containing ApiResponse<BuildTeamResponse>
pub fn build_team_json(store: &CatalogStore, request_json: &str) -> String {
    info!("Processing team build request");

    let request: TeamRequest = match serde_json::from_str(request_json) {
        Ok(req) => req,
        Err(e) => {
            // Well-formed JSON with bad values (unknown role, wrong type) is a request problem
            let error = match e.classify() {
                Category::Data => {
                    warn!("TeamRequest rejected: {}", e);
                    ApiError::new("INVALID_REQUEST", &format!("Invalid request: {}", e))
                }
                _ => {
                    error!("Failed to parse TeamRequest: {}", e);
                    ApiError::new("INVALID_JSON", &format!("Invalid JSON format: {}", e))
                }
            };
            return ApiResponse::<BuildTeamResponse>::error(error).to_json();
        }
    };

    let catalog = match store.load() {
        Ok(catalog) => catalog,
        Err(e) => {
            error!("Catalog load failed: {}", e);
            return ApiResponse::<BuildTeamResponse>::error(ApiError::from(&e)).to_json();
        }
    };

    match build_team_response(&catalog, &request) {
        Ok(response_data) => {
            info!(
                "Built team of {}: {}",
                response_data.team.len(),
                response_data.team.iter().map(|m| m.name.as_str()).collect::<Vec<_>>().join(", ")
            );
            ApiResponse::success(response_data).to_json()
        }
        Err(e) => {
            warn!("Team request rejected: {}", e);
            ApiResponse::<BuildTeamResponse>::error(ApiError::from(&e)).to_json()
        }
    }
}

/// Load the catalog and report its size and role mix.
pub fn catalog_health(store: &CatalogStore) -> Result<CatalogHealth> {
    let catalog = store.load()?;
    Ok(CatalogHealth {
        schema_version: catalog.schema_version.clone(),
        member_count: catalog.len(),
        role_counts: catalog.role_counts(),
        source: store.source().path().map(|p| p.display().to_string()),
    })
}

pub fn catalog_health_json(store: &CatalogStore) -> String {
    match catalog_health(store) {
        Ok(health) => ApiResponse::success(health).to_json(),
        Err(e) => {
            error!("Catalog health check failed: {}", e);
            ApiResponse::<CatalogHealth>::error(ApiError::from(&e)).to_json()
        }
    }
}

/// JSON Schema of the team request payload.
pub fn request_schema_json() -> String {
    let schema = schemars::schema_for!(TeamRequest);
    serde_json::to_string_pretty(&schema).unwrap_or_else(|_| "{}".to_string())
}
