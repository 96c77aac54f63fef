use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use super::types::*;
use crate::clones;
use crate::dashboard::{self, DashboardReport};
use crate::models::StepDefinition;
use crate::provider::{DataProvider, ProviderError};
use crate::store::{Catalog, DataStore, LoadError, OrganizationRow, ScenarioRow, StoreStatus};

type ApiResult<T> = Result<Json<T>, (StatusCode, String)>;

// ============================================================
// Error Handling
// ============================================================

/// Map a failed load to a status code. The message is the error's own.
fn load_error(e: LoadError) -> (StatusCode, String) {
    let status = match &e {
        LoadError::Config(_) => StatusCode::BAD_REQUEST,
        LoadError::RepoNotFound { .. } => StatusCode::NOT_FOUND,
        LoadError::Provider(_) => StatusCode::BAD_GATEWAY,
        LoadError::Cancelled | LoadError::Superseded { .. } => StatusCode::CONFLICT,
    };

    if status == StatusCode::CONFLICT {
        tracing::debug!("Reload abandoned: {}", e);
    } else {
        tracing::warn!("Reload failed: {}", e);
    }
    (status, e.to_string())
}

fn provider_error(e: ProviderError) -> (StatusCode, String) {
    tracing::warn!("Provider read failed: {}", e);
    (StatusCode::BAD_GATEWAY, e.message)
}

fn not_found(kind: &str) -> (StatusCode, String) {
    (StatusCode::NOT_FOUND, format!("{kind} not found"))
}

/// The current snapshot, or 503 while nothing has been loaded.
fn loaded(store: &DataStore) -> Result<Arc<Catalog>, (StatusCode, String)> {
    if !store.is_loaded() {
        return Err((
            StatusCode::SERVICE_UNAVAILABLE,
            "Data not loaded".to_string(),
        ));
    }
    Ok(store.snapshot())
}

// ============================================================
// Health & Status
// ============================================================

pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

pub async fn get_status(State(store): State<DataStore>) -> Json<StoreStatus> {
    Json(store.status())
}

pub async fn reload(State(store): State<DataStore>) -> ApiResult<StoreStatus> {
    store.reload().await.map_err(load_error)?;
    Ok(Json(store.status()))
}

// ============================================================
// Scenarios & Features
// ============================================================

pub async fn list_scenarios(State(store): State<DataStore>) -> ApiResult<Vec<ScenarioRow>> {
    let catalog = loaded(&store)?;
    Ok(Json(catalog.scenario_rows()))
}

pub async fn get_scenario(
    State(store): State<DataStore>,
    Path(id): Path<String>,
) -> ApiResult<ScenarioDetail> {
    let catalog = loaded(&store)?;
    catalog
        .find_scenario(&id)
        .map(|s| Json(ScenarioDetail::from(&s)))
        .ok_or_else(|| not_found("Scenario"))
}

pub async fn get_feature(
    State(store): State<DataStore>,
    Path(id): Path<String>,
) -> ApiResult<FeatureDetail> {
    let catalog = loaded(&store)?;
    catalog
        .find_feature(&id)
        .map(|f| Json(FeatureDetail::from(&f)))
        .ok_or_else(|| not_found("Feature"))
}

pub async fn get_feature_source(
    State(store): State<DataStore>,
    Path(id): Path<String>,
    Query(query): Query<SourceQuery>,
) -> ApiResult<FeatureSource> {
    let (file_path, scenario_name) = {
        let catalog = loaded(&store)?;
        let feature = catalog.find_feature(&id).ok_or_else(|| not_found("Feature"))?;
        let scenario_name = match &query.scenario {
            Some(scenario_id) => Some(
                feature
                    .scenarios()
                    .find(|s| s.id == *scenario_id)
                    .map(|s| s.name.clone())
                    .ok_or_else(|| not_found("Scenario"))?,
            ),
            None => None,
        };
        (feature.file_path.clone(), scenario_name)
    };

    let contents = store
        .provider()
        .read_source(&file_path, scenario_name.as_deref())
        .await
        .map_err(provider_error)?;

    Ok(Json(FeatureSource {
        feature_id: id,
        scenario_id: query.scenario,
        file_path,
        contents,
    }))
}

// ============================================================
// Step Definitions
// ============================================================

/// Step definitions of the repository at the store's base path. Does not need
/// a loaded catalog.
pub async fn list_steps(
    State(store): State<DataStore>,
    Query(query): Query<StepsQuery>,
) -> ApiResult<Vec<StepDefinition>> {
    let base_path = store
        .base_path()
        .ok_or_else(|| (StatusCode::BAD_REQUEST, "base path not found".to_string()))?;

    let steps = store
        .provider()
        .load_step_definitions(&base_path)
        .await
        .map_err(provider_error)?;

    Ok(Json(steps.into_iter().filter(|s| query.matches(s)).collect()))
}

// ============================================================
// Organizations, Owners & Teams
// ============================================================

pub async fn list_organizations(
    State(store): State<DataStore>,
) -> ApiResult<OrganizationsResponse> {
    let catalog = loaded(&store)?;
    Ok(Json(OrganizationsResponse::from(catalog.as_ref())))
}

pub async fn list_clone_candidates(
    State(store): State<DataStore>,
) -> ApiResult<Vec<CloneCandidate>> {
    let catalog = loaded(&store)?;
    let candidates = clones::detector_input(&catalog)
        .into_iter()
        .map(|(id, name)| CloneCandidate { id, name })
        .collect();
    Ok(Json(candidates))
}

pub async fn partition_organizations(
    State(store): State<DataStore>,
    Json(input): Json<PartitionRequest>,
) -> ApiResult<PartitionResponse> {
    let catalog = loaded(&store)?;
    let partition = clones::partition(&catalog, &input.groups);

    Ok(Json(PartitionResponse {
        templates: partition
            .templates
            .iter()
            .map(OrganizationRow::from)
            .collect(),
        clones: partition.clones.iter().map(OrganizationRow::from).collect(),
    }))
}

pub async fn get_organization(
    State(store): State<DataStore>,
    Path(id): Path<String>,
) -> ApiResult<OrganizationDetail> {
    let catalog = loaded(&store)?;
    catalog
        .find_organization(&id)
        .map(|o| Json(OrganizationDetail::from(&o)))
        .ok_or_else(|| not_found("Organization"))
}

pub async fn get_owner(
    State(store): State<DataStore>,
    Path(name): Path<String>,
) -> ApiResult<OwnerDetail> {
    let catalog = loaded(&store)?;
    catalog
        .find_owner(&name)
        .map(|o| Json(OwnerDetail::from(&o)))
        .ok_or_else(|| not_found("Owner"))
}

pub async fn get_team(
    State(store): State<DataStore>,
    Path(name): Path<String>,
) -> ApiResult<TeamDetail> {
    let catalog = loaded(&store)?;
    catalog
        .find_team(&name)
        .map(|t| Json(TeamDetail::from(&t)))
        .ok_or_else(|| not_found("Team"))
}

// ============================================================
// Dashboard
// ============================================================

pub async fn get_dashboard(State(store): State<DataStore>) -> ApiResult<DashboardReport> {
    let catalog = loaded(&store)?;
    Ok(Json(dashboard::report(&catalog)))
}
