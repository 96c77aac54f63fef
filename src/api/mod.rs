mod handlers;
pub mod types;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::store::DataStore;

pub fn create_router(store: DataStore) -> Router {
    let api = Router::new()
        // Health & load status
        .route("/health", get(handlers::health))
        .route("/status", get(handlers::get_status))
        .route("/reload", post(handlers::reload))
        // Scenarios & features
        .route("/scenarios", get(handlers::list_scenarios))
        .route("/scenarios/{id}", get(handlers::get_scenario))
        .route("/features/{id}", get(handlers::get_feature))
        .route("/features/{id}/source", get(handlers::get_feature_source))
        // Step definitions
        .route("/steps", get(handlers::list_steps))
        // Organizations
        .route("/organizations", get(handlers::list_organizations))
        .route("/organizations/clone-candidates", get(handlers::list_clone_candidates))
        .route("/organizations/partition", post(handlers::partition_organizations))
        .route("/organizations/{id}", get(handlers::get_organization))
        // Owners & teams
        .route("/owners/{name}", get(handlers::get_owner))
        .route("/teams/{name}", get(handlers::get_team))
        // Dashboard
        .route("/dashboard", get(handlers::get_dashboard));

    Router::new()
        .nest("/api/v1", api)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(store)
}
