use axum::{
    extract::State,
    http::StatusCode,
    middleware,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    db::MetadataTable,
    middleware::request_id::{make_span_with_request_id, request_id_middleware},
    services::{providers::MetadataProvider, RecommendationSettings, SimilarityIndex},
};

pub mod movies;
pub mod recommendations;
pub mod ui;

/// Shared, read-only application state
///
/// Everything here is built once at startup and never mutated afterwards.
pub struct AppState {
    pub index: Arc<SimilarityIndex>,
    pub metadata: Arc<MetadataTable>,
    /// `None` when no metadata API key is configured
    pub provider: Option<Arc<dyn MetadataProvider>>,
    pub settings: RecommendationSettings,
}

/// Creates the application router with all routes
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(ui::index))
        .route("/health", get(health_check))
        .nest("/api/v1", api_routes())
        .layer(
            ServiceBuilder::new()
                .layer(middleware::from_fn(request_id_middleware))
                .layer(TraceLayer::new_for_http().make_span_with(make_span_with_request_id))
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

/// API routes under /api/v1
fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/movies", get(movies::list))
        .route("/movies/:external_id", get(movies::get_movie))
        .route("/recommendations", post(recommendations::recommend))
}

/// Health check endpoint
async fn health_check(State(state): State<Arc<AppState>>) -> (StatusCode, Json<Value>) {
    (
        StatusCode::OK,
        Json(json!({
            "status": "healthy",
            "movies": state.index.len(),
            "details_enabled": state.provider.is_some(),
        })),
    )
}
