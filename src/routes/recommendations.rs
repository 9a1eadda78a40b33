use axum::{extract::State, Extension, Json};
use std::sync::Arc;

use crate::{
    error::AppResult,
    middleware::request_id::RequestId,
    models::{RecommendationRequest, RecommendationResponse},
    routes::AppState,
    services::recommendations,
};

/// Handler for recommendations endpoint
pub async fn recommend(
    State(state): State<Arc<AppState>>,
    Extension(request_id): Extension<RequestId>,
    Json(request): Json<RecommendationRequest>,
) -> AppResult<Json<RecommendationResponse>> {
    tracing::info!(
        request_id = %request_id,
        title = %request.title,
        count = ?request.count,
        show_details = request.show_details,
        "Processing recommendation request"
    );

    let response = recommendations::get_recommendations(
        &state.index,
        state.provider.as_deref(),
        &state.settings,
        request,
    )
    .await
    .inspect_err(|e| {
        tracing::info!(request_id = %request_id, error = %e, "Recommendation request rejected");
    })?;

    tracing::info!(
        request_id = %request_id,
        results = response.results.len(),
        "Recommendation request completed"
    );

    Ok(Json(response))
}
