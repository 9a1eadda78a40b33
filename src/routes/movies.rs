use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;
use std::sync::Arc;

use crate::{
    error::AppResult,
    models::{CatalogEntry, MovieLookup},
    routes::AppState,
    services::title_search,
};

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    q: Option<String>,
    limit: Option<usize>,
}

/// Handler for the movie selector listing
pub async fn list(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ListQuery>,
) -> Json<Vec<CatalogEntry>> {
    Json(title_search::search_titles(
        &state.index,
        params.q.as_deref(),
        params.limit,
    ))
}

/// Handler for a single catalog entry plus supplementary metadata
pub async fn get_movie(
    State(state): State<Arc<AppState>>,
    Path(external_id): Path<i64>,
) -> AppResult<Json<MovieLookup>> {
    let lookup = title_search::lookup_movie(&state.index, &state.metadata, external_id)?;
    Ok(Json(lookup))
}
