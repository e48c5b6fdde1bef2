//! Query cache API handlers.

use std::sync::Arc;

use axum::{extract::State, Json};
use serde::Serialize;
use pokedex_core::CacheStats;
use tracing::info;

use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct ClearCacheResponse {
    pub dropped: usize,
}

/// GET /api/v1/cache/stats
pub async fn get_stats(State(state): State<Arc<AppState>>) -> Json<CacheStats> {
    Json(state.service().cache_stats())
}

/// DELETE /api/v1/cache
///
/// Drop every cached query result.
pub async fn clear_cache(State(state): State<Arc<AppState>>) -> Json<ClearCacheResponse> {
    let dropped = state.service().invalidate_cache();
    info!(dropped, "Query cache cleared via API");
    Json(ClearCacheResponse { dropped })
}
