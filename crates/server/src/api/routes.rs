use axum::{
    middleware,
    routing::{delete, get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use super::{cache, handlers, middleware::metrics_middleware, pokemon};
use crate::state::AppState;

pub fn create_router(state: Arc<AppState>) -> Router {
    let cors_allow_any = state.config().server.cors_allow_any;

    // API routes
    let api_routes = Router::new()
        // Health and config
        .route("/health", get(handlers::health))
        .route("/config", get(handlers::get_config))
        // Catalog
        .route(
            "/pokemon",
            get(pokemon::list_pokemon).post(pokemon::create_pokemon),
        )
        .route("/pokemon/draft", post(pokemon::create_from_draft))
        .route("/pokemon/search", get(pokemon::search_by_name))
        .route("/pokemon/by-type", get(pokemon::search_by_type))
        .route("/pokemon/types", get(pokemon::list_types))
        .route("/pokemon/browse", get(pokemon::browse))
        .route("/pokemon/{slug}", get(pokemon::get_pokemon))
        // Query cache
        .route("/cache/stats", get(cache::get_stats))
        .route("/cache", delete(cache::clear_cache));

    let router = Router::new()
        .route("/metrics", get(handlers::metrics))
        .nest("/api/v1", api_routes)
        .layer(middleware::from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    if cors_allow_any {
        router.layer(CorsLayer::permissive())
    } else {
        router
    }
}
