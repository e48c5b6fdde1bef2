//! Prometheus metrics for observability.
//!
//! This module provides metrics for monitoring the Pokédex server:
//! - HTTP request metrics (latency, counts)
//! - Catalog size (collected dynamically)
//! - Core query cache and store metrics (registered from `pokedex_core`)

use once_cell::sync::Lazy;
use prometheus::{
    self, Encoder, HistogramOpts, HistogramVec, IntCounterVec, IntGauge, Opts, Registry,
    TextEncoder,
};
use tracing::warn;

/// Global metrics registry.
pub static REGISTRY: Lazy<Registry> = Lazy::new(|| {
    let registry = Registry::new();
    register_metrics(&registry);
    registry
});

// =============================================================================
// HTTP Request Metrics
// =============================================================================

/// HTTP request duration in seconds.
pub static HTTP_REQUEST_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    HistogramVec::new(
        HistogramOpts::new(
            "pokedex_http_request_duration_seconds",
            "HTTP request duration in seconds",
        )
        .buckets(vec![
            0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0,
        ]),
        &["method", "path", "status"],
    )
    .unwrap()
});

/// HTTP requests total count.
pub static HTTP_REQUESTS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("pokedex_http_requests_total", "Total HTTP requests"),
        &["method", "path", "status"],
    )
    .unwrap()
});

/// HTTP requests currently in flight.
pub static HTTP_REQUESTS_IN_FLIGHT: Lazy<IntGauge> = Lazy::new(|| {
    IntGauge::new(
        "pokedex_http_requests_in_flight",
        "Number of HTTP requests currently being processed",
    )
    .unwrap()
});

// =============================================================================
// Catalog Metrics (collected dynamically)
// =============================================================================

/// Stored catalog entries.
pub static CATALOG_ENTRIES: Lazy<IntGauge> = Lazy::new(|| {
    IntGauge::new("pokedex_catalog_entries", "Number of stored catalog entries").unwrap()
});

/// Results currently held by the query cache.
pub static CACHED_RESULTS: Lazy<IntGauge> = Lazy::new(|| {
    IntGauge::new(
        "pokedex_cached_results",
        "Number of query results held in the cache",
    )
    .unwrap()
});

// =============================================================================
// Registration
// =============================================================================

fn register_metrics(registry: &Registry) {
    // HTTP
    registry
        .register(Box::new(HTTP_REQUEST_DURATION.clone()))
        .unwrap();
    registry
        .register(Box::new(HTTP_REQUESTS_TOTAL.clone()))
        .unwrap();
    registry
        .register(Box::new(HTTP_REQUESTS_IN_FLIGHT.clone()))
        .unwrap();

    // Catalog
    registry
        .register(Box::new(CATALOG_ENTRIES.clone()))
        .unwrap();
    registry
        .register(Box::new(CACHED_RESULTS.clone()))
        .unwrap();

    // Core metrics (query cache, store)
    for metric in pokedex_core::metrics::all_metrics() {
        registry.register(metric).unwrap();
    }
}

/// Encode all metrics as Prometheus text format.
pub fn encode_metrics() -> String {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        warn!(error = %e, "Failed to encode metrics");
    }
    String::from_utf8_lossy(&buffer).into_owned()
}

/// Collect dynamic metrics from current application state.
///
/// Called before encoding so gauges reflect the current catalog.
pub fn collect_dynamic_metrics(state: &crate::state::AppState) {
    let service = state.service();

    if let Ok(count) = service.entry_count() {
        CATALOG_ENTRIES.set(count as i64);
    }
    CACHED_RESULTS.set(service.cache_stats().entries as i64);
}

/// Static segments under `/pokemon/`; anything else there is a slug.
const POKEMON_ROUTES: &[&str] = &["draft", "search", "by-type", "types", "browse"];

/// Normalize a path for metric labels (replace slugs and ids with placeholders).
pub fn normalize_path(path: &str) -> String {
    static SLUG_PATH: Lazy<regex_lite::Regex> =
        Lazy::new(|| regex_lite::Regex::new(r"^(/api/v1/pokemon/)([^/]+)/?$").unwrap());
    static NUMERIC: Lazy<regex_lite::Regex> =
        Lazy::new(|| regex_lite::Regex::new(r"/\d+(/|$)").unwrap());

    if let Some(captures) = SLUG_PATH.captures(path) {
        if !POKEMON_ROUTES.contains(&&captures[2]) {
            return format!("{}{{slug}}", &captures[1]);
        }
    }

    NUMERIC.replace_all(path, "/{id}$1").to_string()
}
