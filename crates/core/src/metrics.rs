//! Prometheus metrics for core components.
//!
//! This module provides metrics for:
//! - Query cache (hits, misses)
//! - Store operations (latency, failures)
//! - Entry creation

use once_cell::sync::Lazy;
use prometheus::{HistogramOpts, HistogramVec, IntCounter, IntCounterVec, Opts};

// =============================================================================
// Query Cache
// =============================================================================

/// Cache hits by operation.
pub static CACHE_HITS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("pokedex_cache_hits_total", "Query cache hits"),
        &["operation"],
    )
    .unwrap()
});

/// Cache misses by operation.
pub static CACHE_MISSES: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("pokedex_cache_misses_total", "Query cache misses"),
        &["operation"],
    )
    .unwrap()
});

// =============================================================================
// Store
// =============================================================================

/// Store operation duration in seconds.
pub static STORE_OPERATION_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    HistogramVec::new(
        HistogramOpts::new(
            "pokedex_store_operation_duration_seconds",
            "Duration of catalog store operations",
        )
        .buckets(vec![0.0005, 0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.5, 1.0]),
        &["operation"],
    )
    .unwrap()
});

/// Store operation failures by operation and error kind.
pub static STORE_ERRORS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("pokedex_store_errors_total", "Failed catalog store operations"),
        &["operation", "kind"],
    )
    .unwrap()
});

/// Entries created since startup.
pub static ENTRIES_CREATED: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new(
        "pokedex_entries_created_total",
        "Catalog entries created since startup",
    )
    .unwrap()
});

/// All core metrics, for registration in a registry.
pub fn all_metrics() -> Vec<Box<dyn prometheus::core::Collector>> {
    vec![
        Box::new(CACHE_HITS.clone()),
        Box::new(CACHE_MISSES.clone()),
        Box::new(STORE_OPERATION_DURATION.clone()),
        Box::new(STORE_ERRORS.clone()),
        Box::new(ENTRIES_CREATED.clone()),
    ]
}
