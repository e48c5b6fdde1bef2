//! Explicit read cache for query results.
//!
//! Results are keyed by operation and normalized arguments. Every successful
//! write must call [`QueryCache::invalidate_all`]; there is no implicit
//! invalidation beyond the optional TTL.
//!
//! Readers take a [`QueryCache::generation`] before going to the store and
//! hand it back to [`QueryCache::put`]. A result read before an invalidation
//! is never stored after it.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use serde::Serialize;
use tracing::debug;

use super::CatalogEntry;
use crate::config::CacheConfig;
use crate::metrics::{CACHE_HITS, CACHE_MISSES};

/// Operation plus normalized arguments.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CacheKey {
    All,
    ManyByName(Vec<String>),
    ByTypes(Vec<String>),
    BySlug(String),
}

impl CacheKey {
    /// Operation name, used as a metric label.
    pub fn operation(&self) -> &'static str {
        match self {
            Self::All => "get_all",
            Self::ManyByName(_) => "get_many_by_name",
            Self::ByTypes(_) => "get_by_types",
            Self::BySlug(_) => "get_by_slug",
        }
    }
}

struct CachedResult {
    entries: Vec<CatalogEntry>,
    stored_at: DateTime<Utc>,
}

/// Cache statistics.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct CacheStats {
    pub enabled: bool,
    pub entries: usize,
    pub hits: u64,
    pub misses: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ttl_secs: Option<u64>,
}

/// Query result cache.
pub struct QueryCache {
    enabled: bool,
    ttl: Option<TimeDelta>,
    results: Mutex<HashMap<CacheKey, CachedResult>>,
    // Bumped under the results lock on every invalidation.
    generation: AtomicU64,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl QueryCache {
    pub fn new(enabled: bool, ttl: Option<Duration>) -> Self {
        Self {
            enabled,
            ttl: ttl.and_then(|ttl| TimeDelta::from_std(ttl).ok()),
            results: Mutex::new(HashMap::new()),
            generation: AtomicU64::new(0),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    pub fn from_config(config: &CacheConfig) -> Self {
        Self::new(config.enabled, config.ttl())
    }

    /// A cache that never stores anything.
    pub fn disabled() -> Self {
        Self::new(false, None)
    }

    // Cached data stays consistent even if a holder panicked.
    fn lock(&self) -> MutexGuard<'_, HashMap<CacheKey, CachedResult>> {
        self.results.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Look up a fresh result.
    pub fn get(&self, key: &CacheKey) -> Option<Vec<CatalogEntry>> {
        let found = if self.enabled {
            let mut results = self.lock();
            match results.get(key) {
                Some(cached) if self.is_fresh(cached) => Some(cached.entries.clone()),
                Some(_) => {
                    results.remove(key);
                    None
                }
                None => None,
            }
        } else {
            None
        };

        let operation = key.operation();
        if found.is_some() {
            self.hits.fetch_add(1, Ordering::Relaxed);
            CACHE_HITS.with_label_values(&[operation]).inc();
        } else {
            self.misses.fetch_add(1, Ordering::Relaxed);
            CACHE_MISSES.with_label_values(&[operation]).inc();
        }
        found
    }

    /// Current invalidation generation. Take it before reading the store.
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    /// Store a result read at `generation`. Dropped if the cache was
    /// invalidated since.
    pub fn put(&self, key: CacheKey, entries: Vec<CatalogEntry>, generation: u64) {
        if !self.enabled {
            return;
        }

        let mut results = self.lock();
        if self.generation.load(Ordering::SeqCst) != generation {
            debug!(operation = key.operation(), "Discarding result read before invalidation");
            return;
        }
        results.insert(
            key,
            CachedResult {
                entries,
                stored_at: Utc::now(),
            },
        );
    }

    /// Drop every cached result. Returns how many were dropped.
    pub fn invalidate_all(&self) -> usize {
        let mut results = self.lock();
        self.generation.fetch_add(1, Ordering::SeqCst);
        let dropped = results.len();
        results.clear();
        debug!(dropped, "Query cache invalidated");
        dropped
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            enabled: self.enabled,
            entries: self.lock().len(),
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            ttl_secs: self.ttl.map(|ttl| ttl.num_seconds() as u64),
        }
    }

    fn is_fresh(&self, cached: &CachedResult) -> bool {
        match self.ttl {
            Some(ttl) => Utc::now() - cached.stored_at < ttl,
            None => true,
        }
    }
}

impl Default for QueryCache {
    fn default() -> Self {
        Self::new(true, None)
    }
}
