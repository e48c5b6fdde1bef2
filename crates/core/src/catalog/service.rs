//! Query service over a catalog store.

use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info, warn};

use super::cache::{CacheKey, CacheStats, QueryCache};
use super::validate::{normalize_search_names, normalize_types, validate_new_entry};
use super::{CatalogEntry, CatalogError, CatalogStore, EntryDraft, NewEntry, MAX_SEARCH_RESULTS};
use crate::browse::{self, DetailView, EntryFilter, Page};
use crate::metrics::{ENTRIES_CREATED, STORE_ERRORS, STORE_OPERATION_DURATION};

/// Reads and writes catalog entries.
///
/// Validates input before it reaches the store, normalizes query arguments
/// and serves repeated reads from an explicit cache. Every successful create
/// drops the whole cache.
pub struct QueryService {
    store: Arc<dyn CatalogStore>,
    cache: QueryCache,
}

impl QueryService {
    pub fn new(store: Arc<dyn CatalogStore>, cache: QueryCache) -> Self {
        Self { store, cache }
    }

    /// A service that always goes to the store.
    pub fn uncached(store: Arc<dyn CatalogStore>) -> Self {
        Self::new(store, QueryCache::disabled())
    }

    /// Validate and store a new entry.
    pub fn create(&self, entry: NewEntry) -> Result<CatalogEntry, CatalogError> {
        if let Err(e) = validate_new_entry(&entry) {
            debug!(slug = %entry.slug, error = %e, "Rejected new entry");
            return Err(e);
        }

        match self.timed("create", || self.store.insert(&entry)) {
            Ok(created) => {
                self.cache.invalidate_all();
                ENTRIES_CREATED.inc();
                info!(id = created.id, slug = %created.slug, "Created catalog entry");
                Ok(created)
            }
            Err(e @ CatalogError::Conflict { .. }) => {
                warn!(slug = %entry.slug, "Slug already taken");
                Err(e)
            }
            Err(e) => Err(e),
        }
    }

    /// Normalize a form submission, then create it.
    pub fn create_from_draft(&self, draft: EntryDraft) -> Result<CatalogEntry, CatalogError> {
        self.create(draft.into_new_entry())
    }

    /// Every entry, ordered by name.
    pub fn get_all(&self) -> Result<Vec<CatalogEntry>, CatalogError> {
        self.cached(CacheKey::All, || self.store.find_all())
    }

    /// Entries whose name contains any of `names`, case-insensitively.
    ///
    /// Names are trimmed and blanks dropped; only the first ten count.
    /// Returns at most twenty entries ordered by id. No names means no
    /// results, without touching the store.
    pub fn get_many_by_name(&self, names: &[String]) -> Result<Vec<CatalogEntry>, CatalogError> {
        let names = normalize_search_names(names);
        if names.is_empty() {
            return Ok(Vec::new());
        }

        let mut key_names: Vec<String> = names.iter().map(|n| n.to_lowercase()).collect();
        key_names.sort();
        key_names.dedup();

        self.cached(CacheKey::ManyByName(key_names), || {
            self.store.find_by_name_substrings(&names, MAX_SEARCH_RESULTS)
        })
    }

    /// Entries having at least one of `types`. Types match exactly.
    pub fn get_by_types(&self, types: &[String]) -> Result<Vec<CatalogEntry>, CatalogError> {
        let types = normalize_types(types);
        if types.is_empty() {
            return Ok(Vec::new());
        }

        self.cached(CacheKey::ByTypes(types.clone()), || {
            self.store.find_by_types(&types)
        })
    }

    /// The entry with exactly this slug.
    pub fn get_by_slug(&self, slug: &str) -> Result<CatalogEntry, CatalogError> {
        if slug.is_empty() {
            return Err(CatalogError::validation("slug", "must not be empty"));
        }

        let key = CacheKey::BySlug(slug.to_string());
        if let Some(entry) = self.cache.get(&key).and_then(|hit| hit.into_iter().next()) {
            return Ok(entry);
        }

        let generation = self.cache.generation();
        match self.timed(key.operation(), || self.store.find_by_slug(slug))? {
            Some(entry) => {
                self.cache.put(key, vec![entry.clone()], generation);
                Ok(entry)
            }
            None => Err(CatalogError::NotFound(format!(
                "no entry with slug '{}'",
                slug
            ))),
        }
    }

    /// Detail page data for the entry with this slug.
    pub fn detail(&self, slug: &str) -> Result<DetailView, CatalogError> {
        self.get_by_slug(slug).map(DetailView::from)
    }

    /// Sorted distinct types across every entry.
    pub fn distinct_types(&self) -> Result<Vec<String>, CatalogError> {
        Ok(browse::distinct_types(&self.get_all()?))
    }

    /// Filter and paginate every entry.
    pub fn browse(&self, filter: &EntryFilter, page: i64) -> Result<Page<CatalogEntry>, CatalogError> {
        Ok(browse::browse(&self.get_all()?, filter, page))
    }

    pub fn entry_count(&self) -> Result<u64, CatalogError> {
        self.timed("count", || self.store.count())
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    /// Drop every cached result. Returns how many were dropped.
    pub fn invalidate_cache(&self) -> usize {
        self.cache.invalidate_all()
    }

    fn cached<F>(&self, key: CacheKey, load: F) -> Result<Vec<CatalogEntry>, CatalogError>
    where
        F: FnOnce() -> Result<Vec<CatalogEntry>, CatalogError>,
    {
        if let Some(hit) = self.cache.get(&key) {
            return Ok(hit);
        }

        let generation = self.cache.generation();
        let entries = self.timed(key.operation(), load)?;
        self.cache.put(key, entries.clone(), generation);
        Ok(entries)
    }

    fn timed<T, F>(&self, operation: &'static str, run: F) -> Result<T, CatalogError>
    where
        F: FnOnce() -> Result<T, CatalogError>,
    {
        let start = Instant::now();
        let result = run();
        STORE_OPERATION_DURATION
            .with_label_values(&[operation])
            .observe(start.elapsed().as_secs_f64());

        if let Err(e) = &result {
            STORE_ERRORS.with_label_values(&[operation, e.kind()]).inc();
            if e.is_retryable() {
                warn!(operation, error = %e, "Catalog store unavailable");
            }
        }
        result
    }
}
