//! In-memory catalog store for testing.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use crate::catalog::{CatalogEntry, CatalogError, CatalogStore, NewEntry};

/// In-memory implementation of [`CatalogStore`].
///
/// Mirrors the ordering and uniqueness rules of the SQLite store and adds
/// controls for tests:
/// - count every call that reaches the store
/// - simulate an unavailable backend
///
/// # Example
///
/// ```rust,ignore
/// use pokedex_core::testing::{fixtures, InMemoryCatalogStore};
///
/// let store = Arc::new(InMemoryCatalogStore::new());
/// let service = QueryService::new(store.clone(), QueryCache::default());
///
/// service.get_all()?;
/// service.get_all()?;
/// assert_eq!(store.calls(), 1);
/// ```
#[derive(Debug, Default)]
pub struct InMemoryCatalogStore {
    entries: Mutex<Vec<CatalogEntry>>,
    next_id: Mutex<i64>,
    calls: AtomicUsize,
    unavailable: AtomicBool,
}

impl InMemoryCatalogStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with `entries`, ids assigned in order.
    pub fn with_entries(entries: impl IntoIterator<Item = NewEntry>) -> Self {
        let store = Self::new();
        for entry in entries {
            if let Err(e) = store.insert(&entry) {
                panic!("fixture entry {} rejected: {}", entry.slug, e);
            }
        }
        store.reset_calls();
        store
    }

    /// Number of store calls since creation or the last reset.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn reset_calls(&self) {
        self.calls.store(0, Ordering::SeqCst);
    }

    /// Make every subsequent call fail with [`CatalogError::Database`].
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    fn enter(&self) -> Result<(), CatalogError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(CatalogError::Database("store unavailable".to_string()));
        }
        Ok(())
    }

    fn snapshot(&self) -> Vec<CatalogEntry> {
        self.entries
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}

fn sort_by_name(entries: &mut [CatalogEntry]) {
    entries.sort_by(|a, b| a.name.as_bytes().cmp(b.name.as_bytes()).then(a.id.cmp(&b.id)));
}

impl CatalogStore for InMemoryCatalogStore {
    fn insert(&self, entry: &NewEntry) -> Result<CatalogEntry, CatalogError> {
        self.enter()?;
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        if entries.iter().any(|existing| existing.slug == entry.slug) {
            return Err(CatalogError::Conflict {
                field: Some("slug".to_string()),
                message: "an entry with this slug already exists".to_string(),
            });
        }

        let mut next_id = self.next_id.lock().unwrap_or_else(|e| e.into_inner());
        *next_id += 1;
        let stored = CatalogEntry::from_new(*next_id, entry.clone());
        entries.push(stored.clone());
        Ok(stored)
    }

    fn find_all(&self) -> Result<Vec<CatalogEntry>, CatalogError> {
        self.enter()?;
        let mut entries = self.snapshot();
        sort_by_name(&mut entries);
        Ok(entries)
    }

    fn find_by_name_substrings(
        &self,
        names: &[String],
        limit: usize,
    ) -> Result<Vec<CatalogEntry>, CatalogError> {
        self.enter()?;
        let needles: Vec<String> = names.iter().map(|n| n.to_lowercase()).collect();
        let mut entries: Vec<CatalogEntry> = self
            .snapshot()
            .into_iter()
            .filter(|entry| {
                let name = entry.name.to_lowercase();
                needles.iter().any(|needle| name.contains(needle.as_str()))
            })
            .collect();
        entries.sort_by_key(|entry| entry.id);
        entries.truncate(limit);
        Ok(entries)
    }

    fn find_by_types(&self, types: &[String]) -> Result<Vec<CatalogEntry>, CatalogError> {
        self.enter()?;
        let mut entries: Vec<CatalogEntry> = self
            .snapshot()
            .into_iter()
            .filter(|entry| entry.types.iter().any(|t| types.contains(t)))
            .collect();
        sort_by_name(&mut entries);
        Ok(entries)
    }

    fn find_by_slug(&self, slug: &str) -> Result<Option<CatalogEntry>, CatalogError> {
        self.enter()?;
        Ok(self.snapshot().into_iter().find(|entry| entry.slug == slug))
    }

    fn count(&self) -> Result<u64, CatalogError> {
        self.enter()?;
        Ok(self.snapshot().len() as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::fixtures;

    #[test]
    fn test_ids_increase_and_slugs_are_unique() {
        let store = InMemoryCatalogStore::new();
        let first = store.insert(&fixtures::pikachu()).unwrap();
        let second = store.insert(&fixtures::charmander()).unwrap();
        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);

        let err = store.insert(&fixtures::pikachu()).unwrap_err();
        assert!(matches!(err, CatalogError::Conflict { .. }));
        assert_eq!(store.count().unwrap(), 2);
    }

    #[test]
    fn test_unavailable_store_fails_and_counts_calls() {
        let store = InMemoryCatalogStore::with_entries([fixtures::pikachu()]);
        assert_eq!(store.calls(), 0);

        store.set_unavailable(true);
        assert!(matches!(store.find_all(), Err(CatalogError::Database(_))));
        store.set_unavailable(false);
        assert_eq!(store.find_all().unwrap().len(), 1);
        assert_eq!(store.calls(), 2);
    }
}
