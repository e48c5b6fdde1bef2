//! Query service integration tests against a file-backed SQLite store.
//!
//! These tests cover:
//! - Create then read back by slug, name and type
//! - Slug conflicts and missing entries
//! - Cache invalidation on create
//! - Persistence across store reopen

use std::sync::Arc;

use tempfile::TempDir;

use pokedex_core::{
    testing::fixtures, CatalogError, EntryFilter, QueryCache, QueryService, SqliteCatalogStore,
};

struct TestHarness {
    service: QueryService,
    temp_dir: TempDir,
}

impl TestHarness {
    fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let service = Self::open(&temp_dir);
        Self { service, temp_dir }
    }

    fn open(temp_dir: &TempDir) -> QueryService {
        let store = SqliteCatalogStore::new(&temp_dir.path().join("pokedex.db"))
            .expect("Failed to open catalog store");
        QueryService::new(Arc::new(store), QueryCache::default())
    }

    fn reopen(&self) -> QueryService {
        Self::open(&self.temp_dir)
    }
}

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

#[test]
fn test_create_and_read_back() {
    let harness = TestHarness::new();
    let created = harness.service.create(fixtures::pikachu()).unwrap();

    assert_eq!(harness.service.get_by_slug("pikachu").unwrap(), created);
    assert_eq!(
        harness.service.get_many_by_name(&strings(&["PIK"])).unwrap(),
        vec![created.clone()]
    );
    assert_eq!(
        harness.service.get_by_types(&strings(&["electric"])).unwrap(),
        vec![created]
    );
}

#[test]
fn test_duplicate_slug_is_a_conflict() {
    let harness = TestHarness::new();
    harness.service.create(fixtures::pikachu()).unwrap();

    let err = harness.service.create(fixtures::pikachu()).unwrap_err();
    match err {
        CatalogError::Conflict { field, .. } => assert_eq!(field.as_deref(), Some("slug")),
        other => panic!("expected conflict, got {:?}", other),
    }
    assert_eq!(harness.service.entry_count().unwrap(), 1);
}

#[test]
fn test_missing_slug_is_not_found() {
    let harness = TestHarness::new();
    let err = harness.service.get_by_slug("missingno").unwrap_err();
    assert!(matches!(err, CatalogError::NotFound(_)));
    assert!(!err.is_retryable());
}

#[test]
fn test_create_invalidates_cached_reads() {
    let harness = TestHarness::new();
    harness.service.create(fixtures::pikachu()).unwrap();
    assert_eq!(harness.service.get_all().unwrap().len(), 1);
    assert_eq!(harness.service.distinct_types().unwrap(), strings(&["electric"]));

    harness.service.create(fixtures::charmander()).unwrap();
    let names: Vec<String> = harness
        .service
        .get_all()
        .unwrap()
        .into_iter()
        .map(|e| e.name)
        .collect();
    assert_eq!(names, strings(&["Charmander", "Pikachu"]));
    assert_eq!(
        harness.service.distinct_types().unwrap(),
        strings(&["electric", "fire"])
    );
}

#[test]
fn test_entries_survive_reopen() {
    let harness = TestHarness::new();
    harness.service.create(fixtures::charmander()).unwrap();

    let reopened = harness.reopen();
    let entry = reopened.get_by_slug("charmander").unwrap();
    assert_eq!(entry.types, strings(&["fire"]));
    assert_eq!(
        entry.weakness,
        Some(strings(&["water", "ground", "rock"]))
    );
}

#[test]
fn test_browse_over_stored_entries() {
    let harness = TestHarness::new();
    for i in 1..=14 {
        harness
            .service
            .create(fixtures::new_entry(&format!("Unown {:02}", i), &["psychic"]))
            .unwrap();
    }
    harness.service.create(fixtures::charmander()).unwrap();

    let page = harness
        .service
        .browse(&EntryFilter::new().with_types(["psychic"]), 2)
        .unwrap();
    assert_eq!(page.total_pages, 2);
    assert_eq!(page.filtered_count, 14);
    assert_eq!(page.items.len(), 2);
    assert_eq!(page.items[0].name, "Unown 13");
}
