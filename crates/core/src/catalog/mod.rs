//! Pokémon catalog: entry types, validation, storage and the query service.
//!
//! Storage sits behind [`CatalogStore`]; [`QueryService`] layers validation,
//! input normalization and an explicit [`QueryCache`] on top of it.

mod cache;
mod service;
mod sqlite;
mod types;
mod validate;

pub use cache::{CacheKey, CacheStats, QueryCache};
pub use service::QueryService;
pub use sqlite::SqliteCatalogStore;
pub use types::*;
pub use validate::{
    derive_slug, is_valid_slug, is_valid_sprite_url, normalize_search_names, normalize_types,
    parse_search_names, split_list, validate_new_entry, MAX_SEARCH_NAMES, MAX_SEARCH_RESULTS,
};

/// Storage collaborator for catalog entries.
///
/// Implementations own ordering and uniqueness: `slug` must be unique and
/// violations reported as [`CatalogError::Conflict`].
pub trait CatalogStore: Send + Sync {
    /// Insert a new entry and return it with its generated id.
    fn insert(&self, entry: &NewEntry) -> Result<CatalogEntry, CatalogError>;

    /// All entries, ordered by name (bytewise) then id.
    fn find_all(&self) -> Result<Vec<CatalogEntry>, CatalogError>;

    /// Entries whose name contains any of `names`, case-insensitively.
    ///
    /// Ordered by id, at most `limit` results.
    fn find_by_name_substrings(
        &self,
        names: &[String],
        limit: usize,
    ) -> Result<Vec<CatalogEntry>, CatalogError>;

    /// Entries sharing at least one type with `types` (exact match).
    ///
    /// Ordered by name then id.
    fn find_by_types(&self, types: &[String]) -> Result<Vec<CatalogEntry>, CatalogError>;

    /// The entry with exactly this slug.
    fn find_by_slug(&self, slug: &str) -> Result<Option<CatalogEntry>, CatalogError>;

    /// Number of stored entries.
    fn count(&self) -> Result<u64, CatalogError>;
}
