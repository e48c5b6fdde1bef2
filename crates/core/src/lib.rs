pub mod browse;
pub mod catalog;
pub mod config;
pub mod metrics;
pub mod testing;

pub use browse::{
    browse, distinct_types, filter_entries, page_window, paginate, DetailView, EntryFilter, Page,
    PAGE_SIZE, PAGE_WINDOW,
};
pub use catalog::{
    CacheKey, CacheStats, CatalogEntry, CatalogError, CatalogStore, EntryDraft, NewEntry,
    QueryCache, QueryService, SqliteCatalogStore,
};
pub use config::{
    load_config, load_config_from_str, validate_config, CacheConfig, Config, ConfigError,
    DatabaseConfig, SanitizedConfig, ServerConfig,
};
