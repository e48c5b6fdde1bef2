//! Types for browsing catalog entries.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::catalog::{split_list, CatalogEntry};

/// Name and type filters applied while browsing.
///
/// The name filter is a case-insensitive substring; type membership is an
/// exact string match. Empty filters match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryFilter {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub types: BTreeSet<String>,
}

impl EntryFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_types<I, S>(mut self, types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.types = types.into_iter().map(Into::into).collect();
        self
    }

    /// Build a filter from optional query parameters. `types` is comma separated.
    pub fn from_params(name: Option<&str>, types: Option<&str>) -> Self {
        Self {
            name: name.unwrap_or_default().to_string(),
            types: types.map(split_list).unwrap_or_default().into_iter().collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_empty() && self.types.is_empty()
    }

    /// Whether a single entry passes both filters.
    pub fn matches(&self, entry: &CatalogEntry) -> bool {
        self.matches_with_needle(entry, &self.name.to_lowercase())
    }

    pub(crate) fn matches_with_needle(&self, entry: &CatalogEntry, needle: &str) -> bool {
        let name_match = needle.is_empty() || entry.name.to_lowercase().contains(needle);
        let type_match =
            self.types.is_empty() || entry.types.iter().any(|t| self.types.contains(t));
        name_match && type_match
    }
}

/// One page of a filtered list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// Page actually returned (1-indexed, after clamping).
    pub page: usize,
    pub page_size: usize,
    pub total_pages: usize,
    pub filtered_count: usize,
}

impl<T> Page<T> {
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            page: self.page,
            page_size: self.page_size,
            total_pages: self.total_pages,
            filtered_count: self.filtered_count,
        }
    }

    pub fn has_previous(&self) -> bool {
        self.page > 1
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }
}

/// Detail page data for one entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DetailView {
    #[serde(flatten)]
    pub entry: CatalogEntry,
    /// False when weakness is missing or empty.
    pub show_weakness: bool,
}

impl From<CatalogEntry> for DetailView {
    fn from(entry: CatalogEntry) -> Self {
        let show_weakness = entry
            .weakness
            .as_ref()
            .is_some_and(|weakness| !weakness.is_empty());
        Self {
            entry,
            show_weakness,
        }
    }
}
