//! Browsing: in-memory filtering and paging of catalog entries.
//!
//! Everything here is pure and synchronous. Callers re-run it on every
//! filter or page change and are responsible for resetting the page to 1
//! when a filter changes.

mod types;

pub use types::*;

use std::collections::BTreeSet;

use crate::catalog::CatalogEntry;

/// Entries per page.
pub const PAGE_SIZE: usize = 12;

/// Maximum page-number buttons shown by a pager.
pub const PAGE_WINDOW: usize = 5;

/// Keep entries passing `filter`, preserving input order.
pub fn filter_entries<'a>(entries: &'a [CatalogEntry], filter: &EntryFilter) -> Vec<&'a CatalogEntry> {
    let needle = filter.name.to_lowercase();
    entries
        .iter()
        .filter(|entry| filter.matches_with_needle(entry, &needle))
        .collect()
}

/// Slice `items` into the requested 1-indexed page.
///
/// Out-of-range pages are clamped to `[1, total_pages]`. An empty list yields
/// page 1 with no items and `total_pages == 0`.
pub fn paginate<T: Clone>(items: &[T], requested_page: i64, page_size: usize) -> Page<T> {
    let page_size = page_size.max(1);
    let filtered_count = items.len();
    let total_pages = filtered_count.div_ceil(page_size);

    let page = if total_pages == 0 {
        1
    } else {
        let requested = usize::try_from(requested_page.max(1)).unwrap_or(usize::MAX);
        requested.min(total_pages)
    };

    let start = (page - 1) * page_size;
    let end = (start + page_size).min(filtered_count);
    let items = if start < end {
        items[start..end].to_vec()
    } else {
        Vec::new()
    };

    Page {
        items,
        page,
        page_size,
        total_pages,
        filtered_count,
    }
}

/// Filter then paginate with the standard page size.
pub fn browse(entries: &[CatalogEntry], filter: &EntryFilter, requested_page: i64) -> Page<CatalogEntry> {
    let filtered = filter_entries(entries, filter);
    paginate(&filtered, requested_page, PAGE_SIZE).map(|entry| entry.clone())
}

/// Page numbers to show around `current`: at most `PAGE_WINDOW` consecutive
/// pages, shifted so the window stays inside `[1, total_pages]`.
pub fn page_window(current: usize, total_pages: usize) -> Vec<usize> {
    if total_pages == 0 {
        return Vec::new();
    }
    if total_pages <= PAGE_WINDOW {
        return (1..=total_pages).collect();
    }

    let half = PAGE_WINDOW / 2;
    let current = current.clamp(1, total_pages);
    let first = if current <= half + 1 {
        1
    } else if current + half >= total_pages {
        total_pages - PAGE_WINDOW + 1
    } else {
        current - half
    };

    (first..first + PAGE_WINDOW).collect()
}

/// Every distinct type across `entries`, sorted.
pub fn distinct_types(entries: &[CatalogEntry]) -> Vec<String> {
    entries
        .iter()
        .flat_map(|entry| entry.types.iter().cloned())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}
