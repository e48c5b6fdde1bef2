//! Input validation and normalization for catalog operations.

use url::Url;

use super::{CatalogError, NewEntry};

/// Maximum number of names honoured by a name search. Extra names are ignored.
pub const MAX_SEARCH_NAMES: usize = 10;

/// Maximum number of entries returned by a name search.
pub const MAX_SEARCH_RESULTS: usize = 20;

const NAME_LEN: (usize, usize) = (2, 50);
const DESCRIPTION_LEN: (usize, usize) = (10, 500);

/// Derive the default slug for a name: lowercase, whitespace runs become `-`.
///
/// The result is not otherwise sanitized, so names with punctuation produce
/// slugs that fail `is_valid_slug` until the caller overrides them.
pub fn derive_slug(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut in_whitespace = false;

    for c in name.chars() {
        if c.is_whitespace() {
            if !in_whitespace {
                slug.push('-');
            }
            in_whitespace = true;
        } else {
            slug.extend(c.to_lowercase());
            in_whitespace = false;
        }
    }

    slug
}

/// Whether `slug` matches `[a-z0-9-]+` in full.
pub fn is_valid_slug(slug: &str) -> bool {
    !slug.is_empty()
        && slug
            .bytes()
            .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'-')
}

/// Whether `sprite` is an absolute http(s) URL with a host.
pub fn is_valid_sprite_url(sprite: &str) -> bool {
    match Url::parse(sprite) {
        Ok(url) => matches!(url.scheme(), "http" | "https") && url.host().is_some(),
        Err(_) => false,
    }
}

/// Split a comma separated list, trimming items and dropping blanks.
pub fn split_list(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

/// Parse the search box input: comma separated, trimmed, lowercased, blanks dropped.
pub fn parse_search_names(input: &str) -> Vec<String> {
    split_list(input)
        .into_iter()
        .map(|name| name.to_lowercase())
        .collect()
}

/// Normalize names for a name search: trim, drop blanks, keep the first
/// `MAX_SEARCH_NAMES`.
pub fn normalize_search_names(names: &[String]) -> Vec<String> {
    names
        .iter()
        .map(|name| name.trim())
        .filter(|name| !name.is_empty())
        .take(MAX_SEARCH_NAMES)
        .map(str::to_string)
        .collect()
}

/// Normalize a type set: sorted and de-duplicated. Values are matched
/// exactly, so they are not trimmed or case folded.
pub fn normalize_types(types: &[String]) -> Vec<String> {
    let mut types = types.to_vec();
    types.sort();
    types.dedup();
    types
}

/// Validate every field of a new entry, returning the first violation.
pub fn validate_new_entry(entry: &NewEntry) -> Result<(), CatalogError> {
    check_length("name", &entry.name, NAME_LEN)?;
    if entry.name.trim().is_empty() {
        return Err(CatalogError::validation("name", "must not be blank"));
    }

    if entry.slug.is_empty() {
        return Err(CatalogError::validation("slug", "must not be empty"));
    }
    if !is_valid_slug(&entry.slug) {
        return Err(CatalogError::validation(
            "slug",
            format!(
                "'{}' may only contain lowercase letters, digits and '-'",
                entry.slug
            ),
        ));
    }

    check_not_blank("category", &entry.category)?;
    check_not_blank("abilities", &entry.abilities)?;
    check_length("description", &entry.description, DESCRIPTION_LEN)?;

    if !is_valid_sprite_url(&entry.sprite) {
        return Err(CatalogError::validation(
            "sprite",
            "must be a valid http(s) URL",
        ));
    }

    Ok(())
}

fn check_length(field: &str, value: &str, (min, max): (usize, usize)) -> Result<(), CatalogError> {
    let len = value.chars().count();
    if len < min || len > max {
        return Err(CatalogError::validation(
            field,
            format!("must be {}-{} characters (got {})", min, max, len),
        ));
    }
    Ok(())
}

fn check_not_blank(field: &str, value: &str) -> Result<(), CatalogError> {
    if value.trim().is_empty() {
        return Err(CatalogError::validation(field, "must not be blank"));
    }
    Ok(())
}
