//! Pokémon catalog API handlers.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};
use pokedex_core::{
    catalog::{parse_search_names, split_list},
    page_window, CatalogEntry, DetailView, EntryDraft, EntryFilter, NewEntry, Page,
};

use super::error::catalog_error;
use crate::state::AppState;

// ============================================================================
// Request/Response types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    /// Comma separated name fragments.
    #[serde(default)]
    pub q: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct TypeParams {
    /// Comma separated type tags.
    #[serde(default)]
    pub types: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct BrowseParams {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub types: Option<String>,
    /// Kept raw so a malformed page never rejects the request.
    #[serde(default)]
    pub page: Option<String>,
}

impl BrowseParams {
    /// Requested page. Missing or unparsable values mean the first page;
    /// digit strings too large for an `i64` mean the last.
    pub fn page(&self) -> i64 {
        let Some(raw) = self.page.as_deref().map(str::trim).filter(|r| !r.is_empty()) else {
            return 1;
        };
        match raw.parse::<i64>() {
            Ok(page) => page,
            Err(_) if raw.bytes().all(|b| b.is_ascii_digit()) => i64::MAX,
            Err(_) => 1,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct EntryListResponse {
    pub entries: Vec<CatalogEntry>,
    pub total: usize,
}

impl From<Vec<CatalogEntry>> for EntryListResponse {
    fn from(entries: Vec<CatalogEntry>) -> Self {
        let total = entries.len();
        Self { entries, total }
    }
}

#[derive(Debug, Serialize)]
pub struct TypesResponse {
    pub types: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct BrowseResponse {
    #[serde(flatten)]
    pub page: Page<CatalogEntry>,
    /// Page numbers for the pager, around the returned page.
    pub page_window: Vec<usize>,
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /api/v1/pokemon
///
/// Create an entry from a complete JSON body.
pub async fn create_pokemon(
    State(state): State<Arc<AppState>>,
    Json(entry): Json<NewEntry>,
) -> Result<(StatusCode, Json<CatalogEntry>), impl IntoResponse> {
    match state.service().create(entry) {
        Ok(created) => Ok((StatusCode::CREATED, Json(created))),
        Err(e) => Err(catalog_error(e)),
    }
}

/// POST /api/v1/pokemon/draft
///
/// Create an entry from a form submission with comma separated lists.
pub async fn create_from_draft(
    State(state): State<Arc<AppState>>,
    Json(draft): Json<EntryDraft>,
) -> Result<(StatusCode, Json<CatalogEntry>), impl IntoResponse> {
    match state.service().create_from_draft(draft) {
        Ok(created) => Ok((StatusCode::CREATED, Json(created))),
        Err(e) => Err(catalog_error(e)),
    }
}

/// GET /api/v1/pokemon
pub async fn list_pokemon(
    State(state): State<Arc<AppState>>,
) -> Result<Json<EntryListResponse>, impl IntoResponse> {
    state
        .service()
        .get_all()
        .map(|entries| Json(EntryListResponse::from(entries)))
        .map_err(catalog_error)
}

/// GET /api/v1/pokemon/search?q=pika,char
pub async fn search_by_name(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchParams>,
) -> Result<Json<EntryListResponse>, impl IntoResponse> {
    let names = params
        .q
        .as_deref()
        .map(parse_search_names)
        .unwrap_or_default();

    state
        .service()
        .get_many_by_name(&names)
        .map(|entries| Json(EntryListResponse::from(entries)))
        .map_err(catalog_error)
}

/// GET /api/v1/pokemon/by-type?types=fire,water
pub async fn search_by_type(
    State(state): State<Arc<AppState>>,
    Query(params): Query<TypeParams>,
) -> Result<Json<EntryListResponse>, impl IntoResponse> {
    let types = params.types.as_deref().map(split_list).unwrap_or_default();

    state
        .service()
        .get_by_types(&types)
        .map(|entries| Json(EntryListResponse::from(entries)))
        .map_err(catalog_error)
}

/// GET /api/v1/pokemon/types
pub async fn list_types(
    State(state): State<Arc<AppState>>,
) -> Result<Json<TypesResponse>, impl IntoResponse> {
    state
        .service()
        .distinct_types()
        .map(|types| Json(TypesResponse { types }))
        .map_err(catalog_error)
}

/// GET /api/v1/pokemon/browse?name=&types=&page=
///
/// Filter every entry by name and types, then return one page.
pub async fn browse(
    State(state): State<Arc<AppState>>,
    Query(params): Query<BrowseParams>,
) -> Result<Json<BrowseResponse>, impl IntoResponse> {
    let filter = EntryFilter::from_params(params.name.as_deref(), params.types.as_deref());

    match state.service().browse(&filter, params.page()) {
        Ok(page) => {
            let page_window = page_window(page.page, page.total_pages);
            Ok(Json(BrowseResponse { page, page_window }))
        }
        Err(e) => Err(catalog_error(e)),
    }
}

/// GET /api/v1/pokemon/{slug}
pub async fn get_pokemon(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
) -> Result<Json<DetailView>, impl IntoResponse> {
    state
        .service()
        .detail(&slug)
        .map(Json)
        .map_err(catalog_error)
}
