//! Error responses for API handlers.

use axum::{http::StatusCode, Json};
use serde::Serialize;
use tracing::error;

use pokedex_core::CatalogError;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub kind: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    pub retryable: bool,
}

/// Map a catalog error to its HTTP status and JSON body.
pub fn catalog_error(e: CatalogError) -> (StatusCode, Json<ErrorResponse>) {
    let status = match &e {
        CatalogError::Validation { .. } => StatusCode::BAD_REQUEST,
        CatalogError::Conflict { .. } => StatusCode::CONFLICT,
        CatalogError::NotFound(_) => StatusCode::NOT_FOUND,
        CatalogError::Database(_) => StatusCode::SERVICE_UNAVAILABLE,
    };

    if status.is_server_error() {
        error!(error = %e, "Catalog request failed");
    }

    (
        status,
        Json(ErrorResponse {
            error: e.to_string(),
            kind: e.kind().to_string(),
            field: e.field().map(str::to_string),
            retryable: e.is_retryable(),
        }),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (CatalogError::validation("name", "too short"), StatusCode::BAD_REQUEST),
            (
                CatalogError::Conflict {
                    field: Some("slug".to_string()),
                    message: "taken".to_string(),
                },
                StatusCode::CONFLICT,
            ),
            (CatalogError::NotFound("x".to_string()), StatusCode::NOT_FOUND),
            (
                CatalogError::Database("locked".to_string()),
                StatusCode::SERVICE_UNAVAILABLE,
            ),
        ];

        for (err, expected) in cases {
            let (status, _) = catalog_error(err);
            assert_eq!(status, expected);
        }
    }

    #[test]
    fn test_body_carries_field_and_retryable() {
        let (_, Json(body)) = catalog_error(CatalogError::validation("sprite", "bad url"));
        assert_eq!(body.kind, "validation");
        assert_eq!(body.field.as_deref(), Some("sprite"));
        assert!(!body.retryable);

        let (_, Json(body)) = catalog_error(CatalogError::Database("busy".to_string()));
        assert_eq!(body.kind, "unavailable");
        assert!(body.field.is_none());
        assert!(body.retryable);
    }
}
