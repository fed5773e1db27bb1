//! HTTP error mapping.
//!
//! | Variant | Status | Body |
//! |---------|--------|------|
//! | Validation | 400 | `{"message", "errors": {field: message}}` |
//! | InvalidId | 400 | `{"message"}` |
//! | InvalidBody | 400 | `{"message"}` |
//! | JsonBody | rejection status (400, 415, 422) | `{"message"}` |
//! | NotFound | 404 | `{"message": "Not found"}` |
//! | Store | 500 | `{"message"}`, logged |

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use tracing::error;

use companydb::{error::DocumentStoreError, schema::ValidationErrors};

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Validation failed: {0}")]
    Validation(ValidationErrors),

    #[error("Invalid id: {0}")]
    InvalidId(String),

    /// The body is JSON but cannot be stored as a document.
    #[error("Invalid request body: {0}")]
    InvalidBody(String),

    #[error(transparent)]
    JsonBody(#[from] JsonRejection),

    #[error("Not found")]
    NotFound,

    #[error("Store error: {0}")]
    Store(DocumentStoreError),
}

pub type AppResult<T> = Result<T, AppError>;

impl From<DocumentStoreError> for AppError {
    fn from(err: DocumentStoreError) -> Self {
        match err {
            DocumentStoreError::Validation(errors) => AppError::Validation(errors),
            DocumentStoreError::DocumentNotFound(..) => AppError::NotFound,
            other => AppError::Store(other),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            AppError::Validation(errors) => (
                StatusCode::BAD_REQUEST,
                json!({ "message": "Validation failed", "errors": errors }),
            ),
            AppError::InvalidId(id) => (
                StatusCode::BAD_REQUEST,
                json!({ "message": format!("Invalid id: {id}") }),
            ),
            AppError::InvalidBody(reason) => (
                StatusCode::BAD_REQUEST,
                json!({ "message": format!("Invalid request body: {reason}") }),
            ),
            AppError::JsonBody(rejection) => (
                rejection.status(),
                json!({ "message": rejection.body_text() }),
            ),
            AppError::NotFound => (
                StatusCode::NOT_FOUND,
                json!({ "message": "Not found" }),
            ),
            AppError::Store(err) => {
                error!(error = %err, "store operation failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "message": "Internal server error" }),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_errors_map_to_http_categories() {
        let not_found = AppError::from(DocumentStoreError::DocumentNotFound("x".into(), "products".into()));
        let backend = AppError::from(DocumentStoreError::Backend("connection reset".into()));

        assert!(matches!(not_found, AppError::NotFound));
        assert!(matches!(backend, AppError::Store(_)));
        assert_eq!(not_found.into_response().status(), StatusCode::NOT_FOUND);
        assert_eq!(backend.into_response().status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            AppError::InvalidId("abc".into()).into_response().status(),
            StatusCode::BAD_REQUEST,
        );
    }
}
