//! HTTP routes.
//!
//! Every resource module exposes a `router()`; [`router`] merges them and
//! attaches the shared state and request tracing.

pub mod employees;
pub mod products;
mod resource;

use axum::Router;
use bson::{Bson, Document as BsonDocument, Uuid};
use serde::Serialize;
use serde_json::Value;
use tower_http::trace::TraceLayer;

use crate::{
    error::{AppError, AppResult},
    state::AppState,
};

/// Builds the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .merge(products::router())
        .merge(employees::router())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Body of plain acknowledgement responses.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

impl MessageResponse {
    pub fn ok() -> Self {
        Self { message: "OK" }
    }
}

/// Parses a path identity.
pub(crate) fn parse_id(raw: &str) -> AppResult<Uuid> {
    uuid::Uuid::parse_str(raw)
        .map(Uuid::from)
        .map_err(|_| AppError::InvalidId(raw.to_string()))
}

/// Converts a JSON request body into BSON for schema validation.
///
/// Anything other than a JSON object is treated as an empty document, so
/// the schema reports each required field as missing.
pub(crate) fn body_document(body: Value) -> AppResult<BsonDocument> {
    if !body.is_object() {
        return Ok(BsonDocument::new());
    }

    match bson::ser::serialize_to_bson(&body) {
        Ok(Bson::Document(document)) => Ok(document),
        Ok(_) => Ok(BsonDocument::new()),
        Err(err) => Err(AppError::InvalidBody(err.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_hyphenated_ids_only() {
        assert!(parse_id("67e55044-10b1-426f-9247-bb680e5fe0c8").is_ok());
        assert!(matches!(parse_id("not-an-id"), Err(AppError::InvalidId(_))));
    }

    #[test]
    fn non_object_bodies_become_empty_documents() {
        assert!(body_document(json!([])).unwrap().is_empty());
        assert!(body_document(json!("text")).unwrap().is_empty());

        let document = body_document(json!({ "name": "Widget", "price": 3 })).unwrap();
        assert_eq!(document.get_str("name").unwrap(), "Widget");
        assert!(document.contains_key("price"));
    }

    #[test]
    fn unrepresentable_numbers_are_client_errors() {
        let result = body_document(json!({ "name": "a", "client": "b", "qty": u64::MAX }));

        assert!(matches!(result, Err(AppError::InvalidBody(_))));
    }
}
