#![allow(dead_code)]

use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode},
};
use companydb::{backend::StoreBackendBuilder, memory::InMemoryStore, store::DocumentStore};
use companydb_server::{AppState, api};
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

/// A router over a fresh in-memory store, plus the state to seed it through.
pub async fn test_app() -> (Router, AppState) {
    let backend = InMemoryStore::builder().build().await.unwrap();
    let state = AppState::new(DocumentStore::new(backend).into_dyn());

    (api::router(state.clone()), state)
}

/// Sends one request and returns the status with the decoded JSON body.
pub async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(method)
        .uri(uri);

    let request = match body {
        Some(json) => request
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => request.body(Body::empty()).unwrap(),
    };

    dispatch(app, request).await
}

/// Sends a prepared request and returns the status with the decoded JSON body.
pub async fn dispatch(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();

    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };

    (status, body)
}
