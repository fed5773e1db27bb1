//! Handlers shared by every document resource.
//!
//! Each handler is generic over the stored [`Document`] type and is mounted
//! per resource with a turbofish, e.g. `get(resource::get_by_id::<Product>)`.

use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
};
use serde_json::Value;
use tracing::info;

use companydb::prelude::*;

use crate::{
    api::{MessageResponse, body_document, parse_id},
    error::{AppError, AppResult},
    state::AppState,
};

/// GET /{collection}
pub async fn list<D: Document>(State(state): State<AppState>) -> AppResult<Json<Vec<D>>> {
    let documents = state.store
        .typed_collection::<D>()
        .find(None)
        .await?;

    Ok(Json(documents))
}

/// GET /{collection}/random
pub async fn random<D: Document>(State(state): State<AppState>) -> AppResult<Json<D>> {
    let document = state.store
        .typed_collection::<D>()
        .find_random()
        .await?
        .ok_or(AppError::NotFound)?;

    Ok(Json(document))
}

/// GET /{collection}/{id}
pub async fn get_by_id<D: Document>(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<D>> {
    let id = parse_id(&id)?;
    let document = state.store
        .typed_collection::<D>()
        .find_by_id(id)
        .await?
        .ok_or(AppError::NotFound)?;

    Ok(Json(document))
}

/// POST /{collection}
pub async fn create<D: Document>(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> AppResult<(StatusCode, Json<D>)> {
    let Json(body) = body?;
    let collection = state.store.typed_collection::<D>();
    let mut document = Model::<D>::from_input(body_document(body)?)?;

    document.save(&collection).await?;
    info!(collection = D::collection_name(), id = %document.id(), "document created");

    Ok((StatusCode::CREATED, Json(document.into_inner())))
}

/// PUT /{collection}/{id}
pub async fn update<D: Document>(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<Value>, JsonRejection>,
) -> AppResult<Json<D>> {
    let id = parse_id(&id)?;
    let Json(body) = body?;
    let collection = state.store.typed_collection::<D>();

    if collection.find_by_id(id).await?.is_none() {
        return Err(AppError::NotFound);
    }

    let document = Model::<D>::from_input_with_id(body_document(body)?, id)?.into_inner();
    collection.replace(document.clone()).await?;

    Ok(Json(document))
}

/// DELETE /{collection}/{id}
pub async fn delete<D: Document>(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<MessageResponse>> {
    let id = parse_id(&id)?;
    let result = state.store
        .typed_collection::<D>()
        .delete_by_id(id)
        .await?;

    if result.deleted == 0 {
        return Err(AppError::NotFound);
    }

    Ok(Json(MessageResponse::ok()))
}
