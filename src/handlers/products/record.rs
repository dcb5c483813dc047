use axum::extract::{rejection::JsonRejection, Path, State};
use axum::Json;

use super::read_payload;
use crate::app::AppState;
use crate::database::models::{Product, ProductPayload};
use crate::error::{ApiError, Operation};
use crate::middleware::{ApiResponse, ApiResult};

/// GET /api/products/:id
///
/// A missing product is still a 200; the envelope just has no `data`.
pub async fn get(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Product> {
    let product = state
        .products
        .find(&id)
        .await
        .map_err(ApiError::data(Operation::Get))?;

    Ok(ApiResponse::optional(product))
}

/// PUT /api/products/:id - overwrite name, image and price as sent
pub async fn put(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<ProductPayload>, JsonRejection>,
) -> ApiResult<Product> {
    let payload = read_payload(payload)?;

    let updated = state
        .products
        .update(&id, payload.into_fields())
        .await
        .map_err(ApiError::data(Operation::Update))?;

    match updated {
        Some(product) => Ok(ApiResponse::success(product)),
        None => Err(ApiError::not_found("Product not found")),
    }
}

/// DELETE /api/products/:id
///
/// Answers 200 whether or not a row was removed; `data` is absent when nothing matched.
pub async fn delete(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Product> {
    let deleted = state
        .products
        .delete(&id)
        .await
        .map_err(ApiError::data(Operation::Delete))?;

    if deleted.is_none() {
        tracing::debug!("delete matched no product for id {}", id);
    }
    Ok(ApiResponse::optional(deleted))
}
