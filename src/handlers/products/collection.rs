use axum::extract::{rejection::JsonRejection, State};
use axum::Json;

use super::read_payload;
use crate::app::AppState;
use crate::database::models::{Product, ProductPayload};
use crate::error::{ApiError, Operation};
use crate::middleware::{ApiResponse, ApiResult};

/// GET /api/products - all products, newest first
pub async fn list(State(state): State<AppState>) -> ApiResult<Vec<Product>> {
    let products = state
        .products
        .list()
        .await
        .map_err(ApiError::data(Operation::List))?;

    Ok(ApiResponse::success(products))
}

/// POST /api/products - create a product from name, image and price
pub async fn create(
    State(state): State<AppState>,
    payload: Result<Json<ProductPayload>, JsonRejection>,
) -> ApiResult<Product> {
    let payload = read_payload(payload)?;

    if !payload.has_required_fields() {
        return Err(ApiError::MissingFields);
    }

    let product = state
        .products
        .create(payload.into_fields())
        .await
        .map_err(ApiError::data(Operation::Create))?;

    tracing::info!("Created product {} ({})", product.id, product.name);
    Ok(ApiResponse::created(product))
}
