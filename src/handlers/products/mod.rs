pub mod collection;
pub mod record;

use axum::extract::rejection::JsonRejection;
use axum::Json;

use crate::database::models::ProductPayload;
use crate::error::ApiError;

// Re-export handler functions for use in routing
pub use collection::create as products_post;
pub use collection::list as products_get;
pub use record::delete as product_delete;
pub use record::get as product_get;
pub use record::put as product_put;

/// A body without a JSON content type is treated as empty, the way JSON body
/// parsers skip requests they do not recognize. Unparseable JSON is a 400.
pub(crate) fn read_payload(
    payload: Result<Json<ProductPayload>, JsonRejection>,
) -> Result<ProductPayload, ApiError> {
    match payload {
        Ok(Json(payload)) => Ok(payload),
        Err(JsonRejection::MissingJsonContentType(_)) => Ok(ProductPayload::default()),
        Err(rejection) => Err(ApiError::InvalidJson(rejection.body_text())),
    }
}
