use axum::{
    body::Body,
    extract::Request,
    http::{header, HeaderMap},
    middleware::Next,
    response::{IntoResponse, Response},
};
use serde::de::IgnoredAny;

use crate::error::ApiError;

/// Same ceiling axum's `Json` extractor applies by default
const BODY_LIMIT: usize = 2 * 1024 * 1024;

/// Reject malformed JSON bodies before any later stage sees the request.
///
/// The buffered body is handed on unchanged so handlers still extract it.
/// Requests without a JSON content type pass through untouched.
pub async fn json_body(req: Request, next: Next) -> Response {
    if !is_json(req.headers()) {
        return next.run(req).await;
    }

    let (parts, body) = req.into_parts();
    let bytes = match axum::body::to_bytes(body, BODY_LIMIT).await {
        Ok(bytes) => bytes,
        Err(e) => return ApiError::InvalidJson(e.to_string()).into_response(),
    };

    if !bytes.is_empty() {
        if let Err(e) = serde_json::from_slice::<IgnoredAny>(&bytes) {
            tracing::debug!("rejecting malformed JSON body: {}", e);
            return ApiError::InvalidJson(e.to_string()).into_response();
        }
    }

    next.run(Request::from_parts(parts, Body::from(bytes))).await
}

fn is_json(headers: &HeaderMap) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(';').next())
        .map(|essence| {
            let essence = essence.trim().to_ascii_lowercase();
            essence == "application/json" || essence.ends_with("+json")
        })
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(content_type: &'static str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::CONTENT_TYPE, HeaderValue::from_static(content_type));
        headers
    }

    #[test]
    fn recognizes_json_content_types() {
        assert!(is_json(&headers("application/json")));
        assert!(is_json(&headers("application/json; charset=utf-8")));
        assert!(is_json(&headers("application/merge-patch+json")));
        assert!(!is_json(&headers("text/plain")));
        assert!(!is_json(&HeaderMap::new()));
    }
}
