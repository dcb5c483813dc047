use std::sync::Arc;

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use tracing::warn;

use super::errors::ProtectionFailure;
use crate::error::ApiError;
use crate::protect::{DecisionProvider, RequestDetails, REQUESTED_TOKENS};

/// Ask the decision provider about every request before it reaches a route.
///
/// Denials short-circuit with 429/403. A provider failure answers 500 and
/// tags the response with [`ProtectionFailure`] for the error reporter.
pub async fn protect_middleware(
    State(provider): State<Arc<dyn DecisionProvider>>,
    request: Request,
    next: Next,
) -> Response {
    let details = RequestDetails::from_request(&request);

    let decision = match provider.protect(&details, REQUESTED_TOKENS).await {
        Ok(decision) => decision,
        Err(e) => {
            let mut response = ApiError::internal_server_error("Internal server error").into_response();
            response
                .extensions_mut()
                .insert(ProtectionFailure::new(format!("Protection error: {}", e)));
            return response;
        }
    };

    let verdict = decision.verdict();
    match verdict.rejection() {
        Some(rejection) => {
            warn!(
                "request {} {} from {:?} denied: {:?} (decision {})",
                details.method, details.path, details.ip, verdict, decision.id
            );
            rejection.into_response()
        }
        None => next.run(request).await,
    }
}
