use axum::{extract::Request, middleware::Next, response::Response};
use tracing::error;

/// Marker an inner layer attaches to a response it already answered with an
/// error, so the failure still reaches the generic error path.
#[derive(Debug, Clone)]
pub struct ProtectionFailure {
    pub message: String,
}

impl ProtectionFailure {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Generic error path: logs failures forwarded by inner layers
pub async fn report_errors(req: Request, next: Next) -> Response {
    let method = req.method().clone();
    let path = req.uri().path().to_string();

    let response = next.run(req).await;
    if let Some(failure) = response.extensions().get::<ProtectionFailure>() {
        error!("{} {} failed: {}", method, path, failure.message);
    }
    response
}
