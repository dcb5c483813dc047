use axum::{extract::Request, http::header, middleware::Next, response::Response};
use std::time::Instant;
use tracing::info;

/// One line per request: method, path, status, latency and response size
pub async fn access_log(req: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = req.method().clone();
    let uri = req.uri().clone();

    let response = next.run(req).await;
    let status = response.status();
    let duration = start.elapsed();
    let length = response
        .headers()
        .get(header::CONTENT_LENGTH)
        .and_then(|h| h.to_str().ok())
        .unwrap_or("-")
        .to_string();

    info!(
        "{} {} {} {:.3} ms - {}",
        method,
        uri,
        status.as_u16(),
        duration.as_secs_f64() * 1000.0,
        length
    );

    response
}
