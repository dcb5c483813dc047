use std::path::Path;
use std::sync::Arc;

use axum::{
    http::HeaderValue,
    middleware::{from_fn, from_fn_with_state},
    routing::get,
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    services::{ServeDir, ServeFile},
    trace::TraceLayer,
};

use crate::config::{AppConfig, SecurityConfig};
use crate::database::ProductRepository;
use crate::handlers::{products, system};
use crate::middleware::{access_log, json_body, protect_middleware, report_errors, security_headers};
use crate::protect::DecisionProvider;

/// Shared handler state
#[derive(Clone)]
pub struct AppState {
    pub products: Arc<dyn ProductRepository>,
}

impl AppState {
    pub fn new(products: Arc<dyn ProductRepository>) -> Self {
        Self { products }
    }
}

/// Build the full application.
///
/// Layer order, outermost first: trace, CORS, security headers, access log,
/// error reporting, JSON body check, protection (when a provider is given), routes.
pub fn router(state: AppState, provider: Option<Arc<dyn DecisionProvider>>, config: &AppConfig) -> Router {
    let mut app = Router::new()
        .route("/health", get(system::health))
        .merge(product_routes());

    app = if config.is_production() {
        app.fallback_service(static_bundle(&config.server.frontend_dist))
    } else {
        app.route("/", get(system::root))
    };

    let mut app = app.with_state(state);

    if let Some(provider) = provider {
        app = app.layer(from_fn_with_state(provider, protect_middleware));
    }

    app.layer(from_fn(json_body))
        .layer(from_fn(report_errors))
        .layer(from_fn(access_log))
        .layer(from_fn(security_headers))
        .layer(cors_layer(&config.security))
        .layer(TraceLayer::new_for_http())
}

fn product_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/api/products",
            get(products::products_get).post(products::products_post),
        )
        .route(
            "/api/products/:id",
            get(products::product_get)
                .put(products::product_put)
                .delete(products::product_delete),
        )
}

/// Pre-built frontend with an index.html fallback for client-side routes
fn static_bundle(dist: &str) -> ServeDir<ServeFile> {
    let index = Path::new(dist).join("index.html");
    ServeDir::new(dist).fallback(ServeFile::new(index))
}

fn cors_layer(security: &SecurityConfig) -> CorsLayer {
    if security.cors_origins.is_empty() {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = security
        .cors_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(Any)
        .allow_headers(Any)
}
