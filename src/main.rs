use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use catalog_api::app::{self, AppState};
use catalog_api::config;
use catalog_api::database::{DatabaseManager, PgProductRepository};
use catalog_api::protect::{DecisionProvider, RemoteDecisionProvider};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL, PROTECT_KEY, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("catalog_api=debug,tower_http=info")),
        )
        .init();

    let config = config::config();
    info!("Starting Catalog API in {:?} mode", config.environment);

    let pool = DatabaseManager::connect(&config.database)?;
    DatabaseManager::init_schema(&pool).await;

    let provider: Option<Arc<dyn DecisionProvider>> = if config.protection.enabled {
        if config.protection.key.is_empty() {
            warn!("PROTECT_KEY is not set; protected requests will fail with 500");
        }
        let provider = RemoteDecisionProvider::new(&config.protection)
            .context("invalid protection settings (set PROTECT_URL or PROTECT_ENABLED=false)")?;
        info!(
            "Request protection via {} (dry run: {})",
            provider.endpoint(),
            config.protection.dry_run
        );
        Some(Arc::new(provider))
    } else {
        warn!("Request protection is disabled");
        None
    };

    let state = AppState::new(Arc::new(PgProductRepository::new(pool.clone())));
    let app = app::router(state, provider, config);

    let bind_addr = format!("0.0.0.0:{}", config.server.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    info!("Server is running on port {}", config.server.port);

    axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    pool.close().await;
    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("failed to listen for shutdown signal: {}", e);
    }
}
