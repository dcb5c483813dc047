use sqlx::{postgres::PgPoolOptions, PgPool};
use std::time::Duration;
use thiserror::Error;
use tracing::{error, info};

use crate::config::DatabaseConfig;

/// Errors from the data layer
#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Missing configuration: {0}")]
    ConfigMissing(&'static str),

    #[error("Invalid database URL")]
    InvalidDatabaseUrl,

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

const CREATE_PRODUCTS_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS products (
        id SERIAL PRIMARY KEY,
        name VARCHAR(100) NOT NULL,
        image VARCHAR(255) NOT NULL,
        price DECIMAL(10, 2) NOT NULL,
        created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
    )
"#;

/// Owns construction and bootstrap of the PostgreSQL pool
pub struct DatabaseManager;

impl DatabaseManager {
    /// Build the pool lazily; connections are opened on first use
    pub fn connect(config: &DatabaseConfig) -> Result<PgPool, DatabaseError> {
        let url = config
            .url
            .as_deref()
            .ok_or(DatabaseError::ConfigMissing("DATABASE_URL"))?;
        Self::validate_url(url)?;

        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(config.connection_timeout))
            .connect_lazy(url)?;

        info!("Created database pool for: {}", Self::redact(url));
        Ok(pool)
    }

    /// Create the products table if missing. Failure is logged, never fatal.
    pub async fn init_schema(pool: &PgPool) {
        match sqlx::query(CREATE_PRODUCTS_TABLE).execute(pool).await {
            Ok(_) => info!("Database initialized successfully"),
            Err(e) => error!("Error in DB {}", e),
        }
    }

    /// Pings the pool to ensure connectivity
    pub async fn health_check(pool: &PgPool) -> Result<(), DatabaseError> {
        sqlx::query("SELECT 1").execute(pool).await?;
        Ok(())
    }

    fn validate_url(url: &str) -> Result<(), DatabaseError> {
        let parsed = url::Url::parse(url).map_err(|_| DatabaseError::InvalidDatabaseUrl)?;
        match parsed.scheme() {
            "postgres" | "postgresql" => Ok(()),
            _ => Err(DatabaseError::InvalidDatabaseUrl),
        }
    }

    /// Connection string with the password masked, for logs
    fn redact(url: &str) -> String {
        match url::Url::parse(url) {
            Ok(mut parsed) => {
                if parsed.password().is_some() {
                    let _ = parsed.set_password(Some("****"));
                }
                parsed.into()
            }
            Err(_) => "<invalid url>".to_string(),
        }
    }
}
