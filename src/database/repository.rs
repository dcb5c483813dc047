use async_trait::async_trait;
use sqlx::PgPool;

use crate::database::manager::{DatabaseError, DatabaseManager};
use crate::database::models::{Product, ProductFields};

/// Data access for the products table. Every method runs exactly one statement.
#[async_trait]
pub trait ProductRepository: Send + Sync {
    async fn list(&self) -> Result<Vec<Product>, DatabaseError>;

    async fn create(&self, fields: ProductFields) -> Result<Product, DatabaseError>;

    /// `id` is passed through unparsed; a malformed id is a data-layer error
    async fn find(&self, id: &str) -> Result<Option<Product>, DatabaseError>;

    async fn update(&self, id: &str, fields: ProductFields) -> Result<Option<Product>, DatabaseError>;

    async fn delete(&self, id: &str) -> Result<Option<Product>, DatabaseError>;

    async fn health_check(&self) -> Result<(), DatabaseError>;
}

pub struct PgProductRepository {
    pool: PgPool,
}

impl PgProductRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const COLUMNS: &str = "id, name, image, price, created_at";

#[async_trait]
impl ProductRepository for PgProductRepository {
    async fn list(&self) -> Result<Vec<Product>, DatabaseError> {
        let sql = format!("SELECT {COLUMNS} FROM products ORDER BY created_at DESC");
        let products = sqlx::query_as::<_, Product>(&sql)
            .fetch_all(&self.pool)
            .await?;
        tracing::debug!("fetched products: {}", products.len());
        Ok(products)
    }

    async fn create(&self, fields: ProductFields) -> Result<Product, DatabaseError> {
        let sql = format!(
            "INSERT INTO products (name, image, price) VALUES ($1, $2, $3::numeric) RETURNING {COLUMNS}"
        );
        let product = sqlx::query_as::<_, Product>(&sql)
            .bind(fields.name)
            .bind(fields.image)
            .bind(fields.price)
            .fetch_one(&self.pool)
            .await?;
        Ok(product)
    }

    async fn find(&self, id: &str) -> Result<Option<Product>, DatabaseError> {
        let sql = format!("SELECT {COLUMNS} FROM products WHERE id = $1::integer");
        let product = sqlx::query_as::<_, Product>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(product)
    }

    async fn update(&self, id: &str, fields: ProductFields) -> Result<Option<Product>, DatabaseError> {
        let sql = format!(
            "UPDATE products SET name = $1, image = $2, price = $3::numeric WHERE id = $4::integer RETURNING {COLUMNS}"
        );
        let product = sqlx::query_as::<_, Product>(&sql)
            .bind(fields.name)
            .bind(fields.image)
            .bind(fields.price)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(product)
    }

    async fn delete(&self, id: &str) -> Result<Option<Product>, DatabaseError> {
        let sql = format!("DELETE FROM products WHERE id = $1::integer RETURNING {COLUMNS}");
        let product = sqlx::query_as::<_, Product>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(product)
    }

    async fn health_check(&self) -> Result<(), DatabaseError> {
        DatabaseManager::health_check(&self.pool).await
    }
}
