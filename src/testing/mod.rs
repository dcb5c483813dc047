use std::str::FromStr;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;

use crate::client::{ClientError, FormData, ProductApi};
use crate::database::models::{Product, ProductFields};
use crate::database::{DatabaseError, ProductRepository};
use crate::protect::{Decision, DecisionProvider, ProtectError, RequestDetails};

fn timestamp(offset_secs: i64) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 1, 1)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|t| t + chrono::Duration::seconds(offset_secs))
        .unwrap_or_default()
}

/// A 19.99 product whose creation time grows with its id
pub fn product(id: i32, name: &str) -> Product {
    Product {
        id,
        name: name.to_string(),
        image: format!("{}.png", name.to_lowercase()),
        price: Decimal::new(1999, 2),
        created_at: timestamp(id as i64),
    }
}

fn db_error(message: &str) -> DatabaseError {
    DatabaseError::Sqlx(sqlx::Error::Protocol(message.to_string()))
}

/// In-memory stand-in for the products table with the same type coercions
#[derive(Default)]
pub struct MemoryProductRepository {
    rows: Mutex<Vec<Product>>,
    next_id: Mutex<i32>,
    offline: bool,
}

impl MemoryProductRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every call fails as if the database were unreachable
    pub fn offline() -> Self {
        Self {
            offline: true,
            ..Self::default()
        }
    }

    pub fn len(&self) -> usize {
        self.rows.lock().map(|rows| rows.len()).unwrap_or(0)
    }

    fn check_online(&self) -> Result<(), DatabaseError> {
        if self.offline {
            return Err(db_error("connection refused"));
        }
        Ok(())
    }

    fn parse_id(id: &str) -> Result<i32, DatabaseError> {
        id.parse()
            .map_err(|_| db_error(&format!("invalid input syntax for type integer: \"{}\"", id)))
    }

    fn row_values(fields: ProductFields) -> Result<(String, String, Decimal), DatabaseError> {
        let name = fields.name.ok_or_else(|| db_error("null value in column \"name\""))?;
        let image = fields.image.ok_or_else(|| db_error("null value in column \"image\""))?;
        let price = fields.price.ok_or_else(|| db_error("null value in column \"price\""))?;
        let price = Decimal::from_str(&price)
            .map_err(|_| db_error(&format!("invalid input syntax for type numeric: \"{}\"", price)))?;
        Ok((name, image, price.round_dp(2)))
    }
}

#[async_trait]
impl ProductRepository for MemoryProductRepository {
    async fn list(&self) -> Result<Vec<Product>, DatabaseError> {
        self.check_online()?;
        let mut rows = self.rows.lock().map_err(|_| db_error("poisoned"))?.clone();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(rows)
    }

    async fn create(&self, fields: ProductFields) -> Result<Product, DatabaseError> {
        self.check_online()?;
        let (name, image, price) = Self::row_values(fields)?;
        let mut next_id = self.next_id.lock().map_err(|_| db_error("poisoned"))?;
        *next_id += 1;
        let product = Product {
            id: *next_id,
            name,
            image,
            price,
            created_at: timestamp(*next_id as i64),
        };
        self.rows
            .lock()
            .map_err(|_| db_error("poisoned"))?
            .push(product.clone());
        Ok(product)
    }

    async fn find(&self, id: &str) -> Result<Option<Product>, DatabaseError> {
        self.check_online()?;
        let id = Self::parse_id(id)?;
        let rows = self.rows.lock().map_err(|_| db_error("poisoned"))?;
        Ok(rows.iter().find(|p| p.id == id).cloned())
    }

    async fn update(&self, id: &str, fields: ProductFields) -> Result<Option<Product>, DatabaseError> {
        self.check_online()?;
        let id = Self::parse_id(id)?;
        let mut rows = self.rows.lock().map_err(|_| db_error("poisoned"))?;
        let Some(row) = rows.iter_mut().find(|p| p.id == id) else {
            return Ok(None);
        };
        let (name, image, price) = Self::row_values(fields)?;
        row.name = name;
        row.image = image;
        row.price = price;
        Ok(Some(row.clone()))
    }

    async fn delete(&self, id: &str) -> Result<Option<Product>, DatabaseError> {
        self.check_online()?;
        let id = Self::parse_id(id)?;
        let mut rows = self.rows.lock().map_err(|_| db_error("poisoned"))?;
        let position = rows.iter().position(|p| p.id == id);
        Ok(position.map(|i| rows.remove(i)))
    }

    async fn health_check(&self) -> Result<(), DatabaseError> {
        self.check_online()
    }
}

/// Decision provider that answers every call with the same outcome
pub struct ScriptedProvider {
    decision: Option<Decision>,
    calls: Mutex<Vec<u32>>,
}

impl ScriptedProvider {
    pub fn deciding(decision: serde_json::Value) -> Self {
        Self {
            decision: serde_json::from_value(decision).ok(),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn failing() -> Self {
        Self {
            decision: None,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Tokens requested per call, in call order
    pub fn calls(&self) -> Vec<u32> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl DecisionProvider for ScriptedProvider {
    async fn protect(&self, _request: &RequestDetails, requested: u32) -> Result<Decision, ProtectError> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(requested);
        }
        self.decision.clone().ok_or(ProtectError::MissingKey)
    }
}

#[derive(Default)]
struct StubState {
    products: Vec<Product>,
    fail_next: Option<Option<String>>,
}

/// Client-side API double. Clones share one product list.
#[derive(Clone, Default)]
pub struct StubProductApi {
    inner: Arc<Mutex<StubState>>,
}

impl StubProductApi {
    /// Products in list order (newest first)
    pub fn with_products(products: Vec<Product>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(StubState {
                products,
                fail_next: None,
            })),
        }
    }

    /// The next call fails with a 400 carrying `message` as the server error
    pub fn fail_next(&self, message: Option<&str>) {
        if let Ok(mut inner) = self.inner.lock() {
            inner.fail_next = Some(message.map(str::to_string));
        }
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, StubState>, ClientError> {
        let mut inner = self.inner.lock().map_err(|_| ClientError::MissingData)?;
        if let Some(message) = inner.fail_next.take() {
            return Err(ClientError::Status { status: 400, message });
        }
        Ok(inner)
    }

    fn from_form(id: i32, form: &FormData) -> Result<Product, ClientError> {
        let price = Decimal::from_str(&form.price).map_err(|_| ClientError::Status {
            status: 400,
            message: Some("Error creating product: invalid price".to_string()),
        })?;
        Ok(Product {
            id,
            name: form.name.clone(),
            image: form.image.clone(),
            price,
            created_at: timestamp(id as i64),
        })
    }
}

#[async_trait]
impl ProductApi for StubProductApi {
    async fn list(&self) -> Result<Vec<Product>, ClientError> {
        Ok(self.lock()?.products.clone())
    }

    async fn get(&self, id: i32) -> Result<Option<Product>, ClientError> {
        Ok(self.lock()?.products.iter().find(|p| p.id == id).cloned())
    }

    async fn create(&self, form: &FormData) -> Result<Product, ClientError> {
        let mut inner = self.lock()?;
        let id = inner.products.iter().map(|p| p.id).max().unwrap_or(0) + 1;
        let product = Self::from_form(id, form)?;
        inner.products.insert(0, product.clone());
        Ok(product)
    }

    async fn update(&self, id: i32, form: &FormData) -> Result<Product, ClientError> {
        let mut inner = self.lock()?;
        let updated = Self::from_form(id, form)?;
        match inner.products.iter_mut().find(|p| p.id == id) {
            Some(existing) => {
                existing.name = updated.name;
                existing.image = updated.image;
                existing.price = updated.price;
                Ok(existing.clone())
            }
            None => Err(ClientError::Status {
                status: 404,
                message: None,
            }),
        }
    }

    async fn delete(&self, id: i32) -> Result<Option<Product>, ClientError> {
        let mut inner = self.lock()?;
        let position = inner.products.iter().position(|p| p.id == id);
        Ok(position.map(|i| inner.products.remove(i)))
    }
}
