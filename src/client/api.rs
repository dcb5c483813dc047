use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use thiserror::Error;
use url::Url;

use super::state::FormData;
use crate::database::models::Product;

/// Where the API lives during local development
pub const DEFAULT_BASE_URL: &str = "http://localhost:3000";

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Invalid server URL: {0}")]
    InvalidUrl(String),

    /// Non-2xx answer; `message` is the server's `error` text when it sent one
    #[error("Request failed with status {status}")]
    Status { status: u16, message: Option<String> },

    #[error("Response did not contain data")]
    MissingData,

    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

impl ClientError {
    pub fn server_message(&self) -> Option<&str> {
        match self {
            ClientError::Status { message, .. } => message.as_deref(),
            _ => None,
        }
    }
}

/// The five product endpoints as seen from a client
#[async_trait]
pub trait ProductApi: Send + Sync {
    async fn list(&self) -> Result<Vec<Product>, ClientError>;

    async fn get(&self, id: i32) -> Result<Option<Product>, ClientError>;

    async fn create(&self, form: &FormData) -> Result<Product, ClientError>;

    async fn update(&self, id: i32, form: &FormData) -> Result<Product, ClientError>;

    async fn delete(&self, id: i32) -> Result<Option<Product>, ClientError>;
}

#[derive(Debug, Deserialize)]
struct Envelope<T> {
    data: Option<T>,
    error: Option<String>,
}

/// reqwest-backed client for `{base}/api/products`
pub struct HttpProductApi {
    client: reqwest::Client,
    products_url: Url,
}

impl HttpProductApi {
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        let mut base = Url::parse(base_url).map_err(|e| ClientError::InvalidUrl(format!("{}: {}", base_url, e)))?;
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        let products_url = base
            .join("api/products")
            .map_err(|e| ClientError::InvalidUrl(e.to_string()))?;

        Ok(Self {
            client: reqwest::Client::new(),
            products_url,
        })
    }

    pub fn products_url(&self) -> &Url {
        &self.products_url
    }

    fn record_url(&self, id: i32) -> String {
        format!("{}/{}", self.products_url, id)
    }

    async fn read<T: DeserializeOwned>(response: reqwest::Response) -> Result<Option<T>, ClientError> {
        let status = response.status();
        if !status.is_success() {
            // Body may not be JSON at all (proxies, static 404 pages)
            let message = response
                .json::<Envelope<serde_json::Value>>()
                .await
                .ok()
                .and_then(|envelope| envelope.error);
            return Err(ClientError::Status {
                status: status.as_u16(),
                message,
            });
        }
        let envelope = response.json::<Envelope<T>>().await?;
        Ok(envelope.data)
    }
}

#[async_trait]
impl ProductApi for HttpProductApi {
    async fn list(&self) -> Result<Vec<Product>, ClientError> {
        let response = self.client.get(self.products_url.clone()).send().await?;
        Ok(Self::read(response).await?.unwrap_or_default())
    }

    async fn get(&self, id: i32) -> Result<Option<Product>, ClientError> {
        let response = self.client.get(self.record_url(id)).send().await?;
        Self::read(response).await
    }

    async fn create(&self, form: &FormData) -> Result<Product, ClientError> {
        let response = self
            .client
            .post(self.products_url.clone())
            .json(form)
            .send()
            .await?;
        Self::read(response).await?.ok_or(ClientError::MissingData)
    }

    async fn update(&self, id: i32, form: &FormData) -> Result<Product, ClientError> {
        let response = self.client.put(self.record_url(id)).json(form).send().await?;
        Self::read(response).await?.ok_or(ClientError::MissingData)
    }

    async fn delete(&self, id: i32) -> Result<Option<Product>, ClientError> {
        let response = self.client.delete(self.record_url(id)).send().await?;
        Self::read(response).await
    }
}
