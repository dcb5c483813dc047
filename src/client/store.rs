use serde::Serialize;
use tracing::debug;

use super::api::{ClientError, ProductApi};
use super::state::{FormPatch, StoreState};

const FETCH_PRODUCTS_FAILED: &str = "Failed to fetch products. Please try again.";
const FETCH_PRODUCT_FAILED: &str = "Failed to fetch product. Please try again.";
const ADD_FAILED: &str = "Failed to add product. Please try again.";
const UPDATE_FAILED: &str = "Failed to update product. Please try again.";
const DELETE_FAILED: &str = "Failed to delete product. Please try again.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ToastLevel {
    Success,
    Error,
}

/// Side effects a front end has to carry out after an action
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "effect", rename_all = "snake_case")]
pub enum UiEffect {
    Toast { level: ToastLevel, message: String },
    CloseAddProductModal,
}

/// Context object holding the current snapshot and the API it acts through
pub struct ProductStore<A> {
    api: A,
    state: StoreState,
    effects: Vec<UiEffect>,
}

impl<A: ProductApi> ProductStore<A> {
    pub fn new(api: A) -> Self {
        Self {
            api,
            state: StoreState::default(),
            effects: Vec::new(),
        }
    }

    pub fn state(&self) -> &StoreState {
        &self.state
    }

    /// Drain queued effects in the order they were produced
    pub fn take_effects(&mut self) -> Vec<UiEffect> {
        std::mem::take(&mut self.effects)
    }

    fn apply(&mut self, transition: impl FnOnce(StoreState) -> StoreState) {
        let current = std::mem::take(&mut self.state);
        self.state = transition(current);
    }

    fn toast(&mut self, level: ToastLevel, message: impl Into<String>) {
        self.effects.push(UiEffect::Toast {
            level,
            message: message.into(),
        });
    }

    /// Toast the server's own error text, falling back to the fixed message
    fn toast_failure(&mut self, error: &ClientError, fallback: &str) {
        let message = error.server_message().unwrap_or(fallback).to_string();
        self.toast(ToastLevel::Error, message);
    }

    pub fn set_form_data(&mut self, patch: FormPatch) {
        self.apply(|s| s.with_form_patch(patch));
    }

    pub fn reset_form_data(&mut self) {
        self.apply(StoreState::with_reset_form);
    }

    pub async fn fetch_products(&mut self) {
        self.apply(StoreState::begin);
        match self.api.list().await {
            Ok(products) => self.apply(|s| s.with_products(products)),
            Err(e) => {
                debug!("fetch products failed: {}", e);
                self.apply(|s| s.failed(FETCH_PRODUCTS_FAILED));
            }
        }
        self.apply(StoreState::finish);
    }

    pub async fn fetch_product(&mut self, id: i32) {
        self.apply(StoreState::begin);
        match self.api.get(id).await {
            Ok(product) => self.apply(|s| s.with_current_product(product)),
            Err(e) => {
                debug!("fetch product {} failed: {}", id, e);
                self.apply(|s| s.failed(FETCH_PRODUCT_FAILED).without_current_product());
                self.toast(ToastLevel::Error, FETCH_PRODUCT_FAILED);
            }
        }
        self.apply(StoreState::finish);
    }

    /// Submit the form as a new product. The add dialog is dismissed either way.
    pub async fn add_product(&mut self) {
        self.apply(StoreState::begin);
        let form = self.state.form_data.clone();
        match self.api.create(&form).await {
            Ok(_) => {
                self.fetch_products().await;
                self.reset_form_data();
                self.toast(ToastLevel::Success, "Product added successfully!");
            }
            Err(e) => {
                debug!("add product failed: {}", e);
                self.apply(|s| s.failed(ADD_FAILED));
                self.toast_failure(&e, ADD_FAILED);
            }
        }
        self.apply(StoreState::finish);
        self.effects.push(UiEffect::CloseAddProductModal);
    }

    pub async fn update_product(&mut self, id: i32) {
        self.apply(StoreState::begin);
        let form = self.state.form_data.clone();
        match self.api.update(id, &form).await {
            Ok(_) => {
                self.fetch_products().await;
                self.toast(ToastLevel::Success, "Product updated successfully!");
            }
            Err(e) => {
                debug!("update product {} failed: {}", id, e);
                self.apply(|s| s.failed(UPDATE_FAILED));
                self.toast_failure(&e, UPDATE_FAILED);
            }
        }
        self.apply(StoreState::finish);
    }

    /// Removes the local entry only after the server confirmed the delete
    pub async fn delete_product(&mut self, id: i32) {
        self.apply(StoreState::begin);
        match self.api.delete(id).await {
            Ok(_) => self.apply(|s| s.without_product(id)),
            Err(e) => {
                debug!("delete product {} failed: {}", id, e);
                self.apply(|s| s.failed(DELETE_FAILED));
                self.toast_failure(&e, DELETE_FAILED);
            }
        }
        self.apply(StoreState::finish);
    }
}
