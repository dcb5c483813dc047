use serde::{Deserialize, Serialize};

use crate::database::models::Product;

/// The add/edit form. Values stay as typed by the user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormData {
    pub name: String,
    pub price: String,
    pub image: String,
}

impl From<&Product> for FormData {
    fn from(product: &Product) -> Self {
        Self {
            name: product.name.clone(),
            price: product.price.to_string(),
            image: product.image.clone(),
        }
    }
}

/// Partial form update; `None` keeps the current value
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormPatch {
    pub name: Option<String>,
    pub price: Option<String>,
    pub image: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StoreState {
    pub products: Vec<Product>,
    pub loading: bool,
    pub error: Option<String>,
    pub current_product: Option<Product>,
    pub form_data: FormData,
}

impl StoreState {
    pub fn begin(self) -> Self {
        Self { loading: true, ..self }
    }

    pub fn finish(self) -> Self {
        Self { loading: false, ..self }
    }

    pub fn failed(self, message: &str) -> Self {
        Self {
            error: Some(message.to_string()),
            ..self
        }
    }

    pub fn with_products(self, products: Vec<Product>) -> Self {
        Self {
            products,
            error: None,
            ..self
        }
    }

    /// Loads the product into both the detail slot and the form
    pub fn with_current_product(self, product: Option<Product>) -> Self {
        let form_data = product.as_ref().map(FormData::from).unwrap_or_default();
        Self {
            current_product: product,
            form_data,
            error: None,
            ..self
        }
    }

    pub fn without_current_product(self) -> Self {
        Self {
            current_product: None,
            ..self
        }
    }

    pub fn without_product(self, id: i32) -> Self {
        let products = self.products.into_iter().filter(|p| p.id != id).collect();
        Self {
            products,
            error: None,
            ..self
        }
    }

    pub fn with_form_patch(self, patch: FormPatch) -> Self {
        let current = self.form_data;
        let form_data = FormData {
            name: patch.name.unwrap_or(current.name),
            price: patch.price.unwrap_or(current.price),
            image: patch.image.unwrap_or(current.image),
        };
        Self { form_data, ..self }
    }

    pub fn with_reset_form(self) -> Self {
        Self {
            form_data: FormData::default(),
            ..self
        }
    }
}
