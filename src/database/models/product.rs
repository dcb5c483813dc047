use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Product {
    pub id: i32,
    pub name: String,
    pub image: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    pub created_at: NaiveDateTime,
}

/// Request body for create and update. Fields stay untyped JSON so that
/// whatever the client sent reaches the database as-is.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductPayload {
    #[serde(default)]
    pub name: Option<Value>,
    #[serde(default)]
    pub image: Option<Value>,
    #[serde(default)]
    pub price: Option<Value>,
}

/// Column values bound as text parameters; `None` binds SQL NULL.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductFields {
    pub name: Option<String>,
    pub image: Option<String>,
    pub price: Option<String>,
}

impl ProductPayload {
    /// All of name, image and price present and truthy
    pub fn has_required_fields(&self) -> bool {
        is_truthy(self.name.as_ref()) && is_truthy(self.image.as_ref()) && is_truthy(self.price.as_ref())
    }

    pub fn into_fields(self) -> ProductFields {
        ProductFields {
            name: self.name.and_then(bind_text),
            image: self.image.and_then(bind_text),
            price: self.price.and_then(bind_text),
        }
    }
}

/// Falsy values: absent, null, false, 0, NaN and the empty string.
pub fn is_truthy(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().map(|f| f != 0.0 && !f.is_nan()).unwrap_or(true),
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Array(_)) | Some(Value::Object(_)) => true,
    }
}

fn bind_text(value: Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s),
        other => Some(other.to_string()),
    }
}
