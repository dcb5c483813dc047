//! Client-side product store.
//!
//! [`StoreState`] is an immutable snapshot with pure transitions,
//! [`ProductStore`] runs the async actions against a [`ProductApi`] and
//! queues [`UiEffect`]s for whatever front end renders it.

pub mod api;
pub mod state;
pub mod store;

pub use api::{ClientError, HttpProductApi, ProductApi, DEFAULT_BASE_URL};
pub use state::{FormData, FormPatch, StoreState};
pub use store::{ProductStore, ToastLevel, UiEffect};
