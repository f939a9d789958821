//! Names and payloads of events published by the application state.

use serde::{Deserialize, Serialize};

use crate::catalog::Product;

/// The catalog was replaced. Payload: [`ItemsChangedData`].
pub const ITEMS_CHANGED: &str = "items:changed";

/// A product is being previewed. Payload: the [`Product`].
pub const PREVIEW_CHANGED: &str = "preview:changed";

/// Form errors were recomputed. Payload: [`crate::FormErrors`].
pub const FORM_ERRORS_CHANGE: &str = "formErrors:change";

/// The current step of the order form is valid. Payload: [`crate::OrderDraft`].
pub const ORDER_READY: &str = "order:ready";

/// Data for `items:changed`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemsChangedData {
    /// The new catalog.
    pub catalog: Vec<Product>,
}
