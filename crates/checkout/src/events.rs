//! View-layer events consumed by the glue, and the events it publishes.

use domain::{OrderField, PaymentMethod, Product, ProductId};
use serde::{Deserialize, Serialize};

/// A catalog card was clicked. Payload: product data.
pub const CARD_SELECT: &str = "card:select";

/// The preview's add button was clicked. Payload: product data.
pub const CARD_ADD: &str = "card:add";

/// A basket line's remove button was clicked. Payload: product data.
pub const CARD_REMOVE: &str = "card:remove";

/// A payment button was toggled. Payload: [`PaymentChangeData`].
pub const PAYMENT_CHANGE: &str = "payment:change";

/// Address-step field edits, e.g. `order.address:change`. Payload: [`FieldChangeData`].
pub const ORDER_FIELD_CHANGE: &str = r"^order\..*:change";

/// Contacts-step field edits, e.g. `contacts.email:change`. Payload: [`FieldChangeData`].
pub const CONTACTS_FIELD_CHANGE: &str = r"^contacts\..*:change";

/// The address step was confirmed.
pub const ORDER_SUBMIT: &str = "order:submit";

/// The contacts step was confirmed; the order is sent.
pub const CONTACTS_SUBMIT: &str = "contacts:submit";

/// Basket contents changed. Payload: [`BasketChangedData`].
pub const BASKET_CHANGED: &str = "basket:changed";

/// The order sink confirmed an order. Payload: [`crate::OrderConfirmation`].
pub const ORDER_PLACED: &str = "order:placed";

/// The order sink failed. Payload: [`OrderFailedData`].
pub const ORDER_FAILED: &str = "order:failed";

/// Data for card events. Only the id is read; other keys are ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardData {
    pub id: ProductId,
}

/// Data for field change events.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldChangeData {
    pub field: OrderField,
    pub value: String,
}

/// Data for `payment:change`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentChangeData {
    pub payment: PaymentMethod,
}

/// Data for `basket:changed`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BasketChangedData {
    /// Basket entries in insertion order.
    pub items: Vec<Product>,

    /// Number of entries, shown on the header counter.
    pub count: usize,

    /// Current total of the ordered items.
    pub total: u64,
}

/// Data for `order:failed`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderFailedData {
    pub error: String,
}
