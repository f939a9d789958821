//! Checkout error types.

use domain::{DomainError, FormErrors};
use event_bus::BusError;
use thiserror::Error;

/// Errors that can occur during checkout operations.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// The product source failed.
    #[error("Product source error: {0}")]
    ProductSource(String),

    /// The order sink rejected or failed the submission.
    #[error("Order sink error: {0}")]
    OrderSink(String),

    /// An order submission is already pending.
    #[error("An order submission is already in progress")]
    SubmissionInProgress,

    /// There is nothing to order.
    #[error("Basket is empty")]
    EmptyBasket,

    /// The order draft has invalid fields.
    #[error("Order has {} invalid field(s)", .0.len())]
    InvalidOrder(FormErrors),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Domain error.
    #[error("Domain error: {0}")]
    Domain(#[from] DomainError),

    /// Event bus error.
    #[error("Event bus error: {0}")]
    Bus(#[from] BusError),
}

/// Convenience type alias for checkout results.
pub type Result<T> = std::result::Result<T, CheckoutError>;
