//! Domain error types.

use thiserror::Error;

/// Errors that can occur during domain operations.
///
/// Field validation failures are not errors: they are reported through
/// `formErrors:change` and never surface as `Err`.
#[derive(Debug, Error)]
pub enum DomainError {
    /// Entity data did not fit the entity schema.
    #[error("Entity data does not match schema: {0}")]
    Schema(#[source] serde_json::Error),

    /// Entity data was not a JSON object.
    #[error("Entity data must be an object, got {0}")]
    NotAnObject(&'static str),

    /// Unknown payment method name.
    #[error("Unknown payment method: {0}")]
    UnknownPaymentMethod(String),

    /// Unknown order field name.
    #[error("Unknown order field: {0}")]
    UnknownField(String),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Convenience type alias for domain results.
pub type Result<T> = std::result::Result<T, DomainError>;
