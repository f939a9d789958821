//! Application error types.

use checkout::CheckoutError;
use thiserror::Error;

/// Errors raised while starting or running a session.
#[derive(Debug, Error)]
pub enum AppError {
    /// The global tracing subscriber could not be installed.
    #[error("Failed to initialise tracing: {0}")]
    Tracing(#[from] tracing_subscriber::util::TryInitError),

    /// The metrics recorder could not be installed.
    #[error("Failed to install metrics recorder: {0}")]
    Metrics(#[from] metrics_exporter_prometheus::BuildError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Checkout error: {0}")]
    Checkout(#[from] CheckoutError),
}

/// Result type for application operations.
pub type Result<T> = std::result::Result<T, AppError>;
