use thiserror::Error;

/// Errors that can occur when registering subscriptions.
#[derive(Debug, Error)]
pub enum BusError {
    /// A pattern selector could not be compiled.
    #[error("Invalid event pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

/// Result type for event bus operations.
pub type Result<T> = std::result::Result<T, BusError>;
