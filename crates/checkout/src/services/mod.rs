//! External collaborator traits and their implementations.

pub mod order_sink;
pub mod product_source;

pub use order_sink::{InMemoryOrderSink, OrderConfirmation, OrderSink, PlacedOrder};
pub use product_source::{InMemoryProductSource, JsonFileProductSource, ProductSource};
