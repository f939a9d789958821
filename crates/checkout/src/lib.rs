//! Checkout orchestration for the storefront core.
//!
//! This crate connects the application state to the outside world:
//! - `ProductSource` and `OrderSink` ports with in-memory and file adapters
//! - `CheckoutCoordinator`, which loads the catalog and submits orders
//! - `glue::bind`, which forwards view-layer bus events into state commands
//!
//! Order submission is the only asynchronous step. Basket and order are left
//! untouched until the sink confirms, and a second submission is rejected
//! while one is pending.

pub mod coordinator;
pub mod error;
pub mod events;
pub mod glue;
pub mod services;

pub use coordinator::CheckoutCoordinator;
pub use error::{CheckoutError, Result};
pub use glue::{Bindings, bind};
pub use services::{
    InMemoryOrderSink, InMemoryProductSource, JsonFileProductSource, OrderConfirmation,
    OrderSink, PlacedOrder, ProductSource,
};
