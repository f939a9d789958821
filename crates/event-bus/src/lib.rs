//! Publish/subscribe mediator connecting state mutations to reactive consumers.
//!
//! Subscriptions are keyed by a [`Selector`]: an exact event name, a regular
//! expression matched against emitted names, or a catch-all. Dispatch is
//! synchronous and runs over a snapshot of the subscriber list, so handlers
//! may emit, subscribe or unsubscribe while an emission is in progress.

pub mod bus;
pub mod error;
pub mod handler;
pub mod selector;

pub use bus::{EventBus, Payload};
pub use error::{BusError, Result};
pub use handler::Handler;
pub use selector::Selector;
