//! Shared event handler handles.

use std::sync::Arc;

use crate::bus::Payload;

type HandlerFn = dyn Fn(&str, &Payload) + Send + Sync;

/// A subscribed callback.
///
/// Handlers are reference-counted; clones of the same handler compare equal,
/// which is what makes subscription idempotent per (selector, handler) pair
/// and lets a caller unsubscribe with the handle it subscribed with.
#[derive(Clone)]
pub struct Handler(Arc<HandlerFn>);

impl Handler {
    /// Wraps a closure receiving the event name and payload.
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&str, &Payload) + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    /// Wraps a closure that only cares about the payload.
    pub fn from_payload<F>(f: F) -> Self
    where
        F: Fn(&Payload) + Send + Sync + 'static,
    {
        Self::new(move |_, payload| f(payload))
    }

    /// Invokes the handler.
    pub fn call(&self, event: &str, payload: &Payload) {
        (self.0)(event, payload)
    }
}

impl PartialEq for Handler {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for Handler {}

impl std::fmt::Debug for Handler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Handler({:p})", Arc::as_ptr(&self.0) as *const ())
    }
}
