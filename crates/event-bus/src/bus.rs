//! The event bus.

use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use serde_json::{Map, Value};

use crate::error::Result;
use crate::handler::Handler;
use crate::selector::Selector;

/// Event payload carried by the bus.
pub type Payload = Value;

#[derive(Debug, Clone)]
struct Subscription {
    selector: Selector,
    handler: Handler,
}

/// Synchronous publish/subscribe mediator.
///
/// Cloning an `EventBus` yields another handle to the same subscriber list;
/// one bus is created per session and handed to every component that needs
/// it.
#[derive(Clone, Default)]
pub struct EventBus {
    subscriptions: Arc<RwLock<Vec<Subscription>>>,
}

impl EventBus {
    /// Creates a bus with no subscribers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `handler` for every emission `selector` matches.
    ///
    /// Subscribing the same (selector, handler) pair twice is a no-op.
    pub fn subscribe(&self, selector: Selector, handler: Handler) {
        let mut subscriptions = self.write();
        if subscriptions
            .iter()
            .any(|s| s.selector == selector && s.handler == handler)
        {
            tracing::trace!(%selector, "subscription already registered");
            return;
        }
        tracing::trace!(%selector, "subscribed");
        subscriptions.push(Subscription { selector, handler });
    }

    /// Subscribes to one exact event name.
    pub fn on(&self, event: impl Into<String>, handler: Handler) {
        self.subscribe(Selector::exact(event), handler);
    }

    /// Subscribes to every event whose name matches `pattern`.
    pub fn on_pattern(&self, pattern: &str, handler: Handler) -> Result<()> {
        self.subscribe(Selector::pattern(pattern)?, handler);
        Ok(())
    }

    /// Subscribes to every event. Intended for diagnostics.
    pub fn subscribe_all(&self, handler: Handler) {
        self.subscribe(Selector::All, handler);
    }

    /// Removes a prior registration. No-op if absent.
    pub fn unsubscribe(&self, selector: &Selector, handler: &Handler) {
        self.write()
            .retain(|s| !(s.selector == *selector && s.handler == *handler));
    }

    /// Removes an exact-name registration.
    pub fn off(&self, event: &str, handler: &Handler) {
        self.unsubscribe(&Selector::exact(event), handler);
    }

    /// Drops every subscription.
    pub fn clear(&self) {
        self.write().clear();
    }

    /// Returns the number of registered subscriptions.
    pub fn subscription_count(&self) -> usize {
        self.read().len()
    }

    /// Emits `event` to every matching handler, in subscription order.
    ///
    /// Matching handlers are collected before the first one runs and the
    /// subscriber lock is released during dispatch, so changes made by a
    /// handler only take effect for later emissions.
    pub fn emit(&self, event: &str, payload: Payload) {
        let handlers: Vec<Handler> = self
            .read()
            .iter()
            .filter(|s| s.selector.matches(event))
            .map(|s| s.handler.clone())
            .collect();

        metrics::counter!("event_bus_events_emitted_total").increment(1);
        tracing::trace!(event, handlers = handlers.len(), "dispatching event");

        for handler in &handlers {
            handler.call(event, &payload);
        }
    }

    /// Returns a callback that emits `event` with its argument merged with
    /// `context`.
    ///
    /// Keys in `context` override keys of the same name in the argument.
    /// Arguments that are not JSON objects contribute no keys.
    pub fn trigger(
        &self,
        event: impl Into<String>,
        context: Payload,
    ) -> impl Fn(Payload) + Send + Sync + 'static {
        let bus = self.clone();
        let event = event.into();
        move |occurrence| bus.emit(&event, merge(occurrence, &context))
    }

    fn read(&self) -> RwLockReadGuard<'_, Vec<Subscription>> {
        self.subscriptions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Vec<Subscription>> {
        self.subscriptions
            .write()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("subscriptions", &self.subscription_count())
            .finish()
    }
}

fn merge(occurrence: Payload, context: &Payload) -> Payload {
    let mut merged = match occurrence {
        Value::Object(map) => map,
        _ => Map::new(),
    };
    if let Value::Object(context) = context {
        for (key, value) in context {
            merged.insert(key.clone(), value.clone());
        }
    }
    Value::Object(merged)
}
