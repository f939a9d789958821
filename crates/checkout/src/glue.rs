//! Bus bindings translating view-layer events into state commands.

use std::sync::Arc;

use domain::{AppState, Observable, ProductItem};
use event_bus::{EventBus, Handler, Selector};
use serde::de::DeserializeOwned;

use crate::coordinator::CheckoutCoordinator;
use crate::error::Result;
use crate::events::{
    BASKET_CHANGED, BasketChangedData, CARD_ADD, CARD_REMOVE, CARD_SELECT, CONTACTS_FIELD_CHANGE,
    CONTACTS_SUBMIT, CardData, FieldChangeData, ORDER_FIELD_CHANGE, ORDER_SUBMIT, PAYMENT_CHANGE,
    PaymentChangeData,
};
use crate::services::{OrderSink, ProductSource};

/// Subscriptions registered by [`bind`].
///
/// Handlers hold the state and coordinator, and the state holds the bus, so
/// the bindings live until [`Bindings::unbind`] or [`EventBus::clear`].
#[derive(Debug)]
pub struct Bindings {
    events: EventBus,
    subscriptions: Vec<(Selector, Handler)>,
}

impl Bindings {
    /// Returns the number of registered subscriptions.
    pub fn len(&self) -> usize {
        self.subscriptions.len()
    }

    /// Returns true if nothing was registered.
    pub fn is_empty(&self) -> bool {
        self.subscriptions.is_empty()
    }

    /// Removes every subscription registered by [`bind`].
    pub fn unbind(self) {
        for (selector, handler) in &self.subscriptions {
            self.events.unsubscribe(selector, handler);
        }
    }

    fn add(&mut self, selector: Selector, handler: Handler) {
        self.events.subscribe(selector.clone(), handler.clone());
        self.subscriptions.push((selector, handler));
    }
}

/// Subscribes the checkout glue to the coordinator's bus.
///
/// `contacts:submit` spawns the submission onto the current tokio runtime;
/// outside a runtime it is logged and dropped.
pub fn bind<P, O>(coordinator: Arc<CheckoutCoordinator<P, O>>) -> Result<Bindings>
where
    P: ProductSource + 'static,
    O: OrderSink + 'static,
{
    let events = coordinator.events().clone();
    let state = Arc::clone(coordinator.state());
    let mut bindings = Bindings {
        events: events.clone(),
        subscriptions: Vec::new(),
    };

    bindings.add(
        Selector::exact(CARD_SELECT),
        with_item(&state, |state, item| state.set_preview(&item)),
    );

    bindings.add(
        Selector::exact(CARD_ADD),
        with_item(&state, |state, item| {
            state.add_product(&item);
            publish_basket(state);
        }),
    );

    bindings.add(
        Selector::exact(CARD_REMOVE),
        with_item(&state, |state, item| {
            state.remove_product(&item);
            publish_basket(state);
        }),
    );

    bindings.add(
        Selector::exact(PAYMENT_CHANGE),
        with_data(&state, PAYMENT_CHANGE, |state, data: PaymentChangeData| {
            state.set_payment(data.payment)
        }),
    );

    bindings.add(
        Selector::pattern(ORDER_FIELD_CHANGE)?,
        with_data(&state, ORDER_FIELD_CHANGE, |state, data: FieldChangeData| {
            state.set_order_field(data.field, data.value)
        }),
    );

    bindings.add(
        Selector::pattern(CONTACTS_FIELD_CHANGE)?,
        with_data(&state, CONTACTS_FIELD_CHANGE, |state, data: FieldChangeData| {
            state.set_contacts_field(data.field, data.value)
        }),
    );

    {
        let coordinator = Arc::clone(&coordinator);
        bindings.add(
            Selector::exact(ORDER_SUBMIT),
            Handler::from_payload(move |_| {
                if let Err(error) = coordinator.confirm_address() {
                    tracing::warn!(%error, "address step not confirmed");
                }
            }),
        );
    }

    bindings.add(
        Selector::exact(CONTACTS_SUBMIT),
        Handler::from_payload(move |_| {
            let coordinator = Arc::clone(&coordinator);
            match tokio::runtime::Handle::try_current() {
                Ok(runtime) => {
                    runtime.spawn(async move {
                        if let Err(error) = coordinator.submit_order().await {
                            tracing::warn!(%error, "order not submitted");
                        }
                    });
                }
                Err(error) => {
                    tracing::error!(%error, "contacts:submit received outside a tokio runtime")
                }
            }
        }),
    );

    tracing::debug!(subscriptions = bindings.len(), "checkout glue bound");
    Ok(bindings)
}

/// Builds a handler that resolves the card id against the catalog.
///
/// Ids missing from the catalog are logged and ignored.
fn with_item<F>(state: &Arc<AppState>, f: F) -> Handler
where
    F: Fn(&AppState, ProductItem) + Send + Sync + 'static,
{
    let state = Arc::clone(state);
    Handler::new(move |event, payload| {
        match serde_json::from_value::<CardData>(payload.clone()) {
            Ok(card) => match state.product(&card.id) {
                Some(item) => f(&state, item),
                None => tracing::warn!(event, product_id = %card.id, "card not in catalog"),
            },
            Err(error) => tracing::warn!(%error, event, "malformed card payload"),
        }
    })
}

/// Builds a handler that decodes the payload into `T`.
fn with_data<T, F>(state: &Arc<AppState>, selector: &'static str, f: F) -> Handler
where
    T: DeserializeOwned,
    F: Fn(&AppState, T) + Send + Sync + 'static,
{
    let state = Arc::clone(state);
    Handler::new(move |event, payload| {
        match serde_json::from_value::<T>(payload.clone()) {
            Ok(data) => f(&state, data),
            Err(error) => tracing::warn!(%error, event, selector, "malformed event payload"),
        }
    })
}

fn publish_basket(state: &AppState) {
    let data = BasketChangedData {
        items: state
            .basket()
            .into_iter()
            .map(ProductItem::into_fields)
            .collect(),
        count: state.basket_count(),
        total: state.get_total(),
    };
    match serde_json::to_value(&data) {
        Ok(payload) => state.events().emit(BASKET_CHANGED, payload),
        Err(error) => tracing::error!(%error, "failed to serialize basket payload"),
    }
}
