//! Checkout coordinator: catalog loading and order submission.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use domain::order::{validate_contacts, validate_order};
use domain::{AppState, FormErrors, Observable, OrderDraft};
use event_bus::EventBus;
use serde::Serialize;

use crate::error::{CheckoutError, Result};
use crate::events::{ORDER_FAILED, ORDER_PLACED, OrderFailedData};
use crate::services::{OrderConfirmation, OrderSink, ProductSource};

/// Clears the in-flight flag when a submission ends, however it ends.
struct SubmissionGuard<'a>(&'a AtomicBool);

impl<'a> SubmissionGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for SubmissionGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Drives the steps of checkout that involve external collaborators.
///
/// The application state is never mutated optimistically: submitted items
/// leave the basket only once the order sink confirms the order, so a failed
/// submission can be retried unchanged.
pub struct CheckoutCoordinator<P, O>
where
    P: ProductSource,
    O: OrderSink,
{
    state: Arc<AppState>,
    products: P,
    orders: O,
    submitting: AtomicBool,
}

impl<P, O> CheckoutCoordinator<P, O>
where
    P: ProductSource,
    O: OrderSink,
{
    /// Creates a new checkout coordinator.
    pub fn new(state: Arc<AppState>, products: P, orders: O) -> Self {
        Self {
            state,
            products,
            orders,
            submitting: AtomicBool::new(false),
        }
    }

    /// Returns the application state.
    pub fn state(&self) -> &Arc<AppState> {
        &self.state
    }

    /// Returns the session bus.
    pub fn events(&self) -> &EventBus {
        self.state.events()
    }

    /// Returns true while an order submission is pending.
    pub fn is_submitting(&self) -> bool {
        self.submitting.load(Ordering::Acquire)
    }

    /// Fetches the catalog and installs it in the state.
    ///
    /// Returns the number of products loaded.
    #[tracing::instrument(skip(self))]
    pub async fn load_catalog(&self) -> Result<usize> {
        let products = self.products.fetch_products().await.inspect_err(|error| {
            tracing::error!(%error, "failed to load catalog");
        })?;
        let count = products.len();
        self.state.set_catalog(products);
        tracing::info!(products = count, "catalog loaded");
        Ok(count)
    }

    /// Confirms the address step: validates it and records the order total.
    ///
    /// Returns the total that will be submitted.
    pub fn confirm_address(&self) -> Result<u64> {
        if !self.state.validate_order() {
            return Err(CheckoutError::InvalidOrder(self.state.form_errors()));
        }
        let total = self.state.refresh_total();
        tracing::debug!(total, "address step confirmed");
        Ok(total)
    }

    /// Sends the order to the sink.
    ///
    /// On success the submitted items are removed from the basket and the
    /// order, and `order:placed` is emitted. Items added while the call was
    /// pending stay. On failure `order:failed` is emitted and the state is
    /// left as it was. A call made while another submission is pending fails
    /// with [`CheckoutError::SubmissionInProgress`] without side effects.
    #[tracing::instrument(skip(self))]
    pub async fn submit_order(&self) -> Result<OrderConfirmation> {
        let _guard =
            SubmissionGuard::acquire(&self.submitting).ok_or(CheckoutError::SubmissionInProgress)?;

        if self.state.is_basket_empty() {
            return Err(CheckoutError::EmptyBasket);
        }

        let draft = self.state.order();
        let steps: [fn(&OrderDraft) -> FormErrors; 2] = [validate_order, validate_contacts];
        for validate in steps {
            let errors = validate(&draft);
            if !errors.is_empty() {
                return Err(CheckoutError::InvalidOrder(errors));
            }
        }

        self.state.refresh_total();
        let draft = self.state.order();
        metrics::counter!("checkout_orders_submitted_total").increment(1);
        tracing::info!(items = draft.items.len(), total = draft.total, "submitting order");

        match self.orders.place_order(&draft).await {
            Ok(confirmation) => {
                self.state.remove_ids(&draft.items);
                tracing::info!(order_id = %confirmation.id, "order placed");
                self.publish(ORDER_PLACED, &confirmation);
                Ok(confirmation)
            }
            Err(error) => {
                metrics::counter!("checkout_orders_failed_total").increment(1);
                tracing::warn!(%error, "order submission failed");
                self.publish(
                    ORDER_FAILED,
                    &OrderFailedData {
                        error: error.to_string(),
                    },
                );
                Err(error)
            }
        }
    }

    fn publish<T: Serialize>(&self, event: &str, payload: &T) {
        match serde_json::to_value(payload) {
            Ok(payload) => self.events().emit(event, payload),
            Err(error) => tracing::error!(%error, event, "failed to serialize event payload"),
        }
    }
}
