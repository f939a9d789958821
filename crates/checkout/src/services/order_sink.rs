//! Order sink trait and in-memory implementation.

use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use domain::OrderDraft;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{CheckoutError, Result};

/// Confirmation returned by the order sink.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderConfirmation {
    /// Order identifier assigned by the sink.
    pub id: String,

    /// Total the sink charged.
    pub total: u64,
}

/// Trait for submitting orders.
#[async_trait]
pub trait OrderSink: Send + Sync {
    /// Places an order built from the draft.
    async fn place_order(&self, order: &OrderDraft) -> Result<OrderConfirmation>;
}

/// An order accepted by [`InMemoryOrderSink`].
#[derive(Debug, Clone)]
pub struct PlacedOrder {
    pub confirmation: OrderConfirmation,
    pub order: OrderDraft,
    pub placed_at: DateTime<Utc>,
}

#[derive(Debug, Default)]
struct InMemoryOrderState {
    placed: Vec<PlacedOrder>,
    fail_on_place: bool,
    latency: Duration,
}

/// In-memory order sink for testing.
#[derive(Debug, Clone, Default)]
pub struct InMemoryOrderSink {
    state: Arc<RwLock<InMemoryOrderState>>,
}

impl InMemoryOrderSink {
    /// Creates a new in-memory order sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every place call fail until reset with `false`.
    pub fn set_fail_on_place(&self, fail: bool) {
        self.state
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .fail_on_place = fail;
    }

    /// Delays every place call by `latency`.
    pub fn set_latency(&self, latency: Duration) {
        self.state
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .latency = latency;
    }

    /// Returns the number of accepted orders.
    pub fn order_count(&self) -> usize {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .placed
            .len()
    }

    /// Returns the accepted orders, oldest first.
    pub fn placed_orders(&self) -> Vec<PlacedOrder> {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .placed
            .clone()
    }

    fn latency(&self) -> Duration {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .latency
    }
}

#[async_trait]
impl OrderSink for InMemoryOrderSink {
    async fn place_order(&self, order: &OrderDraft) -> Result<OrderConfirmation> {
        let latency = self.latency();
        if !latency.is_zero() {
            tokio::time::sleep(latency).await;
        }

        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);

        if state.fail_on_place {
            return Err(CheckoutError::OrderSink("Order rejected".to_string()));
        }

        if order.items.is_empty() {
            return Err(CheckoutError::OrderSink("Order has no items".to_string()));
        }

        let confirmation = OrderConfirmation {
            id: Uuid::new_v4().to_string(),
            total: order.total,
        };
        state.placed.push(PlacedOrder {
            confirmation: confirmation.clone(),
            order: order.clone(),
            placed_at: Utc::now(),
        });

        Ok(confirmation)
    }
}
