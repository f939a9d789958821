//! Application state aggregate.

use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use common::ProductId;
use event_bus::{EventBus, Payload};
use serde::Serialize;

use crate::basket::Basket;
use crate::catalog::{Product, ProductItem};
use crate::error::{DomainError, Result};
use crate::events::{
    FORM_ERRORS_CHANGE, ITEMS_CHANGED, ItemsChangedData, ORDER_READY, PREVIEW_CHANGED,
};
use crate::model::Observable;
use crate::order::{
    FormErrors, OrderDraft, OrderField, PaymentMethod, validate_contacts, validate_order,
};

#[derive(Debug, Default)]
struct AppData {
    catalog: Vec<ProductItem>,
    preview: Option<ProductId>,
    basket: Basket,
    order: OrderDraft,
    form_errors: FormErrors,
}

/// Serializable view of the whole state.
#[derive(Debug, Clone, Serialize)]
pub struct AppStateSnapshot {
    pub catalog: Vec<Product>,
    pub preview: Option<ProductId>,
    pub basket: Vec<ProductId>,
    pub order: OrderDraft,
    pub form_errors: FormErrors,
}

/// Single source of truth for catalog, basket, order draft and validation.
///
/// Every command runs synchronously. State is mutated under an internal
/// lock that is released before any event is emitted, so subscribers may
/// query or command the state from inside their handlers.
///
/// Basket and order items are separate collections: the paired commands
/// ([`AppState::add_product`], [`AppState::remove_product`],
/// [`AppState::clear_basket`], [`AppState::remove_ids`]) keep their ids equal.
#[derive(Debug)]
pub struct AppState {
    events: EventBus,
    data: RwLock<AppData>,
}

impl AppState {
    /// Creates an empty state bound to the session bus.
    pub fn new(events: EventBus) -> Self {
        Self {
            events,
            data: RwLock::new(AppData::default()),
        }
    }

    /// Replaces the catalog and emits `items:changed`.
    ///
    /// Duplicate ids are not checked; the list is trusted as a full replacement.
    pub fn set_catalog(&self, products: impl IntoIterator<Item = Product>) {
        let catalog: Vec<ProductItem> = products
            .into_iter()
            .map(|product| ProductItem::from_fields(product, self.events.clone()))
            .collect();
        let payload = ItemsChangedData {
            catalog: catalog.iter().map(|item| item.fields().clone()).collect(),
        };

        tracing::debug!(products = catalog.len(), "catalog replaced");
        self.write().catalog = catalog;
        self.notify(ITEMS_CHANGED, &payload);
    }

    /// Records the previewed product and emits `preview:changed` with it.
    pub fn set_preview(&self, item: &ProductItem) {
        self.write().preview = Some(item.id.clone());
        self.notify(PREVIEW_CHANGED, item.fields());
    }

    /// Appends the item id to the order. No-op if already present.
    pub fn add_to_order(&self, item: &ProductItem) {
        let mut data = self.write();
        if !data.order.contains(&item.id) {
            data.order.items.push(item.id.clone());
        }
    }

    /// Removes one occurrence of the item id from the order.
    pub fn remove_from_order(&self, item: &ProductItem) {
        let mut data = self.write();
        if let Some(index) = data.order.items.iter().position(|id| *id == item.id) {
            data.order.items.remove(index);
        }
    }

    /// Adds the item to the basket. No-op if its id is already present.
    pub fn set_product_to_basket(&self, item: &ProductItem) {
        let mut data = self.write();
        if data.basket.insert(item.clone()) {
            metrics::gauge!("basket_items").set(data.basket.len() as f64);
        }
    }

    /// Removes the basket entry with the item's id.
    pub fn remove_product_from_basket(&self, item: &ProductItem) {
        let mut data = self.write();
        if data.basket.remove(&item.id).is_some() {
            metrics::gauge!("basket_items").set(data.basket.len() as f64);
        }
    }

    /// Adds the item to both the order and the basket.
    pub fn add_product(&self, item: &ProductItem) {
        self.add_to_order(item);
        self.set_product_to_basket(item);
        tracing::debug!(product_id = %item.id, "product added");
    }

    /// Removes the item from both the order and the basket.
    pub fn remove_product(&self, item: &ProductItem) {
        self.remove_product_from_basket(item);
        self.remove_from_order(item);
        tracing::debug!(product_id = %item.id, "product removed");
    }

    /// Writes an address-step field, validates the step and emits
    /// `order:ready` if it is valid.
    pub fn set_order_field(&self, field: OrderField, value: impl Into<String>) {
        self.write_field(field, value.into());
        if self.validate_order() {
            self.notify_ready();
        }
    }

    /// Writes a contacts-step field, validates the step and emits
    /// `order:ready` if it is valid.
    pub fn set_contacts_field(&self, field: OrderField, value: impl Into<String>) {
        self.write_field(field, value.into());
        if self.validate_contacts() {
            self.notify_ready();
        }
    }

    /// Selects the payment method, then behaves like [`AppState::set_order_field`].
    pub fn set_payment(&self, method: PaymentMethod) {
        self.write().order.payment = method;
        if self.validate_order() {
            self.notify_ready();
        }
    }

    /// Validates the address step, replacing the form errors.
    ///
    /// Emits `formErrors:change` and returns true if no field is invalid.
    pub fn validate_order(&self) -> bool {
        self.replace_errors(validate_order)
    }

    /// Validates the contacts step, replacing the form errors.
    ///
    /// Emits `formErrors:change` and returns true if no field is invalid.
    pub fn validate_contacts(&self) -> bool {
        self.replace_errors(validate_contacts)
    }

    /// Sums catalog prices of the ordered items.
    ///
    /// Priceless products add nothing. An ordered id missing from the
    /// catalog is logged and adds nothing. The sum saturates at `u64::MAX`.
    pub fn get_total(&self) -> u64 {
        let data = self.read();
        data.order
            .items
            .iter()
            .map(|id| match data.catalog.iter().find(|item| item.id == *id) {
                Some(item) => item.price.amount_or_zero(),
                None => {
                    tracing::warn!(product_id = %id, "ordered product missing from catalog");
                    0
                }
            })
            .fold(0u64, |total, amount| {
                total.checked_add(amount).unwrap_or_else(|| {
                    tracing::warn!(total, amount, "order total overflowed, saturating");
                    u64::MAX
                })
            })
    }

    /// Stores the current total in the order draft and returns it.
    pub fn refresh_total(&self) -> u64 {
        let total = self.get_total();
        self.write().order.total = total;
        total
    }

    /// Empties the basket and the order items together.
    pub fn clear_basket(&self) {
        let mut data = self.write();
        data.basket.clear();
        data.order.items.clear();
        metrics::gauge!("basket_items").set(0.0);
    }

    /// Removes the given ids from both the basket and the order.
    ///
    /// Entries added after the ids were captured are kept.
    pub fn remove_ids(&self, ids: &[ProductId]) {
        let mut data = self.write();
        for id in ids {
            data.basket.remove(id);
        }
        data.order.items.retain(|id| !ids.contains(id));
        metrics::gauge!("basket_items").set(data.basket.len() as f64);
    }

    /// Returns the basket entries in insertion order.
    pub fn basket(&self) -> Vec<ProductItem> {
        self.read().basket.items().cloned().collect()
    }

    /// Returns true if nothing is in the basket.
    pub fn is_basket_empty(&self) -> bool {
        self.read().basket.is_empty()
    }

    /// Returns the number of basket entries.
    pub fn basket_count(&self) -> usize {
        self.read().basket.len()
    }

    /// Returns true if the product is in the basket.
    pub fn in_basket(&self, id: &ProductId) -> bool {
        self.read().basket.contains(id)
    }

    /// Returns the catalog.
    pub fn catalog(&self) -> Vec<ProductItem> {
        self.read().catalog.clone()
    }

    /// Looks up a catalog entry by id.
    pub fn product(&self, id: &ProductId) -> Option<ProductItem> {
        self.read()
            .catalog
            .iter()
            .find(|item| item.id == *id)
            .cloned()
    }

    /// Returns the previewed product id.
    pub fn preview(&self) -> Option<ProductId> {
        self.read().preview.clone()
    }

    /// Returns a copy of the order draft.
    pub fn order(&self) -> OrderDraft {
        self.read().order.clone()
    }

    /// Returns the errors of the last validation pass.
    pub fn form_errors(&self) -> FormErrors {
        self.read().form_errors.clone()
    }

    /// Returns a serializable view of the whole state.
    pub fn to_snapshot(&self) -> AppStateSnapshot {
        let data = self.read();
        AppStateSnapshot {
            catalog: data.catalog.iter().map(|item| item.fields().clone()).collect(),
            preview: data.preview.clone(),
            basket: data.basket.ids().to_vec(),
            order: data.order.clone(),
            form_errors: data.form_errors.clone(),
        }
    }

    fn write_field(&self, field: OrderField, value: String) {
        if let Err(error) = self.write().order.set_field(field, value) {
            tracing::warn!(%error, %field, "ignoring order field value");
        }
    }

    fn replace_errors(&self, validate: fn(&OrderDraft) -> FormErrors) -> bool {
        let errors = {
            let mut data = self.write();
            let errors = validate(&data.order);
            data.form_errors = errors.clone();
            errors
        };
        let valid = errors.is_empty();
        self.notify(FORM_ERRORS_CHANGE, &errors);
        valid
    }

    fn notify_ready(&self) {
        let order = self.order();
        self.notify(ORDER_READY, &order);
    }

    fn notify<T: Serialize>(&self, event: &str, payload: &T) {
        let result = serde_json::to_value(payload)
            .map_err(DomainError::from)
            .and_then(|payload| self.announce(event, Some(payload)));
        if let Err(error) = result {
            tracing::error!(%error, event, "failed to publish state event");
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, AppData> {
        self.data.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, AppData> {
        self.data.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Observable for AppState {
    fn events(&self) -> &EventBus {
        &self.events
    }

    fn snapshot(&self) -> Result<Payload> {
        Ok(serde_json::to_value(self.to_snapshot())?)
    }
}
