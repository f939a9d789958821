//! Integration tests for a full checkout session driven through the bus.

use std::sync::Arc;
use std::time::Duration;

use checkout::events::{
    BASKET_CHANGED, CARD_ADD, CARD_REMOVE, CARD_SELECT, CONTACTS_SUBMIT, ORDER_FAILED,
    ORDER_PLACED, ORDER_SUBMIT, PAYMENT_CHANGE,
};
use checkout::{
    Bindings, CheckoutCoordinator, CheckoutError, InMemoryOrderSink, InMemoryProductSource, bind,
};
use domain::events::{ITEMS_CHANGED, PREVIEW_CHANGED};
use domain::{AppState, Category, PaymentMethod, Price, Product};
use event_bus::{EventBus, Handler, Payload};
use serde_json::json;
use tokio::sync::mpsc;

type TestCoordinator = CheckoutCoordinator<InMemoryProductSource, InMemoryOrderSink>;

struct TestHarness {
    coordinator: Arc<TestCoordinator>,
    products: InMemoryProductSource,
    orders: InMemoryOrderSink,
    _bindings: Bindings,
}

impl TestHarness {
    fn new() -> Self {
        let products = InMemoryProductSource::new(vec![
            Product::new("p1", "+1 час в сутках", Price::Amount(750))
                .with_category(Category::SoftSkill),
            Product::new("p2", "HEX-леденец", Price::Amount(1450))
                .with_category(Category::Other),
            Product::new("p3", "Мамка-таймер", Price::Priceless)
                .with_category(Category::SoftSkill),
        ]);
        let orders = InMemoryOrderSink::new();
        let state = Arc::new(AppState::new(EventBus::new()));
        let coordinator = Arc::new(CheckoutCoordinator::new(
            state,
            products.clone(),
            orders.clone(),
        ));
        let bindings = bind(Arc::clone(&coordinator)).unwrap();

        Self {
            coordinator,
            products,
            orders,
            _bindings: bindings,
        }
    }

    fn bus(&self) -> &EventBus {
        self.coordinator.events()
    }

    fn listen(&self, event: &str) -> mpsc::UnboundedReceiver<Payload> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.bus().on(
            event,
            Handler::from_payload(move |payload| {
                let _ = tx.send(payload.clone());
            }),
        );
        rx
    }

    fn fill_in_order(&self) {
        let bus = self.bus();
        bus.emit(CARD_ADD, json!({ "id": "p1", "price": 750 }));
        bus.emit(CARD_ADD, json!({ "id": "p2", "price": 1450 }));
        bus.emit(PAYMENT_CHANGE, json!({ "payment": "cash" }));
        let address = bus.trigger("order.address:change", json!({ "field": "address" }));
        address(json!({ "value": "Lenina 1" }));
        bus.emit(ORDER_SUBMIT, json!({}));
        let email = bus.trigger("contacts.email:change", json!({ "field": "email" }));
        email(json!({ "value": "buyer@example.com" }));
        let phone = bus.trigger("contacts.phone:change", json!({ "field": "phone" }));
        phone(json!({ "value": "+7 900 000 00 00" }));
    }
}

#[tokio::test]
async fn test_catalog_load_emits_items_changed() {
    let h = TestHarness::new();
    let mut items = h.listen(ITEMS_CHANGED);

    let count = h.coordinator.load_catalog().await.unwrap();

    assert_eq!(count, 3);
    assert_eq!(h.products.fetch_count(), 1);
    let payload = items.recv().await.unwrap();
    assert_eq!(payload["catalog"].as_array().unwrap().len(), 3);
    assert_eq!(payload["catalog"][2]["price"], json!(null));
}

#[tokio::test]
async fn test_catalog_load_failure_leaves_catalog_empty() {
    let h = TestHarness::new();
    h.products.set_fail_on_fetch(true);

    let result = h.coordinator.load_catalog().await;

    assert!(matches!(result, Err(CheckoutError::ProductSource(_))));
    assert!(h.coordinator.state().catalog().is_empty());
}

#[tokio::test]
async fn test_select_previews_product() {
    let h = TestHarness::new();
    h.coordinator.load_catalog().await.unwrap();
    let mut previews = h.listen(PREVIEW_CHANGED);

    let catalog = h.coordinator.state().catalog();
    h.bus()
        .emit(CARD_SELECT, serde_json::to_value(&catalog[1]).unwrap());

    let preview = previews.recv().await.unwrap();
    assert_eq!(preview["id"], "p2");
    assert_eq!(preview["title"], "HEX-леденец");
    assert!(h.coordinator.state().is_basket_empty());
}

#[tokio::test]
async fn test_basket_changes_are_published() {
    let h = TestHarness::new();
    h.coordinator.load_catalog().await.unwrap();
    let mut basket = h.listen(BASKET_CHANGED);

    h.bus().emit(CARD_ADD, json!({ "id": "p1" }));
    h.bus().emit(CARD_ADD, json!({ "id": "p3" }));
    h.bus().emit(CARD_REMOVE, json!({ "id": "p1" }));

    let first = basket.recv().await.unwrap();
    assert_eq!(first["count"], 1);
    assert_eq!(first["total"], 750);
    let second = basket.recv().await.unwrap();
    assert_eq!(second["count"], 2);
    assert_eq!(second["total"], 750);
    let third = basket.recv().await.unwrap();
    assert_eq!(third["count"], 1);
    assert_eq!(third["total"], 0);
    assert_eq!(third["items"][0]["id"], "p3");
    assert_eq!(third["items"][0]["title"], "Мамка-таймер");
    assert_eq!(third["items"][0]["category"], "софт-скил");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_happy_path_through_bus() {
    let h = TestHarness::new();
    h.coordinator.load_catalog().await.unwrap();
    let mut placed = h.listen(ORDER_PLACED);

    h.fill_in_order();
    assert_eq!(h.coordinator.state().order().total, 2200);
    h.bus().emit(CONTACTS_SUBMIT, json!({}));

    let confirmation = tokio::time::timeout(Duration::from_secs(5), placed.recv())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(confirmation["total"], 2200);

    let orders = h.orders.placed_orders();
    assert_eq!(orders.len(), 1);
    assert_eq!(orders[0].order.payment, PaymentMethod::Cash);
    assert_eq!(orders[0].order.address, "Lenina 1");
    assert_eq!(orders[0].order.email, "buyer@example.com");
    assert_eq!(orders[0].order.items.len(), 2);
    assert!(h.coordinator.state().is_basket_empty());
    assert!(h.coordinator.state().order().items.is_empty());
}

#[tokio::test]
async fn test_failed_submission_keeps_state_for_retry() {
    let h = TestHarness::new();
    h.coordinator.load_catalog().await.unwrap();
    let mut failed = h.listen(ORDER_FAILED);
    h.fill_in_order();
    h.orders.set_fail_on_place(true);

    let result = h.coordinator.submit_order().await;

    assert!(matches!(result, Err(CheckoutError::OrderSink(_))));
    let failure = failed.recv().await.unwrap();
    assert!(failure["error"].as_str().unwrap().contains("Order rejected"));
    assert_eq!(h.coordinator.state().basket_count(), 2);
    assert_eq!(h.coordinator.state().order().items.len(), 2);
    assert!(!h.coordinator.is_submitting());

    h.orders.set_fail_on_place(false);
    let confirmation = h.coordinator.submit_order().await.unwrap();
    assert_eq!(confirmation.total, 2200);
    assert!(h.coordinator.state().is_basket_empty());
}

#[tokio::test]
async fn test_concurrent_submissions_place_one_order() {
    let h = TestHarness::new();
    h.coordinator.load_catalog().await.unwrap();
    h.fill_in_order();
    h.orders.set_latency(Duration::from_millis(50));

    let (first, second) = tokio::join!(
        h.coordinator.submit_order(),
        h.coordinator.submit_order()
    );

    assert!(first.is_ok());
    assert!(matches!(second, Err(CheckoutError::SubmissionInProgress)));
    assert_eq!(h.orders.order_count(), 1);
}
