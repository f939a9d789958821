//! Storefront session wiring.
//!
//! Builds one session per run: a bus with a debug logger on every event, the
//! application state, the checkout coordinator and its glue bindings.

pub mod config;
pub mod error;

use std::sync::Arc;

use checkout::events::{CARD_ADD, CARD_SELECT, ORDER_SUBMIT, PAYMENT_CHANGE};
use checkout::{Bindings, CheckoutCoordinator, OrderConfirmation, OrderSink, ProductSource};
use domain::{AppState, Category, Price, Product};
use event_bus::{EventBus, Handler, Selector};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use serde_json::json;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

pub use config::{Config, LogFormat};
pub use error::{AppError, Result};

/// Installs the global tracing subscriber described by `config`.
pub fn init_tracing(config: &Config) -> Result<()> {
    let filter = EnvFilter::try_new(&config.log_level).unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);
    match config.log_format {
        LogFormat::Pretty => registry.with(tracing_subscriber::fmt::layer()).try_init()?,
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json())
            .try_init()?,
    }
    Ok(())
}

/// Installs the Prometheus recorder backing the `metrics` macros.
pub fn install_metrics() -> Result<PrometheusHandle> {
    Ok(PrometheusBuilder::new().install_recorder()?)
}

/// A wired storefront session.
pub struct Session<P: ProductSource, O: OrderSink> {
    coordinator: Arc<CheckoutCoordinator<P, O>>,
    bindings: Bindings,
    logger: Handler,
}

impl<P, O> Session<P, O>
where
    P: ProductSource + 'static,
    O: OrderSink + 'static,
{
    /// Creates the bus, state and coordinator and binds the checkout glue.
    pub fn start(products: P, orders: O) -> Result<Self> {
        let events = EventBus::new();
        let logger = Handler::new(|event, payload| tracing::debug!(event, %payload, "bus event"));
        events.subscribe_all(logger.clone());

        let state = Arc::new(AppState::new(events));
        let coordinator = Arc::new(CheckoutCoordinator::new(state, products, orders));
        let bindings = checkout::bind(Arc::clone(&coordinator))?;

        tracing::info!(subscriptions = bindings.len() + 1, "session started");
        Ok(Self {
            coordinator,
            bindings,
            logger,
        })
    }

    pub fn coordinator(&self) -> &Arc<CheckoutCoordinator<P, O>> {
        &self.coordinator
    }

    pub fn state(&self) -> &Arc<AppState> {
        self.coordinator.state()
    }

    pub fn events(&self) -> &EventBus {
        self.coordinator.events()
    }

    /// Removes every subscription the session registered.
    pub fn close(self) {
        let Session {
            coordinator,
            bindings,
            logger,
        } = self;
        bindings.unbind();
        coordinator.events().unsubscribe(&Selector::All, &logger);
        tracing::info!("session closed");
    }
}

/// Runs a scripted checkout through the bus, as a view layer would.
///
/// Previews the first product, adds every priced product, fills the
/// address and contact forms and submits.
pub async fn run_demo_checkout<P, O>(session: &Session<P, O>) -> Result<OrderConfirmation>
where
    P: ProductSource + 'static,
    O: OrderSink + 'static,
{
    let coordinator = session.coordinator();
    let events = session.events();
    coordinator.load_catalog().await?;

    let catalog = session.state().catalog();
    if let Some(first) = catalog.first() {
        events.emit(CARD_SELECT, serde_json::to_value(first)?);
    }
    for item in catalog.iter().filter(|item| !item.price.is_priceless()) {
        events.emit(CARD_ADD, serde_json::to_value(item)?);
    }

    events.emit(PAYMENT_CHANGE, json!({ "payment": "card" }));
    let address = events.trigger("order.address:change", json!({ "field": "address" }));
    address(json!({ "value": "Moscow, Lenina 1" }));
    events.emit(ORDER_SUBMIT, json!({}));

    let email = events.trigger("contacts.email:change", json!({ "field": "email" }));
    email(json!({ "value": "buyer@example.com" }));
    let phone = events.trigger("contacts.phone:change", json!({ "field": "phone" }));
    phone(json!({ "value": "+7 900 123 45 67" }));

    Ok(coordinator.submit_order().await?)
}

/// Catalog served when no catalog file is configured.
pub fn demo_catalog() -> Vec<Product> {
    vec![
        Product::new("854cef69", "+1 час в сутках", Price::Amount(750))
            .with_category(Category::SoftSkill)
            .with_image("/Shell.svg")
            .with_description("Если планируете решать задачи в тренажёре, берите два."),
        Product::new("c101ab44", "HEX-леденец", Price::Amount(1450))
            .with_category(Category::Other)
            .with_image("/Asterisk_2.svg")
            .with_description("Лизните этот леденец, чтобы запоминать любой цветовой код CSS."),
        Product::new("b06cde61", "Мамка-таймер", Price::Priceless)
            .with_category(Category::SoftSkill)
            .with_image("/Soft_Flower.svg"),
        Product::new("412bcf81", "Бэкенд-антистресс", Price::Amount(1000))
            .with_category(Category::HardSkill)
            .with_image("/1_Quantum_Headphones.svg"),
    ]
}
