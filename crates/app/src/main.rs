//! Storefront demo entry point.

use app::{AppError, Config, Session};
use checkout::{
    InMemoryOrderSink, InMemoryProductSource, JsonFileProductSource, OrderSink, ProductSource,
};

async fn run<P, O>(products: P, orders: O) -> Result<(), AppError>
where
    P: ProductSource + 'static,
    O: OrderSink + 'static,
{
    let session = Session::start(products, orders)?;
    let result = app::run_demo_checkout(&session).await;
    session.close();

    let confirmation = result?;
    tracing::info!(
        order_id = %confirmation.id,
        total = confirmation.total,
        "demo checkout complete"
    );
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), AppError> {
    // 1. Load configuration and initialize tracing
    let config = Config::from_env();
    app::init_tracing(&config)?;

    // 2. Install Prometheus metrics recorder
    let metrics_handle = app::install_metrics()?;

    // 3. Pick the product source and run the session
    let orders = InMemoryOrderSink::new();
    let result = match &config.catalog_path {
        Some(path) => {
            tracing::info!(path = %path.display(), "loading catalog from file");
            let products = JsonFileProductSource::new(path.clone(), config.cdn_url.clone());
            run(products, orders.clone()).await
        }
        None => {
            tracing::info!("using built-in demo catalog");
            run(InMemoryProductSource::new(app::demo_catalog()), orders.clone()).await
        }
    };

    if let Err(error) = &result {
        tracing::error!(%error, "demo checkout failed");
    }
    tracing::info!(placed = orders.order_count(), "session finished");
    tracing::debug!(metrics = %metrics_handle.render(), "session metrics");
    result
}
