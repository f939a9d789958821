//! Product source trait and implementations.

use std::path::PathBuf;
use std::sync::{Arc, PoisonError, RwLock};

use async_trait::async_trait;
use domain::Product;
use serde::Deserialize;

use crate::error::{CheckoutError, Result};

/// Trait for fetching the product catalog.
#[async_trait]
pub trait ProductSource: Send + Sync {
    /// Returns the full catalog, in display order.
    async fn fetch_products(&self) -> Result<Vec<Product>>;
}

#[derive(Debug, Default)]
struct InMemoryProductState {
    products: Vec<Product>,
    fetch_count: usize,
    fail_on_fetch: bool,
}

/// In-memory product source for testing.
#[derive(Debug, Clone, Default)]
pub struct InMemoryProductSource {
    state: Arc<RwLock<InMemoryProductState>>,
}

impl InMemoryProductSource {
    /// Creates a source serving the given products.
    pub fn new(products: Vec<Product>) -> Self {
        Self {
            state: Arc::new(RwLock::new(InMemoryProductState {
                products,
                ..Default::default()
            })),
        }
    }

    /// Configures the source to fail on fetch.
    pub fn set_fail_on_fetch(&self, fail: bool) {
        self.state
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .fail_on_fetch = fail;
    }

    /// Returns how many fetches were attempted.
    pub fn fetch_count(&self) -> usize {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .fetch_count
    }
}

#[async_trait]
impl ProductSource for InMemoryProductSource {
    async fn fetch_products(&self) -> Result<Vec<Product>> {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        state.fetch_count += 1;

        if state.fail_on_fetch {
            return Err(CheckoutError::ProductSource(
                "Product list unavailable".to_string(),
            ));
        }

        Ok(state.products.clone())
    }
}

/// Wire shape of a product list response.
#[derive(Debug, Deserialize)]
struct ProductList {
    #[serde(default)]
    total: usize,
    items: Vec<Product>,
}

/// Product source reading a product list document from disk.
///
/// The document has the product API's shape, `{"total": n, "items": [...]}`.
/// Image references are prefixed with the CDN base URL, as the storefront's
/// API client does.
#[derive(Debug, Clone)]
pub struct JsonFileProductSource {
    path: PathBuf,
    cdn_url: String,
}

impl JsonFileProductSource {
    /// Creates a source for the given file and CDN base URL.
    pub fn new(path: impl Into<PathBuf>, cdn_url: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            cdn_url: cdn_url.into(),
        }
    }
}

#[async_trait]
impl ProductSource for JsonFileProductSource {
    #[tracing::instrument(skip(self), fields(path = %self.path.display()))]
    async fn fetch_products(&self) -> Result<Vec<Product>> {
        let raw = tokio::fs::read_to_string(&self.path).await?;
        let list: ProductList = serde_json::from_str(&raw)?;

        if list.total != 0 && list.total != list.items.len() {
            tracing::warn!(
                total = list.total,
                items = list.items.len(),
                "product list total does not match item count"
            );
        }

        Ok(list
            .items
            .into_iter()
            .map(|product| {
                let image = format!("{}{}", self.cdn_url, product.image);
                product.with_image(image)
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain::{Category, Price};

    #[tokio::test]
    async fn test_in_memory_fetch() {
        let source = InMemoryProductSource::new(vec![Product::new("a", "A", Price::Amount(1))]);

        let products = source.fetch_products().await.unwrap();
        assert_eq!(products.len(), 1);
        assert_eq!(source.fetch_count(), 1);
    }

    #[tokio::test]
    async fn test_in_memory_fail_on_fetch() {
        let source = InMemoryProductSource::new(vec![]);
        source.set_fail_on_fetch(true);

        let result = source.fetch_products().await;
        assert!(matches!(result, Err(CheckoutError::ProductSource(_))));
        assert_eq!(source.fetch_count(), 1);
    }

    #[tokio::test]
    async fn test_json_file_prefixes_images() {
        let path = std::env::temp_dir().join(format!("catalog-{}.json", uuid::Uuid::new_v4()));
        tokio::fs::write(
            &path,
            r#"{
                "total": 2,
                "items": [
                    {"id": "a", "title": "A", "image": "/a.svg", "category": "кнопка", "price": 100},
                    {"id": "b", "title": "B", "image": "/b.svg", "category": "другое", "price": null}
                ]
            }"#,
        )
        .await
        .unwrap();

        let source = JsonFileProductSource::new(&path, "https://cdn.example.com/content");
        let products = source.fetch_products().await.unwrap();
        tokio::fs::remove_file(&path).await.unwrap();

        assert_eq!(products.len(), 2);
        assert_eq!(products[0].image, "https://cdn.example.com/content/a.svg");
        assert_eq!(products[0].category, Category::Button);
        assert!(products[1].price.is_priceless());
    }

    #[tokio::test]
    async fn test_json_file_missing_is_io_error() {
        let source = JsonFileProductSource::new("/nonexistent/catalog.json", "");
        let result = source.fetch_products().await;
        assert!(matches!(result, Err(CheckoutError::Io(_))));
    }
}
