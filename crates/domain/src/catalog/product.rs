//! Product entries as delivered by the product source.

use common::ProductId;
use serde::{Deserialize, Serialize};

use crate::model::{Model, Schema};

/// Product category. Wire labels are the storefront's fixed label set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Category {
    #[serde(rename = "софт-скил")]
    SoftSkill,

    #[serde(rename = "хард-скил")]
    HardSkill,

    #[default]
    #[serde(rename = "другое")]
    Other,

    #[serde(rename = "кнопка")]
    Button,

    #[serde(rename = "дополнительное")]
    Additional,
}

impl Category {
    /// Returns the wire label.
    pub fn label(&self) -> &'static str {
        match self {
            Category::SoftSkill => "софт-скил",
            Category::HardSkill => "хард-скил",
            Category::Other => "другое",
            Category::Button => "кнопка",
            Category::Additional => "дополнительное",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Product price.
///
/// Priceless products are `null` on the wire and contribute nothing to an
/// order total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "Option<u64>", into = "Option<u64>")]
pub enum Price {
    Amount(u64),
    #[default]
    Priceless,
}

impl Price {
    /// Returns the amount, or `None` for priceless products.
    pub fn amount(&self) -> Option<u64> {
        match self {
            Price::Amount(amount) => Some(*amount),
            Price::Priceless => None,
        }
    }

    /// Returns what this price adds to a total.
    pub fn amount_or_zero(&self) -> u64 {
        self.amount().unwrap_or(0)
    }

    /// Returns true for priceless products.
    pub fn is_priceless(&self) -> bool {
        matches!(self, Price::Priceless)
    }
}

impl From<Option<u64>> for Price {
    fn from(value: Option<u64>) -> Self {
        value.map_or(Price::Priceless, Price::Amount)
    }
}

impl From<Price> for Option<u64> {
    fn from(price: Price) -> Self {
        price.amount()
    }
}

impl std::fmt::Display for Price {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Price::Amount(amount) => write!(f, "{amount} synapses"),
            Price::Priceless => f.write_str("priceless"),
        }
    }
}

/// A catalog entry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Product {
    pub id: ProductId,
    pub title: String,
    pub description: String,
    pub image: String,
    pub category: Category,
    pub price: Price,
}

impl Product {
    /// Creates a product with the given id, title and price.
    pub fn new(id: impl Into<ProductId>, title: impl Into<String>, price: Price) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            price,
            ..Self::default()
        }
    }

    /// Sets the category.
    pub fn with_category(mut self, category: Category) -> Self {
        self.category = category;
        self
    }

    /// Sets the image reference.
    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = image.into();
        self
    }

    /// Sets the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

impl Schema for Product {}

/// A product bound to the session bus.
pub type ProductItem = Model<Product>;
