//! Basket selection.

use std::collections::HashMap;

use common::ProductId;

use crate::catalog::ProductItem;

/// The products chosen for checkout, unique by id, in insertion order.
///
/// Entries are indexed by product id, so removal works with any instance
/// that carries the same id.
#[derive(Debug, Clone, Default)]
pub struct Basket {
    entries: HashMap<ProductId, ProductItem>,
    order: Vec<ProductId>,
}

impl Basket {
    /// Creates an empty basket.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a product. Returns false if its id is already present.
    pub fn insert(&mut self, item: ProductItem) -> bool {
        if self.entries.contains_key(&item.id) {
            return false;
        }
        self.order.push(item.id.clone());
        self.entries.insert(item.id.clone(), item);
        true
    }

    /// Removes the entry with the given id.
    pub fn remove(&mut self, id: &ProductId) -> Option<ProductItem> {
        let removed = self.entries.remove(id)?;
        self.order.retain(|entry| entry != id);
        Some(removed)
    }

    /// Returns true if a product with this id is in the basket.
    pub fn contains(&self, id: &ProductId) -> bool {
        self.entries.contains_key(id)
    }

    /// Returns the entry with the given id.
    pub fn get(&self, id: &ProductId) -> Option<&ProductItem> {
        self.entries.get(id)
    }

    /// Returns the number of entries.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Returns true if the basket is empty.
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Iterates over entries in insertion order.
    pub fn items(&self) -> impl Iterator<Item = &ProductItem> {
        self.order.iter().filter_map(|id| self.entries.get(id))
    }

    /// Returns the ids in insertion order.
    pub fn ids(&self) -> &[ProductId] {
        &self.order
    }

    /// Empties the basket.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.order.clear();
    }
}
