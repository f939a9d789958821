//! Catalog types.

mod product;

pub use product::{Category, Price, Product, ProductItem};
