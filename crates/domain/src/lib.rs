//! Domain layer for the storefront core.
//!
//! This crate provides:
//! - `Observable` and `Model`, the base for entities that announce their own changes
//! - Catalog types (`Product`, `Category`, `Price`)
//! - The order draft, its editable fields and validation
//! - `AppState`, the aggregate owning catalog, basket, order draft and form errors

pub mod app_state;
pub mod basket;
pub mod catalog;
pub mod error;
pub mod events;
pub mod model;
pub mod order;

pub use app_state::AppState;
pub use basket::Basket;
pub use catalog::{Category, Price, Product, ProductItem};
pub use common::ProductId;
pub use error::{DomainError, Result};
pub use model::{Model, Observable, Schema};
pub use order::{FormErrors, OrderDraft, OrderField, PaymentMethod};
