//! Field validation for the order and contacts steps.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{OrderDraft, OrderField};

pub const ADDRESS_REQUIRED: &str = "Address is required";
pub const EMAIL_REQUIRED: &str = "Email is required";
pub const PHONE_REQUIRED: &str = "Phone is required";

/// Messages for currently-invalid fields. An absent key means valid.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FormErrors(BTreeMap<OrderField, String>);

impl FormErrors {
    /// Creates an empty error set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a message for a field.
    pub fn insert(&mut self, field: OrderField, message: impl Into<String>) {
        self.0.insert(field, message.into());
    }

    /// Returns the message for a field, if it is invalid.
    pub fn get(&self, field: OrderField) -> Option<&str> {
        self.0.get(&field).map(String::as_str)
    }

    /// Returns true if the field is invalid.
    pub fn contains(&self, field: OrderField) -> bool {
        self.0.contains_key(&field)
    }

    /// Returns true if every field is valid.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the number of invalid fields.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Iterates over invalid fields and their messages.
    pub fn iter(&self) -> impl Iterator<Item = (OrderField, &str)> {
        self.0.iter().map(|(field, message)| (*field, message.as_str()))
    }
}

/// Validates the address step. Payment always has a value.
pub fn validate_order(draft: &OrderDraft) -> FormErrors {
    let mut errors = FormErrors::new();
    if draft.address.is_empty() {
        errors.insert(OrderField::Address, ADDRESS_REQUIRED);
    }
    errors
}

/// Validates the contacts step.
pub fn validate_contacts(draft: &OrderDraft) -> FormErrors {
    let mut errors = FormErrors::new();
    if draft.email.is_empty() {
        errors.insert(OrderField::Email, EMAIL_REQUIRED);
    }
    if draft.phone.is_empty() {
        errors.insert(OrderField::Phone, PHONE_REQUIRED);
    }
    errors
}
