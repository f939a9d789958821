//! The in-progress checkout form.

use std::str::FromStr;

use common::ProductId;
use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// How the customer pays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    /// Online card payment.
    #[default]
    Card,

    /// Cash on delivery.
    Cash,
}

impl PaymentMethod {
    /// Returns the wire name.
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Card => "card",
            PaymentMethod::Cash => "cash",
        }
    }
}

impl FromStr for PaymentMethod {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "card" => Ok(PaymentMethod::Card),
            "cash" => Ok(PaymentMethod::Cash),
            other => Err(DomainError::UnknownPaymentMethod(other.to_string())),
        }
    }
}

impl std::fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A user-editable order field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderField {
    Payment,
    Email,
    Phone,
    Address,
}

impl OrderField {
    /// Returns the wire name.
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderField::Payment => "payment",
            OrderField::Email => "email",
            OrderField::Phone => "phone",
            OrderField::Address => "address",
        }
    }
}

impl FromStr for OrderField {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "payment" => Ok(OrderField::Payment),
            "email" => Ok(OrderField::Email),
            "phone" => Ok(OrderField::Phone),
            "address" => Ok(OrderField::Address),
            other => Err(DomainError::UnknownField(other.to_string())),
        }
    }
}

impl std::fmt::Display for OrderField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Checkout form state plus the ordered product ids.
///
/// Serializes to the payload the order sink accepts:
/// `{payment, email, phone, address, total, items}`. Empty strings mean the
/// field is unset. `total` is only current right after a recomputation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrderDraft {
    pub payment: PaymentMethod,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub total: u64,
    pub items: Vec<ProductId>,
}

impl OrderDraft {
    /// Writes a field from its raw form value.
    ///
    /// Payment values must name a known method; the draft is left unchanged
    /// otherwise.
    pub fn set_field(&mut self, field: OrderField, value: impl Into<String>) -> crate::Result<()> {
        let value = value.into();
        match field {
            OrderField::Payment => self.payment = value.parse()?,
            OrderField::Email => self.email = value,
            OrderField::Phone => self.phone = value,
            OrderField::Address => self.address = value,
        }
        Ok(())
    }

    /// Returns the raw form value of a field.
    pub fn field(&self, field: OrderField) -> &str {
        match field {
            OrderField::Payment => self.payment.as_str(),
            OrderField::Email => &self.email,
            OrderField::Phone => &self.phone,
            OrderField::Address => &self.address,
        }
    }

    /// Returns true if the product is part of the order.
    pub fn contains(&self, id: &ProductId) -> bool {
        self.items.contains(id)
    }
}
