//! Order draft, editable fields and field validation.

mod draft;
mod validation;

pub use draft::{OrderDraft, OrderField, PaymentMethod};
pub use validation::{
    ADDRESS_REQUIRED, EMAIL_REQUIRED, FormErrors, PHONE_REQUIRED, validate_contacts,
    validate_order,
};
