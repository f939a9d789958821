//! Observable entity base.

use event_bus::{EventBus, Payload};
use serde::{Serialize, Serializer, de::DeserializeOwned};
use serde_json::Value;

use crate::error::{DomainError, Result};

/// Marker for entity field sets.
///
/// Implementors must be annotated with `#[serde(default)]` so that a partial
/// data bag fills only the fields it carries and leaves the rest at their
/// defaults. Unknown keys are ignored by serde.
pub trait Schema: Serialize + DeserializeOwned + Default + Clone {}

/// Trait for domain objects that announce their own changes on a bus.
pub trait Observable {
    /// Returns the bus this entity publishes to.
    fn events(&self) -> &EventBus;

    /// Returns a shallow snapshot of the entity's current field values.
    fn snapshot(&self) -> Result<Payload>;

    /// Emits `event` with `payload`, or with the current snapshot when the
    /// payload is omitted.
    fn announce(&self, event: &str, payload: Option<Payload>) -> Result<()> {
        let payload = match payload {
            Some(payload) => payload,
            None => self.snapshot()?,
        };
        self.events().emit(event, payload);
        Ok(())
    }
}

/// An entity built from a schema and bound to a bus.
#[derive(Debug, Clone)]
pub struct Model<T> {
    fields: T,
    events: EventBus,
}

impl<T: Schema> Model<T> {
    /// Builds an entity from a partial data bag.
    ///
    /// `null` yields an entity with every field defaulted. Present fields of
    /// the wrong shape are rejected.
    pub fn new(data: Payload, events: EventBus) -> Result<Self> {
        let fields = match data {
            Value::Null => T::default(),
            Value::Object(_) => serde_json::from_value(data).map_err(DomainError::Schema)?,
            Value::Bool(_) => return Err(DomainError::NotAnObject("boolean")),
            Value::Number(_) => return Err(DomainError::NotAnObject("number")),
            Value::String(_) => return Err(DomainError::NotAnObject("string")),
            Value::Array(_) => return Err(DomainError::NotAnObject("array")),
        };
        Ok(Self { fields, events })
    }

    /// Builds an entity from a complete field set.
    pub fn from_fields(fields: T, events: EventBus) -> Self {
        Self { fields, events }
    }

    /// Returns the entity's fields.
    pub fn fields(&self) -> &T {
        &self.fields
    }

    /// Consumes the entity, returning its fields.
    pub fn into_fields(self) -> T {
        self.fields
    }
}

impl<T> std::ops::Deref for Model<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.fields
    }
}

impl<T: Schema> Observable for Model<T> {
    fn events(&self) -> &EventBus {
        &self.events
    }

    fn snapshot(&self) -> Result<Payload> {
        Ok(serde_json::to_value(&self.fields)?)
    }
}

// Entities serialize as their bare fields; the bus handle is not data.
impl<T: Serialize> Serialize for Model<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.fields.serialize(serializer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use event_bus::Handler;
    use serde::Deserialize;
    use serde_json::json;
    use std::sync::{Arc, Mutex};

    #[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
    #[serde(default)]
    struct Counter {
        label: String,
        value: i64,
    }

    impl Schema for Counter {}

    #[test]
    fn test_partial_bag_fills_present_fields_only() {
        let model: Model<Counter> =
            Model::new(json!({ "value": 7, "unknown": true }), EventBus::new()).unwrap();
        assert_eq!(model.value, 7);
        assert_eq!(model.label, "");
    }

    #[test]
    fn test_null_bag_yields_defaults() {
        let model: Model<Counter> = Model::new(Value::Null, EventBus::new()).unwrap();
        assert_eq!(model.fields(), &Counter::default());
    }

    #[test]
    fn test_mistyped_field_is_rejected() {
        let result: Result<Model<Counter>> =
            Model::new(json!({ "value": "seven" }), EventBus::new());
        assert!(matches!(result, Err(DomainError::Schema(_))));
    }

    #[test]
    fn test_non_object_bag_is_rejected() {
        let result: Result<Model<Counter>> = Model::new(json!([1, 2]), EventBus::new());
        assert!(matches!(result, Err(DomainError::NotAnObject("array"))));
    }

    #[test]
    fn test_announce_without_payload_emits_snapshot() {
        let bus = EventBus::new();
        let seen = Arc::new(Mutex::new(None));
        let sink = Arc::clone(&seen);
        bus.on(
            "counter:changed",
            Handler::from_payload(move |payload| *sink.lock().unwrap() = Some(payload.clone())),
        );

        let model = Model::from_fields(
            Counter {
                label: "clicks".into(),
                value: 3,
            },
            bus,
        );
        model.announce("counter:changed", None).unwrap();

        assert_eq!(
            seen.lock().unwrap().clone(),
            Some(json!({ "label": "clicks", "value": 3 }))
        );
    }

    #[test]
    fn test_announce_with_payload_emits_it_verbatim() {
        let bus = EventBus::new();
        let seen = Arc::new(Mutex::new(None));
        let sink = Arc::clone(&seen);
        bus.on(
            "counter:reset",
            Handler::from_payload(move |payload| *sink.lock().unwrap() = Some(payload.clone())),
        );

        let model: Model<Counter> = Model::new(Value::Null, bus).unwrap();
        model
            .announce("counter:reset", Some(json!({ "by": "user" })))
            .unwrap();

        assert_eq!(seen.lock().unwrap().clone(), Some(json!({ "by": "user" })));
    }

    #[test]
    fn test_model_serializes_as_fields() {
        let model = Model::from_fields(
            Counter {
                label: "a".into(),
                value: 1,
            },
            EventBus::new(),
        );
        assert_eq!(
            serde_json::to_value(&model).unwrap(),
            json!({ "label": "a", "value": 1 })
        );
    }
}
