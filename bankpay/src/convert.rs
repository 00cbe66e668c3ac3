//! Conversion of untyped JSON structures into typed models and collections.
//!
//! The gateway hands back loosely-typed structural data: parsed JSON
//! objects and arrays, nested arbitrarily. This module turns that data into
//! validated domain objects. The source system resolved fields by
//! reflecting over constructor parameters; here every model declares an
//! explicit `from_object` (see [`Model`]) built on the [`ObjectReader`]
//! field-resolution surface below, so the same lookup is static and
//! compile-time checked.
//!
//! Field resolution always distinguishes three branches explicitly:
//!
//! 1. property present and valid — the value is used;
//! 2. property absent (or JSON null) — `required_*` readers fail with
//!    [`ValidationError::IllegalValue`], `optional_*` readers yield `None`
//!    so the caller can apply its default;
//! 3. property present but invalid — a specific error, never a fallback.
//!
//! Unknown properties are ignored, so the gateway can add fields without
//! breaking older clients. Shape errors originate here; a model's own
//! constructor failures pass through unwrapped.

use rust_decimal::Decimal;
use serde_json::{Map, Value};

use crate::collection::Collection;
use crate::error::ValidationError;
use crate::model::Model;

/// Converts a JSON value into a model instance.
///
/// # Errors
///
/// Returns [`ValidationError::IllegalType`] when `value` is not an object,
/// or whatever the model's own hydration raises.
pub fn convert<T: Model>(value: &Value) -> Result<T, ValidationError> {
    match value {
        Value::Object(object) => T::from_object(object),
        other => Err(ValidationError::illegal_type(
            T::model_name(),
            json_type_name(other),
        )),
    }
}

/// Converts a JSON value into a typed collection.
///
/// The value must be an array; every element converts to the declared
/// element type in order. An empty array yields an empty collection, never
/// an absent value.
///
/// # Errors
///
/// Returns [`ValidationError::IllegalType`] when `value` is not an array,
/// or the first element-level error.
pub fn convert_collection<T: Model>(value: &Value) -> Result<Collection<T>, ValidationError> {
    match value {
        Value::Array(items) => items
            .iter()
            .map(convert::<T>)
            .collect::<Result<Collection<T>, _>>(),
        other => Err(ValidationError::illegal_type(
            format!("array of {}", T::model_name()),
            json_type_name(other),
        )),
    }
}

/// Name of a JSON value's type, for error messages.
fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Enum types resolvable from a raw backing value.
///
/// Each enum provides a lookup over its declared cases; a non-matching
/// value yields `None` and the reader turns that into an
/// [`ValidationError::IllegalValue`] naming the field.
pub trait FromRaw: Sized {
    /// Resolves an enum case from its raw backing value.
    fn from_raw(raw: &Value) -> Option<Self>;
}

/// Field-resolution surface over a plain JSON object.
///
/// Wraps a borrowed map and exposes typed readers. `required_*` readers
/// fail when the property is missing or null; `optional_*` readers return
/// `None` in that case. Both fail when the property is present with an
/// incompatible type — numeric readers accept JSON numbers and numeric
/// strings (the gateway emits both), nothing else is coerced.
#[derive(Debug, Clone, Copy)]
pub struct ObjectReader<'a> {
    object: &'a Map<String, Value>,
}

impl<'a> ObjectReader<'a> {
    /// Wraps a plain JSON object.
    #[must_use]
    pub const fn new(object: &'a Map<String, Value>) -> Self {
        Self { object }
    }

    /// Returns the property when present and non-null.
    #[must_use]
    pub fn present(&self, key: &str) -> Option<&'a Value> {
        match self.object.get(key) {
            None | Some(Value::Null) => None,
            Some(value) => Some(value),
        }
    }

    fn require(&self, key: &str) -> Result<&'a Value, ValidationError> {
        self.present(key)
            .ok_or_else(|| ValidationError::illegal_value(key, "missing required property"))
    }

    /// Reads a required string property.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::IllegalValue`] when absent,
    /// [`ValidationError::IllegalType`] when not a string.
    pub fn required_str(&self, key: &str) -> Result<&'a str, ValidationError> {
        as_str(key, self.require(key)?)
    }

    /// Reads an optional string property.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::IllegalType`] when present but not a
    /// string.
    pub fn optional_str(&self, key: &str) -> Result<Option<&'a str>, ValidationError> {
        self.present(key).map(|value| as_str(key, value)).transpose()
    }

    /// Reads a required boolean property.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::IllegalValue`] when absent,
    /// [`ValidationError::IllegalType`] when not a boolean.
    pub fn required_bool(&self, key: &str) -> Result<bool, ValidationError> {
        as_bool(key, self.require(key)?)
    }

    /// Reads an optional boolean property.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::IllegalType`] when present but not a
    /// boolean.
    pub fn optional_bool(&self, key: &str) -> Result<Option<bool>, ValidationError> {
        self.present(key).map(|value| as_bool(key, value)).transpose()
    }

    /// Reads a required unsigned integer, accepting numbers and numeric
    /// strings.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::IllegalValue`] when absent,
    /// [`ValidationError::IllegalType`] on an incompatible type.
    pub fn required_u64(&self, key: &str) -> Result<u64, ValidationError> {
        as_u64(key, self.require(key)?)
    }

    /// Reads an optional unsigned integer.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::IllegalType`] when present with an
    /// incompatible type.
    pub fn optional_u64(&self, key: &str) -> Result<Option<u64>, ValidationError> {
        self.present(key).map(|value| as_u64(key, value)).transpose()
    }

    /// Reads a required signed integer, accepting numbers and numeric
    /// strings.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::IllegalValue`] when absent,
    /// [`ValidationError::IllegalType`] on an incompatible type.
    pub fn required_i64(&self, key: &str) -> Result<i64, ValidationError> {
        let value = self.require(key)?;
        match value {
            Value::Number(n) => n
                .as_i64()
                .ok_or_else(|| illegal_scalar(key, "integer", value)),
            Value::String(s) => s
                .trim()
                .parse::<i64>()
                .map_err(|_| illegal_scalar(key, "integer", value)),
            other => Err(illegal_scalar(key, "integer", other)),
        }
    }

    /// Reads a required decimal amount, accepting numbers and numeric
    /// strings.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::IllegalValue`] when absent,
    /// [`ValidationError::IllegalType`] on an incompatible type.
    pub fn required_decimal(&self, key: &str) -> Result<Decimal, ValidationError> {
        as_decimal(key, self.require(key)?)
    }

    /// Reads an optional decimal amount.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::IllegalType`] when present with an
    /// incompatible type.
    pub fn optional_decimal(&self, key: &str) -> Result<Option<Decimal>, ValidationError> {
        self.present(key)
            .map(|value| as_decimal(key, value))
            .transpose()
    }

    /// Reads a required nested object without converting it, for callers
    /// that hydrate the sub-object themselves.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::IllegalValue`] when absent,
    /// [`ValidationError::IllegalType`] when not an object.
    pub fn required_object(&self, key: &str) -> Result<&'a Map<String, Value>, ValidationError> {
        let value = self.require(key)?;
        value
            .as_object()
            .ok_or_else(|| illegal_scalar(key, "object", value))
    }

    /// Reads a required nested model.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::IllegalValue`] when absent, otherwise
    /// whatever the nested conversion raises.
    pub fn required_model<M: Model>(&self, key: &str) -> Result<M, ValidationError> {
        convert(self.require(key)?)
    }

    /// Reads an optional nested model.
    ///
    /// # Errors
    ///
    /// Propagates nested conversion errors when the property is present.
    pub fn optional_model<M: Model>(&self, key: &str) -> Result<Option<M>, ValidationError> {
        self.present(key).map(convert).transpose()
    }

    /// Reads a required nested collection.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::IllegalValue`] when absent, otherwise
    /// whatever the nested conversion raises.
    pub fn required_collection<M: Model>(&self, key: &str) -> Result<Collection<M>, ValidationError> {
        convert_collection(self.require(key)?)
    }

    /// Reads an optional nested collection.
    ///
    /// # Errors
    ///
    /// Propagates nested conversion errors when the property is present.
    pub fn optional_collection<M: Model>(
        &self,
        key: &str,
    ) -> Result<Option<Collection<M>>, ValidationError> {
        self.present(key).map(convert_collection).transpose()
    }

    /// Reads a required enum property by its backing value.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::IllegalValue`] when absent or when the
    /// backing value matches no declared case.
    pub fn required_enum<E: FromRaw>(&self, key: &str) -> Result<E, ValidationError> {
        let raw = self.require(key)?;
        E::from_raw(raw).ok_or_else(|| unrecognized_case(key, raw))
    }

    /// Reads an optional enum property by its backing value.
    ///
    /// An absent or null property yields `None`; a present but unmatched
    /// value is still an error.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::IllegalValue`] when the backing value
    /// matches no declared case.
    pub fn optional_enum<E: FromRaw>(&self, key: &str) -> Result<Option<E>, ValidationError> {
        self.present(key)
            .map(|raw| E::from_raw(raw).ok_or_else(|| unrecognized_case(key, raw)))
            .transpose()
    }
}

fn as_str<'a>(key: &str, value: &'a Value) -> Result<&'a str, ValidationError> {
    value
        .as_str()
        .ok_or_else(|| illegal_scalar(key, "string", value))
}

fn as_bool(key: &str, value: &Value) -> Result<bool, ValidationError> {
    value
        .as_bool()
        .ok_or_else(|| illegal_scalar(key, "boolean", value))
}

fn as_u64(key: &str, value: &Value) -> Result<u64, ValidationError> {
    match value {
        Value::Number(n) => n
            .as_u64()
            .ok_or_else(|| illegal_scalar(key, "unsigned integer", value)),
        Value::String(s) => s
            .trim()
            .parse::<u64>()
            .map_err(|_| illegal_scalar(key, "unsigned integer", value)),
        other => Err(illegal_scalar(key, "unsigned integer", other)),
    }
}

fn as_decimal(key: &str, value: &Value) -> Result<Decimal, ValidationError> {
    match value {
        Value::Number(n) => n
            .to_string()
            .parse::<Decimal>()
            .map_err(|_| illegal_scalar(key, "decimal", value)),
        Value::String(s) => s
            .trim()
            .parse::<Decimal>()
            .map_err(|_| illegal_scalar(key, "decimal", value)),
        other => Err(illegal_scalar(key, "decimal", other)),
    }
}

fn illegal_scalar(key: &str, expected: &str, found: &Value) -> ValidationError {
    ValidationError::illegal_type(
        format!("{expected} in '{key}'"),
        json_type_name(found).to_owned(),
    )
}

fn unrecognized_case(key: &str, raw: &Value) -> ValidationError {
    ValidationError::illegal_value(key, format!("unrecognized value {raw}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Currency, Store, StoreStatus};
    use serde_json::json;

    #[test]
    fn test_convert_object_into_model() {
        let value = json!({
            "storeId": "3f2e4bd1-58b5-4a0c-9e4f-0b6f3c36b1aa",
            "name": "Main Street",
            "currency": "SEK",
            "status": "active"
        });
        let store: Store = convert(&value).unwrap();
        assert_eq!(store.name(), "Main Street");
        assert_eq!(store.currency(), Currency::Sek);
        assert_eq!(store.status(), StoreStatus::Active);
        assert!(store.contact_email().is_none());
    }

    #[test]
    fn test_convert_non_object_is_illegal_type() {
        let err = convert::<Store>(&json!([1, 2])).unwrap_err();
        assert!(matches!(err, ValidationError::IllegalType { .. }));
    }

    #[test]
    fn test_convert_collection_preserves_length_and_order() {
        let value = json!([
            {
                "storeId": "3f2e4bd1-58b5-4a0c-9e4f-0b6f3c36b1aa",
                "name": "First",
                "currency": "SEK",
                "status": "active"
            },
            {
                "storeId": "aa1e4bd1-58b5-4a0c-9e4f-0b6f3c36b1bb",
                "name": "Second",
                "currency": "EUR",
                "status": "suspended"
            }
        ]);
        let stores: Collection<Store> = convert_collection(&value).unwrap();
        assert_eq!(stores.len(), 2);
        assert_eq!(stores.get(0).unwrap().name(), "First");
        assert_eq!(stores.get(1).unwrap().name(), "Second");
    }

    #[test]
    fn test_convert_collection_from_object_is_illegal_type() {
        let err = convert_collection::<Store>(&json!({"not": "a list"})).unwrap_err();
        assert!(
            matches!(err, ValidationError::IllegalType { ref expected, .. } if expected.contains("array"))
        );
    }

    #[test]
    fn test_convert_collection_from_empty_array_is_empty_not_absent() {
        let stores: Collection<Store> = convert_collection(&json!([])).unwrap();
        assert_eq!(stores.len(), 0);
    }

    #[test]
    fn test_missing_required_property_is_illegal_value() {
        let value = json!({
            "storeId": "3f2e4bd1-58b5-4a0c-9e4f-0b6f3c36b1aa",
            "currency": "SEK",
            "status": "active"
        });
        let err = convert::<Store>(&value).unwrap_err();
        assert!(
            matches!(err, ValidationError::IllegalValue { ref field, ref reason }
                if field == "name" && reason == "missing required property")
        );
    }

    #[test]
    fn test_missing_optional_property_uses_default() {
        let object = json!({}).as_object().cloned().unwrap();
        let reader = ObjectReader::new(&object);
        assert_eq!(reader.optional_str("reference").unwrap(), None);
        assert_eq!(reader.optional_u64("ttl").unwrap(), None);
    }

    #[test]
    fn test_null_property_counts_as_absent() {
        let value = json!({"reference": null});
        let object = value.as_object().unwrap();
        let reader = ObjectReader::new(object);
        assert_eq!(reader.optional_str("reference").unwrap(), None);
        assert!(reader.required_str("reference").is_err());
    }

    #[test]
    fn test_numeric_string_coercion() {
        let value = json!({"expiresIn": "3600", "amount": "99.90"});
        let object = value.as_object().unwrap();
        let reader = ObjectReader::new(object);
        assert_eq!(reader.required_u64("expiresIn").unwrap(), 3600);
        assert_eq!(
            reader.required_decimal("amount").unwrap(),
            "99.90".parse::<Decimal>().unwrap()
        );
    }

    #[test]
    fn test_incompatible_scalar_is_never_coerced() {
        let value = json!({"expiresIn": true});
        let object = value.as_object().unwrap();
        let reader = ObjectReader::new(object);
        assert!(matches!(
            reader.required_u64("expiresIn").unwrap_err(),
            ValidationError::IllegalType { .. }
        ));
    }

    #[test]
    fn test_required_object_rejects_absence_and_scalars() {
        let value = json!({"details": {"kind": "card"}, "note": "plain"});
        let object = value.as_object().unwrap();
        let reader = ObjectReader::new(object);
        let details = reader.required_object("details").unwrap();
        assert_eq!(details.get("kind"), Some(&Value::from("card")));
        assert!(matches!(
            reader.required_object("missing").unwrap_err(),
            ValidationError::IllegalValue { ref field, .. } if field == "missing"
        ));
        assert!(matches!(
            reader.required_object("note").unwrap_err(),
            ValidationError::IllegalType { .. }
        ));
    }

    #[test]
    fn test_nested_collection_readers() {
        let value = json!({
            "stores": [{
                "storeId": "3f2e4bd1-58b5-4a0c-9e4f-0b6f3c36b1aa",
                "name": "Main Street",
                "currency": "SEK",
                "status": "active"
            }]
        });
        let object = value.as_object().unwrap();
        let reader = ObjectReader::new(object);
        let stores: Collection<Store> = reader.required_collection("stores").unwrap();
        assert_eq!(stores.len(), 1);
        assert!(reader.optional_collection::<Store>("branches").unwrap().is_none());
        assert!(reader.required_collection::<Store>("branches").is_err());
    }

    #[test]
    fn test_nested_collection_element_error_propagates() {
        let value = json!({"stores": [{"name": "missing the rest"}]});
        let object = value.as_object().unwrap();
        let reader = ObjectReader::new(object);
        let err = reader.required_collection::<Store>("stores").unwrap_err();
        assert!(matches!(err, ValidationError::IllegalValue { ref field, .. } if field == "storeId"));
    }

    #[test]
    fn test_unknown_properties_are_ignored() {
        let value = json!({
            "storeId": "3f2e4bd1-58b5-4a0c-9e4f-0b6f3c36b1aa",
            "name": "Main Street",
            "currency": "SEK",
            "status": "active",
            "introducedNextYear": {"nested": true}
        });
        assert!(convert::<Store>(&value).is_ok());
    }

    #[test]
    fn test_unmatched_enum_value_is_illegal_value() {
        let value = json!({"currency": "XYZ"});
        let object = value.as_object().unwrap();
        let reader = ObjectReader::new(object);
        let err = reader.required_enum::<Currency>("currency").unwrap_err();
        assert!(matches!(err, ValidationError::IllegalValue { ref field, .. } if field == "currency"));
    }

    #[test]
    fn test_optional_enum_absent_is_none_but_unmatched_errors() {
        let value = json!({"status": "paused"});
        let object = value.as_object().unwrap();
        let reader = ObjectReader::new(object);
        assert_eq!(
            reader.optional_enum::<Currency>("currency").unwrap(),
            None::<Currency>
        );
        assert!(reader.optional_enum::<StoreStatus>("status").is_err());
    }

    #[test]
    fn test_constructor_failure_propagates_unwrapped() {
        // Valid shape, but the name fails the model's own invariant.
        let value = json!({
            "storeId": "3f2e4bd1-58b5-4a0c-9e4f-0b6f3c36b1aa",
            "name": "   ",
            "currency": "SEK",
            "status": "active"
        });
        let err = convert::<Store>(&value).unwrap_err();
        assert!(matches!(err, ValidationError::EmptyValue { ref field } if field == "name"));
    }
}
