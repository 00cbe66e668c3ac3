//! Base contract for immutable, self-validating domain records.
//!
//! Every domain object in this crate is a [`Model`]: a value object whose
//! constructor runs all field-level validation up front, so an instance in
//! hand has already passed its invariants. There is no update-in-place;
//! "modifying" a model means constructing a new one.
//!
//! Models convert to and from a plain JSON object representation. The
//! `full` flag selects between the compact form used for API payloads
//! (absent optionals are omitted) and the exhaustive form used for cache
//! serialization (absent optionals appear as explicit nulls, so a
//! round-trip reconstructs the instance field for field).

use serde_json::{Map, Value};

use crate::error::ValidationError;

/// An immutable, construction-time-validated record.
pub trait Model: std::fmt::Debug + Clone + PartialEq + Sized {
    /// Stable type tag for this model, used by the cache envelope.
    fn model_name() -> &'static str;

    /// Converts the model into a plain mapping of wire-spelled field names.
    ///
    /// With `full == false`, fields holding no value are omitted. With
    /// `full == true`, they are present as explicit nulls. Nested models
    /// and collections convert recursively with the same flag.
    fn to_object(&self, full: bool) -> Map<String, Value>;

    /// Hydrates an instance from a plain mapping.
    ///
    /// Implementations resolve each declared field through an
    /// [`ObjectReader`](crate::convert::ObjectReader) and then run the
    /// ordinary validating constructor; validation failures propagate
    /// unchanged. Unknown keys in `object` are ignored.
    ///
    /// # Errors
    ///
    /// Returns the most specific [`ValidationError`] for the first field
    /// that cannot be resolved or fails its invariant.
    fn from_object(object: &Map<String, Value>) -> Result<Self, ValidationError>;

    /// Converts the model into a JSON value (an object).
    fn to_value(&self, full: bool) -> Value {
        Value::Object(self.to_object(full))
    }
}

/// Inserts an optional field following the compact/full convention.
///
/// Present values are always inserted; absent values become explicit nulls
/// only when `full` is set.
pub fn insert_optional(object: &mut Map<String, Value>, key: &str, value: Option<Value>, full: bool) {
    match value {
        Some(value) => {
            object.insert(key.to_owned(), value);
        }
        None if full => {
            object.insert(key.to_owned(), Value::Null);
        }
        None => {}
    }
}
