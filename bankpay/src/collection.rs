//! Homogeneous, ordered collections of domain models.
//!
//! [`Collection<T>`] carries the element type in its type parameter, which
//! is the compile-time analog of the source system's runtime element-type
//! check: a collection of stores simply cannot hold a customer. The runtime
//! half of the guarantee lives at the JSON boundary, where hydration of a
//! mis-shaped element fails with a typed error (see [`crate::convert`]).

use serde_json::{Map, Value};

use crate::error::ValidationError;
use crate::model::Model;

/// An ordered sequence of models of a single type.
///
/// Iteration is restartable (`iter()` always begins at index zero) and
/// yields elements in insertion order.
#[derive(Debug, Clone, PartialEq)]
pub struct Collection<T: Model> {
    items: Vec<T>,
}

impl<T: Model> Collection<T> {
    /// Creates an empty collection.
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Wire-spelled name of the element type.
    #[must_use]
    pub fn element_name() -> &'static str {
        T::model_name()
    }

    /// Number of elements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns `true` when the collection holds no elements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Returns the element at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::IllegalValue`] when `index` is out of
    /// range.
    pub fn get(&self, index: usize) -> Result<&T, ValidationError> {
        self.items.get(index).ok_or_else(|| {
            ValidationError::illegal_value(
                "index",
                format!("{index} is out of range for {} elements", self.items.len()),
            )
        })
    }

    /// Returns the first element, if any.
    #[must_use]
    pub fn first(&self) -> Option<&T> {
        self.items.first()
    }

    /// Appends an element. Homogeneity is guaranteed by the type parameter.
    pub fn push(&mut self, item: T) {
        self.items.push(item);
    }

    /// Iterates over the elements in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    /// Converts every element to its plain-mapping form, preserving order.
    #[must_use]
    pub fn to_array(&self, full: bool) -> Vec<Map<String, Value>> {
        self.items.iter().map(|item| item.to_object(full)).collect()
    }

    /// Converts the collection to a JSON array value.
    #[must_use]
    pub fn to_value(&self, full: bool) -> Value {
        Value::Array(self.items.iter().map(|item| item.to_value(full)).collect())
    }
}

impl<T: Model> Default for Collection<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Model> From<Vec<T>> for Collection<T> {
    fn from(items: Vec<T>) -> Self {
        Self { items }
    }
}

impl<T: Model> FromIterator<T> for Collection<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self {
            items: iter.into_iter().collect(),
        }
    }
}

impl<'a, T: Model> IntoIterator for &'a Collection<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl<T: Model> IntoIterator for Collection<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}
