//! Payment orders, the composite record behind `POST /v1/orders`.

use serde_json::{Map, Value};

use crate::convert::ObjectReader;
use crate::error::ValidationError;
use crate::model::{Model, insert_optional};
use crate::validate;

use super::{Customer, Money};

/// A payment order: an amount owed, optionally tied to an identified
/// customer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Order {
    order_id: String,
    amount: Money,
    customer: Option<Customer>,
}

impl Order {
    /// Creates an order.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::IllegalValue`] for a malformed id. The
    /// nested amount and customer carry their own invariants and arrive
    /// already validated.
    pub fn new(
        order_id: impl Into<String>,
        amount: Money,
        customer: Option<Customer>,
    ) -> Result<Self, ValidationError> {
        let order_id = order_id.into();
        validate::uuid("orderId", &order_id)?;
        Ok(Self {
            order_id,
            amount,
            customer,
        })
    }

    /// Gateway-assigned order id.
    #[must_use]
    pub fn order_id(&self) -> &str {
        &self.order_id
    }

    /// Amount owed.
    #[must_use]
    pub const fn amount(&self) -> &Money {
        &self.amount
    }

    /// Identified customer, if any.
    #[must_use]
    pub const fn customer(&self) -> Option<&Customer> {
        self.customer.as_ref()
    }
}

impl Model for Order {
    fn model_name() -> &'static str {
        "order"
    }

    fn to_object(&self, full: bool) -> Map<String, Value> {
        let mut object = Map::new();
        object.insert("orderId".to_owned(), Value::from(self.order_id.clone()));
        object.insert("amount".to_owned(), self.amount.to_value(full));
        insert_optional(
            &mut object,
            "customer",
            self.customer.as_ref().map(|customer| customer.to_value(full)),
            full,
        );
        object
    }

    fn from_object(object: &Map<String, Value>) -> Result<Self, ValidationError> {
        let reader = ObjectReader::new(object);
        Self::new(
            reader.required_str("orderId")?,
            reader.required_model("amount")?,
            reader.optional_model("customer")?,
        )
    }
}
