//! Monetary amounts and supported settlement currencies.

use rust_decimal::Decimal;
use serde_json::{Map, Value};

use crate::convert::{FromRaw, ObjectReader};
use crate::error::ValidationError;
use crate::model::Model;
use crate::validate;

/// Settlement currencies accepted by the gateway.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Currency {
    /// Swedish krona.
    Sek,
    /// Norwegian krone.
    Nok,
    /// Danish krone.
    Dkk,
    /// Euro.
    Eur,
}

impl Currency {
    /// ISO 4217 code, the wire backing value.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::Sek => "SEK",
            Self::Nok => "NOK",
            Self::Dkk => "DKK",
            Self::Eur => "EUR",
        }
    }
}

impl FromRaw for Currency {
    fn from_raw(raw: &Value) -> Option<Self> {
        match raw.as_str()? {
            "SEK" => Some(Self::Sek),
            "NOK" => Some(Self::Nok),
            "DKK" => Some(Self::Dkk),
            "EUR" => Some(Self::Eur),
            _ => None,
        }
    }
}

/// A strictly positive amount in a settlement currency.
///
/// Amounts serialize as strings (`"99.90"`) to avoid floating-point
/// representation on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Money {
    amount: Decimal,
    currency: Currency,
}

impl Money {
    /// Creates an amount.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::IllegalValue`] when `amount` is zero or
    /// negative.
    pub fn new(amount: Decimal, currency: Currency) -> Result<Self, ValidationError> {
        validate::positive("amount", amount)?;
        Ok(Self { amount, currency })
    }

    /// The decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.amount
    }

    /// The settlement currency.
    #[must_use]
    pub const fn currency(&self) -> Currency {
        self.currency
    }
}

impl Model for Money {
    fn model_name() -> &'static str {
        "money"
    }

    fn to_object(&self, _full: bool) -> Map<String, Value> {
        let mut object = Map::new();
        object.insert("amount".to_owned(), Value::from(self.amount.to_string()));
        object.insert("currency".to_owned(), Value::from(self.currency.code()));
        object
    }

    fn from_object(object: &Map<String, Value>) -> Result<Self, ValidationError> {
        let reader = ObjectReader::new(object);
        Self::new(
            reader.required_decimal("amount")?,
            reader.required_enum("currency")?,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::convert::convert;
    use serde_json::json;

    #[test]
    fn test_zero_amount_is_rejected() {
        let err = Money::new(Decimal::ZERO, Currency::Sek).unwrap_err();
        assert!(matches!(err, ValidationError::IllegalValue { ref field, .. } if field == "amount"));
    }

    #[test]
    fn test_round_trip_through_full_object_form() {
        let original = Money::new("99.90".parse().unwrap(), Currency::Eur).unwrap();
        let restored: Money = convert(&original.to_value(true)).unwrap();
        assert_eq!(restored, original);
    }

    #[test]
    fn test_hydrates_from_number_or_string_amount() {
        let from_string: Money = convert(&json!({"amount": "25.00", "currency": "SEK"})).unwrap();
        let from_number: Money = convert(&json!({"amount": 25.00, "currency": "SEK"})).unwrap();
        assert_eq!(from_string.amount(), from_number.amount());
    }

    #[test]
    fn test_unknown_currency_is_illegal_value() {
        let err = convert::<Money>(&json!({"amount": "25.00", "currency": "USD"})).unwrap_err();
        assert!(
            matches!(err, ValidationError::IllegalValue { ref field, .. } if field == "currency")
        );
    }
}
