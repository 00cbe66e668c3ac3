//! Customer identity data attached to invoice and part-payment orders.

use serde_json::{Map, Value};

use crate::convert::ObjectReader;
use crate::error::ValidationError;
use crate::model::{Model, insert_optional};
use crate::validate;

const COUNTRY_ALPHABET: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// A customer identified toward the gateway for credit decisions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Customer {
    email: String,
    country: String,
    national_id: String,
    reference: Option<String>,
}

impl Customer {
    /// Creates a customer record.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::IllegalValue`] for a malformed email,
    /// [`ValidationError::IllegalCharset`] for a country code outside
    /// `A-Z`, and [`ValidationError::IllegalCustomer`] for an invalid
    /// national identity number.
    pub fn new(
        email: impl Into<String>,
        country: impl Into<String>,
        national_id: impl Into<String>,
        reference: Option<String>,
    ) -> Result<Self, ValidationError> {
        let email = email.into();
        let country = country.into();
        let national_id = national_id.into();
        validate::email("email", &email)?;
        validate::charset("country", &country, COUNTRY_ALPHABET)?;
        if country.len() != 2 {
            return Err(ValidationError::illegal_value(
                "country",
                "must be a two-letter ISO 3166-1 code",
            ));
        }
        validate::national_id("nationalId", &national_id)?;
        if let Some(reference) = &reference {
            validate::non_empty("reference", reference)?;
        }
        Ok(Self {
            email,
            country,
            national_id,
            reference,
        })
    }

    /// Contact email.
    #[must_use]
    pub fn email(&self) -> &str {
        &self.email
    }

    /// Two-letter country code.
    #[must_use]
    pub fn country(&self) -> &str {
        &self.country
    }

    /// National identity number, as given.
    #[must_use]
    pub fn national_id(&self) -> &str {
        &self.national_id
    }

    /// Merchant-side customer reference, if any.
    #[must_use]
    pub fn reference(&self) -> Option<&str> {
        self.reference.as_deref()
    }
}

impl Model for Customer {
    fn model_name() -> &'static str {
        "customer"
    }

    fn to_object(&self, full: bool) -> Map<String, Value> {
        let mut object = Map::new();
        object.insert("email".to_owned(), Value::from(self.email.clone()));
        object.insert("country".to_owned(), Value::from(self.country.clone()));
        object.insert("nationalId".to_owned(), Value::from(self.national_id.clone()));
        insert_optional(
            &mut object,
            "reference",
            self.reference.clone().map(Value::from),
            full,
        );
        object
    }

    fn from_object(object: &Map<String, Value>) -> Result<Self, ValidationError> {
        let reader = ObjectReader::new(object);
        Self::new(
            reader.required_str("email")?,
            reader.required_str("country")?,
            reader.required_str("nationalId")?,
            reader.optional_str("reference")?.map(str::to_owned),
        )
    }
}
