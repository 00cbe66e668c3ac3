//! Merchant store records as returned by `GET /v1/stores`.

use serde_json::{Map, Value};

use crate::collection::Collection;
use crate::convert::{FromRaw, ObjectReader};
use crate::error::ValidationError;
use crate::model::{Model, insert_optional};
use crate::validate;

use super::Currency;

/// Lifecycle state of a merchant store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreStatus {
    /// Accepting payments.
    Active,
    /// Temporarily disabled by the gateway.
    Suspended,
    /// Permanently closed.
    Closed,
}

impl StoreStatus {
    /// Wire backing value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Suspended => "suspended",
            Self::Closed => "closed",
        }
    }
}

impl FromRaw for StoreStatus {
    fn from_raw(raw: &Value) -> Option<Self> {
        match raw.as_str()? {
            "active" => Some(Self::Active),
            "suspended" => Some(Self::Suspended),
            "closed" => Some(Self::Closed),
            _ => None,
        }
    }
}

/// A merchant store registered with the gateway.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Store {
    store_id: String,
    name: String,
    currency: Currency,
    status: StoreStatus,
    contact_email: Option<String>,
}

/// The collection returned by the store listing endpoint.
pub type StoreCollection = Collection<Store>;

impl Store {
    /// Creates a store record.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::IllegalValue`] for a malformed id or
    /// contact email and [`ValidationError::EmptyValue`] for an empty
    /// name.
    pub fn new(
        store_id: impl Into<String>,
        name: impl Into<String>,
        currency: Currency,
        status: StoreStatus,
        contact_email: Option<String>,
    ) -> Result<Self, ValidationError> {
        let store_id = store_id.into();
        let name = name.into();
        validate::uuid("storeId", &store_id)?;
        validate::non_empty("name", &name)?;
        if let Some(email) = &contact_email {
            validate::email("contactEmail", email)?;
        }
        Ok(Self {
            store_id,
            name,
            currency,
            status,
            contact_email,
        })
    }

    /// Gateway-assigned store id.
    #[must_use]
    pub fn store_id(&self) -> &str {
        &self.store_id
    }

    /// Display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Settlement currency.
    #[must_use]
    pub const fn currency(&self) -> Currency {
        self.currency
    }

    /// Lifecycle state.
    #[must_use]
    pub const fn status(&self) -> StoreStatus {
        self.status
    }

    /// Contact email, if registered.
    #[must_use]
    pub fn contact_email(&self) -> Option<&str> {
        self.contact_email.as_deref()
    }
}

impl Model for Store {
    fn model_name() -> &'static str {
        "store"
    }

    fn to_object(&self, full: bool) -> Map<String, Value> {
        let mut object = Map::new();
        object.insert("storeId".to_owned(), Value::from(self.store_id.clone()));
        object.insert("name".to_owned(), Value::from(self.name.clone()));
        object.insert("currency".to_owned(), Value::from(self.currency.code()));
        object.insert("status".to_owned(), Value::from(self.status.as_str()));
        insert_optional(
            &mut object,
            "contactEmail",
            self.contact_email.clone().map(Value::from),
            full,
        );
        object
    }

    fn from_object(object: &Map<String, Value>) -> Result<Self, ValidationError> {
        let reader = ObjectReader::new(object);
        Self::new(
            reader.required_str("storeId")?,
            reader.required_str("name")?,
            reader.required_enum("currency")?,
            reader.required_enum("status")?,
            reader.optional_str("contactEmail")?.map(str::to_owned),
        )
    }
}
