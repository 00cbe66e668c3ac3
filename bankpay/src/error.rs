//! Error types for the Bankpay merchant API SDK.
//!
//! The taxonomy mirrors the gateway's failure classes: [`ValidationError`]
//! for data that breaks a domain rule, [`CacheError`] for cached-payload
//! problems, [`ConfigError`] for missing configuration, and
//! [`ApiError`]/[`AuthError`] for remote-call failures. Conversion and
//! validation failures always propagate to the immediate caller; nothing in
//! this crate downgrades them to a generic error.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A value failed a field-level domain rule.
///
/// Raised by the predicates in [`crate::validate`] and by model
/// constructors. Each variant names the most specific rule that was broken.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// A required string was empty or whitespace-only.
    #[error("field '{field}' must not be empty")]
    EmptyValue {
        /// The offending field, in its wire spelling.
        field: String,
    },

    /// A value was present but violated a domain rule.
    #[error("field '{field}' has an illegal value: {reason}")]
    IllegalValue {
        /// The offending field, in its wire spelling.
        field: String,
        /// What was wrong with the value.
        reason: String,
    },

    /// A structural value had the wrong shape for the target type.
    #[error("expected {expected}, found {found}")]
    IllegalType {
        /// What the converter expected at this position.
        expected: String,
        /// What it found instead.
        found: String,
    },

    /// A string contained characters outside the allowed alphabet.
    #[error("field '{field}' contains characters outside the allowed set")]
    IllegalCharset {
        /// The offending field, in its wire spelling.
        field: String,
    },

    /// Customer identity data failed country-specific rules.
    #[error("illegal customer data: {reason}")]
    IllegalCustomer {
        /// What was wrong with the identity data.
        reason: String,
    },
}

impl ValidationError {
    /// Creates a [`ValidationError::EmptyValue`] for the given field.
    #[must_use]
    pub fn empty(field: impl Into<String>) -> Self {
        Self::EmptyValue {
            field: field.into(),
        }
    }

    /// Creates a [`ValidationError::IllegalValue`] for the given field.
    #[must_use]
    pub fn illegal_value(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::IllegalValue {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Creates a [`ValidationError::IllegalType`] shape error.
    #[must_use]
    pub fn illegal_type(expected: impl Into<String>, found: impl Into<String>) -> Self {
        Self::IllegalType {
            expected: expected.into(),
            found: found.into(),
        }
    }

    /// Creates a [`ValidationError::IllegalCharset`] for the given field.
    #[must_use]
    pub fn illegal_charset(field: impl Into<String>) -> Self {
        Self::IllegalCharset {
            field: field.into(),
        }
    }

    /// Creates a [`ValidationError::IllegalCustomer`] error.
    #[must_use]
    pub fn illegal_customer(reason: impl Into<String>) -> Self {
        Self::IllegalCustomer {
            reason: reason.into(),
        }
    }
}

/// A cached payload could not be read, written, or converted.
///
/// The cache wrapper never lets a raw type or serde error leak to its
/// callers; everything surfaces as one of these variants.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    /// The stored payload belongs to a different model than the one the
    /// cache handle is typed for.
    #[error("cached payload holds '{found}', expected '{expected}'")]
    TypeMismatch {
        /// The model the cache handle expects.
        expected: String,
        /// The model tag found in the stored envelope.
        found: String,
    },

    /// The payload could not be JSON-encoded for storage.
    #[error("failed to encode payload for caching: {0}")]
    Encode(#[source] serde_json::Error),

    /// The stored envelope is not valid JSON.
    #[error("failed to decode cached payload: {0}")]
    Decode(#[source] serde_json::Error),

    /// The stored data failed hydration into the expected model.
    #[error("failed to convert cached payload: {0}")]
    Convert(#[from] ValidationError),

    /// The underlying cache store reported a failure.
    #[error("cache backend error: {0}")]
    Backend(String),
}

/// Required configuration is missing or unreadable.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("cannot read configuration file '{path}': {source}")]
    Io {
        /// Path that was attempted.
        path: String,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// The configuration file is not valid TOML.
    #[error("cannot parse configuration: {0}")]
    Parse(#[from] toml::de::Error),

    /// A required key is absent or empty after environment expansion.
    #[error("missing required configuration key '{0}'")]
    MissingKey(&'static str),
}

/// Structured error payload returned by the gateway on non-2xx responses.
///
/// # JSON Format
///
/// ```json
/// {
///   "traceId": "3f2e…",
///   "code": "store_not_found",
///   "message": "No store with that id",
///   "timestamp": "2024-03-01T10:15:00Z"
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorBody {
    /// Correlation id for the failed request, if the gateway supplied one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trace_id: Option<String>,

    /// Machine-readable error code.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,

    /// Human-readable message.
    pub message: String,

    /// Gateway-side timestamp of the failure.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}

impl ErrorBody {
    /// Creates an error body with only a message.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            ..Self::default()
        }
    }

    /// Sets the machine-readable error code.
    #[must_use]
    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    /// Sets the correlation id.
    #[must_use]
    pub fn with_trace_id(mut self, trace_id: impl Into<String>) -> Self {
        self.trace_id = Some(trace_id.into());
        self
    }
}

impl fmt::Display for ErrorBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.code {
            Some(code) => write!(f, "{}: {}", code, self.message),
            None => write!(f, "{}", self.message),
        }
    }
}

/// A call to the merchant API failed.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The gateway answered with a non-2xx status.
    #[error("gateway returned {status}: {body}")]
    Gateway {
        /// HTTP status code of the response.
        status: u16,
        /// Parsed error payload, or a synthesized one when the body was
        /// not structured.
        body: ErrorBody,
    },

    /// The request never produced a gateway response.
    #[error("transport failure in {context}: {reason}")]
    Transport {
        /// Human-readable identifier of the call site (e.g. `"GET /v1/stores"`).
        context: &'static str,
        /// Description of the underlying failure.
        reason: String,
    },

    /// Token acquisition failed before the request could be made.
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// A fresh gateway response failed hydration into its typed model.
    #[error("invalid response payload: {0}")]
    InvalidBody(#[from] ValidationError),

    /// A cached payload failed to read back.
    #[error(transparent)]
    Cache(#[from] CacheError),
}

/// The credential exchange with the auth endpoint failed.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// The auth endpoint rejected the credentials.
    #[error("credential exchange rejected with status {status}: {message}")]
    Rejected {
        /// HTTP status code of the rejection.
        status: u16,
        /// Response body, verbatim.
        message: String,
    },

    /// The exchange request never reached the auth endpoint.
    #[error("transport failure during credential exchange: {0}")]
    Transport(String),

    /// The auth endpoint answered 2xx with an unusable token payload.
    #[error("malformed token response: {0}")]
    MalformedToken(#[from] ValidationError),
}
