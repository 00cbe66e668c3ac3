//! Bearer-token lifecycle for the merchant API's JSON-token auth scheme.
//!
//! A [`Jwt`] holds the merchant's client credentials and at most one live
//! [`Token`]. Callers that need an authenticated request go through
//! [`ensure_token`]: when the current token is absent or expired, the
//! configured [`TokenExchanger`] performs the credential exchange and the
//! fresh token replaces the old one wholesale. Tokens are never mutated or
//! extended; expiry is computed once, at construction, from the
//! server-supplied relative lifetime.

use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::error::{AuthError, ValidationError};
use crate::model::Model;
use crate::timestamp::UnixTimestamp;
use crate::validate;

/// Grant type used for the credential exchange.
pub const GRANT_CLIENT_CREDENTIALS: &str = "client_credentials";

/// A bearer credential with an absolute expiry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    access_token: String,
    token_type: String,
    expires_at: UnixTimestamp,
}

impl Token {
    /// Creates a token from the auth endpoint's response parts. Expiry is
    /// `now + expires_in` and is never recomputed afterwards.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::EmptyValue`] when the access token or
    /// token type is empty.
    pub fn new(
        access_token: impl Into<String>,
        token_type: impl Into<String>,
        expires_in: u64,
    ) -> Result<Self, ValidationError> {
        Self::with_expiry(
            access_token,
            token_type,
            UnixTimestamp::now().saturating_add(expires_in),
        )
    }

    /// Creates a token with an already-absolute expiry, as read back from
    /// the cache.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::EmptyValue`] when the access token or
    /// token type is empty.
    pub fn with_expiry(
        access_token: impl Into<String>,
        token_type: impl Into<String>,
        expires_at: UnixTimestamp,
    ) -> Result<Self, ValidationError> {
        let access_token = access_token.into();
        let token_type = token_type.into();
        validate::non_empty("accessToken", &access_token)?;
        validate::non_empty("tokenType", &token_type)?;
        Ok(Self {
            access_token,
            token_type,
            expires_at,
        })
    }

    /// The opaque bearer credential.
    #[must_use]
    pub fn access_token(&self) -> &str {
        &self.access_token
    }

    /// Token type as reported by the auth endpoint (usually `Bearer`).
    #[must_use]
    pub fn token_type(&self) -> &str {
        &self.token_type
    }

    /// Absolute expiry instant.
    #[must_use]
    pub const fn expires_at(&self) -> UnixTimestamp {
        self.expires_at
    }

    /// Whether the current clock has reached the expiry instant.
    #[must_use]
    pub fn is_expired(&self) -> bool {
        self.expires_at.has_passed()
    }

    /// Value for the `Authorization` request header.
    #[must_use]
    pub fn authorization_header(&self) -> String {
        format!("{} {}", self.token_type, self.access_token)
    }
}

impl Model for Token {
    fn model_name() -> &'static str {
        "token"
    }

    fn to_object(&self, _full: bool) -> Map<String, Value> {
        let mut object = Map::new();
        object.insert("accessToken".to_owned(), Value::from(self.access_token.clone()));
        object.insert("tokenType".to_owned(), Value::from(self.token_type.clone()));
        object.insert("expiresAt".to_owned(), Value::from(self.expires_at.as_secs()));
        object
    }

    fn from_object(object: &Map<String, Value>) -> Result<Self, ValidationError> {
        let reader = crate::convert::ObjectReader::new(object);
        Self::with_expiry(
            reader.required_str("accessToken")?,
            reader.required_str("tokenType")?,
            UnixTimestamp::from_secs(reader.required_u64("expiresAt")?),
        )
    }
}

/// Client-credential configuration owning at most one live token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Jwt {
    client_id: String,
    client_secret: String,
    scope: String,
    grant_type: String,
    token: Option<Token>,
}

impl Jwt {
    /// Creates a credential configuration with no token.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::EmptyValue`] when the client id or
    /// secret is empty.
    pub fn new(
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        scope: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let client_id = client_id.into();
        let client_secret = client_secret.into();
        validate::non_empty("clientId", &client_id)?;
        validate::non_empty("clientSecret", &client_secret)?;
        Ok(Self {
            client_id,
            client_secret,
            scope: scope.into(),
            grant_type: GRANT_CLIENT_CREDENTIALS.to_owned(),
            token: None,
        })
    }

    /// Merchant client id.
    #[must_use]
    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    /// Merchant client secret.
    #[must_use]
    pub fn client_secret(&self) -> &str {
        &self.client_secret
    }

    /// Requested OAuth scope.
    #[must_use]
    pub fn scope(&self) -> &str {
        &self.scope
    }

    /// Grant type sent on exchange.
    #[must_use]
    pub fn grant_type(&self) -> &str {
        &self.grant_type
    }

    /// The current token, if one has been stored.
    #[must_use]
    pub fn token(&self) -> Option<&Token> {
        self.token.as_ref()
    }

    /// Replaces the current token wholesale.
    pub fn set_token(&mut self, token: Token) {
        self.token = Some(token);
    }

    /// Drops the current token, forcing re-authentication.
    pub fn clear_token(&mut self) {
        self.token = None;
    }

    /// Whether a token is present and not yet expired.
    #[must_use]
    pub fn has_valid_token(&self) -> bool {
        self.token.as_ref().is_some_and(|token| !token.is_expired())
    }
}

/// External collaborator performing the credential exchange.
#[async_trait]
pub trait TokenExchanger: Send + Sync {
    /// Exchanges the configuration's credentials for a fresh token.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError`] when the auth endpoint rejects the
    /// credentials, is unreachable, or answers with an unusable payload.
    async fn exchange(&self, jwt: &Jwt) -> Result<Token, AuthError>;
}

/// Returns a valid token, exchanging credentials first when the current
/// one is absent or expired.
///
/// On exchange failure the error propagates and the stored token is left
/// untouched.
///
/// # Errors
///
/// Returns [`AuthError`] from the exchange.
pub async fn ensure_token<'a>(
    jwt: &'a mut Jwt,
    exchanger: &dyn TokenExchanger,
) -> Result<&'a Token, AuthError> {
    if !jwt.has_valid_token() {
        let token = exchanger.exchange(jwt).await?;
        jwt.set_token(token);
    }
    Ok(jwt.token().expect("token present after exchange"))
}
