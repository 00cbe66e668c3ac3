//! Gateway API client and repository sources.

use std::sync::Arc;

use async_trait::async_trait;
use http::StatusCode;
use serde_json::Value;
use tokio::sync::Mutex;
use url::Url;

use bankpay::auth::{Jwt, Token, TokenExchanger, ensure_token};
use bankpay::config::Environment;
use bankpay::error::{ApiError, ErrorBody};
use bankpay::repository::RemoteSource;

/// Raw result of one gateway call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    /// Parsed response body; `Null` when the response had no body.
    pub body: Value,
    /// HTTP status code.
    pub code: u16,
}

/// Thin reqwest wrapper for the merchant API.
///
/// Attaches the bearer header, joins paths against the environment's base
/// URL, and maps non-2xx responses to [`ApiError::Gateway`] with the
/// parsed [`ErrorBody`] when the gateway sent one.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
}

impl ApiClient {
    /// Creates a client against an explicit base URL.
    #[must_use]
    pub fn new(base_url: Url) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url,
        }
    }

    /// Creates a client for the given environment.
    ///
    /// # Panics
    ///
    /// Never in practice; the environment base URLs are valid by
    /// construction.
    #[must_use]
    pub fn for_environment(environment: Environment) -> Self {
        let base_url = Url::parse(environment.api_base()).expect("valid environment base url");
        Self::new(base_url)
    }

    /// Sends an authenticated GET request.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] on transport failure or a non-2xx response.
    pub async fn get(&self, path: &str, token: &Token) -> Result<ApiResponse, ApiError> {
        let url = self.join(path, "GET")?;
        let request = self
            .http
            .get(url)
            .header(http::header::AUTHORIZATION, token.authorization_header());
        Self::dispatch(request, "GET").await
    }

    /// Sends an authenticated POST request with a JSON body.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] on transport failure or a non-2xx response.
    pub async fn post(
        &self,
        path: &str,
        token: &Token,
        body: &Value,
    ) -> Result<ApiResponse, ApiError> {
        let url = self.join(path, "POST")?;
        let request = self
            .http
            .post(url)
            .header(http::header::AUTHORIZATION, token.authorization_header())
            .json(body);
        Self::dispatch(request, "POST").await
    }

    fn join(&self, path: &str, context: &'static str) -> Result<Url, ApiError> {
        self.base_url.join(path).map_err(|err| ApiError::Transport {
            context,
            reason: format!("invalid request path '{path}': {err}"),
        })
    }

    async fn dispatch(
        request: reqwest::RequestBuilder,
        context: &'static str,
    ) -> Result<ApiResponse, ApiError> {
        let response = request.send().await.map_err(|err| ApiError::Transport {
            context,
            reason: err.to_string(),
        })?;
        let status = response.status();
        let text = response.text().await.map_err(|err| ApiError::Transport {
            context,
            reason: err.to_string(),
        })?;
        let body: Value = if text.trim().is_empty() {
            Value::Null
        } else {
            serde_json::from_str(&text).unwrap_or(Value::String(text.clone()))
        };

        if status.is_success() {
            return Ok(ApiResponse {
                body,
                code: status.as_u16(),
            });
        }

        // Prefer the gateway's structured error body; fall back to the
        // raw text so the caller always gets a message.
        let error_body = serde_json::from_value::<ErrorBody>(body)
            .unwrap_or_else(|_| ErrorBody::new(status_fallback_message(status, &text)));
        Err(ApiError::Gateway {
            status: status.as_u16(),
            body: error_body,
        })
    }
}

fn status_fallback_message(status: StatusCode, text: &str) -> String {
    if text.trim().is_empty() {
        format!("gateway returned {status} with no body")
    } else {
        text.to_owned()
    }
}

/// [`RemoteSource`] for the merchant's store listing (`GET /v1/stores`).
///
/// Owns the credential state behind a mutex: concurrent fetches serialize
/// on token acquisition, so at most one credential exchange is in flight.
pub struct StoresSource {
    client: ApiClient,
    jwt: Mutex<Jwt>,
    exchanger: Arc<dyn TokenExchanger>,
}

impl std::fmt::Debug for StoresSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoresSource")
            .field("client", &self.client)
            .finish_non_exhaustive()
    }
}

impl StoresSource {
    /// Path of the store listing endpoint.
    pub const PATH: &'static str = "/v1/stores";

    /// Creates a source over the given client and credentials.
    #[must_use]
    pub fn new(client: ApiClient, jwt: Jwt, exchanger: Arc<dyn TokenExchanger>) -> Self {
        Self {
            client,
            jwt: Mutex::new(jwt),
            exchanger,
        }
    }
}

#[async_trait]
impl RemoteSource for StoresSource {
    async fn fetch(&self) -> Result<Value, ApiError> {
        // Hold the lock only for token acquisition, not the request itself.
        let token = {
            let mut jwt = self.jwt.lock().await;
            ensure_token(&mut jwt, self.exchanger.as_ref()).await?.clone()
        };
        let response = self.client.get(Self::PATH, &token).await?;
        Ok(response.body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn token() -> Token {
        Token::new("test-token", "Bearer", 3600).unwrap()
    }

    async fn client(server: &MockServer) -> ApiClient {
        ApiClient::new(Url::parse(&server.uri()).unwrap())
    }

    #[tokio::test]
    async fn test_get_attaches_bearer_header() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/stores"))
            .and(header("authorization", "Bearer test-token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
            .expect(1)
            .mount(&server)
            .await;

        let response = client(&server)
            .await
            .get("/v1/stores", &token())
            .await
            .unwrap();
        assert_eq!(response.code, 200);
        assert_eq!(response.body, serde_json::json!([]));
    }

    #[tokio::test]
    async fn test_non_2xx_parses_structured_error_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/stores"))
            .respond_with(ResponseTemplate::new(404).set_body_json(serde_json::json!({
                "traceId": "t-123",
                "code": "store_not_found",
                "message": "no stores for merchant",
                "timestamp": "2024-03-01T10:15:00Z"
            })))
            .mount(&server)
            .await;

        let err = client(&server)
            .await
            .get("/v1/stores", &token())
            .await
            .unwrap_err();
        match err {
            ApiError::Gateway { status, body } => {
                assert_eq!(status, 404);
                assert_eq!(body.trace_id.as_deref(), Some("t-123"));
                assert_eq!(body.code.as_deref(), Some("store_not_found"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_non_2xx_without_structured_body_still_carries_message() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/stores"))
            .respond_with(ResponseTemplate::new(500).set_body_string("upstream exploded"))
            .mount(&server)
            .await;

        let err = client(&server)
            .await
            .get("/v1/stores", &token())
            .await
            .unwrap_err();
        match err {
            ApiError::Gateway { status, body } => {
                assert_eq!(status, 500);
                assert_eq!(body.message, "upstream exploded");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    struct FixedExchanger;

    #[async_trait]
    impl TokenExchanger for FixedExchanger {
        async fn exchange(&self, _jwt: &Jwt) -> Result<Token, bankpay::error::AuthError> {
            Ok(token())
        }
    }

    #[tokio::test]
    async fn test_concurrent_fetches_overlap_after_token_exchange() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/stores"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!([]))
                    .set_delay(std::time::Duration::from_millis(300)),
            )
            .expect(2)
            .mount(&server)
            .await;

        let source = StoresSource::new(
            client(&server).await,
            Jwt::new("merchant-1", "s3cret", "merchant-api").unwrap(),
            Arc::new(FixedExchanger),
        );

        let started = std::time::Instant::now();
        let (first, second) = tokio::join!(source.fetch(), source.fetch());
        first.unwrap();
        second.unwrap();
        // The requests run outside the credential lock, so their delays
        // overlap instead of stacking.
        assert!(started.elapsed() < std::time::Duration::from_millis(550));
    }

    #[tokio::test]
    async fn test_post_sends_json_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/orders/o-1/capture"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"ok": true})))
            .expect(1)
            .mount(&server)
            .await;

        let response = client(&server)
            .await
            .post(
                "/v1/orders/o-1/capture",
                &token(),
                &serde_json::json!({"amount": "99.90"}),
            )
            .await
            .unwrap();
        assert_eq!(response.body["ok"], serde_json::json!(true));
    }
}
