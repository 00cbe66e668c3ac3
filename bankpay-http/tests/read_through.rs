//! End-to-end flow: credential exchange, store fetch, cached re-read.

use std::sync::Arc;

use serde_json::json;
use url::Url;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use bankpay::cache::MemoryCache;
use bankpay::repository::StoreRepository;
use bankpay_http::auth::{AuthClient, TOKEN_PATH};
use bankpay_http::client::{ApiClient, StoresSource};

async fn mount_gateway(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path(TOKEN_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "integration-token",
            "token_type": "Bearer",
            "expires_in": 3600
        })))
        .expect(1)
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/v1/stores"))
        .and(header("authorization", "Bearer integration-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {
                "storeId": "3f2e4bd1-58b5-4a0c-9e4f-0b6f3c36b1aa",
                "name": "Main Street",
                "currency": "SEK",
                "status": "active",
                "contactEmail": "merchant@shop.example"
            },
            {
                "storeId": "aa1e4bd1-58b5-4a0c-9e4f-0b6f3c36b1bb",
                "name": "Harbour",
                "currency": "EUR",
                "status": "suspended"
            }
        ])))
        .expect(1)
        .mount(server)
        .await;
}

fn stores_source(server: &MockServer) -> StoresSource {
    let base = Url::parse(&server.uri()).unwrap();
    let client = ApiClient::new(base.clone());
    let exchanger = Arc::new(AuthClient::new(base.join(TOKEN_PATH).unwrap()));
    let jwt = bankpay::auth::Jwt::new("merchant-1", "s3cret", "merchant-api").unwrap();
    StoresSource::new(client, jwt, exchanger)
}

#[tokio::test]
async fn second_read_is_served_from_cache() {
    let server = MockServer::start().await;
    mount_gateway(&server).await;

    let repository = StoreRepository::new(Arc::new(MemoryCache::new()), 3600);
    let source = stores_source(&server);

    let first = repository.get_stores(&source).await.unwrap();
    assert_eq!(first.len(), 2);
    assert_eq!(first.get(0).unwrap().name(), "Main Street");
    assert_eq!(first.get(1).unwrap().name(), "Harbour");
    assert_eq!(
        first.get(0).unwrap().contact_email(),
        Some("merchant@shop.example")
    );

    // Mock expectations (one token exchange, one listing call) verify that
    // this read never reaches the gateway.
    let second = repository.get_stores(&source).await.unwrap();
    assert_eq!(second, first);
}

#[tokio::test]
async fn invalidate_then_read_refetches() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(TOKEN_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "integration-token",
            "token_type": "Bearer",
            "expires_in": 3600
        })))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/v1/stores"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {
                "storeId": "3f2e4bd1-58b5-4a0c-9e4f-0b6f3c36b1aa",
                "name": "Main Street",
                "currency": "SEK",
                "status": "active"
            }
        ])))
        .expect(2)
        .mount(&server)
        .await;

    let repository = StoreRepository::new(Arc::new(MemoryCache::new()), 3600);
    let source = stores_source(&server);

    repository.get_stores(&source).await.unwrap();
    repository.invalidate().unwrap();
    repository.get_stores(&source).await.unwrap();
}
