//! Common test utilities for creditpack integration tests.

#![allow(dead_code)] // Some utilities are used by different test files

use std::sync::Arc;

use axum::http::header::AUTHORIZATION;
use axum::http::{HeaderName, HeaderValue};
use axum_test::{TestResponse, TestServer};
use jsonwebtoken::{encode, EncodingKey, Header};
use serde_json::{json, Value};
use wiremock::MockServer;

use creditpack_core::{ProductCatalog, User, UserId};
use creditpack_service::auth::Claims;
use creditpack_service::crypto::signature_header;
use creditpack_service::{create_router, AppState, ServiceConfig};
use creditpack_store::{MemoryStore, UserCreditStore};

pub const AUTH_SECRET: &str = "test-auth-secret";
pub const WEBHOOK_SECRET: &str = "polar_whs_test_secret";
pub const POLAR_TOKEN: &str = "polar_oat_test";

pub const SMALL_PACK: &str = "prod_small";
pub const MEDIUM_PACK: &str = "prod_medium";
pub const LARGE_PACK: &str = "prod_large";

/// Test harness containing everything needed for integration tests.
pub struct TestHarness {
    /// The test server for making HTTP requests.
    pub server: TestServer,
    /// The store behind the server.
    pub store: Arc<MemoryStore>,
    /// Mock Polar API, when the harness was built with one.
    pub polar: Option<MockServer>,
}

/// Configuration shared by all harnesses.
pub fn base_config() -> ServiceConfig {
    ServiceConfig {
        listen_addr: "127.0.0.1:0".into(),
        auth_secret: Some(AUTH_SECRET.into()),
        polar_webhook_secret: Some(WEBHOOK_SECRET.into()),
        catalog: ProductCatalog::new(
            Some(SMALL_PACK.parse().unwrap()),
            Some(MEDIUM_PACK.parse().unwrap()),
            Some(LARGE_PACK.parse().unwrap()),
        ),
        ..ServiceConfig::default()
    }
}

impl TestHarness {
    /// Harness without Polar API access.
    pub fn new() -> Self {
        Self::with_config(base_config(), None)
    }

    /// Harness whose Polar client talks to a fresh mock server.
    pub async fn with_polar() -> Self {
        let mock = MockServer::start().await;
        let config = ServiceConfig {
            polar_access_token: Some(POLAR_TOKEN.into()),
            polar_api_url: Some(mock.uri()),
            ..base_config()
        };
        Self::with_config(config, Some(mock))
    }

    /// Harness with an explicit configuration.
    pub fn with_config(config: ServiceConfig, polar: Option<MockServer>) -> Self {
        let store = Arc::new(MemoryStore::new());
        let state = AppState::new(store.clone(), config);
        let server = TestServer::new(create_router(state)).expect("Failed to create test server");

        Self {
            server,
            store,
            polar,
        }
    }

    /// The mock Polar server.
    pub fn polar(&self) -> &MockServer {
        self.polar.as_ref().expect("harness built without Polar")
    }

    /// Insert a user with a starting balance.
    pub async fn seed_user(&self, id: &str, credits: i64) -> UserId {
        let user_id: UserId = id.parse().unwrap();
        let user = User::new(user_id.clone(), Some(format!("{id}@example.com"))).with_credits(credits);
        self.store.insert_user(&user).await.unwrap();
        user_id
    }

    /// Current balance of a seeded user.
    pub async fn credits(&self, user_id: &UserId) -> i64 {
        self.store
            .get_user(user_id)
            .await
            .unwrap()
            .expect("user exists")
            .credits
    }

    /// Deliver a correctly signed webhook.
    pub async fn post_webhook(&self, body: &Value) -> TestResponse {
        let bytes = body.to_string().into_bytes();
        let mut request = self.server.post("/webhooks/polar");
        for (name, value) in signed_headers(&bytes) {
            request = request.add_header(name, value);
        }
        request.bytes(bytes.into()).await
    }
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}

/// Standard Webhooks headers for `body`, signed now with `WEBHOOK_SECRET`.
pub fn signed_headers(body: &[u8]) -> Vec<(HeaderName, HeaderValue)> {
    signed_headers_at(body, WEBHOOK_SECRET, chrono::Utc::now().timestamp())
}

/// Standard Webhooks headers signed with an arbitrary secret and timestamp.
pub fn signed_headers_at(body: &[u8], secret: &str, timestamp: i64) -> Vec<(HeaderName, HeaderValue)> {
    let msg_id = format!("msg_{}", uuid_like());
    let signature = signature_header(secret, &msg_id, timestamp, body);
    vec![
        (
            HeaderName::from_static("webhook-id"),
            HeaderValue::from_str(&msg_id).unwrap(),
        ),
        (
            HeaderName::from_static("webhook-timestamp"),
            HeaderValue::from_str(&timestamp.to_string()).unwrap(),
        ),
        (
            HeaderName::from_static("webhook-signature"),
            HeaderValue::from_str(&signature).unwrap(),
        ),
    ]
}

fn uuid_like() -> String {
    UserId::generate().to_string()
}

/// An `order.paid` event body as Polar sends it.
pub fn order_paid(product_id: &str, external_id: Option<&str>) -> Value {
    json!({
        "type": "order.paid",
        "timestamp": "2025-01-01T00:00:00Z",
        "data": {
            "id": format!("ord_{}", uuid_like()),
            "product_id": product_id,
            "status": "paid",
            "total_amount": 500,
            "currency": "usd",
            "customer": {
                "id": "cus_test",
                "external_id": external_id,
                "email": "buyer@example.com"
            }
        }
    })
}

/// Authorization header for a user.
pub fn bearer(user_id: &str) -> (HeaderName, HeaderValue) {
    bearer_with_secret(user_id, AUTH_SECRET)
}

/// Authorization header signed with an arbitrary secret.
pub fn bearer_with_secret(user_id: &str, secret: &str) -> (HeaderName, HeaderValue) {
    let claims = Claims {
        sub: user_id.into(),
        email: Some(format!("{user_id}@example.com")),
        exp: chrono::Utc::now().timestamp() + 3600,
    };
    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .unwrap();

    (
        AUTHORIZATION,
        HeaderValue::from_str(&format!("Bearer {token}")).unwrap(),
    )
}
