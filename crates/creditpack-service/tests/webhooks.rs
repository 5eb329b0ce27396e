//! Polar webhook integration tests.
//!
//! Covers the credit provisioning rules end to end: signed delivery in,
//! balance change out.

mod common;

use std::sync::Arc;

use axum::http::StatusCode;
use serde_json::json;

use common::{
    order_paid, signed_headers_at, TestHarness, LARGE_PACK, MEDIUM_PACK, SMALL_PACK,
    WEBHOOK_SECRET,
};
use creditpack_service::ServiceConfig;

#[tokio::test]
async fn small_pack_credits_fifty() {
    let harness = TestHarness::new();
    let user = harness.seed_user("u1", 10).await;

    let response = harness.post_webhook(&order_paid(SMALL_PACK, Some("u1"))).await;

    response.assert_status(StatusCode::ACCEPTED);
    let body: serde_json::Value = response.json();
    assert_eq!(body["received"], true);
    assert_eq!(body["credits_granted"], 50);
    assert_eq!(harness.credits(&user).await, 60);
}

#[tokio::test]
async fn each_pack_credits_its_amount() {
    for (product, amount) in [(SMALL_PACK, 50), (MEDIUM_PACK, 200), (LARGE_PACK, 400)] {
        let harness = TestHarness::new();
        let user = harness.seed_user("buyer", 0).await;

        harness
            .post_webhook(&order_paid(product, Some("buyer")))
            .await
            .assert_status(StatusCode::ACCEPTED);

        assert_eq!(harness.credits(&user).await, amount, "product {product}");
    }
}

#[tokio::test]
async fn duplicate_delivery_credits_twice() {
    let harness = TestHarness::new();
    let user = harness.seed_user("u1", 10).await;
    let event = order_paid(SMALL_PACK, Some("u1"));

    harness.post_webhook(&event).await.assert_status(StatusCode::ACCEPTED);
    harness.post_webhook(&event).await.assert_status(StatusCode::ACCEPTED);

    assert_eq!(harness.credits(&user).await, 110);
}

#[tokio::test]
async fn concurrent_deliveries_are_all_applied() {
    let harness = Arc::new(TestHarness::new());
    let user = harness.seed_user("u1", 0).await;

    let deliveries = (0..20).map(|_| {
        let harness = Arc::clone(&harness);
        async move {
            harness
                .post_webhook(&order_paid(MEDIUM_PACK, Some("u1")))
                .await
                .assert_status(StatusCode::ACCEPTED);
        }
    });
    futures::future::join_all(deliveries).await;

    assert_eq!(harness.credits(&user).await, 4000);
}

#[tokio::test]
async fn missing_external_id_is_rejected_without_mutation() {
    let harness = TestHarness::new();
    let user = harness.seed_user("u1", 10).await;

    let response = harness.post_webhook(&order_paid(SMALL_PACK, None)).await;

    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
    let body: serde_json::Value = response.json();
    assert_eq!(body["error"]["code"], "missing_identity");
    assert_eq!(harness.credits(&user).await, 10);
}

#[tokio::test]
async fn unknown_product_grants_nothing() {
    let harness = TestHarness::new();
    let user = harness.seed_user("u1", 10).await;

    let response = harness.post_webhook(&order_paid("prod_mystery", Some("u1"))).await;

    response.assert_status(StatusCode::ACCEPTED);
    let body: serde_json::Value = response.json();
    assert_eq!(body["credits_granted"], 0);
    assert_eq!(harness.credits(&user).await, 10);
}

#[tokio::test]
async fn unknown_user_is_not_found() {
    let harness = TestHarness::new();

    let response = harness.post_webhook(&order_paid(SMALL_PACK, Some("ghost"))).await;

    response.assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn other_events_are_acknowledged() {
    let harness = TestHarness::new();
    let user = harness.seed_user("u1", 10).await;

    let response = harness
        .post_webhook(&json!({
            "type": "order.created",
            "data": { "id": "ord_1", "product_id": SMALL_PACK, "customer": { "external_id": "u1" } }
        }))
        .await;

    response.assert_status(StatusCode::ACCEPTED);
    let body: serde_json::Value = response.json();
    assert_eq!(body["received"], true);
    assert!(body.get("credits_granted").is_none());
    assert_eq!(harness.credits(&user).await, 10);
}

#[tokio::test]
async fn malformed_order_is_bad_request() {
    let harness = TestHarness::new();

    let response = harness
        .post_webhook(&json!({ "type": "order.paid", "data": { "id": "ord_1" } }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn unsigned_delivery_is_rejected() {
    let harness = TestHarness::new();
    let user = harness.seed_user("u1", 10).await;

    let response = harness
        .server
        .post("/webhooks/polar")
        .json(&order_paid(SMALL_PACK, Some("u1")))
        .await;

    response.assert_status(StatusCode::UNAUTHORIZED);
    let body: serde_json::Value = response.json();
    assert_eq!(body["error"]["code"], "invalid_signature");
    assert_eq!(harness.credits(&user).await, 10);
}

#[tokio::test]
async fn wrong_secret_is_rejected() {
    let harness = TestHarness::new();
    let user = harness.seed_user("u1", 10).await;
    let bytes = order_paid(SMALL_PACK, Some("u1")).to_string().into_bytes();

    let mut request = harness.server.post("/webhooks/polar");
    for (name, value) in signed_headers_at(&bytes, "not-the-secret", chrono::Utc::now().timestamp()) {
        request = request.add_header(name, value);
    }
    let response = request.bytes(bytes.into()).await;

    response.assert_status(StatusCode::UNAUTHORIZED);
    assert_eq!(harness.credits(&user).await, 10);
}

#[tokio::test]
async fn stale_signature_is_rejected() {
    let harness = TestHarness::new();
    let user = harness.seed_user("u1", 10).await;
    let bytes = order_paid(SMALL_PACK, Some("u1")).to_string().into_bytes();
    let an_hour_ago = chrono::Utc::now().timestamp() - 3600;

    let mut request = harness.server.post("/webhooks/polar");
    for (name, value) in signed_headers_at(&bytes, WEBHOOK_SECRET, an_hour_ago) {
        request = request.add_header(name, value);
    }
    let response = request.bytes(bytes.into()).await;

    response.assert_status(StatusCode::UNAUTHORIZED);
    assert_eq!(harness.credits(&user).await, 10);
}

#[tokio::test]
async fn verification_skipped_without_secret() {
    let config = ServiceConfig {
        polar_webhook_secret: None,
        ..common::base_config()
    };
    let harness = TestHarness::with_config(config, None);
    let user = harness.seed_user("u1", 10).await;

    let response = harness
        .server
        .post("/webhooks/polar")
        .json(&order_paid(LARGE_PACK, Some("u1")))
        .await;

    response.assert_status(StatusCode::ACCEPTED);
    assert_eq!(harness.credits(&user).await, 410);
}

#[tokio::test]
async fn null_customer_is_missing_identity() {
    let harness = TestHarness::new();
    let user = harness.seed_user("u1", 10).await;

    let response = harness
        .post_webhook(&json!({
            "type": "order.paid",
            "data": { "id": "ord_1", "product_id": SMALL_PACK, "customer": null }
        }))
        .await;

    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
    let body: serde_json::Value = response.json();
    assert_eq!(body["error"]["code"], "missing_identity");
    assert_eq!(body["error"]["details"]["order_id"], "ord_1");
    assert_eq!(harness.credits(&user).await, 10);
}
