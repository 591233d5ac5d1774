mod common;

use common::{TestApp, UnreachableLedgerStore};
use std::sync::Arc;

#[tokio::test]
async fn health_check_works() {
    let app = TestApp::spawn().await;

    let response = app
        .client
        .get(app.url("/health"))
        .send()
        .await
        .expect("Failed to execute request");

    assert!(response.status().is_success());

    let body: serde_json::Value = response.json().await.expect("Failed to parse JSON");
    assert_eq!(body["status"], "ok");
    assert_eq!(body["service"], "rent-ledger-service");
    assert_eq!(body["store"], "memory");
}

#[tokio::test]
async fn health_reports_unreachable_store() {
    let app = TestApp::spawn_with_store(Arc::new(UnreachableLedgerStore)).await;

    let response = app
        .client
        .get(app.url("/health"))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status().as_u16(), 503);
    let body: serde_json::Value = response.json().await.expect("Failed to parse JSON");
    assert_eq!(body["status"], "unhealthy");
    assert!(body["error"]
        .as_str()
        .is_some_and(|e| e.contains("connection refused")));

    let response = app
        .client
        .get(app.url("/ready"))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status().as_u16(), 503);
}

#[tokio::test]
async fn readiness_check_works() {
    let app = TestApp::spawn().await;

    let response = app
        .client
        .get(app.url("/ready"))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status().as_u16(), 200);
}

#[tokio::test]
async fn responses_carry_request_id() {
    let app = TestApp::spawn().await;

    let response = app
        .client
        .get(app.url("/health"))
        .header("x-request-id", "req-42")
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(
        response
            .headers()
            .get("x-request-id")
            .and_then(|v| v.to_str().ok()),
        Some("req-42")
    );
}

#[tokio::test]
async fn metrics_endpoint_reports_writes() {
    let app = TestApp::spawn().await;
    app.seed(common::record(
        "Chennai",
        "Lotus Towers",
        "Asha",
        "March",
        "Rent",
        12000.0,
        0.0,
    ))
    .await;

    let response = app
        .client
        .get(app.url("/metrics"))
        .send()
        .await
        .expect("Failed to execute request");

    assert!(response.status().is_success());
    let body = response.text().await.expect("Failed to read body");
    assert!(body.contains("ledger_records_written_total"));
}
