mod common;

use common::{record, TestApp, UnreachableLedgerStore};
use serde_json::{json, Value};
use std::sync::Arc;

#[tokio::test]
async fn create_record_returns_created_record() {
    let app = TestApp::spawn().await;

    let response = app
        .create_record(&record(
            "Chennai",
            "Lotus Towers",
            "Asha Menon",
            "January",
            "Rent",
            25000.0,
            10000.0,
        ))
        .await;

    assert_eq!(response.status().as_u16(), 201);
    let body: Value = response.json().await.expect("Failed to parse JSON");
    assert_eq!(body["message"], "Record saved successfully");

    let id = body["id"].as_str().expect("id present");
    assert!(!id.is_empty());
    assert_eq!(body["record"]["id"], id);
    assert_eq!(body["record"]["tenant_name"], "Asha Menon");
    assert_eq!(body["record"]["outstanding"], 15000.0);
    assert_eq!(body["record"]["status"]["tier"], "OVERDUE");
}

#[tokio::test]
async fn get_record_returns_stored_fields() {
    let app = TestApp::spawn().await;
    let id = app
        .seed(record(
            "Bengaluru",
            "Palm Grove",
            "Ravi",
            "February",
            "Maintenance",
            3000.0,
            3000.0,
        ))
        .await;

    let (status, body) = app.get_json(&format!("/records/{}", id)).await;

    assert_eq!(status, 200);
    assert_eq!(body["city"], "Bengaluru");
    assert_eq!(body["property_name"], "Palm Grove");
    assert_eq!(body["month"], "February");
    assert_eq!(body["category"], "Maintenance");
    assert_eq!(body["status"]["tier"], "PAID");
    assert_eq!(body["status"]["color"], "green");
}

#[tokio::test]
async fn missing_required_fields_are_rejected() {
    let app = TestApp::spawn().await;

    let response = app
        .create_record(&record("", "Lotus Towers", "", "January", "Rent", 100.0, 0.0))
        .await;

    assert_eq!(response.status().as_u16(), 422);
    let body: Value = response.json().await.expect("Failed to parse JSON");
    assert_eq!(body["error"], "Validation error");

    // Nothing reached the store
    assert_eq!(app.get_json("/records?month=January").await.1["count"], 0);
}

#[tokio::test]
async fn negative_amounts_are_rejected() {
    let app = TestApp::spawn().await;

    let response = app
        .create_record(&record(
            "Chennai",
            "Lotus Towers",
            "Asha",
            "January",
            "Rent",
            -1.0,
            0.0,
        ))
        .await;

    assert_eq!(response.status().as_u16(), 422);
}

#[tokio::test]
async fn unknown_month_is_rejected() {
    let app = TestApp::spawn().await;

    let response = app
        .create_record(&record(
            "Chennai",
            "Lotus Towers",
            "Asha",
            "Smarch",
            "Rent",
            100.0,
            0.0,
        ))
        .await;

    assert_eq!(response.status().as_u16(), 422);
}

#[tokio::test]
async fn list_filters_by_month_and_city() {
    let app = TestApp::spawn().await;
    app.seed(record("Chennai", "Lotus Towers", "Asha", "March", "Rent", 100.0, 0.0))
        .await;
    app.seed(record("Bengaluru", "Palm Grove", "Ravi", "March", "Rent", 200.0, 0.0))
        .await;
    app.seed(record("Chennai", "Lotus Towers", "Meena", "April", "Rent", 300.0, 0.0))
        .await;

    let (status, body) = app.get_json("/records?month=March").await;
    assert_eq!(status, 200);
    assert_eq!(body["count"], 2);

    let (_, body) = app.get_json("/records?month=March&city=chen").await;
    assert_eq!(body["count"], 1);
    assert_eq!(body["records"][0]["tenant_name"], "Asha");

    // A blank city pattern does not filter
    let (_, body) = app.get_json("/records?month=March&city=").await;
    assert_eq!(body["count"], 2);
}

#[tokio::test]
async fn empty_month_has_message() {
    let app = TestApp::spawn().await;

    let (status, body) = app.get_json("/records?month=December").await;

    assert_eq!(status, 200);
    assert_eq!(body["count"], 0);
    assert_eq!(body["message"], "No records found for December");
}

#[tokio::test]
async fn search_matches_tenant_or_property_ignoring_case() {
    let app = TestApp::spawn().await;
    app.seed(record("Chennai", "Lotus Towers", "Asha Menon", "May", "Rent", 100.0, 0.0))
        .await;
    app.seed(record("Chennai", "Palm Grove", "Ravi", "May", "Rent", 100.0, 0.0))
        .await;
    app.seed(record("Chennai", "Sea View", "Kiran", "June", "Rent", 100.0, 0.0))
        .await;

    let (status, body) = app.get_json("/records/search?q=asha").await;
    assert_eq!(status, 200);
    assert_eq!(body["count"], 1);

    let (_, body) = app.get_json("/records/search?q=GROVE").await;
    assert_eq!(body["count"], 1);
    assert_eq!(body["records"][0]["tenant_name"], "Ravi");

    let (_, body) = app.get_json("/records/search?q=nobody").await;
    assert_eq!(body["count"], 0);
    assert_eq!(body["message"], "No matches found");
}

#[tokio::test]
async fn search_treats_pattern_characters_literally() {
    let app = TestApp::spawn().await;
    app.seed(record("Chennai", "Block (A)", "Asha", "May", "Rent", 100.0, 0.0))
        .await;
    app.seed(record("Chennai", "Block B", "Ravi", "May", "Rent", 100.0, 0.0))
        .await;

    let (_, body) = app.get_json("/records/search?q=%28A%29").await;
    assert_eq!(body["count"], 1);
    assert_eq!(body["records"][0]["tenant_name"], "Asha");
}

#[tokio::test]
async fn blank_search_is_rejected() {
    let app = TestApp::spawn().await;

    let (status, _) = app.get_json("/records/search?q=%20%20").await;

    assert_eq!(status, 422);
}

#[tokio::test]
async fn update_changes_paid_amount_and_notes() {
    let app = TestApp::spawn().await;
    let id = app
        .seed(record("Chennai", "Lotus Towers", "Asha", "July", "Rent", 20000.0, 0.0))
        .await;

    let response = app
        .client
        .patch(app.url(&format!("/records/{}", id)))
        .json(&json!({ "paid_amount": 18000.0, "notes": "Cheque received" }))
        .send()
        .await
        .expect("Failed to send update");

    assert_eq!(response.status().as_u16(), 200);
    let body: Value = response.json().await.expect("Failed to parse JSON");
    assert_eq!(body["paid_amount"], 18000.0);
    assert_eq!(body["notes"], "Cheque received");
    assert_eq!(body["billed_amount"], 20000.0);
    assert_eq!(body["status"]["tier"], "PENDING");
}

#[tokio::test]
async fn update_with_only_notes_keeps_payment() {
    let app = TestApp::spawn().await;
    let id = app
        .seed(record("Chennai", "Lotus Towers", "Asha", "July", "Rent", 20000.0, 5000.0))
        .await;

    let response = app
        .client
        .patch(app.url(&format!("/records/{}", id)))
        .json(&json!({ "notes": "Called tenant" }))
        .send()
        .await
        .expect("Failed to send update");

    assert_eq!(response.status().as_u16(), 200);
    let body: Value = response.json().await.expect("Failed to parse JSON");
    assert_eq!(body["paid_amount"], 5000.0);
    assert_eq!(body["notes"], "Called tenant");
}

#[tokio::test]
async fn update_rejects_negative_payment() {
    let app = TestApp::spawn().await;
    let id = app
        .seed(record("Chennai", "Lotus Towers", "Asha", "July", "Rent", 20000.0, 0.0))
        .await;

    let response = app
        .client
        .patch(app.url(&format!("/records/{}", id)))
        .json(&json!({ "paid_amount": -5.0 }))
        .send()
        .await
        .expect("Failed to send update");

    assert_eq!(response.status().as_u16(), 422);
}

#[tokio::test]
async fn update_of_unknown_record_is_not_found() {
    let app = TestApp::spawn().await;

    let response = app
        .client
        .patch(app.url("/records/does-not-exist"))
        .json(&json!({ "paid_amount": 10.0 }))
        .send()
        .await
        .expect("Failed to send update");

    assert_eq!(response.status().as_u16(), 404);
}

#[tokio::test]
async fn delete_removes_record() {
    let app = TestApp::spawn().await;
    let id = app
        .seed(record("Chennai", "Lotus Towers", "Asha", "August", "Rent", 100.0, 0.0))
        .await;

    let response = app
        .client
        .delete(app.url(&format!("/records/{}", id)))
        .send()
        .await
        .expect("Failed to send delete");
    assert_eq!(response.status().as_u16(), 204);

    let (status, _) = app.get_json(&format!("/records/{}", id)).await;
    assert_eq!(status, 404);

    let response = app
        .client
        .delete(app.url(&format!("/records/{}", id)))
        .send()
        .await
        .expect("Failed to send delete");
    assert_eq!(response.status().as_u16(), 404);
}

#[tokio::test]
async fn meta_lists_form_choices() {
    let app = TestApp::spawn().await;

    let (status, body) = app.get_json("/meta").await;

    assert_eq!(status, 200);
    assert_eq!(body["months"].as_array().map(Vec::len), Some(12));
    assert_eq!(body["months"][0], "January");
    assert_eq!(
        body["categories"],
        json!(["Rent", "Maintenance", "Electricity", "Commercial", "Other"])
    );
    assert_eq!(body["pending_limit"], 5000.0);
    assert_eq!(body["overdue_limit"], 15000.0);
}

#[tokio::test]
async fn amounts_above_limit_are_rejected() {
    let app = TestApp::spawn().await;

    let response = app
        .create_record(&record(
            "Chennai",
            "Lotus Towers",
            "Asha",
            "January",
            "Rent",
            5e28,
            0.0,
        ))
        .await;
    assert_eq!(response.status().as_u16(), 422);

    let id = app
        .seed(record(
            "Chennai",
            "Lotus Towers",
            "Asha",
            "January",
            "Rent",
            1_000_000_000.0,
            0.0,
        ))
        .await;

    let response = app
        .client
        .patch(app.url(&format!("/records/{}", id)))
        .json(&json!({ "paid_amount": 5e28 }))
        .send()
        .await
        .expect("Failed to send update");
    assert_eq!(response.status().as_u16(), 422);
}

#[tokio::test]
async fn month_query_ignores_letter_case() {
    let app = TestApp::spawn().await;
    app.seed(record("Chennai", "Lotus Towers", "Asha", "March", "Rent", 100.0, 0.0))
        .await;

    let (status, body) = app.get_json("/records?month=march").await;

    assert_eq!(status, 200);
    assert_eq!(body["count"], 1);
}

#[tokio::test]
async fn search_keeps_surrounding_whitespace() {
    let app = TestApp::spawn().await;
    app.seed(record("Chennai", "Lotus Towers", "Asha", "May", "Rent", 100.0, 0.0))
        .await;

    let (_, body) = app.get_json("/records/search?q=Lotus%20").await;
    assert_eq!(body["count"], 1);

    let (_, body) = app.get_json("/records/search?q=Towers%20").await;
    assert_eq!(body["count"], 0);
}

#[tokio::test]
async fn unreachable_store_is_service_unavailable() {
    let app = TestApp::spawn_with_store(Arc::new(UnreachableLedgerStore)).await;

    let (status, body) = app.get_json("/records?month=January").await;
    assert_eq!(status, 503);
    assert_eq!(body["error"], "Service unavailable");

    let response = app
        .create_record(&record(
            "Chennai",
            "Lotus Towers",
            "Asha",
            "January",
            "Rent",
            100.0,
            0.0,
        ))
        .await;
    assert_eq!(response.status().as_u16(), 503);
}
