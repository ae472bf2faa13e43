mod common;

use common::*;
use reqwest::StatusCode;
use serde_json::{json, Value};

fn form(email: &str) -> Value {
    json!({
        "name": "Ada Lovelace",
        "email": email,
        "subject": "Collaboration",
        "message": "Would you like to build something together?"
    })
}

async fn submit(app: &TestApp, body: &Value) -> reqwest::Response {
    app.client
        .post(app.url("/api/v1/contact"))
        .json(body)
        .send()
        .await
        .expect("contact request failed")
}

#[actix_rt::test]
async fn valid_submission_is_stored() {
    let app = TestApp::spawn().await;

    let response = submit(&app, &form("ada@example.com")).await;

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "Message sent successfully");

    let stored = app.stores.messages.messages();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].email, "ada@example.com");
    assert!(!stored[0].is_read);
}

#[actix_rt::test]
async fn first_invalid_field_is_reported() {
    let app = TestApp::spawn().await;

    let response = submit(
        &app,
        &json!({ "name": "A", "email": "not-an-email", "subject": "Hi", "message": "short" }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["success"], false);
    assert_eq!(body["field"], "name");
    assert_eq!(body["error"], "Name must be at least 2 characters");
    assert!(app.stores.messages.messages().is_empty());
}

#[actix_rt::test]
async fn third_message_within_the_hour_is_rate_limited() {
    let app = TestApp::spawn().await;

    for _ in 0..2 {
        assert_eq!(submit(&app, &form("busy@example.com")).await.status(), StatusCode::OK);
    }
    let response = submit(&app, &form("Busy@Example.com")).await;

    assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(app.stores.messages.messages().len(), 2);

    let other = submit(&app, &form("calm@example.com")).await;
    assert_eq!(other.status(), StatusCode::OK);
}

#[actix_rt::test]
async fn inbox_filters_and_marks_messages_read() {
    let app = TestApp::spawn().await;
    submit(&app, &form("one@example.com")).await;
    submit(&app, &form("two@example.com")).await;
    let token = app.admin_token().await;

    let (status, inbox) = app.get_json("/api/v1/admin/messages", Some(&token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(inbox["total"], 2);
    assert_eq!(inbox["unread"], 2);

    let id = inbox["messages"][0]["id"].as_str().unwrap().to_string();
    let toggled = app
        .client
        .post(app.url(&format!("/api/v1/admin/messages/{id}/read")))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(toggled.status(), StatusCode::OK);

    let (_, unread) = app.get_json("/api/v1/admin/messages?filter=unread", Some(&token)).await;
    assert_eq!(unread["messages"].as_array().unwrap().len(), 1);
    assert_eq!(unread["unread"], 1);

    let (_, read) = app.get_json("/api/v1/admin/messages?filter=read", Some(&token)).await;
    assert_eq!(read["messages"][0]["id"], id.as_str());
}

#[actix_rt::test]
async fn deleting_a_message_needs_confirmation() {
    let app = TestApp::spawn().await;
    submit(&app, &form("one@example.com")).await;
    let token = app.admin_token().await;
    let id = app.stores.messages.messages()[0].id;

    let declined = app
        .client
        .delete(app.url(&format!("/api/v1/admin/messages/{id}")))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(declined.status(), StatusCode::PRECONDITION_REQUIRED);
    assert_eq!(app.stores.messages.messages().len(), 1);

    let confirmed = app
        .client
        .delete(app.url(&format!("/api/v1/admin/messages/{id}?confirm=true")))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(confirmed.status(), StatusCode::OK);
    assert!(app.stores.messages.messages().is_empty());
}

#[actix_rt::test]
async fn inbox_is_admin_only() {
    let app = TestApp::spawn().await;

    let (status, _) = app.get_json("/api/v1/admin/messages", None).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
}
