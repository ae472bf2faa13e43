mod common;

use common::*;
use portfolio_cms::entities::token::AuthResponse;
use reqwest::StatusCode;
use serde_json::{json, Value};

#[actix_rt::test]
async fn first_registration_creates_the_admin_and_closes_sign_up() {
    let app = TestApp::spawn().await;

    let first = app.register(ADMIN_EMAIL, ADMIN_PASSWORD).await;
    assert_eq!(first.status(), StatusCode::CREATED);

    let second = app.register("someone@example.com", ADMIN_PASSWORD).await;
    assert_eq!(second.status(), StatusCode::FORBIDDEN);
}

#[actix_rt::test]
async fn weak_passwords_are_rejected() {
    let app = TestApp::spawn().await;

    let response = app.register(ADMIN_EMAIL, "password").await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[actix_rt::test]
async fn login_returns_bearer_tokens() {
    let app = TestApp::spawn().await;

    let auth = app.admin_tokens().await;

    assert!(!auth.access_token.is_empty());
    assert!(!auth.refresh_token.is_empty());
    assert_eq!(auth.token_type, "Bearer");
}

#[actix_rt::test]
async fn wrong_password_is_unauthorized() {
    let app = TestApp::spawn().await;
    app.register(ADMIN_EMAIL, ADMIN_PASSWORD).await;

    let response = app.login(ADMIN_EMAIL, "Wrong#Password99").await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[actix_rt::test]
async fn me_returns_the_signed_in_user() {
    let app = TestApp::spawn().await;
    let token = app.admin_token().await;

    let (status, body) = app.get_json("/api/v1/auth/me", Some(&token)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["email"], ADMIN_EMAIL);
    assert_eq!(body["is_admin"], true);
    assert!(body.get("password_hash").is_none());
}

#[actix_rt::test]
async fn me_requires_a_token() {
    let app = TestApp::spawn().await;

    let (status, _) = app.get_json("/api/v1/auth/me", None).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[actix_rt::test]
async fn logout_revokes_the_access_token() {
    let app = TestApp::spawn().await;
    let auth = app.admin_tokens().await;

    let response = app
        .client
        .post(app.url("/api/v1/auth/logout"))
        .bearer_auth(&auth.access_token)
        .json(&json!({ "refresh_token": auth.refresh_token }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let (status, _) = app.get_json("/api/v1/auth/me", Some(&auth.access_token)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let refreshed = app
        .client
        .post(app.url("/api/v1/auth/refresh-token"))
        .json(&json!({ "refresh_token": auth.refresh_token }))
        .send()
        .await
        .unwrap();
    assert_eq!(refreshed.status(), StatusCode::UNAUTHORIZED);
}

#[actix_rt::test]
async fn refresh_tokens_work_once() {
    let app = TestApp::spawn().await;
    let auth = app.admin_tokens().await;

    let first = app
        .client
        .post(app.url("/api/v1/auth/refresh-token"))
        .json(&json!({ "refresh_token": auth.refresh_token }))
        .send()
        .await
        .unwrap();
    assert_eq!(first.status(), StatusCode::OK);
    let renewed: AuthResponse = first.json().await.unwrap();
    assert_ne!(renewed.access_token, auth.access_token);

    let replay = app
        .client
        .post(app.url("/api/v1/auth/refresh-token"))
        .json(&json!({ "refresh_token": auth.refresh_token }))
        .send()
        .await
        .unwrap();
    assert_eq!(replay.status(), StatusCode::UNAUTHORIZED);

    let (status, _) = app.get_json("/api/v1/admin/dashboard", Some(&renewed.access_token)).await;
    assert_eq!(status, StatusCode::OK);
}

#[actix_rt::test]
async fn malformed_json_gets_a_json_error() {
    let app = TestApp::spawn().await;

    let response = app
        .client
        .post(app.url("/api/v1/auth/login"))
        .header("content-type", "application/json")
        .body("{not json")
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"], "JSON payload error");
}
