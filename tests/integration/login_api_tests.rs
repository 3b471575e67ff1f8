// ======================================
// tests/integration/login_api_tests.rs
// ======================================
//! Drives `POST /api/auth/login` through the axum router
use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use std::time::Duration;
use tower::ServiceExt;
use userauth_backend::{auth::LOCKOUT_THRESHOLD, routes::create_router};
use userauth_common::{ErrorBody, Session};

use crate::test_utils::{login_request, read_json, setup_test_state, ALICE_EMAIL, ALICE_PASSWORD};

#[tokio::test]
async fn test_login_success() {
    let (state, _clock) = setup_test_state().await;
    let app = create_router(state);

    let response = app
        .oneshot(login_request(ALICE_EMAIL, ALICE_PASSWORD))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let session: Session = read_json(response).await;
    assert_eq!(session.email, ALICE_EMAIL);
    assert_eq!(session.name, "Alice");
    assert!(!session.user_id.is_empty());
    assert!(!session.token.is_empty());
}

#[tokio::test]
async fn test_wrong_password_and_unknown_email_share_a_response() {
    let (state, _clock) = setup_test_state().await;
    let app = create_router(state);

    let wrong = app
        .clone()
        .oneshot(login_request(ALICE_EMAIL, "Wr0ng!password"))
        .await
        .unwrap();
    let unknown = app
        .oneshot(login_request("nobody@example.com", "Wr0ng!password"))
        .await
        .unwrap();

    assert_eq!(wrong.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(unknown.status(), StatusCode::UNAUTHORIZED);

    let wrong: ErrorBody = read_json(wrong).await;
    let unknown: ErrorBody = read_json(unknown).await;
    assert_eq!(wrong, unknown);
    assert_eq!(wrong.error.code, "INVALID_CREDENTIALS");
}

#[tokio::test]
async fn test_lockout_after_five_failures() {
    let (state, _clock) = setup_test_state().await;
    let app = create_router(state);

    for _ in 0..LOCKOUT_THRESHOLD - 1 {
        let response = app
            .clone()
            .oneshot(login_request(ALICE_EMAIL, "Wr0ng!password"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    let response = app
        .clone()
        .oneshot(login_request(ALICE_EMAIL, "Wr0ng!password"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(response.headers()[header::RETRY_AFTER], "1800");

    let body: ErrorBody = read_json(response).await;
    assert_eq!(body.error.code, "RATE_LIMITED");
    assert_eq!(body.error.retry_after_secs, Some(1800));
    assert!(body.error.message.contains("1800 seconds"));
}

#[tokio::test]
async fn test_locked_account_rejects_correct_password_until_window_elapses() {
    let (state, clock) = setup_test_state().await;
    let app = create_router(state.clone());

    for _ in 0..LOCKOUT_THRESHOLD {
        app.clone()
            .oneshot(login_request(ALICE_EMAIL, "Wr0ng!password"))
            .await
            .unwrap();
    }

    clock.advance(Duration::from_secs(10 * 60));
    let response = app
        .clone()
        .oneshot(login_request(ALICE_EMAIL, ALICE_PASSWORD))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(response.headers()[header::RETRY_AFTER], "1200");

    clock.advance(Duration::from_secs(20 * 60));
    let response = app
        .oneshot(login_request(ALICE_EMAIL, ALICE_PASSWORD))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(state.throttle().tracked(), 0);
}

#[tokio::test]
async fn test_lockout_is_per_account() {
    let (state, _clock) = setup_test_state().await;
    let app = create_router(state);

    for _ in 0..LOCKOUT_THRESHOLD {
        app.clone()
            .oneshot(login_request("mallory@example.com", "guess"))
            .await
            .unwrap();
    }

    let response = app
        .oneshot(login_request(ALICE_EMAIL, ALICE_PASSWORD))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_email_is_not_normalised() {
    let (state, _clock) = setup_test_state().await;
    let app = create_router(state);

    let response = app
        .oneshot(login_request("Alice@Example.com", ALICE_PASSWORD))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_invalid_input_is_rejected_without_counting() {
    let (state, _clock) = setup_test_state().await;
    let app = create_router(state.clone());

    let response = app.oneshot(login_request("", "whatever")).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body: ErrorBody = read_json(response).await;
    assert_eq!(body.error.code, "INVALID_INPUT");
    assert_eq!(state.throttle().tracked(), 0);
}

#[tokio::test]
async fn test_malformed_json_is_a_client_error() {
    let (state, _clock) = setup_test_state().await;
    let app = create_router(state);

    let request = Request::builder()
        .method("POST")
        .uri("/api/auth/login")
        .header("content-type", "application/json")
        .body(Body::from("{\"email\": "))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert!(response.status().is_client_error());
}

#[tokio::test]
async fn test_health() {
    let (state, _clock) = setup_test_state().await;
    let app = create_router(state);

    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body: serde_json::Value = read_json(response).await;
    assert_eq!(body["status"], "ok");
}
