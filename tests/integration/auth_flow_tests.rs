//! Account flows through the HTTP API.
use axum::http::{Method, StatusCode};
use serde_json::json;

use crate::test_utils::{TestApp, BREACHED_PASSWORD, GOOD_PASSWORD};

const ALICE: &str = "alice@example.com";

#[tokio::test]
async fn test_register_sets_session() {
    let app = TestApp::new().await;
    let response = app
        .request(
            Method::POST,
            "/api/auth/register",
            None,
            Some(json!({ "email": ALICE, "password": GOOD_PASSWORD })),
        )
        .await;

    assert_eq!(response.status, StatusCode::CREATED);
    assert_eq!(response.body["message"], "Benutzer erfolgreich registriert");
    assert_eq!(response.body["user"]["email"], ALICE);
    assert!(response.body["user"]["id"].is_i64());

    let set_cookie = response.set_cookie().unwrap();
    assert!(set_cookie.contains("HttpOnly"));
    assert!(set_cookie.contains("SameSite=Strict"));

    let cookie = response.session_cookie().unwrap();
    let me = app.request(Method::GET, "/api/auth/me", Some(&cookie), None).await;
    assert_eq!(me.status, StatusCode::OK);
    assert_eq!(me.body["user"], response.body["user"]);
}

#[tokio::test]
async fn test_me_requires_session() {
    let app = TestApp::new().await;
    let response = app.request(Method::GET, "/api/auth/me", None, None).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.error_code(), Some("AUTH_003"));

    let forged = format!("betledger.sid={}", "A".repeat(43));
    let response = app.request(Method::GET, "/api/auth/me", Some(&forged), None).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_weak_password_lists_every_rule() {
    let app = TestApp::new().await;
    let response = app
        .request(
            Method::POST,
            "/api/auth/register",
            None,
            Some(json!({ "email": ALICE, "password": "abc" })),
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.error_code(), Some("PWD_001"));
    let message = response.body["error"].as_str().unwrap();
    assert_eq!(message.split(", ").count(), 4);
    assert!(response.session_cookie().is_none());
}

#[tokio::test]
async fn test_breached_password_rejected() {
    let app = TestApp::new().await;
    let response = app
        .request(
            Method::POST,
            "/api/auth/register",
            None,
            Some(json!({ "email": ALICE, "password": BREACHED_PASSWORD })),
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.error_code(), Some("PWD_002"));
}

#[tokio::test]
async fn test_duplicate_email_rejected_regardless_of_password() {
    let app = TestApp::new().await;
    app.register(ALICE).await;

    let response = app
        .request(
            Method::POST,
            "/api/auth/register",
            None,
            Some(json!({ "email": ALICE, "password": "Another#Pass2" })),
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.error_code(), Some("ACC_001"));
}

#[tokio::test]
async fn test_missing_and_malformed_bodies() {
    let app = TestApp::new().await;

    let missing = app
        .request(Method::POST, "/api/auth/login", None, Some(json!({ "email": ALICE })))
        .await;
    assert_eq!(missing.status, StatusCode::BAD_REQUEST);
    assert_eq!(missing.error_code(), Some("VAL_001"));

    let request = axum::http::Request::builder()
        .method(Method::POST)
        .uri("/api/auth/register")
        .header("content-type", "application/json")
        .body(axum::body::Body::from("{not json"))
        .unwrap();
    let malformed = app.send(request).await;
    assert_eq!(malformed.status, StatusCode::BAD_REQUEST);
    assert_eq!(malformed.error_code(), Some("VAL_001"));
}

#[tokio::test]
async fn test_login_does_not_reveal_unknown_accounts() {
    let app = TestApp::new().await;
    app.register(ALICE).await;

    let unknown = app.login("nobody@example.com", GOOD_PASSWORD).await;
    let wrong = app.login(ALICE, "WrongP@ss1").await;
    assert_eq!(unknown.status, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong.status, StatusCode::UNAUTHORIZED);
    assert_eq!(unknown.body, wrong.body);
}

#[tokio::test]
async fn test_lockout_after_ten_failures() {
    let app = TestApp::new().await;
    app.register(ALICE).await;

    for attempt in 1..=10 {
        let response = app.login(ALICE, "WrongP@ss1").await;
        assert_eq!(response.status, StatusCode::UNAUTHORIZED, "attempt {attempt}");
        assert_eq!(response.error_code(), Some("AUTH_001"));
    }

    let locked = app.login(ALICE, GOOD_PASSWORD).await;
    assert_eq!(locked.status, StatusCode::LOCKED);
    assert_eq!(locked.error_code(), Some("AUTH_002"));
    assert!(locked.session_cookie().is_none());
}

#[tokio::test]
async fn test_successful_login_resets_counter() {
    let app = TestApp::new().await;
    app.register(ALICE).await;

    for _ in 0..9 {
        app.login(ALICE, "WrongP@ss1").await;
    }
    let ok = app.login(ALICE, GOOD_PASSWORD).await;
    assert_eq!(ok.status, StatusCode::OK);
    assert_eq!(ok.body["message"], "Erfolgreich angemeldet");

    // a full new budget of attempts is available again
    for _ in 0..9 {
        app.login(ALICE, "WrongP@ss1").await;
    }
    assert_eq!(app.login(ALICE, GOOD_PASSWORD).await.status, StatusCode::OK);
}

#[tokio::test]
async fn test_login_rotates_session() {
    let app = TestApp::new().await;
    let first = app.register(ALICE).await;

    let response = app
        .request(
            Method::POST,
            "/api/auth/login",
            Some(&first),
            Some(json!({ "email": ALICE, "password": GOOD_PASSWORD })),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    let second = response.session_cookie().unwrap();
    assert_ne!(first, second);

    let old = app.request(Method::GET, "/api/auth/me", Some(&first), None).await;
    assert_eq!(old.status, StatusCode::UNAUTHORIZED);
    let new = app.request(Method::GET, "/api/auth/me", Some(&second), None).await;
    assert_eq!(new.status, StatusCode::OK);
    assert_eq!(app.sessions.len(), 1);
}

#[tokio::test]
async fn test_logout_destroys_session() {
    let app = TestApp::new().await;
    let cookie = app.register(ALICE).await;

    let response = app.request(Method::POST, "/api/auth/logout", Some(&cookie), None).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["message"], "Erfolgreich abgemeldet");
    assert!(response.set_cookie().unwrap().contains("Max-Age=0"));
    assert!(app.sessions.is_empty());

    let me = app.request(Method::GET, "/api/auth/me", Some(&cookie), None).await;
    assert_eq!(me.status, StatusCode::UNAUTHORIZED);

    // logging out without a session is still fine
    let again = app.request(Method::POST, "/api/auth/logout", None, None).await;
    assert_eq!(again.status, StatusCode::OK);
}

#[tokio::test]
async fn test_logout_reports_store_failure() {
    let app = TestApp::with_failing_destroy().await;
    let cookie = app.register(ALICE).await;

    let response = app.request(Method::POST, "/api/auth/logout", Some(&cookie), None).await;
    assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response.error_code(), Some("SES_001"));
    assert_eq!(response.body["error"], "Fehler beim Abmelden");
    assert!(response.set_cookie().is_none());

    // the session survives the failed logout
    let me = app.request(Method::GET, "/api/auth/me", Some(&cookie), None).await;
    assert_eq!(me.status, StatusCode::OK);
}

#[tokio::test]
async fn test_emails_are_case_sensitive() {
    let app = TestApp::new().await;
    app.register(ALICE).await;
    app.register("Alice@Example.com").await;

    let response = app.login("ALICE@example.com", GOOD_PASSWORD).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_health() {
    let app = TestApp::new().await;
    let response = app.request(Method::GET, "/api/health", None, None).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["status"], "OK");
    assert!(response.body["timestamp"].is_string());
}
