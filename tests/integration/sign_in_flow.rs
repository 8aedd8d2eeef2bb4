//! Integration tests for sign-in, session persistence and sign-out

use std::sync::Arc;

use super::common::fixtures::{admin_details, USER_ID};
use super::common::server::{client_for, TestConsole};
use serde_json::json;
use tempfile::TempDir;
use uniman::{AccountService, AuthService, FileSessionStore, SessionHandle, SignInError};

const SIGN_IN: &str = "/api/auth/sign-in";

fn auth_payload(role: &str) -> serde_json::Value {
    json!({"auth_payload": {
        "access_token": "access-1",
        "refresh_token": "refresh-1",
        "user_id": USER_ID,
        "role": role,
    }})
}

/// Sign-in writes the session file; a new process restores it
#[tokio::test]
async fn test_sign_in_persists_session_to_disk() {
    let console = TestConsole::start(None).await;
    console.respond("POST", SIGN_IN, 200, auth_payload("Administrator")).await;

    let dir = TempDir::new().expect("Failed to create temp dir");
    let store = Arc::new(FileSessionStore::new(dir.path().join("session.json")));
    let client = client_for(&console.server.uri(), SessionHandle::new(store.clone()));

    AuthService::sign_in(&client, "Administrator", "admin@uniman.dev", "secret")
        .await
        .unwrap();

    let restored = SessionHandle::restore(store.clone()).unwrap();
    assert_eq!(restored.access_token().as_deref(), Some("access-1"));
    assert_eq!(restored.snapshot().unwrap().user_id, USER_ID);

    AuthService::sign_out(&client).unwrap();
    assert!(!store.path().exists());
    assert!(!SessionHandle::restore(store).unwrap().is_signed_in());
}

/// Non-administrator accounts are refused and nothing is stored
#[tokio::test]
async fn test_sign_in_refuses_other_roles() {
    let console = TestConsole::start(None).await;
    console.respond("POST", SIGN_IN, 200, auth_payload("User")).await;

    let err = AuthService::sign_in(&console.client, "Administrator", "user", "secret")
        .await
        .unwrap_err();

    assert!(matches!(err, SignInError::NotPrivileged { .. }));
    assert!(console.store.stored().is_none());
}

/// The bearer token from sign-in is used for the next call
#[tokio::test]
async fn test_signed_in_client_fetches_profile() {
    let console = TestConsole::start(None).await;
    console.respond("POST", SIGN_IN, 200, auth_payload("Administrator")).await;
    console
        .respond_for_token("POST", "/api/account/short-details", "access-1", 200, admin_details())
        .await;

    AuthService::sign_in(&console.client, "Administrator", "admin", "secret")
        .await
        .unwrap();
    let details = AccountService::short_details(&console.client, USER_ID)
        .await
        .unwrap();

    assert_eq!(details.full_name, "Fanari Admin");
    assert_eq!(details.avatar_initial(), Some('F'));
    let sent = console.requests_to("/api/account/short-details").await;
    let body: serde_json::Value = sent[0].body_json().unwrap();
    assert_eq!(body, json!({"user_id": USER_ID}));
}
