//! Integration tests for the authenticated request pipeline
//!
//! Covers the bearer-token path, transparent renewal on 401 and terminal
//! session teardown, end to end over HTTP.

use std::time::Duration;

use super::common::fixtures::{admin_session, emoji_list, refreshed_token, USER_ID};
use super::common::server::{client_for, TestConsole};
use serde_json::json;
use uniman::api::error::{CONNECTION_ERROR_MESSAGE, NOT_FOUND_MESSAGE};
use uniman::{ApiRequest, ApiResponse, EmojiService, FailureKind, SessionHandle, UiEvent};

const LIST: &str = "/api/emoji/list";
const REFRESH: &str = "/api/auth/refresh";

/// Valid token: the call succeeds with the server's data
#[tokio::test]
async fn test_valid_token_returns_data() {
    let console = TestConsole::start(Some(admin_session("valid"))).await;
    console
        .respond_for_token("GET", LIST, "valid", 200, emoji_list())
        .await;

    let response = console.client.call(ApiRequest::get(LIST)).await;

    match response {
        ApiResponse::Success {
            status_code, data, ..
        } => {
            assert_eq!(status_code, 200);
            assert_eq!(data, emoji_list());
        }
        other => panic!("expected success, got {other:?}"),
    }

    let sent = console.requests_to(LIST).await;
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].headers.get("accept").unwrap(), "application/json");
    assert_eq!(sent[0].headers.get("content-type").unwrap(), "application/json");
}

/// Expired access token, valid refresh token: renewed once, retried once
#[tokio::test]
async fn test_expired_token_is_renewed_transparently() {
    let console = TestConsole::start(Some(admin_session("expired"))).await;
    console
        .respond_for_token("GET", LIST, "expired", 401, json!({"message": "Token expired"}))
        .await;
    console
        .respond_for_token("GET", LIST, "renewed", 200, emoji_list())
        .await;
    console
        .respond("POST", REFRESH, 200, refreshed_token("renewed"))
        .await;

    let emojis = EmojiService::list(&console.client).await.unwrap();
    assert_eq!(emojis.len(), 2);

    let refreshes = console.requests_to(REFRESH).await;
    assert_eq!(refreshes.len(), 1);
    assert!(refreshes[0].headers.get("authorization").is_none());
    let body: serde_json::Value = refreshes[0].body_json().unwrap();
    assert_eq!(
        body,
        json!({"refresh_token": "refresh-42", "user_id": USER_ID, "role": "Administrator"})
    );

    assert_eq!(console.requests_to(LIST).await.len(), 2);
    let stored = console.store.stored().unwrap();
    assert_eq!(stored.access_token.as_deref(), Some("renewed"));
    assert_eq!(stored.refresh_token, "refresh-42");
    assert!(stored.access_token_expiry.is_some());
}

/// Expired access and refresh tokens: terminal failure, session gone
#[tokio::test]
async fn test_expired_refresh_token_signs_out() {
    let mut console = TestConsole::start(Some(admin_session("expired"))).await;
    console
        .respond("GET", LIST, 401, json!({"message": "Token expired"}))
        .await;
    console
        .respond("POST", REFRESH, 401, json!({"message": "Refresh token expired"}))
        .await;

    let response = console.client.call(ApiRequest::get(LIST)).await;

    assert_eq!(response.failure_kind(), Some(FailureKind::AuthTerminal));
    assert_eq!(response.message(), Some("Refresh token expired"));
    assert!(!console.client.session().is_signed_in());
    assert!(console.store.stored().is_none());
    assert_eq!(
        console.drain_events(),
        vec![UiEvent::SignOut {
            after: Duration::from_millis(2000)
        }]
    );
    // the failed request is not re-issued after a terminal refresh failure
    assert_eq!(console.requests_to(LIST).await.len(), 1);
}

/// Server keeps answering 401: the retry budget bounds the attempts
#[tokio::test]
async fn test_persistent_401_stops_after_budget() {
    let console = TestConsole::start(Some(admin_session("expired"))).await;
    console.respond("GET", LIST, 401, json!({})).await;
    console
        .respond("POST", REFRESH, 200, refreshed_token("renewed"))
        .await;

    let response = console
        .client
        .call(ApiRequest::get(LIST).with_retry_budget(2))
        .await;

    assert_eq!(response.failure_kind(), Some(FailureKind::Application));
    assert_eq!(response.status_code(), Some(401));
    assert_eq!(console.requests_to(LIST).await.len(), 3);
    assert_eq!(console.requests_to(REFRESH).await.len(), 2);
}

/// Unknown route without a JSON body gets the not-found text
#[tokio::test]
async fn test_unmatched_route_reports_not_found() {
    let console = TestConsole::start(Some(admin_session("valid"))).await;

    let response = console.client.call(ApiRequest::get("/api/missing")).await;

    assert_eq!(response.status_code(), Some(404));
    assert_eq!(response.message(), Some(NOT_FOUND_MESSAGE));
    assert_eq!(response.failure_kind(), Some(FailureKind::Application));
}

/// Nothing listening: transport failure with the connection text
#[tokio::test]
async fn test_unreachable_server_is_transport_failure() {
    let client = client_for(
        "http://127.0.0.1:9",
        SessionHandle::from_session(admin_session("valid")),
    );

    let response = client.call(ApiRequest::get(LIST)).await;

    assert_eq!(response.failure_kind(), Some(FailureKind::Transport));
    assert_eq!(response.status_code(), None);
    assert_eq!(response.message(), Some(CONNECTION_ERROR_MESSAGE));
}
