use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::json;

use super::error::ApiFailure;
use super::pipeline::ApiClient;
use super::request::ApiRequest;
use crate::session::{Session, SessionStoreError};

pub const SIGN_IN_PATH: &str = "/api/auth/sign-in";

#[derive(Debug, thiserror::Error)]
pub enum SignInError {
    #[error("Please enter your email")]
    EmptyLogin,
    #[error("Please enter your password")]
    EmptyPassword,
    #[error("You are not an admin")]
    NotPrivileged { role: String },
    #[error(transparent)]
    Api(#[from] ApiFailure),
    #[error("failed to store session: {0}")]
    Store(#[from] SessionStoreError),
}

#[derive(Debug, Deserialize)]
struct SignInResponse {
    auth_payload: AuthPayload,
}

#[derive(Debug, Deserialize)]
struct AuthPayload {
    access_token: String,
    refresh_token: String,
    user_id: String,
    role: String,
    #[serde(default, with = "chrono::serde::ts_milliseconds_option")]
    access_token_valid_till: Option<DateTime<Utc>>,
}

/// Sign-in and sign-out flows
pub struct AuthService;

impl AuthService {
    /// Exchange credentials for a session. Only accounts carrying
    /// `privileged_role` are let in; anyone else is turned away without
    /// touching the stored session.
    pub async fn sign_in(
        client: &ApiClient,
        privileged_role: &str,
        login: &str,
        password: &str,
    ) -> Result<Session, SignInError> {
        let login = login.trim();
        if login.is_empty() {
            return Err(SignInError::EmptyLogin);
        }
        if password.is_empty() {
            return Err(SignInError::EmptyPassword);
        }

        let request = ApiRequest::post(
            SIGN_IN_PATH,
            json!({ "email_or_username": login, "password": password }),
        )
        .with_retry_budget(0);
        let response: SignInResponse = client.call_json(request).await?;
        let payload = response.auth_payload;

        if payload.role != privileged_role {
            tracing::info!(role = %payload.role, "Rejected sign-in for non-privileged account");
            return Err(SignInError::NotPrivileged { role: payload.role });
        }

        let mut session = Session::new(
            payload.access_token,
            payload.refresh_token,
            payload.user_id,
            payload.role,
        );
        session.access_token_expiry = payload.access_token_valid_till;

        client.session().replace(session.clone())?;
        tracing::info!(user_id = %session.user_id, "Signed in");
        Ok(session)
    }

    /// Forget the session in memory and on disk.
    pub fn sign_out(client: &ApiClient) -> Result<(), SessionStoreError> {
        client.session().clear()?;
        tracing::info!("Signed out");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::error::FailureKind;
    use crate::api::mock::{MockReply, MockTransport};
    use crate::config::Config;
    use crate::session::{MemorySessionStore, SessionHandle};
    use std::sync::Arc;

    fn setup(reply: MockReply) -> (MockTransport, MemorySessionStore, ApiClient) {
        let mock = MockTransport::new().with_reply(SIGN_IN_PATH, reply);
        let store = MemorySessionStore::new();
        let session = SessionHandle::new(Arc::new(store.clone()));
        let client = ApiClient::new(&Config::default(), Arc::new(mock.clone()), session);
        (mock, store, client)
    }

    fn payload(role: &str) -> MockReply {
        MockReply::json(
            200,
            json!({"auth_payload": {
                "access_token": "acc",
                "refresh_token": "ref",
                "user_id": "u-7",
                "role": role,
            }}),
        )
    }

    #[tokio::test]
    async fn administrator_is_signed_in_and_persisted() {
        let (mock, store, client) = setup(payload("Administrator"));

        let session = AuthService::sign_in(&client, "Administrator", " admin@uniman.dev ", "pw")
            .await
            .unwrap();
        assert_eq!(session.user_id, "u-7");
        assert_eq!(client.session().access_token().as_deref(), Some("acc"));
        assert_eq!(store.stored(), Some(session));

        let sent = &mock.requests_to(SIGN_IN_PATH)[0];
        assert_eq!(
            sent.json_body().unwrap(),
            json!({"email_or_username": "admin@uniman.dev", "password": "pw"})
        );
    }

    #[tokio::test]
    async fn other_roles_are_rejected() {
        let (_, store, client) = setup(payload("Host"));

        let err = AuthService::sign_in(&client, "Administrator", "host", "pw")
            .await
            .unwrap_err();
        assert!(matches!(err, SignInError::NotPrivileged { ref role } if role == "Host"));
        assert!(store.stored().is_none());
        assert!(!client.session().is_signed_in());
    }

    #[tokio::test]
    async fn empty_inputs_never_reach_the_server() {
        let (mock, _, client) = setup(payload("Administrator"));

        assert!(matches!(
            AuthService::sign_in(&client, "Administrator", "  ", "pw").await,
            Err(SignInError::EmptyLogin)
        ));
        assert!(matches!(
            AuthService::sign_in(&client, "Administrator", "a", "").await,
            Err(SignInError::EmptyPassword)
        ));
        assert!(mock.captured_requests().is_empty());
    }

    #[tokio::test]
    async fn bad_credentials_surface_server_message() {
        let (_, _, client) = setup(MockReply::json(401, json!({"message": "Invalid credentials"})));

        let err = AuthService::sign_in(&client, "Administrator", "a", "b")
            .await
            .unwrap_err();
        match err {
            SignInError::Api(failure) => {
                assert_eq!(failure.kind, FailureKind::Application);
                assert_eq!(failure.message, "Invalid credentials");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn sign_out_clears_store() {
        let (_, store, client) = setup(payload("Administrator"));
        AuthService::sign_in(&client, "Administrator", "a", "b").await.unwrap();

        AuthService::sign_out(&client).unwrap();
        assert!(store.stored().is_none());
        assert!(!client.session().is_signed_in());
    }
}
