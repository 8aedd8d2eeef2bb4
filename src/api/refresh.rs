use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::json;
use tokio::sync::Mutex;
use uuid::Uuid;

use super::error::{
    failure_message, AuthError, CONNECTION_ERROR_MESSAGE, NOT_SIGNED_IN_MESSAGE, PARSE_ERROR_MESSAGE,
};
use super::request::{json_headers, HttpMethod, OutgoingRequest};
use super::transport::HttpTransport;
use crate::session::{Session, SessionHandle};

pub const REFRESH_PATH: &str = "/api/auth/refresh";

#[derive(Debug, Deserialize)]
struct RefreshPayload {
    access_token: String,
    #[serde(default, with = "chrono::serde::ts_milliseconds_option")]
    access_token_valid_till: Option<DateTime<Utc>>,
}

/// Whether a refresh outcome came from this caller's own server round trip
/// or from one it waited behind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flight {
    Led,
    Joined,
}

#[derive(Debug)]
struct LastFlight {
    generation: u64,
    stale_token: Option<String>,
    result: Result<Session, AuthError>,
}

/// Mints a new access token from the session's refresh token.
///
/// Refreshes are single-flight. The gate serializes them and keeps the last
/// outcome; a caller whose request went out before that outcome landed, with
/// the same stale token, gets it back instead of calling the server again.
/// This holds for failures too, so one rejected refresh token yields one
/// teardown.
pub struct TokenRefresher {
    transport: Arc<dyn HttpTransport>,
    session: SessionHandle,
    origin: String,
    gate: Mutex<Option<LastFlight>>,
    generation: AtomicU64,
}

impl TokenRefresher {
    pub fn new(transport: Arc<dyn HttpTransport>, session: SessionHandle, origin: impl Into<String>) -> Self {
        Self {
            transport,
            session,
            origin: origin.into(),
            gate: Mutex::new(None),
            generation: AtomicU64::new(0),
        }
    }

    /// Number of refreshes completed so far. Read it before sending a request
    /// and hand it to [`refresh_after`](Self::refresh_after) if that request
    /// comes back 401.
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::Acquire)
    }

    /// Renew the access token that `stale_token` was. On success the new
    /// session is already installed in the handle and persisted.
    pub async fn refresh(&self, stale_token: Option<&str>) -> Result<Session, AuthError> {
        self.refresh_after(stale_token, self.generation()).await.0
    }

    /// [`refresh`](Self::refresh) for a request sent at `seen_generation`.
    pub async fn refresh_after(
        &self,
        stale_token: Option<&str>,
        seen_generation: u64,
    ) -> (Result<Session, AuthError>, Flight) {
        let mut last = self.gate.lock().await;

        if let Some(flight) = last.as_ref() {
            if flight.generation > seen_generation && flight.stale_token.as_deref() == stale_token {
                tracing::debug!(generation = flight.generation, "Reusing outcome of a concurrent refresh");
                return (flight.result.clone(), Flight::Joined);
            }
        }

        let result = self.renew(stale_token).await;
        let generation = self.generation.fetch_add(1, Ordering::AcqRel) + 1;
        *last = Some(LastFlight {
            generation,
            stale_token: stale_token.map(str::to_owned),
            result: result.clone(),
        });
        (result, Flight::Led)
    }

    async fn renew(&self, stale_token: Option<&str>) -> Result<Session, AuthError> {
        let Some(current) = self.session.snapshot() else {
            return Err(AuthError::Terminal {
                status_code: None,
                message: NOT_SIGNED_IN_MESSAGE.to_string(),
            });
        };

        if current.access_token.is_some() && current.access_token.as_deref() != stale_token {
            tracing::debug!("Access token already renewed by a concurrent refresh");
            return Ok(current);
        }

        let body = json!({
            "refresh_token": current.refresh_token,
            "user_id": current.user_id,
            "role": current.role,
        });
        let request = OutgoingRequest {
            request_id: Uuid::new_v4(),
            method: HttpMethod::Post,
            url: format!("{}{}", self.origin, REFRESH_PATH),
            path: REFRESH_PATH.to_string(),
            headers: json_headers(),
            body: Some(body.to_string()),
        };
        let request_id = request.request_id;

        let raw = match self.transport.send(request).await {
            Ok(raw) => raw,
            Err(e) => {
                tracing::warn!(%request_id, error = %e, "Token refresh could not reach the server");
                return Err(AuthError::Transient {
                    status_code: None,
                    message: CONNECTION_ERROR_MESSAGE.to_string(),
                });
            }
        };

        if raw.status == 401 {
            tracing::info!(%request_id, "Refresh token rejected");
            return Err(AuthError::Terminal {
                status_code: Some(raw.status),
                message: failure_message(raw.status, &raw.body),
            });
        }
        if !raw.is_success() {
            tracing::warn!(%request_id, status = raw.status, "Token refresh failed");
            return Err(AuthError::Transient {
                status_code: Some(raw.status),
                message: failure_message(raw.status, &raw.body),
            });
        }

        let payload: RefreshPayload = serde_json::from_str(&raw.body).map_err(|e| {
            tracing::warn!(%request_id, error = %e, "Malformed refresh response");
            AuthError::Transient {
                status_code: Some(raw.status),
                message: PARSE_ERROR_MESSAGE.to_string(),
            }
        })?;

        let renewed =
            current.with_renewed_access_token(payload.access_token, payload.access_token_valid_till);
        if let Err(e) = self.session.replace(renewed.clone()) {
            tracing::warn!(error = %e, "Failed to persist renewed session");
        }
        tracing::debug!(%request_id, "Access token renewed");
        Ok(renewed)
    }
}
