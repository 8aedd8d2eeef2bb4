use std::sync::Arc;
use std::time::Duration;

use serde::de::DeserializeOwned;

use super::error::{ApiFailure, AuthError, FailureKind};
use super::refresh::{Flight, TokenRefresher};
use super::request::{json_headers, overlay_header, ApiRequest, OutgoingRequest, AUTHORIZATION};
use super::response::ApiResponse;
use super::transport::HttpTransport;
use crate::config::Config;
use crate::session::SessionHandle;
use crate::ui::{UiEvent, UiEventSender};

/// Entry point for every authenticated server call.
///
/// Cheap to clone; clones share the transport, the session and the refresh
/// gate.
#[derive(Clone)]
pub struct ApiClient {
    transport: Arc<dyn HttpTransport>,
    session: SessionHandle,
    refresher: Arc<TokenRefresher>,
    events: UiEventSender,
    origin: String,
    retry_budget: u32,
    sign_out_delay: Duration,
}

impl ApiClient {
    pub fn new(config: &Config, transport: Arc<dyn HttpTransport>, session: SessionHandle) -> Self {
        let refresher = TokenRefresher::new(transport.clone(), session.clone(), config.origin.clone());
        Self {
            transport,
            session,
            refresher: Arc::new(refresher),
            events: UiEventSender::disconnected(),
            origin: config.origin.clone(),
            retry_budget: config.retry_budget,
            sign_out_delay: config.sign_out_delay,
        }
    }

    /// Route sign-out and toast signals to `events`.
    pub fn with_events(mut self, events: UiEventSender) -> Self {
        self.events = events;
        self
    }

    pub fn session(&self) -> &SessionHandle {
        &self.session
    }

    pub fn events(&self) -> &UiEventSender {
        &self.events
    }

    pub fn origin(&self) -> &str {
        &self.origin
    }

    /// Perform `request`, renewing the access token on 401 while the retry
    /// budget lasts. Never panics and never returns anything but a response.
    pub async fn call(&self, request: ApiRequest) -> ApiResponse {
        let budget = request.retry_budget.unwrap_or(self.retry_budget);
        let mut request = request.with_retry_budget(budget);
        let mut attempt: u32 = 0;

        loop {
            attempt += 1;
            let token = self.session.access_token();
            let outgoing = self.outgoing(&request, token.as_deref());
            let request_id = outgoing.request_id;
            let seen_generation = self.refresher.generation();
            tracing::debug!(%request_id, path = %request.path, attempt, "Sending request");

            let raw = match self.transport.send(outgoing).await {
                Ok(raw) => raw,
                Err(e) => {
                    tracing::warn!(%request_id, path = %request.path, error = %e, "Transport failure");
                    return ApiFailure::transport().into();
                }
            };

            if raw.is_success() {
                return match serde_json::from_str(&raw.body) {
                    Ok(data) => ApiResponse::success(raw.status, data),
                    Err(e) => {
                        tracing::warn!(%request_id, status = raw.status, error = %e, "Unparseable response body");
                        ApiFailure::parse(Some(raw.status)).into()
                    }
                };
            }

            let remaining = request.retry_budget.unwrap_or(0);
            if raw.status == 401 && remaining > 0 {
                tracing::debug!(%request_id, remaining, "Access token rejected, refreshing");
                let (result, flight) = self
                    .refresher
                    .refresh_after(token.as_deref(), seen_generation)
                    .await;
                match result {
                    Ok(_) => {
                        request = request.retried();
                        continue;
                    }
                    Err(err) => return self.refresh_failed(err, flight).into(),
                }
            }

            tracing::debug!(%request_id, status = raw.status, "Request failed");
            return ApiFailure::application(raw.status, &raw.body).into();
        }
    }

    /// [`call`](Self::call) and decode the success payload into `T`. A payload
    /// of the wrong shape is a parse failure.
    pub async fn call_json<T: DeserializeOwned>(&self, request: ApiRequest) -> Result<T, ApiFailure> {
        match self.call(request).await {
            ApiResponse::Success {
                status_code, data, ..
            } => serde_json::from_value(data).map_err(|e| {
                tracing::warn!(error = %e, "Response did not match the expected shape");
                ApiFailure::parse(Some(status_code))
            }),
            ApiResponse::Failure(failure) => Err(failure),
        }
    }

    fn outgoing(&self, request: &ApiRequest, token: Option<&str>) -> OutgoingRequest {
        let mut headers = json_headers();
        if let Some(token) = token {
            overlay_header(&mut headers, AUTHORIZATION, &format!("Bearer {token}"));
        }
        for (name, value) in &request.headers {
            overlay_header(&mut headers, name, value);
        }
        let origin = request.origin.as_deref().unwrap_or(&self.origin);

        OutgoingRequest {
            request_id: request.request_id,
            method: request.method,
            url: format!("{origin}{}", request.path),
            path: request.path.clone(),
            headers,
            body: request.encoded_body(),
        }
    }

    fn refresh_failed(&self, err: AuthError, flight: Flight) -> ApiFailure {
        match err {
            AuthError::Terminal {
                status_code,
                message,
            } => {
                // whoever led the refresh owns the teardown
                if flight == Flight::Led {
                    tracing::info!("Session expired, signing out");
                    if let Err(e) = self.session.clear() {
                        tracing::warn!(error = %e, "Failed to clear persisted session");
                    }
                    self.events.send(UiEvent::SignOut {
                        after: self.sign_out_delay,
                    });
                }
                ApiFailure::new(FailureKind::AuthTerminal, status_code, message)
            }
            AuthError::Transient {
                status_code,
                message,
            } => {
                let kind = if status_code.is_some() {
                    FailureKind::Application
                } else {
                    FailureKind::Transport
                };
                ApiFailure::new(kind, status_code, message)
            }
        }
    }
}
