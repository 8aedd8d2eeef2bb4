//! Console harness backed by a wiremock server

use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use tokio::sync::mpsc::UnboundedReceiver;
use uniman::session::MemorySessionStore;
use uniman::{
    ApiClient, Config, ReqwestTransport, Session, SessionHandle, SessionStore, UiEvent,
    UiEventSender,
};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// A client pointed at a fresh mock server, with its store and UI events
/// exposed for assertions.
pub struct TestConsole {
    pub server: MockServer,
    pub client: ApiClient,
    pub store: MemorySessionStore,
    pub events: UnboundedReceiver<UiEvent>,
}

impl TestConsole {
    pub async fn start(session: Option<Session>) -> Self {
        let server = MockServer::start().await;
        let store = MemorySessionStore::new();
        if let Some(session) = &session {
            store.persist(session).expect("seed session");
        }
        let handle = SessionHandle::restore(Arc::new(store.clone())).expect("restore session");
        let client = client_for(&server.uri(), handle);
        let (sender, events) = UiEventSender::channel();

        Self {
            client: client.with_events(sender),
            server,
            store,
            events,
        }
    }

    pub fn drain_events(&mut self) -> Vec<UiEvent> {
        std::iter::from_fn(|| self.events.try_recv().ok()).collect()
    }

    /// Answer `verb path` with `status` and a JSON body.
    pub async fn respond(&self, verb: &str, route: &str, status: u16, body: Value) {
        Mock::given(method(verb))
            .and(path(route))
            .respond_with(ResponseTemplate::new(status).set_body_json(body))
            .mount(&self.server)
            .await;
    }

    /// Answer `verb path` only for requests carrying `Bearer token`.
    pub async fn respond_for_token(&self, verb: &str, route: &str, token: &str, status: u16, body: Value) {
        Mock::given(method(verb))
            .and(path(route))
            .and(header("authorization", format!("Bearer {token}").as_str()))
            .respond_with(ResponseTemplate::new(status).set_body_json(body))
            .mount(&self.server)
            .await;
    }

    pub async fn requests_to(&self, route: &str) -> Vec<wiremock::Request> {
        self.server
            .received_requests()
            .await
            .unwrap_or_default()
            .into_iter()
            .filter(|r| r.url.path() == route)
            .collect()
    }
}

pub fn test_config(origin: &str) -> Config {
    Config::default()
        .with_origin(origin)
        .with_sign_out_delay(Duration::from_millis(2000))
}

pub fn client_for(origin: &str, session: SessionHandle) -> ApiClient {
    let transport = ReqwestTransport::new(Duration::from_secs(5)).expect("build transport");
    ApiClient::new(&test_config(origin), Arc::new(transport), session)
}
