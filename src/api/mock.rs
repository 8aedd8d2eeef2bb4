//! Scripted transport for deterministic tests
//!
//! Replies are queued per request path. Each call consumes the next reply;
//! the last one stays in place and answers every later call. Paths with no
//! script answer 404. Every request is captured for assertions.
//!
//! A reply can be held behind a [`MockGate`] so tests decide exactly when a
//! response arrives, which is how overlapping navigations are driven.

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::Value;
use tokio::sync::watch;

use super::error::TransportError;
use super::request::OutgoingRequest;
use super::transport::{HttpTransport, RawResponse};

/// Latch that keeps held replies pending until opened
#[derive(Clone, Debug)]
pub struct MockGate {
    tx: Arc<watch::Sender<bool>>,
}

impl Default for MockGate {
    fn default() -> Self {
        Self::new()
    }
}

impl MockGate {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(false);
        Self { tx: Arc::new(tx) }
    }

    /// Release every reply held by this gate, now and later.
    pub fn open(&self) {
        self.tx.send_replace(true);
    }

    pub fn is_open(&self) -> bool {
        *self.tx.borrow()
    }

    async fn wait(&self) {
        let mut rx = self.tx.subscribe();
        // The sender lives as long as self, so `changed` cannot fail here.
        while !*rx.borrow_and_update() {
            if rx.changed().await.is_err() {
                return;
            }
        }
    }
}

#[derive(Clone, Debug)]
pub enum MockReply {
    Respond(RawResponse),
    Fail(TransportError),
    Held(MockGate, Box<MockReply>),
}

impl MockReply {
    pub fn json(status: u16, body: Value) -> Self {
        MockReply::Respond(RawResponse::new(status, body.to_string()))
    }

    pub fn text(status: u16, body: impl Into<String>) -> Self {
        MockReply::Respond(RawResponse::new(status, body))
    }

    pub fn unreachable() -> Self {
        MockReply::Fail(TransportError::Connect("connection refused".into()))
    }

    /// This reply, delivered only once `gate` opens.
    pub fn held(self, gate: &MockGate) -> Self {
        MockReply::Held(gate.clone(), Box::new(self))
    }
}

/// Mock transport for testing
#[derive(Clone, Default)]
pub struct MockTransport {
    routes: Arc<Mutex<HashMap<String, VecDeque<MockReply>>>>,
    captured: Arc<Mutex<Vec<OutgoingRequest>>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a reply for `path` (builder form)
    pub fn with_reply(self, path: &str, reply: MockReply) -> Self {
        self.enqueue(path, reply);
        self
    }

    /// Queue a reply for `path`
    pub fn enqueue(&self, path: &str, reply: MockReply) {
        self.routes
            .lock()
            .entry(path.to_string())
            .or_default()
            .push_back(reply);
    }

    /// Get all captured requests for assertions
    pub fn captured_requests(&self) -> Vec<OutgoingRequest> {
        self.captured.lock().clone()
    }

    pub fn requests_to(&self, path: &str) -> Vec<OutgoingRequest> {
        self.captured
            .lock()
            .iter()
            .filter(|r| r.path == path)
            .cloned()
            .collect()
    }

    pub fn count_to(&self, path: &str) -> usize {
        self.captured.lock().iter().filter(|r| r.path == path).count()
    }

    /// Reset all scripted replies and captured requests
    pub fn reset(&self) {
        self.routes.lock().clear();
        self.captured.lock().clear();
    }

    fn next_reply(&self, path: &str) -> MockReply {
        let mut routes = self.routes.lock();
        match routes.get_mut(path) {
            Some(queue) if queue.len() > 1 => queue
                .pop_front()
                .unwrap_or_else(|| MockReply::text(404, "")),
            Some(queue) => queue
                .front()
                .cloned()
                .unwrap_or_else(|| MockReply::text(404, "")),
            None => MockReply::text(404, ""),
        }
    }
}

#[async_trait]
impl HttpTransport for MockTransport {
    async fn send(&self, request: OutgoingRequest) -> Result<RawResponse, TransportError> {
        let mut reply = self.next_reply(&request.path);
        self.captured.lock().push(request);

        loop {
            match reply {
                MockReply::Respond(response) => return Ok(response),
                MockReply::Fail(err) => return Err(err),
                MockReply::Held(gate, inner) => {
                    gate.wait().await;
                    reply = *inner;
                }
            }
        }
    }
}
