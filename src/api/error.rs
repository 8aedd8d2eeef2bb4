use std::fmt;

/// Shown when the server could not be reached at all.
pub const CONNECTION_ERROR_MESSAGE: &str =
    "Failed to connect to the server, please try again later or contact support team.";
pub const PARSE_ERROR_MESSAGE: &str = "Error Parsing Response";
pub const BAD_REQUEST_MESSAGE: &str = "Bad request, Check the post data";
pub const NOT_FOUND_MESSAGE: &str = "Not found, Check the api route";
pub const GENERIC_FAILURE_MESSAGE: &str = "Response Not Okay";
pub const NOT_SIGNED_IN_MESSAGE: &str = "Not signed in";

/// Why a call did not produce data
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureKind {
    /// The server was never reached (DNS, refused connection, timeout)
    Transport,
    /// 2xx with a body that is not the expected JSON
    Parse,
    /// The refresh token was rejected; the session has been torn down
    AuthTerminal,
    /// Any other non-success answer from the server
    Application,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FailureKind::Transport => "transport",
            FailureKind::Parse => "parse",
            FailureKind::AuthTerminal => "auth-terminal",
            FailureKind::Application => "application",
        };
        f.write_str(name)
    }
}

/// A failed call, carrying a message suitable for a toast
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct ApiFailure {
    pub kind: FailureKind,
    pub status_code: Option<u16>,
    pub message: String,
}

impl ApiFailure {
    pub fn new(kind: FailureKind, status_code: Option<u16>, message: impl Into<String>) -> Self {
        Self {
            kind,
            status_code,
            message: message.into(),
        }
    }

    pub fn transport() -> Self {
        Self::new(FailureKind::Transport, None, CONNECTION_ERROR_MESSAGE)
    }

    pub fn parse(status_code: Option<u16>) -> Self {
        Self::new(FailureKind::Parse, status_code, PARSE_ERROR_MESSAGE)
    }

    pub fn application(status_code: u16, body: &str) -> Self {
        Self::new(
            FailureKind::Application,
            Some(status_code),
            failure_message(status_code, body),
        )
    }

    pub fn is_auth_terminal(&self) -> bool {
        self.kind == FailureKind::AuthTerminal
    }
}

/// Outcome of a failed token refresh
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    /// Refresh token rejected or no session at all; the user must sign in again
    #[error("{message}")]
    Terminal {
        status_code: Option<u16>,
        message: String,
    },
    /// Refresh could not complete right now; the session is kept
    #[error("{message}")]
    Transient {
        status_code: Option<u16>,
        message: String,
    },
}

impl AuthError {
    pub fn status_code(&self) -> Option<u16> {
        match self {
            AuthError::Terminal { status_code, .. } | AuthError::Transient { status_code, .. } => {
                *status_code
            }
        }
    }

    pub fn message(&self) -> &str {
        match self {
            AuthError::Terminal { message, .. } | AuthError::Transient { message, .. } => message,
        }
    }
}

/// Failure below HTTP: the request never produced a status line
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    #[error("connection failed: {0}")]
    Connect(String),
    #[error("request timed out")]
    Timeout,
    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

/// Message for a non-success answer.
///
/// A JSON object body wins with its string `message`, falling back to the
/// generic text. A body that is not JSON gets a status-derived text.
pub fn failure_message(status_code: u16, body: &str) -> String {
    match serde_json::from_str::<serde_json::Value>(body) {
        Ok(serde_json::Value::Null) | Err(_) => status_message(status_code).to_string(),
        Ok(value) => value
            .get("message")
            .and_then(|m| m.as_str())
            .filter(|m| !m.is_empty())
            .unwrap_or(GENERIC_FAILURE_MESSAGE)
            .to_string(),
    }
}

pub fn status_message(status_code: u16) -> &'static str {
    match status_code {
        400 => BAD_REQUEST_MESSAGE,
        404 => NOT_FOUND_MESSAGE,
        _ => GENERIC_FAILURE_MESSAGE,
    }
}
