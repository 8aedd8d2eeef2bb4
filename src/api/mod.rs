//! Authenticated request pipeline
//!
//! Every server call goes through [`ApiClient::call`], which attaches the
//! bearer token, renews it through the [`TokenRefresher`] when the server
//! answers 401 and retries within a bounded budget. Failures never escape as
//! errors; they come back as [`ApiResponse::Failure`] tagged with a
//! [`FailureKind`].

pub mod auth;
pub mod endpoints;
pub mod error;
pub mod mock;
pub mod pipeline;
pub mod refresh;
pub mod request;
pub mod response;
pub mod transport;

pub use auth::{AuthService, SignInError};
pub use endpoints::{AccountService, Emoji, EmojiService, NewEmoji, UserDetails};
pub use error::{ApiFailure, AuthError, FailureKind, TransportError};
pub use pipeline::ApiClient;
pub use refresh::{Flight, TokenRefresher};
pub use request::{ApiRequest, HttpMethod, OutgoingRequest};
pub use response::ApiResponse;
pub use transport::{HttpTransport, RawResponse, ReqwestTransport};
