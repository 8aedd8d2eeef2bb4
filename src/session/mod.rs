//! Authenticated session state
//!
//! The session record is created at sign-in, renewed by the token refresher
//! and destroyed on sign-out or when the refresh token is rejected. It is
//! held in a [`SessionHandle`] that every pipeline call reads from; only the
//! auth flows and the refresher write to it.

mod handle;
mod model;
mod store;

pub use handle::SessionHandle;
pub use model::Session;
pub use store::{FileSessionStore, MemorySessionStore, SessionStore, SessionStoreError};
