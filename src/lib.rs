pub mod api;
pub mod cli;
pub mod config;
pub mod nav;
pub mod session;
pub mod ui;
pub mod util;

pub use api::{
    AccountService, ApiClient, ApiFailure, ApiRequest, ApiResponse, AuthError, AuthService,
    EmojiService, FailureKind, HttpTransport, ReqwestTransport, SignInError, TokenRefresher,
};
pub use config::Config;
pub use nav::{
    MemoryHistory, NavError, NavOutcome, NavigationController, NavigationRequest,
    NavigationState, Navigator, ViewRegistry,
};
pub use session::{FileSessionStore, Session, SessionHandle, SessionStore};
pub use ui::{ChromeState, Toast, ToastQueue, UiEvent, UiEventSender};
