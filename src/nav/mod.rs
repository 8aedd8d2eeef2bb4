//! Dashboard navigation
//!
//! [`NavigationController`] is a synchronous state machine that keeps the
//! selected section, the active view, the history stack and the `h`/`w` URL
//! parameters consistent. [`Navigator`] drives it asynchronously: it opens a
//! transition, loads the view's data through the API client and commits the
//! result only if no newer navigation has started in the meantime.

pub mod controller;
pub mod error;
pub mod history;
pub mod menu;
pub mod navigator;
pub mod query;
pub mod views;

pub use controller::{
    Commit, HistoryMode, NavCause, NavState, NavTicket, NavigationController, NavigationRequest,
    NavigationState, PendingTransition,
};
pub use error::NavError;
pub use history::{BrowserHistory, HistoryEntry, MemoryHistory};
pub use menu::{admin_menu, menu_for_role, Menu, MenuGroup, MenuItem};
pub use navigator::{NavOutcome, Navigator};
pub use query::{NavLocation, SectionSelection};
pub use views::{LoadContext, ViewContent, ViewFactory, ViewRegistry, WorkspaceView};
