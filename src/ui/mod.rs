//! Auxiliary UI collaborators
//!
//! The console core never renders anything itself. It reports what changed
//! through [`UiEvent`]s; a shell (WASM, TUI or the bundled CLI) consumes them
//! and may keep [`ChromeState`] and a [`ToastQueue`] up to date.

pub mod chrome;
pub mod events;
pub mod toast;

pub use chrome::ChromeState;
pub use events::{UiEvent, UiEventSender};
pub use toast::{Toast, ToastKind, ToastQueue};
