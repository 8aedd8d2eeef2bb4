use std::time::Duration;

use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use crate::nav::{SectionSelection, ViewContent};
use crate::ui::toast::Toast;

/// Signals from the console core to whatever shell is presenting it
#[derive(Debug, Clone, PartialEq)]
pub enum UiEvent {
    /// Replace the workspace with a freshly loaded view
    RenderView {
        view_id: String,
        title: String,
        content: ViewContent,
    },

    /// Header selection changed; `highlighted_item` is the menu component
    /// that should be marked selected, if any
    SectionChanged {
        section: SectionSelection,
        highlighted_item: Option<String>,
    },

    /// Ask the notification panel to poll for new entries
    RefreshNotifications,

    /// Close the sidebar (mobile header slider)
    CollapseSidebar,

    /// Show a toast
    Toast(Toast),

    /// Session was torn down; redirect to sign-out after the delay
    SignOut { after: Duration },
}

/// Cloneable sending half of the UI channel.
///
/// Sending never fails the caller. A sender built with
/// [`UiEventSender::disconnected`] drops everything, which is what headless
/// callers that do not care about UI signals want.
#[derive(Clone, Debug, Default)]
pub struct UiEventSender {
    tx: Option<UnboundedSender<UiEvent>>,
}

impl UiEventSender {
    pub fn new(tx: UnboundedSender<UiEvent>) -> Self {
        Self { tx: Some(tx) }
    }

    pub fn channel() -> (Self, UnboundedReceiver<UiEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self::new(tx), rx)
    }

    pub fn disconnected() -> Self {
        Self { tx: None }
    }

    pub fn send(&self, event: UiEvent) {
        let Some(tx) = &self.tx else {
            return;
        };
        if let Err(e) = tx.send(event) {
            tracing::debug!(event = ?e.0, "UI event receiver closed, dropping event");
        }
    }
}
