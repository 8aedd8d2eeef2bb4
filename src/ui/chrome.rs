use super::UiEvent;

/// Visibility of the dashboard chrome around the workspace
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChromeState {
    pub sidebar_open: bool,
    pub dropdown_open: bool,
    pub notifications_open: bool,
}

impl ChromeState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Toggle the header slider; with `close_mode` it only ever closes.
    pub fn toggle_sidebar(&mut self, close_mode: bool) {
        if close_mode {
            self.sidebar_open = false;
        } else {
            self.sidebar_open = !self.sidebar_open;
        }
    }

    /// Opening the profile dropdown closes the sidebar.
    pub fn toggle_dropdown(&mut self) {
        self.dropdown_open = !self.dropdown_open;
        if self.dropdown_open {
            self.toggle_sidebar(true);
        }
    }

    /// Opening the notification panel closes the sidebar.
    pub fn toggle_notifications(&mut self) {
        self.notifications_open = !self.notifications_open;
        if self.notifications_open {
            self.toggle_sidebar(true);
        }
    }

    pub fn close_notifications(&mut self) {
        self.notifications_open = false;
    }

    /// React to core events that affect the chrome. Returns true when
    /// anything changed.
    pub fn apply(&mut self, event: &UiEvent) -> bool {
        let before = self.clone();
        match event {
            UiEvent::CollapseSidebar => self.toggle_sidebar(true),
            UiEvent::SignOut { .. } => *self = Self::default(),
            _ => {}
        }
        *self != before
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn close_mode_never_opens_sidebar() {
        let mut chrome = ChromeState::new();
        chrome.toggle_sidebar(true);
        assert!(!chrome.sidebar_open);

        chrome.toggle_sidebar(false);
        assert!(chrome.sidebar_open);
        chrome.toggle_sidebar(false);
        assert!(!chrome.sidebar_open);
    }

    #[test]
    fn opening_panels_closes_sidebar() {
        let mut chrome = ChromeState::new();
        chrome.toggle_sidebar(false);
        chrome.toggle_notifications();
        assert!(chrome.notifications_open);
        assert!(!chrome.sidebar_open);

        chrome.toggle_sidebar(false);
        chrome.toggle_dropdown();
        assert!(chrome.dropdown_open);
        assert!(!chrome.sidebar_open);
    }

    #[test]
    fn collapse_event_closes_sidebar() {
        let mut chrome = ChromeState::new();
        chrome.toggle_sidebar(false);
        assert!(chrome.apply(&UiEvent::CollapseSidebar));
        assert!(!chrome.sidebar_open);
        assert!(!chrome.apply(&UiEvent::CollapseSidebar));
        assert!(!chrome.apply(&UiEvent::RefreshNotifications));
    }

    #[test]
    fn sign_out_resets_everything() {
        let mut chrome = ChromeState::new();
        chrome.toggle_dropdown();
        chrome.toggle_notifications();
        assert!(chrome.apply(&UiEvent::SignOut {
            after: std::time::Duration::ZERO
        }));
        assert_eq!(chrome, ChromeState::default());
    }
}
