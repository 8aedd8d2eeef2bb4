use std::fmt;
use std::sync::Arc;

use super::history::{BrowserHistory, HistoryEntry};
use super::menu::{menu_for_role, Menu};
use super::query::{NavLocation, SectionSelection};
use super::views::ViewRegistry;
use super::NavError;

/// Fencing token for one navigation attempt. Only the most recently issued
/// ticket may commit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NavTicket(u64);

impl NavTicket {
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for NavTicket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// What a committed transition does to the history stack
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryMode {
    Push,
    Replace,
    /// Replay: the browser already moved, nothing to record
    Keep,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavCause {
    HeaderClick,
    Programmatic,
    Replay,
    Mount,
}

impl NavCause {
    /// Clicks and programmatic navigation add the default route as a new
    /// entry; replay and mount overwrite the offending one.
    fn redirect_mode(self) -> HistoryMode {
        match self {
            NavCause::HeaderClick | NavCause::Programmatic => HistoryMode::Push,
            NavCause::Replay | NavCause::Mount => HistoryMode::Replace,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Highlight {
    Set(Option<String>),
    Keep,
}

/// Visible navigation state. `active_view` is `None` until the first commit.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NavigationState {
    pub selected_section: Option<SectionSelection>,
    pub active_view: Option<String>,
    pub history_sequence_id: u64,
    /// Menu component drawn as selected
    pub highlighted_item: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavState {
    Uninitialized,
    Ready {
        section: SectionSelection,
        view: String,
    },
}

impl NavigationState {
    pub fn status(&self) -> NavState {
        match (&self.selected_section, &self.active_view) {
            (Some(section), Some(view)) => NavState::Ready {
                section: section.clone(),
                view: view.clone(),
            },
            _ => NavState::Uninitialized,
        }
    }
}

/// A validated transition waiting for its view data
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingTransition {
    pub ticket: NavTicket,
    pub cause: NavCause,
    pub section: SectionSelection,
    pub view: String,
    pub title: String,
    pub location: NavLocation,
    pub history: HistoryMode,
    /// True when the requested target was invalid and this is the default route
    pub redirected: bool,
    highlight: Highlight,
}

/// Programmatic navigation target
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationRequest {
    pub section: SectionSelection,
    pub view: Option<String>,
    pub params: Vec<(String, String)>,
    /// With `h=false`, keep the current highlight instead of clearing it
    pub preserve_selection: bool,
}

impl NavigationRequest {
    pub fn to_section(section: impl Into<String>) -> Self {
        Self {
            section: SectionSelection::Section(section.into()),
            view: None,
            params: Vec::new(),
            preserve_selection: false,
        }
    }

    /// Show `view` with no header item selected.
    pub fn deselected(view: impl Into<String>) -> Self {
        Self {
            section: SectionSelection::Deselected,
            view: Some(view.into()),
            params: Vec::new(),
            preserve_selection: false,
        }
    }

    pub fn with_view(mut self, view: impl Into<String>) -> Self {
        self.view = Some(view.into());
        self
    }

    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.push((key.into(), value.into()));
        self
    }

    pub fn preserving_selection(mut self) -> Self {
        self.preserve_selection = true;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Commit {
    Applied(NavigationState),
    /// A newer navigation started; nothing changed
    Stale,
}

/// Synchronous navigation state machine.
///
/// Transitions happen in two steps: `begin_*` validates the target and
/// issues a ticket, and [`commit`](Self::commit) applies it once the view
/// data is in. Beginning a transition supersedes every older ticket.
pub struct NavigationController {
    menu: Option<Menu>,
    registry: Arc<ViewRegistry>,
    history: Box<dyn BrowserHistory>,
    dashboard_path: String,
    state: NavigationState,
    last_sequence_id: u64,
    latest_ticket: u64,
}

impl fmt::Debug for NavigationController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NavigationController")
            .field("state", &self.state)
            .field("history_len", &self.history.len())
            .field("latest_ticket", &self.latest_ticket)
            .finish()
    }
}

impl NavigationController {
    pub fn new(
        registry: Arc<ViewRegistry>,
        history: Box<dyn BrowserHistory>,
        dashboard_path: impl Into<String>,
    ) -> Self {
        let last_sequence_id = history.current().map_or(0, |entry| entry.sequence_id);
        Self {
            menu: None,
            registry,
            history,
            dashboard_path: dashboard_path.into(),
            state: NavigationState::default(),
            last_sequence_id,
            latest_ticket: 0,
        }
    }

    pub fn load_menu(&mut self, menu: Menu) -> Result<(), NavError> {
        let first = menu.first_item().ok_or(NavError::EmptyMenu)?;
        if !self.registry.contains(&first.component) {
            return Err(NavError::UnknownView(first.component.clone()));
        }
        self.menu = Some(menu);
        Ok(())
    }

    pub fn load_menu_for_role(&mut self, role: &str) -> Result<(), NavError> {
        self.load_menu(menu_for_role(role)?)
    }

    pub fn menu(&self) -> Option<&Menu> {
        self.menu.as_ref()
    }

    pub fn registry(&self) -> &Arc<ViewRegistry> {
        &self.registry
    }

    pub fn state(&self) -> &NavigationState {
        &self.state
    }

    pub fn history(&self) -> &dyn BrowserHistory {
        self.history.as_ref()
    }

    pub fn history_mut(&mut self) -> &mut dyn BrowserHistory {
        self.history.as_mut()
    }

    pub fn dashboard_path(&self) -> &str {
        &self.dashboard_path
    }

    /// True if no transition has begun since `ticket` was issued.
    pub fn is_current(&self, ticket: NavTicket) -> bool {
        ticket.0 == self.latest_ticket
    }

    pub fn begin_header_click(&mut self, section: &str) -> Result<PendingTransition, NavError> {
        let menu = self.menu.as_ref().ok_or(NavError::MenuNotLoaded)?;
        let selection = SectionSelection::Section(section.to_string());
        let Some((selection, view)) = self.resolve(menu, selection, None) else {
            return self.redirect(NavCause::HeaderClick);
        };
        let highlight = Highlight::Set(
            menu.item(section)
                .or_else(|| menu.item(&view))
                .map(|item| item.component.clone()),
        );
        let location = NavLocation::new(selection.clone(), view.clone());
        Ok(self.pending(
            NavCause::HeaderClick,
            selection,
            view,
            location,
            HistoryMode::Push,
            highlight,
        ))
    }

    pub fn begin_navigation(&mut self, request: NavigationRequest) -> Result<PendingTransition, NavError> {
        let menu = self.menu.as_ref().ok_or(NavError::MenuNotLoaded)?;
        let Some((selection, view)) = self.resolve(menu, request.section, request.view) else {
            return self.redirect(NavCause::Programmatic);
        };
        let highlight = match &selection {
            SectionSelection::Section(id) => {
                Highlight::Set(menu.item(id).map(|item| item.component.clone()))
            }
            SectionSelection::Deselected if request.preserve_selection => Highlight::Keep,
            SectionSelection::Deselected => Highlight::Set(None),
        };
        let mut location = NavLocation::new(selection.clone(), view.clone());
        location.extra = request.params;
        Ok(self.pending(
            NavCause::Programmatic,
            selection,
            view,
            location,
            HistoryMode::Push,
            highlight,
        ))
    }

    /// Back/forward landed on `url`; rebuild the state it encodes.
    pub fn begin_replay(&mut self, url: &str) -> Result<PendingTransition, NavError> {
        let menu = self.menu.as_ref().ok_or(NavError::MenuNotLoaded)?;
        let location = NavLocation::parse(url);
        let Some(section) = location.section.clone() else {
            tracing::warn!(%url, "History entry has no section, redirecting");
            return self.redirect(NavCause::Replay);
        };
        let Some((selection, view)) = self.resolve(menu, section, location.view.clone()) else {
            tracing::warn!(%url, "History entry names an unknown section or view, redirecting");
            return self.redirect(NavCause::Replay);
        };
        let highlight = Self::highlight_for(menu, &selection);
        Ok(self.pending(NavCause::Replay, selection, view, location, HistoryMode::Keep, highlight))
    }

    /// First navigation after the menu loads. A valid `url` is adopted in
    /// place; without one the default route is pushed.
    pub fn begin_mount(&mut self, url: Option<&str>) -> Result<PendingTransition, NavError> {
        let menu = self.menu.as_ref().ok_or(NavError::MenuNotLoaded)?;
        let location = url.map(NavLocation::parse).unwrap_or_default();

        let Some(section) = location.section.clone() else {
            let first = menu.first_item().ok_or(NavError::EmptyMenu)?;
            let component = first.component.clone();
            let selection = SectionSelection::Section(component.clone());
            let location = NavLocation::new(selection.clone(), component.clone());
            let highlight = Highlight::Set(Some(component.clone()));
            return Ok(self.pending(
                NavCause::Mount,
                selection,
                component,
                location,
                HistoryMode::Push,
                highlight,
            ));
        };

        let Some((selection, view)) = self.resolve(menu, section, location.view.clone()) else {
            tracing::warn!(url = url.unwrap_or_default(), "Dashboard URL is not navigable, redirecting");
            return self.redirect(NavCause::Mount);
        };
        let highlight = Self::highlight_for(menu, &selection);
        Ok(self.pending(NavCause::Mount, selection, view, location, HistoryMode::Replace, highlight))
    }

    /// Apply `pending` if it is still the latest transition.
    pub fn commit(&mut self, pending: &PendingTransition) -> Commit {
        if !self.is_current(pending.ticket) {
            tracing::debug!(ticket = %pending.ticket, "Dropping stale navigation");
            return Commit::Stale;
        }

        let url = pending.location.to_url(&self.dashboard_path);
        let sequence_id = match pending.history {
            HistoryMode::Push | HistoryMode::Replace => {
                self.last_sequence_id += 1;
                let entry = HistoryEntry::new(self.last_sequence_id, url);
                if pending.history == HistoryMode::Push {
                    self.history.push(entry);
                } else {
                    self.history.replace(entry);
                }
                self.last_sequence_id
            }
            HistoryMode::Keep => self
                .history
                .current()
                .map_or(self.state.history_sequence_id, |entry| entry.sequence_id),
        };

        let highlighted_item = match &pending.highlight {
            Highlight::Set(item) => item.clone(),
            Highlight::Keep => self.state.highlighted_item.clone(),
        };
        self.state = NavigationState {
            selected_section: Some(pending.section.clone()),
            active_view: Some(pending.view.clone()),
            history_sequence_id: sequence_id,
            highlighted_item,
        };
        tracing::debug!(
            ticket = %pending.ticket,
            section = %pending.section,
            view = %pending.view,
            "Navigation committed"
        );
        Commit::Applied(self.state.clone())
    }

    /// The view data for `pending` could not be loaded. State is left as it
    /// was; returns whether the failure belongs to the latest transition.
    ///
    /// A failed replay also moves the history cursor back to the entry the
    /// state still shows, since the browser already stepped away from it.
    pub fn fail(&mut self, pending: &PendingTransition) -> bool {
        let current = self.is_current(pending.ticket);
        tracing::debug!(ticket = %pending.ticket, view = %pending.view, current, "Navigation failed");
        if current && pending.cause == NavCause::Replay {
            self.realign_history();
        }
        current
    }

    fn realign_history(&mut self) {
        let shown = self.state.history_sequence_id;
        if self
            .history
            .current()
            .is_some_and(|entry| entry.sequence_id == shown)
        {
            return;
        }
        match self.history.go_to(shown) {
            Some(entry) => tracing::debug!(url = %entry.url, "History cursor restored"),
            None => tracing::warn!(sequence_id = shown, "Shown entry is gone from history"),
        }
    }

    fn resolve(
        &self,
        menu: &Menu,
        section: SectionSelection,
        view: Option<String>,
    ) -> Option<(SectionSelection, String)> {
        let view = match &section {
            SectionSelection::Section(id) => {
                if !menu.contains_section(id) {
                    return None;
                }
                match view {
                    Some(view) => view,
                    None => menu.default_view(id)?.to_string(),
                }
            }
            SectionSelection::Deselected => view?,
        };
        self.registry.contains(&view).then_some((section, view))
    }

    fn redirect(&mut self, cause: NavCause) -> Result<PendingTransition, NavError> {
        let menu = self.menu.as_ref().ok_or(NavError::MenuNotLoaded)?;
        let first = menu.first_item().ok_or(NavError::EmptyMenu)?;
        let component = first.component.clone();
        let selection = SectionSelection::Section(component.clone());
        let location = NavLocation::new(selection.clone(), component.clone());
        let highlight = Highlight::Set(Some(component.clone()));
        let mut pending = self.pending(
            cause,
            selection,
            component,
            location,
            cause.redirect_mode(),
            highlight,
        );
        pending.redirected = true;
        Ok(pending)
    }

    fn highlight_for(menu: &Menu, selection: &SectionSelection) -> Highlight {
        Highlight::Set(
            selection
                .section_id()
                .and_then(|id| menu.item(id))
                .map(|item| item.component.clone()),
        )
    }

    fn title_for(&self, view: &str) -> String {
        self.menu
            .as_ref()
            .and_then(|menu| menu.item(view))
            .map(|item| item.title().to_string())
            .unwrap_or_else(|| view.replace('-', " "))
    }

    fn pending(
        &mut self,
        cause: NavCause,
        section: SectionSelection,
        view: String,
        location: NavLocation,
        history: HistoryMode,
        highlight: Highlight,
    ) -> PendingTransition {
        self.latest_ticket += 1;
        PendingTransition {
            ticket: NavTicket(self.latest_ticket),
            cause,
            title: self.title_for(&view),
            section,
            view,
            location,
            history,
            redirected: false,
            highlight,
        }
    }
}
