use std::sync::Arc;

use parking_lot::Mutex;

use super::controller::{
    Commit, NavCause, NavTicket, NavigationController, NavigationRequest, NavigationState,
    PendingTransition,
};
use super::history::BrowserHistory;
use super::views::LoadContext;
use super::NavError;
use crate::api::{AccountService, ApiClient, ApiFailure, UserDetails};
use crate::ui::{Toast, UiEvent, UiEventSender};

/// How a navigation attempt ended
#[derive(Debug, Clone, PartialEq)]
pub enum NavOutcome {
    Committed(NavigationState),
    /// Superseded by a newer navigation; its result was discarded
    Stale,
    /// The view data could not be loaded; state is unchanged
    Failed(ApiFailure),
}

/// Async driver around a shared [`NavigationController`].
///
/// The controller lock is only taken for the synchronous begin and commit
/// steps, never across the view fetch.
#[derive(Clone)]
pub struct Navigator {
    controller: Arc<Mutex<NavigationController>>,
    client: ApiClient,
    events: UiEventSender,
}

impl Navigator {
    pub fn new(client: ApiClient, controller: NavigationController) -> Self {
        let events = client.events().clone();
        Self {
            controller: Arc::new(Mutex::new(controller)),
            client,
            events,
        }
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    pub fn state(&self) -> NavigationState {
        self.controller.lock().state().clone()
    }

    pub fn is_current(&self, ticket: NavTicket) -> bool {
        self.controller.lock().is_current(ticket)
    }

    /// Run `f` with the controller locked.
    pub fn with_controller<R>(&self, f: impl FnOnce(&mut NavigationController) -> R) -> R {
        f(&mut self.controller.lock())
    }

    /// Load the signed-in user's profile, pick the menu for their role and
    /// perform the first navigation.
    pub async fn mount(&self, url: Option<&str>) -> Result<(UserDetails, NavOutcome), NavError> {
        let session = self.client.session().snapshot().ok_or(NavError::NotSignedIn)?;
        let user = match AccountService::short_details(&self.client, &session.user_id).await {
            Ok(user) => user,
            Err(failure) => {
                self.toast_failure(&failure);
                return Err(failure.into());
            }
        };
        let outcome = self.mount_with_user(&user, url).await?;
        Ok((user, outcome))
    }

    /// Mount for an already known user.
    pub async fn mount_with_user(&self, user: &UserDetails, url: Option<&str>) -> Result<NavOutcome, NavError> {
        let pending = {
            let mut controller = self.controller.lock();
            controller.load_menu_for_role(&user.role)?;
            controller.begin_mount(url)?
        };
        self.run(pending).await
    }

    pub async fn select_header(&self, section: &str) -> Result<NavOutcome, NavError> {
        let pending = self.controller.lock().begin_header_click(section)?;
        self.run(pending).await
    }

    pub async fn navigate(&self, request: NavigationRequest) -> Result<NavOutcome, NavError> {
        let pending = self.controller.lock().begin_navigation(request)?;
        self.run(pending).await
    }

    /// The browser moved to `url` through back/forward.
    pub async fn replay(&self, url: &str) -> Result<NavOutcome, NavError> {
        let pending = self.controller.lock().begin_replay(url)?;
        self.run(pending).await
    }

    /// Step back in history and replay the entry. `None` at the start of history.
    pub async fn back(&self) -> Result<Option<NavOutcome>, NavError> {
        let entry = self.controller.lock().history_mut().back();
        match entry {
            Some(entry) => self.replay(&entry.url).await.map(Some),
            None => Ok(None),
        }
    }

    pub async fn forward(&self) -> Result<Option<NavOutcome>, NavError> {
        let entry = self.controller.lock().history_mut().forward();
        match entry {
            Some(entry) => self.replay(&entry.url).await.map(Some),
            None => Ok(None),
        }
    }

    async fn run(&self, pending: PendingTransition) -> Result<NavOutcome, NavError> {
        let view = self.controller.lock().registry().create(&pending.view);
        let view = view.ok_or_else(|| NavError::UnknownView(pending.view.clone()))?;

        tracing::debug!(ticket = %pending.ticket, view = %pending.view, "Loading view");
        let ticket = pending.ticket;
        let is_current = move || self.is_current(ticket);
        let cx = LoadContext::new(&self.client, &is_current);
        let content = match view.load(&cx).await {
            Ok(content) => content,
            Err(failure) => {
                let current = self.controller.lock().fail(&pending);
                if !current {
                    return Ok(NavOutcome::Stale);
                }
                tracing::warn!(view = %pending.view, error = %failure, "View failed to load");
                self.toast_failure(&failure);
                return Ok(NavOutcome::Failed(failure));
            }
        };

        let commit = self.controller.lock().commit(&pending);
        let state = match commit {
            Commit::Applied(state) => state,
            Commit::Stale => return Ok(NavOutcome::Stale),
        };

        self.events.send(UiEvent::SectionChanged {
            section: pending.section.clone(),
            highlighted_item: state.highlighted_item.clone(),
        });
        self.events.send(UiEvent::RenderView {
            view_id: pending.view.clone(),
            title: pending.title.clone(),
            content,
        });
        if pending.cause != NavCause::Replay {
            self.events.send(UiEvent::CollapseSidebar);
        }
        self.events.send(UiEvent::RefreshNotifications);

        Ok(NavOutcome::Committed(state))
    }

    fn toast_failure(&self, failure: &ApiFailure) {
        // terminal auth failures already trigger the sign-out redirect
        if !failure.is_auth_terminal() {
            self.events.send(UiEvent::Toast(Toast::error(failure.message.clone())));
        }
    }
}
