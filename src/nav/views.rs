use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;

use super::menu::Menu;
use crate::api::{ApiClient, ApiFailure, Emoji, EmojiService};

/// Data a view hands to the shell for rendering
#[derive(Debug, Clone, PartialEq)]
pub enum ViewContent {
    /// View with nothing to fetch (home, creation forms)
    Static { heading: String },
    Emojis(Vec<Emoji>),
}

/// Handed to a view while it loads.
pub struct LoadContext<'a> {
    client: &'a ApiClient,
    is_current: &'a (dyn Fn() -> bool + Send + Sync),
}

impl<'a> LoadContext<'a> {
    pub fn new(client: &'a ApiClient, is_current: &'a (dyn Fn() -> bool + Send + Sync)) -> Self {
        Self { client, is_current }
    }

    pub fn client(&self) -> &ApiClient {
        self.client
    }

    /// False once a newer navigation has begun. Whatever this load returns
    /// after that is discarded, so a view may stop early.
    pub fn is_current(&self) -> bool {
        (self.is_current)()
    }
}

/// A workspace view: fetches what it needs before it is shown
#[async_trait]
pub trait WorkspaceView: Send + Sync {
    fn id(&self) -> &str;
    async fn load(&self, cx: &LoadContext<'_>) -> Result<ViewContent, ApiFailure>;
}

pub type ViewFactory = Arc<dyn Fn() -> Box<dyn WorkspaceView> + Send + Sync>;

/// Explicit map from view id to the factory that builds it
#[derive(Clone, Default)]
pub struct ViewRegistry {
    factories: BTreeMap<String, ViewFactory>,
}

impl fmt::Debug for ViewRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ViewRegistry")
            .field("views", &self.factories.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl ViewRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Views behind the administrator menu.
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        registry.register("emojis", || Box::new(EmojisView));
        registry.register_static("home", "Home");
        registry.register_static("create-event-tag", "Tags");
        registry.register_static("create-event", "Create Event");
        registry.register_static("event-list", "List");
        registry.register_static("create-host", "Create Host");
        registry.register_static("host-list", "List");
        registry
    }

    pub fn register<F>(&mut self, id: impl Into<String>, factory: F)
    where
        F: Fn() -> Box<dyn WorkspaceView> + Send + Sync + 'static,
    {
        self.factories.insert(id.into(), Arc::new(factory));
    }

    pub fn register_static(&mut self, id: impl Into<String>, heading: impl Into<String>) {
        let id = id.into();
        let heading = heading.into();
        let view_id = id.clone();
        self.register(id, move || {
            Box::new(StaticView {
                id: view_id.clone(),
                heading: heading.clone(),
            })
        });
    }

    /// Register a static view for every menu item that has no view yet.
    pub fn register_menu_defaults(&mut self, menu: &Menu) {
        for item in menu.items() {
            if !self.contains(&item.component) {
                self.register_static(item.component.clone(), item.title().to_string());
            }
        }
    }

    pub fn contains(&self, id: &str) -> bool {
        self.factories.contains_key(id)
    }

    pub fn create(&self, id: &str) -> Option<Box<dyn WorkspaceView>> {
        self.factories.get(id).map(|factory| factory())
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.factories.keys().map(String::as_str)
    }
}

pub struct StaticView {
    id: String,
    heading: String,
}

#[async_trait]
impl WorkspaceView for StaticView {
    fn id(&self) -> &str {
        &self.id
    }

    async fn load(&self, _cx: &LoadContext<'_>) -> Result<ViewContent, ApiFailure> {
        Ok(ViewContent::Static {
            heading: self.heading.clone(),
        })
    }
}

/// Emoji management: loads the available emojis
pub struct EmojisView;

#[async_trait]
impl WorkspaceView for EmojisView {
    fn id(&self) -> &str {
        "emojis"
    }

    async fn load(&self, cx: &LoadContext<'_>) -> Result<ViewContent, ApiFailure> {
        if !cx.is_current() {
            tracing::debug!("Emoji view superseded before fetching");
            return Ok(ViewContent::Emojis(Vec::new()));
        }
        EmojiService::list(cx.client()).await.map(ViewContent::Emojis)
    }
}
