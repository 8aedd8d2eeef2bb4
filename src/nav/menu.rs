use super::NavError;

pub const ADMINISTRATOR_ROLE: &str = "Administrator";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuItem {
    pub name: String,
    /// Workspace title when it differs from the menu label
    pub title_name: Option<String>,
    pub component: String,
    pub icon: String,
}

impl MenuItem {
    pub fn new(name: impl Into<String>, component: impl Into<String>, icon: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            title_name: None,
            component: component.into(),
            icon: icon.into(),
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title_name = Some(title.into());
        self
    }

    pub fn title(&self) -> &str {
        self.title_name.as_deref().unwrap_or(&self.name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuGroup {
    pub name: Option<String>,
    pub items: Vec<MenuItem>,
}

impl MenuGroup {
    pub fn unnamed(items: Vec<MenuItem>) -> Self {
        Self { name: None, items }
    }

    pub fn named(name: impl Into<String>, items: Vec<MenuItem>) -> Self {
        Self {
            name: Some(name.into()),
            items,
        }
    }

    /// Section id of a named group: lowercase, spaces as hyphens.
    pub fn slug(&self) -> Option<String> {
        self.name
            .as_ref()
            .map(|name| name.trim().to_lowercase().replace(' ', "-"))
    }
}

/// Header menu for one role
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Menu {
    groups: Vec<MenuGroup>,
}

impl Menu {
    pub fn new(groups: Vec<MenuGroup>) -> Self {
        Self { groups }
    }

    pub fn groups(&self) -> &[MenuGroup] {
        &self.groups
    }

    pub fn items(&self) -> impl Iterator<Item = &MenuItem> {
        self.groups.iter().flat_map(|group| group.items.iter())
    }

    pub fn item(&self, component: &str) -> Option<&MenuItem> {
        self.items().find(|item| item.component == component)
    }

    pub fn first_item(&self) -> Option<&MenuItem> {
        self.items().next()
    }

    pub fn is_empty(&self) -> bool {
        self.first_item().is_none()
    }

    /// A section is an item component or the slug of a named group.
    pub fn contains_section(&self, section: &str) -> bool {
        self.item(section).is_some()
            || self
                .groups
                .iter()
                .any(|group| group.slug().as_deref() == Some(section))
    }

    /// View shown when `section` is selected without a `w`: the item itself,
    /// or the first item of a named group.
    pub fn default_view(&self, section: &str) -> Option<&str> {
        if let Some(item) = self.item(section) {
            return Some(&item.component);
        }
        self.groups
            .iter()
            .find(|group| group.slug().as_deref() == Some(section))
            .and_then(|group| group.items.first())
            .map(|item| item.component.as_str())
    }
}

pub fn menu_for_role(role: &str) -> Result<Menu, NavError> {
    match role {
        ADMINISTRATOR_ROLE => Ok(admin_menu()),
        other => Err(NavError::UnknownRole(other.to_string())),
    }
}

pub fn admin_menu() -> Menu {
    Menu::new(vec![
        MenuGroup::unnamed(vec![
            MenuItem::new("Home", "home", "home.svg"),
            MenuItem::new("Emoji", "emojis", "home.svg"),
        ]),
        MenuGroup::named(
            "Event",
            vec![
                MenuItem::new("Tags", "create-event-tag", "app-info.svg"),
                MenuItem::new("Create", "create-event", "app-info.svg").with_title("Create Event"),
                MenuItem::new("List", "event-list", "app-info.svg"),
            ],
        ),
        MenuGroup::named(
            "Host",
            vec![
                MenuItem::new("Create", "create-host", "app-info.svg").with_title("Create Host"),
                MenuItem::new("List", "host-list", "app-info.svg"),
            ],
        ),
    ])
}
