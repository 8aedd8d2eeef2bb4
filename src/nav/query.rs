use std::fmt;

use url::form_urlencoded;

pub const SECTION_PARAM: &str = "h";
pub const VIEW_PARAM: &str = "w";
const DESELECTED: &str = "false";

/// Value of the `h` parameter
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SectionSelection {
    Section(String),
    /// `h=false`: a view is shown with no header item selected
    Deselected,
}

impl SectionSelection {
    pub fn parse(raw: &str) -> Self {
        if raw == DESELECTED {
            SectionSelection::Deselected
        } else {
            SectionSelection::Section(raw.to_string())
        }
    }

    pub fn as_param(&self) -> &str {
        match self {
            SectionSelection::Section(id) => id,
            SectionSelection::Deselected => DESELECTED,
        }
    }

    pub fn section_id(&self) -> Option<&str> {
        match self {
            SectionSelection::Section(id) => Some(id),
            SectionSelection::Deselected => None,
        }
    }
}

impl fmt::Display for SectionSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_param())
    }
}

/// Replayable projection of the navigation state onto the dashboard URL.
///
/// Parameters other than `h` and `w` are opaque and kept in order. A parsed
/// location also keeps their segments exactly as written, so formatting it
/// again reproduces them byte for byte.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NavLocation {
    pub section: Option<SectionSelection>,
    pub view: Option<String>,
    pub extra: Vec<(String, String)>,
    raw_extra: Option<Vec<String>>,
}

impl NavLocation {
    pub fn new(section: SectionSelection, view: impl Into<String>) -> Self {
        Self {
            section: Some(section),
            view: Some(view.into()),
            extra: Vec::new(),
            raw_extra: None,
        }
    }

    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        let (key, value) = (key.into(), value.into());
        if let Some(raw) = self.raw_extra.as_mut() {
            raw.push(
                form_urlencoded::Serializer::new(String::new())
                    .append_pair(&key, &value)
                    .finish(),
            );
        }
        self.extra.push((key, value));
        self
    }

    /// Parse a dashboard URL, a bare query or a query with a leading `?`.
    /// Empty `h`/`w` values count as missing; the first occurrence wins.
    pub fn parse(url_or_query: &str) -> Self {
        let query = match url_or_query.split_once('?') {
            Some((_, query)) => query,
            None if url_or_query.contains('=') => url_or_query,
            None => "",
        };
        let query = query.split('#').next().unwrap_or_default();

        let mut location = NavLocation::default();
        let mut raw_extra = Vec::new();
        for segment in query.split('&').filter(|segment| !segment.is_empty()) {
            let Some((key, value)) = form_urlencoded::parse(segment.as_bytes()).next() else {
                continue;
            };
            match key.as_ref() {
                SECTION_PARAM => {
                    if location.section.is_none() && !value.is_empty() {
                        location.section = Some(SectionSelection::parse(&value));
                    }
                }
                VIEW_PARAM => {
                    if location.view.is_none() && !value.is_empty() {
                        location.view = Some(value.into_owned());
                    }
                }
                _ => {
                    location.extra.push((key.into_owned(), value.into_owned()));
                    raw_extra.push(segment.to_string());
                }
            }
        }
        if !raw_extra.is_empty() {
            location.raw_extra = Some(raw_extra);
        }
        location
    }

    pub fn to_query(&self) -> String {
        let mut serializer = form_urlencoded::Serializer::new(String::new());
        if let Some(section) = &self.section {
            serializer.append_pair(SECTION_PARAM, section.as_param());
        }
        if let Some(view) = &self.view {
            serializer.append_pair(VIEW_PARAM, view);
        }
        let mut query = match &self.raw_extra {
            Some(_) => serializer.finish(),
            None => {
                for (key, value) in &self.extra {
                    serializer.append_pair(key, value);
                }
                serializer.finish()
            }
        };
        for segment in self.raw_extra.iter().flatten() {
            if !query.is_empty() {
                query.push('&');
            }
            query.push_str(segment);
        }
        query
    }

    pub fn to_url(&self, dashboard_path: &str) -> String {
        let query = self.to_query();
        if query.is_empty() {
            dashboard_path.to_string()
        } else {
            format!("{dashboard_path}?{query}")
        }
    }
}
