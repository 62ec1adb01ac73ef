//! # View Module
//!
//! Value types describing what a caller wants the navigation surface to show.
//!
//! - [`View`] names a dynamic view and, for append requests, the resource it
//!   loads from.
//! - [`StaticView`] selects one of the fixed root views the navigation service
//!   knows about.
//! - [`NavigationRequest`] bundles either of the above with the entry point it
//!   is meant for, so requests can be read from JSON lines and submitted in bulk.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use thiserror::Error;

/// Errors raised while building view values.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ViewError {
    /// A view must carry a non-empty name
    #[error("view name must not be empty")]
    EmptyName,
    /// The selector does not name one of the static views
    #[error("unknown static view '{0}'")]
    UnknownStaticView(String),
}

/// A dynamically named view.
///
/// `name` is handed to the navigation service verbatim; `path` is opaque to
/// the dispatcher and only travels with append requests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawView")]
pub struct View {
    name: String,
    path: String,
}

#[derive(Deserialize)]
struct RawView {
    name: String,
    #[serde(default)]
    path: String,
}

impl TryFrom<RawView> for View {
    type Error = ViewError;

    fn try_from(raw: RawView) -> Result<Self, Self::Error> {
        View::new(raw.name, raw.path)
    }
}

impl View {
    /// Build a view, rejecting an empty name.
    ///
    /// The name is not trimmed: `" news "` stays `" news "`.
    pub fn new(name: impl Into<String>, path: impl Into<String>) -> Result<Self, ViewError> {
        let name = name.into();
        if name.is_empty() {
            return Err(ViewError::EmptyName);
        }
        Ok(Self {
            name,
            path: path.into(),
        })
    }

    /// Build a view that has no resource path (dynamic root views).
    pub fn named(name: impl Into<String>) -> Result<Self, ViewError> {
        Self::new(name, String::new())
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Split into `(name, path)`.
    #[must_use]
    pub fn into_parts(self) -> (String, String) {
        (self.name, self.path)
    }
}

/// The fixed set of root views the navigation service can switch to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StaticView {
    Home,
    News,
    Media,
    Notes,
    Traffic,
    Weather,
    Sensor,
    Reddit,
    Applications,
}

impl StaticView {
    /// Every static view, in menu order.
    pub const ALL: [StaticView; 9] = [
        StaticView::Home,
        StaticView::News,
        StaticView::Media,
        StaticView::Notes,
        StaticView::Traffic,
        StaticView::Weather,
        StaticView::Sensor,
        StaticView::Reddit,
        StaticView::Applications,
    ];

    /// Lower-case selector name (`"home"`, `"news"`, ...)
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            StaticView::Home => "home",
            StaticView::News => "news",
            StaticView::Media => "media",
            StaticView::Notes => "notes",
            StaticView::Traffic => "traffic",
            StaticView::Weather => "weather",
            StaticView::Sensor => "sensor",
            StaticView::Reddit => "reddit",
            StaticView::Applications => "applications",
        }
    }

    /// Capitalised name as it appears in identifiers and messages.
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            StaticView::Home => "Home",
            StaticView::News => "News",
            StaticView::Media => "Media",
            StaticView::Notes => "Notes",
            StaticView::Traffic => "Traffic",
            StaticView::Weather => "Weather",
            StaticView::Sensor => "Sensor",
            StaticView::Reddit => "Reddit",
            StaticView::Applications => "Applications",
        }
    }
}

impl Display for StaticView {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StaticView {
    type Err = ViewError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        StaticView::ALL
            .into_iter()
            .find(|view| view.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| ViewError::UnknownStaticView(s.to_string()))
    }
}

/// One view-transition request, tagged with the entry point it targets.
///
/// JSON shape (one object per line in batch files):
///
/// ```json
/// {"kind": "static", "view": "weather"}
/// {"kind": "dynamic", "view": {"name": "calendar"}}
/// {"kind": "append", "view": {"name": "movie", "path": "/media/movie.qml"}}
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "view", rename_all = "lowercase")]
pub enum NavigationRequest {
    Static(StaticView),
    Dynamic(View),
    Append(View),
}
