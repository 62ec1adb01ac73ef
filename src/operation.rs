//! Operation identifiers for the navigation service.
//!
//! Each dispatcher entry point maps to exactly one [`Operation`], and each
//! operation to exactly one registry identifier. Identifiers are fixed at
//! compile time and spelled the way the navigation service registers them
//! (including `.setDinamicViewAsRoot`).
//!
//! Only `.setHomeViewAsRoot`, `.setApplicationsViewAsRoot`,
//! `.setDinamicViewAsRoot` and `.appendView` are confirmed on the service side.
//! The remaining static views follow the `.set<Name>ViewAsRoot` convention.

use crate::config::RootViewWiring;
use crate::view::StaticView;
use serde::Serialize;
use std::fmt::{Display, Formatter};

/// A remote operation the dispatcher knows how to resolve and invoke.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "operation", content = "view", rename_all = "snake_case")]
pub enum Operation {
    /// Switch the root view to a static view
    SetViewAsRoot(StaticView),
    /// Switch the root view to a dynamically named view
    SetDynamicViewAsRoot,
    /// Append a navigable entry; confirmed with a success flag
    AppendView,
}

impl Operation {
    /// Every operation, static views first.
    #[must_use]
    pub fn all() -> Vec<Operation> {
        StaticView::ALL
            .into_iter()
            .map(Operation::SetViewAsRoot)
            .chain([Operation::SetDynamicViewAsRoot, Operation::AppendView])
            .collect()
    }

    /// Registry identifier resolved for this operation.
    #[must_use]
    pub const fn identifier(self) -> &'static str {
        match self {
            Operation::SetViewAsRoot(view) => match view {
                StaticView::Home => ".setHomeViewAsRoot",
                StaticView::News => ".setNewsViewAsRoot",
                StaticView::Media => ".setMediaViewAsRoot",
                StaticView::Notes => ".setNotesViewAsRoot",
                StaticView::Traffic => ".setTrafficViewAsRoot",
                StaticView::Weather => ".setWeatherViewAsRoot",
                StaticView::Sensor => ".setSensorViewAsRoot",
                StaticView::Reddit => ".setRedditViewAsRoot",
                StaticView::Applications => ".setApplicationsViewAsRoot",
            },
            Operation::SetDynamicViewAsRoot => ".setDinamicViewAsRoot",
            Operation::AppendView => ".appendView",
        }
    }

    /// Interface-qualified name used in call-failure reports.
    #[must_use]
    pub const fn qualified_name(self) -> &'static str {
        match self {
            Operation::SetViewAsRoot(view) => match view {
                StaticView::Home => "Navigation.SetHomeViewAsRoot",
                StaticView::News => "Navigation.SetNewsViewAsRoot",
                StaticView::Media => "Navigation.SetMediaViewAsRoot",
                StaticView::Notes => "Navigation.SetNotesViewAsRoot",
                StaticView::Traffic => "Navigation.SetTrafficViewAsRoot",
                StaticView::Weather => "Navigation.SetWeatherViewAsRoot",
                StaticView::Sensor => "Navigation.SetSensorViewAsRoot",
                StaticView::Reddit => "Navigation.SetRedditViewAsRoot",
                StaticView::Applications => "Navigation.SetApplicationsViewAsRoot",
            },
            Operation::SetDynamicViewAsRoot => "Navigation.SetDynamicViewAsRoot",
            Operation::AppendView => "Navigation.AppendView",
        }
    }

    /// Whether the remote side answers with a success flag.
    #[must_use]
    pub const fn is_confirmed(self) -> bool {
        matches!(self, Operation::AppendView)
    }

    /// Message reported when this operation's identifier cannot be resolved.
    ///
    /// Under [`RootViewWiring::Compatible`] the home entry point reports the
    /// applications message, as the navigation service's clients always have.
    #[must_use]
    pub fn resolution_error_message(self, wiring: RootViewWiring) -> String {
        match (self, wiring) {
            (Operation::AppendView, _) => Operation::AppendView.qualified_name().to_string(),
            (Operation::SetDynamicViewAsRoot, RootViewWiring::Compatible) => {
                "Error setting Navigation View to Dinamic".to_string()
            }
            (Operation::SetDynamicViewAsRoot, RootViewWiring::Corrected) => {
                "Error setting Navigation View to Dynamic".to_string()
            }
            (Operation::SetViewAsRoot(StaticView::Home), RootViewWiring::Compatible) => {
                "Error setting Navigation View to Applications".to_string()
            }
            (Operation::SetViewAsRoot(view), _) => {
                format!("Error setting Navigation View to {}", view.title())
            }
        }
    }
}

impl Display for Operation {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.qualified_name())
    }
}
