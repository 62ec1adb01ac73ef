//! Remote call handles.
//!
//! A [`NavigationCall`] is a proxy for the navigation service object. The bus
//! layer creates one per registered identifier and owns it; the dispatcher
//! borrows it for a single invocation.
//!
//! Methods may block on bus I/O. They are only ever called from dispatch
//! coroutines, never from the caller's thread.

use crate::view::StaticView;

/// Invocable proxy for the navigation service.
pub trait NavigationCall: Send + Sync {
    /// Switch the root view to a static view. No confirmation is returned.
    fn set_view_as_root(&self, view: StaticView);

    /// Switch the root view to a dynamically named view. No confirmation is returned.
    fn set_dynamic_view_as_root(&self, view_name: &str);

    /// Append a navigable entry. Returns the service's success flag.
    fn append_view(&self, view_name: &str, view_path: &str) -> bool;
}
