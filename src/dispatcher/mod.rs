//! # Dispatcher Module
//!
//! The dispatcher turns in-process "switch the active view" requests into
//! remote calls against the navigation service, without making the caller
//! wait for the bus.
//!
//! ## Overview
//!
//! [`ViewDispatcher`] exposes one entry point per request shape:
//!
//! | Entry point | Identifier | Remote call |
//! |---|---|---|
//! | [`ViewDispatcher::request_static_view`] | `.set<Name>ViewAsRoot` | `set_view_as_root(view)` |
//! | [`ViewDispatcher::request_dynamic_view`] | `.setDinamicViewAsRoot` | `set_dynamic_view_as_root(name)` |
//! | [`ViewDispatcher::request_append_view`] | `.appendView` | `append_view(name, path) -> bool` |
//!
//! ## Architecture
//!
//! Each call spawns one `may` coroutine and returns immediately. The
//! coroutine runs strictly in order:
//!
//! 1. resolve the identifier against the [`CallRegistry`](crate::registry::CallRegistry)
//! 2. on failure, report a resolution error and stop
//! 3. invoke the handle
//! 4. for append, report a call error if the service answered `false`
//! 5. hand the [`DispatchOutcome`](crate::report::DispatchOutcome) to the reporter
//!
//! Coroutines are detached. There is no ordering between dispatches, no
//! retry and no cancellation; a handle that never returns parks its
//! coroutine for the lifetime of the process.
//!
//! ## Root-view wiring
//!
//! Under [`RootViewWiring::Compatible`](crate::config::RootViewWiring) the
//! home and applications selectors resolve their own identifiers but switch
//! the root to the news view, matching deployed clients. Use
//! `RootViewWiring::Corrected` to send each selector to its own view.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use navdispatch::dispatcher::ViewDispatcher;
//! use navdispatch::registry::SharedRegistry;
//! use navdispatch::report::TracingReporter;
//! use navdispatch::view::{StaticView, View};
//! use std::sync::Arc;
//!
//! let registry = Arc::new(SharedRegistry::new());
//! // ... the bus layer registers its call handles here ...
//! let dispatcher = ViewDispatcher::new(registry, Arc::new(TracingReporter));
//!
//! dispatcher.request_static_view(StaticView::Weather);
//! dispatcher.request_append_view(View::new("movie", "/media/movie.qml").unwrap());
//! ```

mod core;

pub use core::ViewDispatcher;
