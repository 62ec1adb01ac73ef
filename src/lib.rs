//! # navdispatch
//!
//! **navdispatch** turns in-process "switch the active view" requests into
//! remote calls against a navigation service reachable over an inter-process
//! bus, without ever making the caller wait for the bus.
//!
//! ## Overview
//!
//! A caller asks for a view transition through one of three entry points on
//! [`ViewDispatcher`]. Each entry point spawns a `may` coroutine and returns.
//! The coroutine looks the operation up in a [`CallRegistry`] by its fixed
//! string identifier, invokes the resolved [`NavigationCall`] handle, and
//! reports anything that went wrong to a [`Reporter`].
//!
//! ## Architecture
//!
//! - **[`view`]** - `View`, `StaticView` and tagged `NavigationRequest`s
//! - **[`operation`]** - one `Operation` per entry point, with its registry identifier
//! - **[`call`]** - the `NavigationCall` handle trait consumed from the bus layer
//! - **[`registry`]** - `CallRegistry` lookup trait and the `ArcSwap`-backed `SharedRegistry`
//! - **[`dispatcher`]** - the fire-and-forget `ViewDispatcher`
//! - **[`report`]** - `DispatchOutcome` classification and reporting sinks
//! - **[`config`]** - environment configuration and root-view wiring
//! - **[`logging`]** - `tracing-subscriber` setup
//! - **[`loopback`]** - in-process navigation surface for the CLI and tests
//! - **[`cli`]** - the `navdispatch` command-line front end
//!
//! ### Dispatch Flow
//!
//! ```mermaid
//! sequenceDiagram
//!     participant Caller
//!     participant Dispatcher as ViewDispatcher
//!     participant Coroutine as Dispatch coroutine
//!     participant Registry as CallRegistry
//!     participant Handle as NavigationCall
//!     participant Sink as Reporter
//!
//!     Caller->>Dispatcher: request_append_view(view)
//!     Dispatcher->>Coroutine: spawn
//!     Dispatcher-->>Caller: return ()
//!     Coroutine->>Registry: resolve(".appendView")
//!     alt not found
//!         Coroutine->>Sink: report_resolution_error("Navigation.AppendView")
//!     else resolved
//!         Coroutine->>Handle: append_view(name, path)
//!         Handle-->>Coroutine: bool
//!         alt false
//!             Coroutine->>Sink: report_call_error("Navigation.AppendView")
//!         end
//!     end
//!     Coroutine->>Sink: dispatch_finished(op, outcome)
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use navdispatch::config::RuntimeConfig;
//! use navdispatch::dispatcher::ViewDispatcher;
//! use navdispatch::loopback::{register_all, NavigationSurface};
//! use navdispatch::registry::SharedRegistry;
//! use navdispatch::report::TracingReporter;
//! use navdispatch::view::{StaticView, View};
//! use std::sync::Arc;
//!
//! fn main() -> anyhow::Result<()> {
//!     navdispatch::logging::init_logging()?;
//!     let config = RuntimeConfig::from_env();
//!     config.apply();
//!
//!     let surface = NavigationSurface::spawn()?;
//!     let registry = Arc::new(SharedRegistry::new());
//!     register_all(&registry, Arc::new(surface.call()));
//!
//!     let dispatcher = ViewDispatcher::with_config(registry, Arc::new(TracingReporter), &config);
//!     dispatcher.request_static_view(StaticView::Weather);
//!     dispatcher.request_dynamic_view(View::named("calendar")?);
//!     Ok(())
//! }
//! ```

pub mod call;
pub mod cli;
pub mod config;
pub mod dispatcher;
pub mod ids;
pub mod logging;
pub mod loopback;
pub mod operation;
pub mod registry;
pub mod report;
pub mod view;

pub use call::NavigationCall;
pub use config::{RootViewWiring, RuntimeConfig};
pub use dispatcher::ViewDispatcher;
pub use operation::Operation;
pub use registry::{CallRegistry, ResolveError, SharedRegistry};
pub use report::{DispatchOutcome, Reporter, TracingReporter};
pub use view::{NavigationRequest, StaticView, View, ViewError};
