//! # Loopback Bus Module
//!
//! An in-process stand-in for the navigation service. The surface runs in its
//! own coroutine and is driven over `may` channels the same way a remote
//! service is driven over the bus: fire-and-forget messages for root switches,
//! a reply channel for appends.
//!
//! The binary uses it to exercise the dispatcher end to end; tests use it to
//! observe what actually reached the "remote" side.
//!
//! ```rust,no_run
//! use navdispatch::dispatcher::ViewDispatcher;
//! use navdispatch::loopback::{register_all, NavigationSurface};
//! use navdispatch::registry::SharedRegistry;
//! use navdispatch::report::TracingReporter;
//! use std::sync::Arc;
//!
//! let surface = NavigationSurface::spawn().unwrap();
//! let registry = Arc::new(SharedRegistry::new());
//! register_all(&registry, Arc::new(surface.call()));
//! let dispatcher = ViewDispatcher::new(registry, Arc::new(TracingReporter));
//! ```

use crate::call::NavigationCall;
use crate::operation::Operation;
use crate::registry::SharedRegistry;
use crate::view::StaticView;
use may::coroutine;
use may::sync::mpsc;
use serde::Serialize;
use std::io;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// What the surface currently shows at its root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "name", rename_all = "lowercase")]
pub enum RootView {
    Static(StaticView),
    Dynamic(String),
}

/// One appended navigation entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavigationEntry {
    pub name: String,
    pub path: String,
}

/// Observable state of the surface.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SurfaceState {
    /// Current root view, if any switch has happened
    pub root: Option<RootView>,
    /// Total root switches received
    pub root_switches: u64,
    /// Appended entries, in arrival order
    pub entries: Vec<NavigationEntry>,
}

impl SurfaceState {
    fn append(&mut self, name: String, path: String) -> bool {
        if name.trim().is_empty() || self.entries.iter().any(|e| e.name == name) {
            return false;
        }
        self.entries.push(NavigationEntry { name, path });
        true
    }

    fn set_root(&mut self, root: RootView) {
        self.root = Some(root);
        self.root_switches += 1;
    }
}

/// Messages served by the surface coroutine.
pub enum SurfaceMessage {
    SetRoot(RootView),
    Append {
        name: String,
        path: String,
        reply_tx: mpsc::Sender<bool>,
    },
    Snapshot {
        reply_tx: mpsc::Sender<SurfaceState>,
    },
}

/// Handle to a running surface coroutine.
///
/// The coroutine exits once this handle and every [`LoopbackCall`] made
/// from it have been dropped.
pub struct NavigationSurface {
    tx: mpsc::Sender<SurfaceMessage>,
}

impl NavigationSurface {
    /// Spawn the surface coroutine.
    pub fn spawn() -> io::Result<Self> {
        let (tx, rx) = mpsc::channel::<SurfaceMessage>();

        // SAFETY: may::coroutine::Builder::spawn() is marked unsafe by the may runtime.
        // The coroutine owns its receiver and state and uses no thread-local storage.
        #[allow(unsafe_code)]
        let _handle = unsafe {
            coroutine::Builder::new()
                .name("navigation-surface".to_string())
                .spawn(move || {
                    debug!("Navigation surface start");
                    let mut state = SurfaceState::default();

                    for msg in rx.iter() {
                        match msg {
                            SurfaceMessage::SetRoot(root) => {
                                info!(root = ?root, "Surface root view switched");
                                state.set_root(root);
                            }
                            SurfaceMessage::Append {
                                name,
                                path,
                                reply_tx,
                            } => {
                                let accepted = state.append(name.clone(), path);
                                info!(
                                    name = %name,
                                    accepted = accepted,
                                    total_entries = state.entries.len(),
                                    "Surface append"
                                );
                                if reply_tx.send(accepted).is_err() {
                                    warn!(name = %name, "Append reply dropped - caller gone");
                                }
                            }
                            SurfaceMessage::Snapshot { reply_tx } => {
                                // caller may have stopped waiting
                                let _ = reply_tx.send(state.clone());
                            }
                        }
                    }

                    debug!("Navigation surface exit");
                })?
        };

        Ok(Self { tx })
    }

    /// A call handle bound to this surface.
    #[must_use]
    pub fn call(&self) -> LoopbackCall {
        LoopbackCall {
            tx: self.tx.clone(),
        }
    }

    /// Current state, or `None` if the surface coroutine is gone.
    ///
    /// Messages are served in order, so a snapshot reflects every message
    /// sent before it.
    #[must_use]
    pub fn snapshot(&self) -> Option<SurfaceState> {
        let (reply_tx, reply_rx) = mpsc::channel();
        self.tx.send(SurfaceMessage::Snapshot { reply_tx }).ok()?;
        reply_rx.recv().ok()
    }
}

/// [`NavigationCall`] that forwards to a [`NavigationSurface`].
#[derive(Clone)]
pub struct LoopbackCall {
    tx: mpsc::Sender<SurfaceMessage>,
}

impl LoopbackCall {
    fn send(&self, msg: SurfaceMessage) -> bool {
        match self.tx.send(msg) {
            Ok(()) => true,
            Err(e) => {
                warn!(error = %e, "Navigation surface is gone - message dropped");
                false
            }
        }
    }
}

impl NavigationCall for LoopbackCall {
    fn set_view_as_root(&self, view: StaticView) {
        self.send(SurfaceMessage::SetRoot(RootView::Static(view)));
    }

    fn set_dynamic_view_as_root(&self, view_name: &str) {
        self.send(SurfaceMessage::SetRoot(RootView::Dynamic(
            view_name.to_string(),
        )));
    }

    fn append_view(&self, view_name: &str, view_path: &str) -> bool {
        let (reply_tx, reply_rx) = mpsc::channel();
        let sent = self.send(SurfaceMessage::Append {
            name: view_name.to_string(),
            path: view_path.to_string(),
            reply_tx,
        });
        sent && reply_rx.recv().unwrap_or(false)
    }
}

/// Register `call` under every operation identifier.
pub fn register_all(registry: &SharedRegistry, call: Arc<dyn NavigationCall>) {
    for op in Operation::all() {
        registry.register(op.identifier(), Arc::clone(&call));
    }
}
