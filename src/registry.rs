//! # Call Registry Module
//!
//! Resolves operation identifiers (`.appendView`, `.setHomeViewAsRoot`, ...)
//! to [`NavigationCall`] handles.
//!
//! The dispatcher only depends on the [`CallRegistry`] trait, so tests and
//! alternative bus bindings can substitute their own lookup. [`SharedRegistry`]
//! is the table the bus layer populates at startup and refreshes when the
//! service reappears.
//!
//! ## Concurrency
//!
//! Lookups happen from many dispatch coroutines at once. `SharedRegistry`
//! keeps its table behind an [`ArcSwap`], so a resolve is a lock-free snapshot
//! load; writers copy the table and swap it in.

use crate::call::NavigationCall;
use arc_swap::ArcSwap;
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

/// Why an identifier could not be resolved to a handle.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    /// Nothing is registered under the identifier
    #[error("no navigation call registered for '{identifier}'")]
    NotFound { identifier: String },
}

/// Lookup from operation identifier to remote call handle.
pub trait CallRegistry: Send + Sync {
    fn resolve(&self, identifier: &str) -> Result<Arc<dyn NavigationCall>, ResolveError>;
}

type CallTable = HashMap<String, Arc<dyn NavigationCall>>;

/// Identifier table shared between the bus layer (writer) and dispatchers (readers).
pub struct SharedRegistry {
    calls: ArcSwap<CallTable>,
}

impl Default for SharedRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl SharedRegistry {
    /// Create an empty registry. Every resolve fails until calls are registered.
    #[must_use]
    pub fn new() -> Self {
        Self {
            calls: ArcSwap::from_pointee(HashMap::new()),
        }
    }

    /// Register a handle under `identifier`, replacing any previous one.
    pub fn register(&self, identifier: &str, call: Arc<dyn NavigationCall>) {
        let mut replaced = false;
        self.calls.rcu(|current| {
            let mut next = CallTable::clone(current);
            replaced = next.insert(identifier.to_string(), Arc::clone(&call)).is_some();
            next
        });

        if replaced {
            warn!(
                identifier = %identifier,
                total_calls = self.len(),
                "Replaced existing navigation call"
            );
        } else {
            info!(
                identifier = %identifier,
                total_calls = self.len(),
                "Navigation call registered"
            );
        }
    }

    /// Remove the handle for `identifier`. Returns whether one was registered.
    pub fn unregister(&self, identifier: &str) -> bool {
        let mut removed = false;
        self.calls.rcu(|current| {
            let mut next = CallTable::clone(current);
            removed = next.remove(identifier).is_some();
            next
        });
        if removed {
            info!(identifier = %identifier, "Navigation call unregistered");
        }
        removed
    }

    /// Replace the whole table at once (service restart, reconnect).
    pub fn publish(&self, calls: CallTable) {
        info!(total_calls = calls.len(), "Navigation call table published");
        self.calls.store(Arc::new(calls));
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.calls.load().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Registered identifiers, sorted.
    #[must_use]
    pub fn identifiers(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.calls.load().keys().cloned().collect();
        ids.sort();
        ids
    }
}

impl CallRegistry for SharedRegistry {
    fn resolve(&self, identifier: &str) -> Result<Arc<dyn NavigationCall>, ResolveError> {
        self.calls
            .load()
            .get(identifier)
            .map(Arc::clone)
            .ok_or_else(|| ResolveError::NotFound {
                identifier: identifier.to_string(),
            })
    }
}
