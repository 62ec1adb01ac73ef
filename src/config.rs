//! # Runtime Configuration Module
//!
//! Environment variable-based configuration for the dispatcher and the `may`
//! coroutine runtime it spawns onto.
//!
//! ## Environment Variables
//!
//! ### `NAVD_STACK_SIZE`
//!
//! Stack size for dispatch coroutines. Accepts decimal (`16384`) or
//! hexadecimal (`0x4000`). Default: `0x4000` (16 KB).
//!
//! A dispatch coroutine only resolves one handle and makes one call, so the
//! default is plenty unless the bus binding itself recurses deeply.
//!
//! ### `NAVD_WORKERS`
//!
//! Number of `may` worker threads. Unset leaves the runtime default in place.
//!
//! ### `NAVD_ROOT_VIEW_WIRING`
//!
//! `compatible` (default) or `corrected`; see [`RootViewWiring`].
//!
//! ## Usage
//!
//! ```rust
//! use navdispatch::config::RuntimeConfig;
//!
//! let config = RuntimeConfig::from_env();
//! config.apply();
//! println!("Stack size: {} bytes", config.stack_size);
//! ```

use crate::view::StaticView;
use serde::Serialize;
use std::env;
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use thiserror::Error;
use tracing::warn;

/// Default coroutine stack size (16 KB)
pub const DEFAULT_STACK_SIZE: usize = 0x4000;

/// Configuration errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("unknown root view wiring '{0}' (expected 'compatible' or 'corrected')")]
    UnknownWiring(String),
    #[error("invalid stack size '{0}'")]
    InvalidStackSize(String),
}

/// How static root-view selectors map onto remote root switches.
///
/// Deployed navigation clients switch to the news view when asked for the
/// home or applications view. `Compatible` keeps that mapping so behaviour
/// matches existing installations; `Corrected` sends every selector to its
/// own view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RootViewWiring {
    #[default]
    Compatible,
    Corrected,
}

impl RootViewWiring {
    /// The root view actually requested from the service for `selector`.
    #[must_use]
    pub const fn invoked_view(self, selector: StaticView) -> StaticView {
        match (self, selector) {
            (RootViewWiring::Compatible, StaticView::Home | StaticView::Applications) => {
                StaticView::News
            }
            (_, selector) => selector,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            RootViewWiring::Compatible => "compatible",
            RootViewWiring::Corrected => "corrected",
        }
    }
}

impl Display for RootViewWiring {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RootViewWiring {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "compatible" | "compat" => Ok(RootViewWiring::Compatible),
            "corrected" | "fixed" => Ok(RootViewWiring::Corrected),
            _ => Err(ConfigError::UnknownWiring(s.to_string())),
        }
    }
}

/// Parse a stack size given in decimal or `0x`-prefixed hexadecimal.
pub fn parse_stack_size(val: &str) -> Result<usize, ConfigError> {
    let parsed = if let Some(hex) = val.strip_prefix("0x") {
        usize::from_str_radix(hex, 16).ok()
    } else {
        val.parse().ok()
    };
    match parsed {
        Some(size) if size > 0 => Ok(size),
        _ => Err(ConfigError::InvalidStackSize(val.to_string())),
    }
}

/// Runtime configuration loaded from environment variables.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuntimeConfig {
    /// Stack size for dispatch coroutines in bytes
    pub stack_size: usize,
    /// `may` worker threads; `None` keeps the runtime default
    pub workers: Option<usize>,
    /// Static root-view mapping
    pub wiring: RootViewWiring,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            stack_size: DEFAULT_STACK_SIZE,
            workers: None,
            wiring: RootViewWiring::Compatible,
        }
    }
}

impl RuntimeConfig {
    /// Load configuration from environment variables.
    ///
    /// Invalid values are logged and replaced with defaults.
    #[must_use]
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let stack_size = match env::var("NAVD_STACK_SIZE") {
            Ok(val) => parse_stack_size(&val).unwrap_or_else(|e| {
                warn!(error = %e, default = defaults.stack_size, "Ignoring NAVD_STACK_SIZE");
                defaults.stack_size
            }),
            Err(_) => defaults.stack_size,
        };

        let workers = env::var("NAVD_WORKERS")
            .ok()
            .and_then(|s| match s.parse::<usize>() {
                Ok(n) if n > 0 => Some(n),
                _ => {
                    warn!(value = %s, "Ignoring NAVD_WORKERS");
                    None
                }
            });

        let wiring = match env::var("NAVD_ROOT_VIEW_WIRING") {
            Ok(val) => val.parse().unwrap_or_else(|e: ConfigError| {
                warn!(error = %e, default = %defaults.wiring, "Ignoring NAVD_ROOT_VIEW_WIRING");
                defaults.wiring
            }),
            Err(_) => defaults.wiring,
        };

        RuntimeConfig {
            stack_size,
            workers,
            wiring,
        }
    }

    /// Configure the global `may` runtime. Call once, before the first dispatch.
    pub fn apply(&self) {
        let cfg = may::config();
        cfg.set_stack_size(self.stack_size);
        if let Some(workers) = self.workers {
            cfg.set_workers(workers);
        }
    }
}
