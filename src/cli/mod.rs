//! # CLI Module
//!
//! Command-line front end that drives a [`ViewDispatcher`](crate::dispatcher::ViewDispatcher)
//! against the in-process [loopback surface](crate::loopback).
//!
//! ## Commands
//!
//! ```bash
//! navdispatch views                          # static views and their identifiers
//! navdispatch static weather                 # switch root to a static view
//! navdispatch dynamic calendar               # switch root to a named view
//! navdispatch append movie /media/movie.qml  # append a navigable entry
//! navdispatch batch --file requests.jsonl    # dispatch many requests concurrently
//! ```
//!
//! ## Global options
//!
//! - `--wiring compatible|corrected` - static root-view mapping
//! - `--unregister <IDENTIFIER>` - drop an identifier from the registry first,
//!   to see how resolution failures are reported
//! - `--timeout-ms <MS>` - how long to wait for dispatches to finish
//!
//! Dispatching commands print a JSON summary (failures and final surface
//! state) on stdout and exit with status 1 if any dispatch failed.

mod commands;


pub use commands::{
    load_batch, run, run_cli, Cli, CommandOutput, Commands, FailedDispatch, RunSummary, ViewRow,
};
