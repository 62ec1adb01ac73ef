//! Dispatch outcomes and the reporting sink they are handed to.
//!
//! Nothing a dispatch learns travels back to its caller. Failures are
//! reported here, by side effect only:
//!
//! - [`DispatchOutcome::ResolutionFailed`] → [`Reporter::report_resolution_error`]
//! - [`DispatchOutcome::CallFailed`] → [`Reporter::report_call_error`]
//! - [`DispatchOutcome::Accepted`] → no report
//!
//! Every dispatch, whatever its outcome, ends with exactly one
//! [`Reporter::dispatch_finished`] call.

use crate::operation::Operation;
use may::sync::mpsc;
use serde::Serialize;
use std::fmt::{Display, Formatter};
use tracing::error;

/// Classification of a single dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DispatchOutcome {
    /// The operation identifier did not resolve to a handle
    ResolutionFailed,
    /// The handle was invoked and did not confirm success, or panicked
    CallFailed,
    /// Resolved and invoked; for unconfirmed operations this is assumed success
    Accepted,
}

impl DispatchOutcome {
    #[must_use]
    pub const fn is_failure(self) -> bool {
        !matches!(self, DispatchOutcome::Accepted)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            DispatchOutcome::ResolutionFailed => "resolution_failed",
            DispatchOutcome::CallFailed => "call_failed",
            DispatchOutcome::Accepted => "accepted",
        }
    }
}

impl Display for DispatchOutcome {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error-reporting sink.
///
/// Called from dispatch coroutines concurrently. Implementations must not
/// block for long and must not fail.
pub trait Reporter: Send + Sync {
    /// The operation's identifier could not be resolved.
    fn report_resolution_error(&self, message: &str);

    /// The operation was invoked and signalled failure.
    fn report_call_error(&self, operation_name: &str);

    /// Final outcome of one dispatch. Called after any report above.
    fn dispatch_finished(&self, _operation: Operation, _outcome: DispatchOutcome) {}
}

/// Default sink: turns reports into `error!` events.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingReporter;

impl Reporter for TracingReporter {
    fn report_resolution_error(&self, message: &str) {
        error!(kind = "resolution", message = %message, "Navigation call could not be resolved");
    }

    fn report_call_error(&self, operation_name: &str) {
        error!(kind = "reply", operation = %operation_name, "Navigation call signalled failure");
    }
}

/// Wraps another reporter and forwards every finished dispatch to a channel.
///
/// Lets a front end wait until its dispatches have run without the
/// dispatcher itself ever returning a handle.
pub struct ChannelReporter<R> {
    inner: R,
    tx: mpsc::Sender<(Operation, DispatchOutcome)>,
}

impl<R: Reporter> ChannelReporter<R> {
    pub fn new(inner: R) -> (Self, mpsc::Receiver<(Operation, DispatchOutcome)>) {
        let (tx, rx) = mpsc::channel();
        (Self { inner, tx }, rx)
    }
}

impl<R: Reporter> Reporter for ChannelReporter<R> {
    fn report_resolution_error(&self, message: &str) {
        self.inner.report_resolution_error(message);
    }

    fn report_call_error(&self, operation_name: &str) {
        self.inner.report_call_error(operation_name);
    }

    fn dispatch_finished(&self, operation: Operation, outcome: DispatchOutcome) {
        self.inner.dispatch_finished(operation, outcome);
        // receiver gone means nobody is waiting any more
        let _ = self.tx.send((operation, outcome));
    }
}
