//! Dispatcher core - resolve, invoke, classify, report.

use crate::call::NavigationCall;
use crate::config::{RootViewWiring, RuntimeConfig, DEFAULT_STACK_SIZE};
use crate::ids::DispatchId;
use crate::operation::Operation;
use crate::registry::CallRegistry;
use crate::report::{DispatchOutcome, Reporter};
use crate::view::{NavigationRequest, StaticView, View};
use may::coroutine;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info, warn};

/// Arguments for one remote invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Invocation {
    SetViewAsRoot(StaticView),
    SetDynamicViewAsRoot(String),
    AppendView { name: String, path: String },
}

impl Invocation {
    fn operation(&self) -> Operation {
        match self {
            Invocation::SetViewAsRoot(selector) => Operation::SetViewAsRoot(*selector),
            Invocation::SetDynamicViewAsRoot(_) => Operation::SetDynamicViewAsRoot,
            Invocation::AppendView { .. } => Operation::AppendView,
        }
    }
}

/// Fire-and-forget view dispatcher.
///
/// Every entry point returns as soon as a dispatch coroutine has been
/// spawned. The coroutine resolves the entry point's identifier, invokes the
/// handle and reports failures to the [`Reporter`]. Callers never see a
/// result; dispatches are not ordered relative to one another and cannot be
/// cancelled.
///
/// Cloning is cheap and shares the registry and reporter.
#[derive(Clone)]
pub struct ViewDispatcher {
    registry: Arc<dyn CallRegistry>,
    reporter: Arc<dyn Reporter>,
    stack_size: usize,
    wiring: RootViewWiring,
}

impl ViewDispatcher {
    /// Create a dispatcher with the default stack size and compatible wiring.
    pub fn new(registry: Arc<dyn CallRegistry>, reporter: Arc<dyn Reporter>) -> Self {
        Self {
            registry,
            reporter,
            stack_size: DEFAULT_STACK_SIZE,
            wiring: RootViewWiring::default(),
        }
    }

    /// Create a dispatcher using the stack size and wiring from `config`.
    pub fn with_config(
        registry: Arc<dyn CallRegistry>,
        reporter: Arc<dyn Reporter>,
        config: &RuntimeConfig,
    ) -> Self {
        Self::new(registry, reporter)
            .with_stack_size(config.stack_size)
            .with_wiring(config.wiring)
    }

    #[must_use]
    pub fn with_wiring(mut self, wiring: RootViewWiring) -> Self {
        self.wiring = wiring;
        self
    }

    #[must_use]
    pub fn with_stack_size(mut self, stack_size: usize) -> Self {
        self.stack_size = stack_size;
        self
    }

    #[must_use]
    pub fn wiring(&self) -> RootViewWiring {
        self.wiring
    }

    /// Ask the navigation surface to switch its root to a static view.
    pub fn request_static_view(&self, selector: StaticView) {
        self.spawn_dispatch(Invocation::SetViewAsRoot(selector));
    }

    /// Ask the navigation surface to switch its root to `view`.
    ///
    /// Only the view name is sent.
    pub fn request_dynamic_view(&self, view: View) {
        let (name, _path) = view.into_parts();
        self.spawn_dispatch(Invocation::SetDynamicViewAsRoot(name));
    }

    /// Ask the navigation surface to append `view` as a navigable entry.
    pub fn request_append_view(&self, view: View) {
        let (name, path) = view.into_parts();
        self.spawn_dispatch(Invocation::AppendView { name, path });
    }

    /// Route a tagged request to its entry point.
    pub fn submit(&self, request: NavigationRequest) {
        match request {
            NavigationRequest::Static(selector) => self.request_static_view(selector),
            NavigationRequest::Dynamic(view) => self.request_dynamic_view(view),
            NavigationRequest::Append(view) => self.request_append_view(view),
        }
    }

    fn spawn_dispatch(&self, invocation: Invocation) {
        let dispatch_id = DispatchId::new();
        let operation = invocation.operation();
        let registry = Arc::clone(&self.registry);
        let reporter = Arc::clone(&self.reporter);
        let wiring = self.wiring;

        // N0: Dispatch accepted
        debug!(
            dispatch_id = %dispatch_id,
            operation = %operation,
            stack_size = self.stack_size,
            "Dispatch accepted"
        );

        // SAFETY: may::coroutine::Builder::spawn() is marked unsafe by the may runtime
        // because coroutines must not hold thread-local references across yields.
        // The closure owns all of its data (Arc clones and owned strings) and
        // touches no thread-local state of its own.
        #[allow(unsafe_code)]
        let spawn_result = unsafe {
            coroutine::Builder::new()
                .stack_size(self.stack_size)
                .spawn(move || {
                    execute(
                        dispatch_id,
                        invocation,
                        registry.as_ref(),
                        reporter.as_ref(),
                        wiring,
                    );
                })
        };

        // The join handle is dropped: dispatches are never awaited.
        if let Err(e) = spawn_result {
            error!(
                dispatch_id = %dispatch_id,
                operation = %operation,
                error = %e,
                stack_size = self.stack_size,
                "Failed to spawn dispatch coroutine - request dropped"
            );
        }
    }
}

/// Run one dispatch to completion on the current coroutine or thread.
pub(crate) fn execute(
    dispatch_id: DispatchId,
    invocation: Invocation,
    registry: &dyn CallRegistry,
    reporter: &dyn Reporter,
    wiring: RootViewWiring,
) -> DispatchOutcome {
    let operation = invocation.operation();
    let identifier = operation.identifier();
    let start = Instant::now();

    // N1: Resolve
    debug!(
        dispatch_id = %dispatch_id,
        operation = %operation,
        identifier = %identifier,
        "Resolving navigation call"
    );

    let outcome = match registry.resolve(identifier) {
        Err(e) => {
            // N2: Resolution failed
            warn!(
                dispatch_id = %dispatch_id,
                identifier = %identifier,
                error = %e,
                "Navigation call resolution failed"
            );
            reporter.report_resolution_error(&operation.resolution_error_message(wiring));
            DispatchOutcome::ResolutionFailed
        }
        Ok(call) => {
            // N3: Invoke
            let reply = invoke(dispatch_id, call.as_ref(), &invocation, wiring);
            let outcome = classify(operation, reply);
            if outcome == DispatchOutcome::CallFailed {
                // N4: Call failed
                reporter.report_call_error(operation.qualified_name());
            }
            outcome
        }
    };

    // N5: Dispatch complete
    info!(
        dispatch_id = %dispatch_id,
        operation = %operation,
        outcome = %outcome,
        elapsed_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX),
        "Dispatch complete"
    );

    reporter.dispatch_finished(operation, outcome);
    outcome
}

/// What came back from one handle invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Reply {
    /// The operation has no reply
    NoReply,
    /// The handle answered with a success flag
    Flag(bool),
    /// The handle panicked before answering
    Panicked,
}

/// Confirmed operations succeed only on an explicit `true`; the others are
/// accepted once invoked.
fn classify(operation: Operation, reply: Reply) -> DispatchOutcome {
    let failed = match reply {
        Reply::Panicked => true,
        Reply::Flag(ok) => operation.is_confirmed() && !ok,
        Reply::NoReply => operation.is_confirmed(),
    };
    if failed {
        DispatchOutcome::CallFailed
    } else {
        DispatchOutcome::Accepted
    }
}

/// Invoke the handle, catching a panic so that it ends only this dispatch.
fn invoke(
    dispatch_id: DispatchId,
    call: &dyn NavigationCall,
    invocation: &Invocation,
    wiring: RootViewWiring,
) -> Reply {
    let result = catch_unwind(AssertUnwindSafe(|| match invocation {
        Invocation::SetViewAsRoot(selector) => {
            let target = wiring.invoked_view(*selector);
            if target != *selector {
                debug!(
                    dispatch_id = %dispatch_id,
                    selector = %selector,
                    remapped_to = %target,
                    wiring = %wiring,
                    "Static root view remapped"
                );
            }
            call.set_view_as_root(target);
            Reply::NoReply
        }
        Invocation::SetDynamicViewAsRoot(name) => {
            call.set_dynamic_view_as_root(name);
            Reply::NoReply
        }
        Invocation::AppendView { name, path } => Reply::Flag(call.append_view(name, path)),
    }));

    match result {
        Ok(reply) => reply,
        Err(panic) => {
            let panic_message = panic
                .downcast_ref::<&str>()
                .map(|s| (*s).to_string())
                .or_else(|| panic.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "non-string panic payload".to_string());
            error!(
                dispatch_id = %dispatch_id,
                operation = %invocation.operation(),
                panic_message = %panic_message,
                "Navigation call panicked - CRITICAL"
            );
            Reply::Panicked
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::SharedRegistry;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingCall {
        calls: Mutex<Vec<String>>,
        append_result: bool,
    }

    impl RecordingCall {
        fn accepting() -> Self {
            Self {
                append_result: true,
                ..Self::default()
            }
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    impl NavigationCall for RecordingCall {
        fn set_view_as_root(&self, view: StaticView) {
            self.calls.lock().unwrap().push(format!("root:{view}"));
        }
        fn set_dynamic_view_as_root(&self, view_name: &str) {
            self.calls.lock().unwrap().push(format!("dynamic:{view_name}"));
        }
        fn append_view(&self, view_name: &str, view_path: &str) -> bool {
            self.calls
                .lock()
                .unwrap()
                .push(format!("append:{view_name}:{view_path}"));
            self.append_result
        }
    }

    #[derive(Default)]
    struct RecordingReporter {
        events: Mutex<Vec<String>>,
    }

    impl Reporter for RecordingReporter {
        fn report_resolution_error(&self, message: &str) {
            self.events.lock().unwrap().push(format!("resolve:{message}"));
        }
        fn report_call_error(&self, operation_name: &str) {
            self.events.lock().unwrap().push(format!("call:{operation_name}"));
        }
        fn dispatch_finished(&self, operation: Operation, outcome: DispatchOutcome) {
            self.events
                .lock()
                .unwrap()
                .push(format!("done:{operation}:{outcome}"));
        }
    }

    fn registry_with(call: Arc<RecordingCall>) -> SharedRegistry {
        let registry = SharedRegistry::new();
        for op in Operation::all() {
            registry.register(op.identifier(), Arc::clone(&call) as Arc<dyn NavigationCall>);
        }
        registry
    }

    #[test]
    fn test_execute_resolution_failure_reports_once() {
        let registry = SharedRegistry::new();
        let reporter = RecordingReporter::default();
        let outcome = execute(
            DispatchId::new(),
            Invocation::AppendView {
                name: "movie".into(),
                path: "/m.qml".into(),
            },
            &registry,
            &reporter,
            RootViewWiring::Compatible,
        );
        assert_eq!(outcome, DispatchOutcome::ResolutionFailed);
        assert_eq!(
            *reporter.events.lock().unwrap(),
            vec![
                "resolve:Navigation.AppendView".to_string(),
                "done:Navigation.AppendView:resolution_failed".to_string(),
            ]
        );
    }

    #[test]
    fn test_execute_append_false_is_call_failure() {
        let call = Arc::new(RecordingCall::default());
        let registry = registry_with(Arc::clone(&call));
        let reporter = RecordingReporter::default();
        let outcome = execute(
            DispatchId::new(),
            Invocation::AppendView {
                name: "movie".into(),
                path: "/m.qml".into(),
            },
            &registry,
            &reporter,
            RootViewWiring::Compatible,
        );
        assert_eq!(outcome, DispatchOutcome::CallFailed);
        assert_eq!(call.calls(), vec!["append:movie:/m.qml".to_string()]);
        assert_eq!(
            reporter.events.lock().unwrap()[0],
            "call:Navigation.AppendView"
        );
    }

    #[test]
    fn test_execute_dynamic_is_accepted_without_report() {
        let call = Arc::new(RecordingCall::accepting());
        let registry = registry_with(Arc::clone(&call));
        let reporter = RecordingReporter::default();
        let outcome = execute(
            DispatchId::new(),
            Invocation::SetDynamicViewAsRoot(" calendar ".into()),
            &registry,
            &reporter,
            RootViewWiring::Compatible,
        );
        assert_eq!(outcome, DispatchOutcome::Accepted);
        assert_eq!(call.calls(), vec!["dynamic: calendar ".to_string()]);
        assert_eq!(reporter.events.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_execute_home_invokes_news_under_compatible_wiring() {
        let call = Arc::new(RecordingCall::accepting());
        let registry = registry_with(Arc::clone(&call));
        let reporter = RecordingReporter::default();
        for selector in [StaticView::Home, StaticView::Applications, StaticView::News] {
            execute(
                DispatchId::new(),
                Invocation::SetViewAsRoot(selector),
                &registry,
                &reporter,
                RootViewWiring::Compatible,
            );
        }
        assert_eq!(call.calls(), vec!["root:news"; 3]);
    }

    #[test]
    fn test_execute_home_invokes_home_under_corrected_wiring() {
        let call = Arc::new(RecordingCall::accepting());
        let registry = registry_with(Arc::clone(&call));
        let reporter = RecordingReporter::default();
        execute(
            DispatchId::new(),
            Invocation::SetViewAsRoot(StaticView::Home),
            &registry,
            &reporter,
            RootViewWiring::Corrected,
        );
        assert_eq!(call.calls(), vec!["root:home".to_string()]);
    }

    #[test]
    fn test_classify_follows_confirmation() {
        let root = Operation::SetViewAsRoot(StaticView::News);
        assert_eq!(classify(root, Reply::NoReply), DispatchOutcome::Accepted);
        assert_eq!(
            classify(Operation::SetDynamicViewAsRoot, Reply::NoReply),
            DispatchOutcome::Accepted
        );
        assert_eq!(
            classify(Operation::AppendView, Reply::Flag(true)),
            DispatchOutcome::Accepted
        );
        assert_eq!(
            classify(Operation::AppendView, Reply::Flag(false)),
            DispatchOutcome::CallFailed
        );
        // a confirmed operation that never answered did not succeed
        assert_eq!(
            classify(Operation::AppendView, Reply::NoReply),
            DispatchOutcome::CallFailed
        );
        for op in Operation::all() {
            assert_eq!(classify(op, Reply::Panicked), DispatchOutcome::CallFailed);
        }
    }

    struct PanickingCall;

    impl NavigationCall for PanickingCall {
        fn set_view_as_root(&self, _view: StaticView) {
            panic!("bus exploded");
        }
        fn set_dynamic_view_as_root(&self, _view_name: &str) {
            panic!("bus exploded");
        }
        fn append_view(&self, _view_name: &str, _view_path: &str) -> bool {
            panic!("bus exploded");
        }
    }

    #[test]
    fn test_execute_panicking_handle_is_call_failure() {
        let registry = SharedRegistry::new();
        registry.register(".setWeatherViewAsRoot", Arc::new(PanickingCall));
        let reporter = RecordingReporter::default();
        let outcome = execute(
            DispatchId::new(),
            Invocation::SetViewAsRoot(StaticView::Weather),
            &registry,
            &reporter,
            RootViewWiring::Compatible,
        );
        assert_eq!(outcome, DispatchOutcome::CallFailed);
        assert_eq!(
            *reporter.events.lock().unwrap(),
            vec![
                "call:Navigation.SetWeatherViewAsRoot".to_string(),
                "done:Navigation.SetWeatherViewAsRoot:call_failed".to_string(),
            ]
        );
    }
}
