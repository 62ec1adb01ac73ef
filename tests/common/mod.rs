#![allow(dead_code, clippy::unwrap_used, clippy::expect_used)]

pub mod runtime {
    use std::sync::Once;

    /// Ensures May coroutines are configured only once
    static MAY_INIT: Once = Once::new();

    pub fn setup_may_runtime() {
        MAY_INIT.call_once(|| {
            may::config().set_workers(4);
            may::config().set_stack_size(0x8000);
        });
    }
}

pub mod fakes {
    use navdispatch::call::NavigationCall;
    use navdispatch::operation::Operation;
    use navdispatch::registry::{CallRegistry, ResolveError};
    use navdispatch::report::{DispatchOutcome, Reporter};
    use navdispatch::view::StaticView;
    use parking_lot::Mutex;
    use std::collections::HashMap;
    use std::sync::mpsc;
    use std::sync::Arc;
    use std::time::Duration;

    pub const WAIT: Duration = Duration::from_secs(5);

    /// What reached the fake remote side.
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub enum Invoked {
        Root(StaticView),
        Dynamic(String),
        Append(String, String),
    }

    /// Navigation call that records invocations.
    ///
    /// Appends answer `true` unless the name starts with `"reject"`. A gated
    /// call blocks every invocation until [`RecordingCall::release`] hands out
    /// a token.
    pub struct RecordingCall {
        invoked: Mutex<Vec<Invoked>>,
        gate: Option<std::sync::Mutex<mpsc::Receiver<()>>>,
        gate_tx: Option<Mutex<mpsc::Sender<()>>>,
    }

    impl RecordingCall {
        pub fn new() -> Arc<Self> {
            Arc::new(Self {
                invoked: Mutex::new(Vec::new()),
                gate: None,
                gate_tx: None,
            })
        }

        pub fn gated() -> Arc<Self> {
            let (tx, rx) = mpsc::channel();
            Arc::new(Self {
                invoked: Mutex::new(Vec::new()),
                gate: Some(std::sync::Mutex::new(rx)),
                gate_tx: Some(Mutex::new(tx)),
            })
        }

        pub fn release(&self, count: usize) {
            if let Some(tx) = &self.gate_tx {
                let tx = tx.lock();
                for _ in 0..count {
                    tx.send(()).unwrap();
                }
            }
        }

        pub fn invoked(&self) -> Vec<Invoked> {
            self.invoked.lock().clone()
        }

        fn pass_gate(&self) {
            if let Some(gate) = &self.gate {
                gate.lock().unwrap().recv_timeout(WAIT).expect("gate released");
            }
        }
    }

    impl NavigationCall for RecordingCall {
        fn set_view_as_root(&self, view: StaticView) {
            self.pass_gate();
            self.invoked.lock().push(Invoked::Root(view));
        }

        fn set_dynamic_view_as_root(&self, view_name: &str) {
            self.pass_gate();
            self.invoked.lock().push(Invoked::Dynamic(view_name.to_string()));
        }

        fn append_view(&self, view_name: &str, view_path: &str) -> bool {
            self.pass_gate();
            self.invoked
                .lock()
                .push(Invoked::Append(view_name.to_string(), view_path.to_string()));
            !view_name.starts_with("reject")
        }
    }

    /// Registry over a fixed table that also records every lookup.
    pub struct FakeRegistry {
        calls: HashMap<String, Arc<dyn NavigationCall>>,
        lookups: Mutex<Vec<String>>,
    }

    impl FakeRegistry {
        /// Every operation resolves to `call` except the identifiers in `missing`.
        pub fn with_all_except(call: Arc<RecordingCall>, missing: &[&str]) -> Arc<Self> {
            let calls = Operation::all()
                .into_iter()
                .map(Operation::identifier)
                .filter(|id| !missing.contains(id))
                .map(|id| (id.to_string(), Arc::clone(&call) as Arc<dyn NavigationCall>))
                .collect();
            Arc::new(Self {
                calls,
                lookups: Mutex::new(Vec::new()),
            })
        }

        pub fn with_all(call: Arc<RecordingCall>) -> Arc<Self> {
            Self::with_all_except(call, &[])
        }

        pub fn lookups(&self) -> Vec<String> {
            self.lookups.lock().clone()
        }
    }

    impl CallRegistry for FakeRegistry {
        fn resolve(&self, identifier: &str) -> Result<Arc<dyn NavigationCall>, ResolveError> {
            self.lookups.lock().push(identifier.to_string());
            self.calls
                .get(identifier)
                .map(Arc::clone)
                .ok_or_else(|| ResolveError::NotFound {
                    identifier: identifier.to_string(),
                })
        }
    }

    #[derive(Debug, Clone, PartialEq, Eq)]
    pub enum Report {
        Resolution(String),
        Call(String),
    }

    /// Reporter that keeps every report and signals finished dispatches.
    pub struct RecordingReporter {
        reports: Mutex<Vec<Report>>,
        finished_tx: Mutex<mpsc::Sender<(Operation, DispatchOutcome)>>,
        finished_rx: Mutex<mpsc::Receiver<(Operation, DispatchOutcome)>>,
    }

    impl RecordingReporter {
        pub fn new() -> Arc<Self> {
            let (tx, rx) = mpsc::channel();
            Arc::new(Self {
                reports: Mutex::new(Vec::new()),
                finished_tx: Mutex::new(tx),
                finished_rx: Mutex::new(rx),
            })
        }

        pub fn reports(&self) -> Vec<Report> {
            self.reports.lock().clone()
        }

        /// Wait for `count` dispatches to finish and return their outcomes.
        pub fn wait_for(&self, count: usize) -> Vec<(Operation, DispatchOutcome)> {
            let rx = self.finished_rx.lock();
            (0..count)
                .map(|i| {
                    rx.recv_timeout(WAIT)
                        .unwrap_or_else(|_| panic!("dispatch {} of {count} never finished", i + 1))
                })
                .collect()
        }

        /// Number of dispatches that finished so far, without waiting.
        pub fn finished_now(&self) -> usize {
            self.finished_rx.lock().try_iter().count()
        }
    }

    impl Reporter for RecordingReporter {
        fn report_resolution_error(&self, message: &str) {
            self.reports.lock().push(Report::Resolution(message.to_string()));
        }

        fn report_call_error(&self, operation_name: &str) {
            self.reports.lock().push(Report::Call(operation_name.to_string()));
        }

        fn dispatch_finished(&self, operation: Operation, outcome: DispatchOutcome) {
            self.finished_tx.lock().send((operation, outcome)).unwrap();
        }
    }
}
