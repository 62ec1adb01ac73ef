use crate::config::{RootViewWiring, RuntimeConfig};
use crate::dispatcher::ViewDispatcher;
use crate::loopback::{register_all, NavigationSurface, SurfaceState};
use crate::operation::Operation;
use crate::registry::SharedRegistry;
use crate::report::{ChannelReporter, DispatchOutcome, TracingReporter};
use crate::view::{NavigationRequest, StaticView, View};
use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::info;

/// Command-line front end for the view dispatcher
///
/// Dispatches requests against an in-process navigation surface and prints
/// the resulting surface state as JSON.
#[derive(Parser)]
#[command(name = "navdispatch")]
#[command(about = "Dispatch navigation view requests", long_about = None)]
pub struct Cli {
    /// Static root-view wiring (overrides NAVD_ROOT_VIEW_WIRING)
    #[arg(long, global = true)]
    pub wiring: Option<RootViewWiring>,

    /// Remove an identifier from the registry before dispatching (repeatable)
    #[arg(long = "unregister", value_name = "IDENTIFIER", global = true)]
    pub unregister: Vec<String>,

    /// How long to wait for dispatches to finish
    #[arg(long, default_value_t = 5000, global = true)]
    pub timeout_ms: u64,

    /// The subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand)]
pub enum Commands {
    /// List static views, their identifiers and the root view each one switches to
    Views,
    /// Switch the root to a static view
    Static {
        /// home, news, media, notes, traffic, weather, sensor, reddit or applications
        view: StaticView,
    },
    /// Switch the root to a dynamically named view
    Dynamic {
        /// View name, passed through verbatim
        name: String,
    },
    /// Append a navigable entry
    Append {
        /// View name
        name: String,
        /// Resource path for the view
        path: String,
    },
    /// Dispatch every request in a JSON-lines file concurrently
    Batch {
        /// File with one NavigationRequest JSON object per line
        #[arg(short, long)]
        file: PathBuf,
    },
}

/// One line of `views` output.
#[derive(Debug, Serialize)]
pub struct ViewRow {
    pub view: StaticView,
    pub identifier: &'static str,
    pub switches_to: StaticView,
}

/// A dispatch that did not end in `Accepted`.
#[derive(Debug, Serialize)]
pub struct FailedDispatch {
    pub operation: &'static str,
    pub outcome: DispatchOutcome,
}

/// Result of a dispatching command.
#[derive(Debug, Serialize)]
pub struct RunSummary {
    pub wiring: RootViewWiring,
    pub dispatched: usize,
    pub failures: Vec<FailedDispatch>,
    pub surface: SurfaceState,
}

impl RunSummary {
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }
}

/// What a command produced.
#[derive(Debug)]
pub enum CommandOutput {
    Views(Vec<ViewRow>),
    Dispatch(RunSummary),
}

impl CommandOutput {
    #[must_use]
    pub fn is_success(&self) -> bool {
        match self {
            CommandOutput::Views(_) => true,
            CommandOutput::Dispatch(summary) => summary.is_success(),
        }
    }

    /// Pretty JSON rendering printed by the binary.
    pub fn to_json(&self) -> anyhow::Result<String> {
        let json = match self {
            CommandOutput::Views(rows) => serde_json::to_string_pretty(rows)?,
            CommandOutput::Dispatch(summary) => serde_json::to_string_pretty(summary)?,
        };
        Ok(json)
    }
}

/// Parse the process arguments and run.
pub fn run_cli() -> anyhow::Result<CommandOutput> {
    run(Cli::parse())
}

/// Run an already-parsed command line.
pub fn run(cli: Cli) -> anyhow::Result<CommandOutput> {
    let mut config = RuntimeConfig::from_env();
    if let Some(wiring) = cli.wiring {
        config.wiring = wiring;
    }

    let requests = match &cli.command {
        Commands::Views => return Ok(CommandOutput::Views(view_rows(config.wiring))),
        Commands::Static { view } => vec![NavigationRequest::Static(*view)],
        Commands::Dynamic { name } => vec![NavigationRequest::Dynamic(View::named(name.as_str())?)],
        Commands::Append { name, path } => {
            vec![NavigationRequest::Append(View::new(name.as_str(), path.as_str())?)]
        }
        Commands::Batch { file } => load_batch(file)?,
    };

    config.apply();
    let summary = dispatch_all(
        &config,
        &cli.unregister,
        requests,
        Duration::from_millis(cli.timeout_ms),
    )?;
    Ok(CommandOutput::Dispatch(summary))
}

fn view_rows(wiring: RootViewWiring) -> Vec<ViewRow> {
    StaticView::ALL
        .into_iter()
        .map(|view| ViewRow {
            view,
            identifier: Operation::SetViewAsRoot(view).identifier(),
            switches_to: wiring.invoked_view(view),
        })
        .collect()
}

/// Read `NavigationRequest`s from a JSON-lines file. Blank lines and lines
/// starting with `#` are skipped.
pub fn load_batch(path: &Path) -> anyhow::Result<Vec<NavigationRequest>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read batch file {}", path.display()))?;

    let mut requests = Vec::new();
    for (idx, line) in content.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let request: NavigationRequest = serde_json::from_str(line)
            .with_context(|| format!("{}:{}: invalid request", path.display(), idx + 1))?;
        requests.push(request);
    }
    Ok(requests)
}

fn dispatch_all(
    config: &RuntimeConfig,
    unregister: &[String],
    requests: Vec<NavigationRequest>,
    timeout: Duration,
) -> anyhow::Result<RunSummary> {
    let surface = NavigationSurface::spawn().context("Failed to start navigation surface")?;
    let registry = Arc::new(SharedRegistry::new());
    register_all(&registry, Arc::new(surface.call()));
    for identifier in unregister {
        if !registry.unregister(identifier) {
            bail!("'{identifier}' is not a registered identifier");
        }
    }

    let (reporter, outcomes) = ChannelReporter::new(TracingReporter);
    let dispatcher = ViewDispatcher::with_config(registry, Arc::new(reporter), config);

    let dispatched = requests.len();
    info!(dispatched = dispatched, wiring = %config.wiring, "Dispatching requests");
    for request in requests {
        dispatcher.submit(request);
    }

    let deadline = Instant::now() + timeout;
    let mut failures = Vec::new();
    for finished in 0..dispatched {
        let remaining = deadline.saturating_duration_since(Instant::now());
        let (operation, outcome) = outcomes.recv_timeout(remaining).map_err(|_| {
            anyhow::anyhow!(
                "{} of {} dispatches still pending after {} ms",
                dispatched - finished,
                dispatched,
                timeout.as_millis()
            )
        })?;
        if outcome.is_failure() {
            failures.push(FailedDispatch {
                operation: operation.qualified_name(),
                outcome,
            });
        }
    }

    let surface = surface
        .snapshot()
        .context("Navigation surface stopped before it could be inspected")?;

    Ok(RunSummary {
        wiring: config.wiring,
        dispatched,
        failures,
        surface,
    })
}
