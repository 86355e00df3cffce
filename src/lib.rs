// src/lib.rs

pub mod cli;
pub mod config;
pub mod engine;
pub mod errors;
pub mod exec;
pub mod fs;
pub mod logging;
pub mod materialize;
pub mod shutdown;
pub mod supervisor;
pub mod types;

use tokio::sync::mpsc;
use tracing::info;

use crate::cli::CliArgs;
use crate::config::{config_root_dir, default_config_path, load_and_validate, LaunchPlan};
use crate::engine::{CoreSupervisor, Runtime, SupervisorEvent, SupervisorExit};
use crate::errors::Result;
use crate::exec::{ProcessBackend, RealProcessBackend};
use crate::fs::{FileSystem, RealFileSystem};
use crate::materialize::materialize;
use crate::shutdown::spawn_signal_listener;
use crate::supervisor::preflight;

/// Exit status for errors other than a failed precondition.
pub const EXIT_FAILURE: i32 = 1;
/// Exit status when a service's working directory or dependencies are
/// missing; no service has been started.
pub const EXIT_PRECONDITION: i32 = 2;

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - config loading
/// - signal handling
/// - the real process backend
/// - [`supervise`]
pub async fn run(args: CliArgs) -> Result<SupervisorExit> {
    let config_path = default_config_path();
    let cfg = load_and_validate(&config_path)?;
    let root = config_root_dir(&config_path);
    let plan = cfg.launch_plan(args.mode, &root);

    info!(
        mode = ?args.mode,
        config = %config_path.display(),
        services = plan.descriptors.len(),
        "starting all services"
    );

    let (tx, rx) = mpsc::channel::<SupervisorEvent>(64);

    // Installed before anything is spawned so no signal is missed.
    let _signal_listener = spawn_signal_listener(tx.clone())?;

    let backend = RealProcessBackend::new(tx, plan.output);
    supervise(&RealFileSystem, plan, backend, rx).await
}

/// Stage config, check preconditions, launch every service and supervise
/// them until shutdown or until all of them have stopped.
///
/// A failed precondition returns `PreconditionFailed` before the backend is
/// asked to spawn anything.
pub async fn supervise<B: ProcessBackend>(
    fs: &dyn FileSystem,
    plan: LaunchPlan,
    backend: B,
    event_rx: mpsc::Receiver<SupervisorEvent>,
) -> Result<SupervisorExit> {
    materialize(fs, &plan.env_dir, &plan.targets);
    preflight(fs, &plan.descriptors)?;

    let core = CoreSupervisor::new(plan.descriptors);
    Runtime::new(core, event_rx, backend).run().await
}
