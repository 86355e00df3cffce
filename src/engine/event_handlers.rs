// src/engine/event_handlers.rs

//! Event handling logic for the core supervisor.

use tracing::{debug, error, info, warn};

use crate::engine::registry::{FailureReason, ProcessId, ProcessRegistry, ProcessState};
use crate::engine::ExitReason;
use crate::shutdown::ShutdownSignal;

/// Command produced by the pure core, to be executed by the outer IO shell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoreCommand {
    /// Deliver `signal` to the child with `pid`.
    ForwardSignal {
        id: ProcessId,
        pid: u32,
        signal: ShutdownSignal,
    },
    /// Stop the supervisor.
    RequestExit(ExitReason),
}

/// Decision returned by the core after handling a single `SupervisorEvent`.
#[derive(Debug, Clone)]
pub struct CoreStep {
    /// Commands the IO shell should execute.
    pub commands: Vec<CoreCommand>,
    /// Whether the outer runtime loop should keep running.
    pub keep_running: bool,
}

impl CoreStep {
    fn keep_running() -> Self {
        Self {
            commands: Vec::new(),
            keep_running: true,
        }
    }
}

/// The OS accepted the spawn request: `Starting → Running`.
pub fn handle_spawned(registry: &mut ProcessRegistry, id: ProcessId, pid: u32) -> CoreStep {
    let Some(process) = registry.get_mut(id) else {
        warn!(process = %id, "spawn reported for unknown process");
        return CoreStep::keep_running();
    };

    process.set_pid(pid);
    if process.transition(ProcessState::Running) {
        info!(service = %process.descriptor().tag, pid, "service started");
    }
    CoreStep::keep_running()
}

/// Spawn failed: only this service is affected.
pub fn handle_spawn_failed(
    registry: &mut ProcessRegistry,
    id: ProcessId,
    reason: String,
) -> CoreStep {
    let Some(process) = registry.get_mut(id) else {
        warn!(process = %id, "spawn failure reported for unknown process");
        return CoreStep::keep_running();
    };

    error!(
        service = %process.descriptor().tag,
        command = %process.descriptor().command_line(),
        error = %reason,
        "failed to start service"
    );
    process.transition(ProcessState::Failed(FailureReason::SpawnFailure(reason)));
    finish_if_all_stopped(registry)
}

/// A child exited: classify the outcome. Failed services are never restarted.
pub fn handle_child_exited(
    registry: &mut ProcessRegistry,
    id: ProcessId,
    code: Option<i32>,
    signal: Option<i32>,
) -> CoreStep {
    let Some(process) = registry.get_mut(id) else {
        warn!(process = %id, "exit reported for unknown process");
        return CoreStep::keep_running();
    };

    if process.state().is_terminal() {
        debug!(service = %process.name(), "duplicate exit notification ignored");
        return CoreStep::keep_running();
    }

    let tag = process.descriptor().tag.clone();
    let next = match (process.state(), code) {
        (ProcessState::ShuttingDown(requested), _) => {
            info!(
                service = %tag,
                exit_code = ?code,
                signal = ?signal,
                requested = %requested,
                "service stopped after shutdown request"
            );
            ProcessState::Exited(code)
        }
        (_, Some(0)) => {
            info!(service = %tag, exit_code = 0, "service exited");
            ProcessState::Exited(Some(0))
        }
        (_, Some(code)) => {
            error!(
                service = %tag,
                exit_code = code,
                "service exited with a non-zero code; it will not be restarted"
            );
            ProcessState::Failed(FailureReason::AbnormalExit(code))
        }
        (_, None) => {
            warn!(
                service = %tag,
                signal = ?signal,
                "service was terminated by a signal it did not get from svcrun"
            );
            ProcessState::Exited(None)
        }
    };

    process.transition(next);
    finish_if_all_stopped(registry)
}

/// Waiting on the child failed; record it as failed so it is not signalled.
pub fn handle_child_lost(
    registry: &mut ProcessRegistry,
    id: ProcessId,
    reason: String,
) -> CoreStep {
    let Some(process) = registry.get_mut(id) else {
        warn!(process = %id, "lost process reported for unknown process");
        return CoreStep::keep_running();
    };

    error!(service = %process.descriptor().tag, error = %reason, "lost track of service");
    process.transition(ProcessState::Failed(FailureReason::Lost(reason)));
    finish_if_all_stopped(registry)
}

/// Forward `signal` to every process that has not reached a terminal state,
/// then stop the supervisor without waiting for the children.
///
/// Processes already shutting down are signalled again; processes without a
/// pid are only marked.
pub fn handle_shutdown(registry: &mut ProcessRegistry, signal: ShutdownSignal) -> CoreStep {
    info!(signal = %signal, "shutting down all services");

    let mut commands = Vec::new();
    for process in registry.iter_mut() {
        if !process.state().is_live() {
            debug!(
                service = %process.name(),
                state = ?process.state(),
                "already stopped; not signalling"
            );
            continue;
        }

        process.transition(ProcessState::ShuttingDown(signal));
        match process.pid() {
            Some(pid) => commands.push(CoreCommand::ForwardSignal {
                id: process.id(),
                pid,
                signal,
            }),
            None => debug!(service = %process.name(), "no pid yet; nothing to signal"),
        }
    }

    commands.push(CoreCommand::RequestExit(ExitReason::Shutdown(signal)));
    CoreStep {
        commands,
        keep_running: false,
    }
}

/// Stop once every service is terminal.
fn finish_if_all_stopped(registry: &ProcessRegistry) -> CoreStep {
    if !registry.all_terminal() {
        return CoreStep::keep_running();
    }

    let failed = registry.failed_count();
    if failed > 0 {
        error!(failed, total = registry.len(), "all services have stopped");
    } else {
        info!(total = registry.len(), "all services have stopped");
    }

    CoreStep {
        commands: vec![CoreCommand::RequestExit(ExitReason::AllStopped { failed })],
        keep_running: false,
    }
}
