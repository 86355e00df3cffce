// src/engine/registry.rs

//! The supervisor's table of managed processes.
//!
//! The registry is owned by [`CoreSupervisor`](crate::engine::CoreSupervisor)
//! and only mutated from the runtime's single event loop. Records are created
//! once, in descriptor order, and never added or removed afterwards.

use std::fmt;

use thiserror::Error;
use tracing::debug;

use crate::shutdown::ShutdownSignal;
use crate::supervisor::ServiceDescriptor;

/// Position of a managed process in the registry (= descriptor index).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ProcessId(pub usize);

impl fmt::Display for ProcessId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Why a managed process ended up `Failed`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FailureReason {
    #[error("spawn failed: {0}")]
    SpawnFailure(String),
    #[error("exited with code {0}")]
    AbnormalExit(i32),
    #[error("lost track of process: {0}")]
    Lost(String),
}

/// Lifecycle of one managed process.
///
/// `Starting → Running → ShuttingDown → {Exited | Failed}`; steps may be
/// skipped but never reversed, and the terminal states never change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProcessState {
    Starting,
    Running,
    /// A shutdown signal was forwarded (or is pending for a pid-less process).
    ShuttingDown(ShutdownSignal),
    /// Exit code, or `None` when the process was terminated by a signal.
    Exited(Option<i32>),
    Failed(FailureReason),
}

impl ProcessState {
    fn rank(&self) -> u8 {
        match self {
            ProcessState::Starting => 0,
            ProcessState::Running => 1,
            ProcessState::ShuttingDown(_) => 2,
            ProcessState::Exited(_) | ProcessState::Failed(_) => 3,
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.rank() == 3
    }

    /// Still eligible for shutdown signals.
    pub fn is_live(&self) -> bool {
        !self.is_terminal()
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, ProcessState::Failed(_))
    }
}

/// Runtime record for one spawned (or attempted) service.
#[derive(Debug, Clone)]
pub struct ManagedProcess {
    id: ProcessId,
    descriptor: ServiceDescriptor,
    pid: Option<u32>,
    state: ProcessState,
}

impl ManagedProcess {
    fn new(id: ProcessId, descriptor: ServiceDescriptor) -> Self {
        Self {
            id,
            descriptor,
            pid: None,
            state: ProcessState::Starting,
        }
    }

    pub fn id(&self) -> ProcessId {
        self.id
    }

    pub fn descriptor(&self) -> &ServiceDescriptor {
        &self.descriptor
    }

    pub fn name(&self) -> &str {
        &self.descriptor.name
    }

    pub fn pid(&self) -> Option<u32> {
        self.pid
    }

    pub fn state(&self) -> &ProcessState {
        &self.state
    }

    pub(crate) fn set_pid(&mut self, pid: u32) {
        self.pid = Some(pid);
    }

    /// Move to `next` if that keeps the lifecycle monotonic.
    ///
    /// Re-entering `ShuttingDown` is allowed so a repeated shutdown request
    /// can be recorded. Returns whether the transition was applied.
    pub(crate) fn transition(&mut self, next: ProcessState) -> bool {
        let allowed = match (&self.state, &next) {
            (current, _) if current.is_terminal() => false,
            (ProcessState::ShuttingDown(_), ProcessState::ShuttingDown(_)) => true,
            (current, next) => next.rank() > current.rank(),
        };

        if allowed {
            self.state = next;
        } else {
            debug!(
                process = %self.id,
                service = %self.descriptor.name,
                current = ?self.state,
                rejected = ?next,
                "ignoring non-monotonic state transition"
            );
        }
        allowed
    }
}

/// Fixed, ordered set of managed processes.
#[derive(Debug, Clone)]
pub struct ProcessRegistry {
    processes: Vec<ManagedProcess>,
}

impl ProcessRegistry {
    /// One `Starting` record per descriptor, preserving order.
    pub fn new(descriptors: Vec<ServiceDescriptor>) -> Self {
        let processes = descriptors
            .into_iter()
            .enumerate()
            .map(|(index, descriptor)| ManagedProcess::new(ProcessId(index), descriptor))
            .collect();
        Self { processes }
    }

    pub fn len(&self) -> usize {
        self.processes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.processes.is_empty()
    }

    pub fn get(&self, id: ProcessId) -> Option<&ManagedProcess> {
        self.processes.get(id.0)
    }

    pub(crate) fn get_mut(&mut self, id: ProcessId) -> Option<&mut ManagedProcess> {
        self.processes.get_mut(id.0)
    }

    pub fn processes(&self) -> &[ManagedProcess] {
        &self.processes
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut ManagedProcess> {
        self.processes.iter_mut()
    }

    pub fn ids(&self) -> Vec<ProcessId> {
        self.processes.iter().map(ManagedProcess::id).collect()
    }

    pub fn all_terminal(&self) -> bool {
        self.processes.iter().all(|p| p.state.is_terminal())
    }

    pub fn failed_count(&self) -> usize {
        self.processes.iter().filter(|p| p.state.is_failed()).count()
    }

    pub fn into_processes(self) -> Vec<ManagedProcess> {
        self.processes
    }
}
