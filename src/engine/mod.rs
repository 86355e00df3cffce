// src/engine/mod.rs

//! Supervision engine for svcrun.
//!
//! This module ties together:
//! - the registry of managed processes and their lifecycle states
//! - the pure core that classifies exits and plans shutdown
//! - the runtime event loop that reacts to:
//!   - spawn results
//!   - child exit notifications
//!   - shutdown signals
//!
//! The pure core state machine lives in [`core`]; the async/IO shell is
//! implemented in [`runtime`].

use crate::shutdown::ShutdownSignal;

pub use registry::{FailureReason, ManagedProcess, ProcessId, ProcessRegistry, ProcessState};

/// Exit status when every service stopped and at least one failed.
pub const EXIT_SERVICE_FAILED: i32 = 1;

/// Events flowing into the runtime from the backend and the signal listener.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SupervisorEvent {
    /// The OS accepted the spawn request.
    Spawned { id: ProcessId, pid: u32 },
    /// The OS refused to start the child (bad command, permissions, ...).
    SpawnFailed { id: ProcessId, reason: String },
    /// A child exited. `code` is `None` when it was terminated by a signal,
    /// in which case `signal` carries the signal number (unix only).
    ChildExited {
        id: ProcessId,
        code: Option<i32>,
        signal: Option<i32>,
    },
    /// Waiting on the child failed; its fate is unknown.
    ChildLost { id: ProcessId, reason: String },
    /// Operator or service manager asked the whole group to stop.
    ShutdownRequested(ShutdownSignal),
}

/// Why the supervisor stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitReason {
    /// A shutdown signal was received and forwarded.
    Shutdown(ShutdownSignal),
    /// Every managed process reached a terminal state on its own.
    AllStopped { failed: usize },
}

impl ExitReason {
    pub fn exit_code(&self) -> i32 {
        match self {
            ExitReason::Shutdown(_) => 0,
            ExitReason::AllStopped { failed: 0 } => 0,
            ExitReason::AllStopped { .. } => EXIT_SERVICE_FAILED,
        }
    }
}

/// Final result of a supervisor run.
#[derive(Debug, Clone)]
pub struct SupervisorExit {
    pub reason: ExitReason,
    /// Final snapshot of every managed process, in launch order.
    pub processes: Vec<ManagedProcess>,
}

impl SupervisorExit {
    pub fn exit_code(&self) -> i32 {
        self.reason.exit_code()
    }
}

pub mod core;
pub mod event_handlers;
pub mod registry;
pub mod runtime;

pub use core::CoreSupervisor;
pub use event_handlers::{CoreCommand, CoreStep};
pub use runtime::Runtime;
