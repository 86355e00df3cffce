// src/exec/backend.rs

//! Pluggable process backend abstraction.
//!
//! The runtime talks to a `ProcessBackend` instead of spawning processes
//! itself. This makes it easy to swap in a fake backend in tests while keeping
//! the production implementation in [`process_runner`](super::process_runner).
//!
//! - `RealProcessBackend` spawns OS processes and reports their exits as
//!   `SupervisorEvent`s over an mpsc channel.
//! - Tests can provide their own `ProcessBackend` that, for example, records
//!   which services were spawned and which signals were forwarded.

use tokio::sync::mpsc;

use crate::engine::{ProcessId, SupervisorEvent};
use crate::errors::Result;
use crate::shutdown::ShutdownSignal;
use crate::supervisor::ServiceDescriptor;
use crate::types::OutputMode;

use super::process_runner::spawn_service;
use super::signal::send_signal;

/// Trait abstracting how services are started and signalled.
pub trait ProcessBackend: Send {
    /// Start the service and return its pid.
    ///
    /// Must not block on the child. Once started, the backend is responsible
    /// for eventually reporting `ChildExited` (or `ChildLost`) for `id`.
    fn spawn(&mut self, id: ProcessId, descriptor: &ServiceDescriptor) -> Result<u32>;

    /// Deliver `signal` to `pid`. Signalling a process that already exited
    /// must succeed.
    fn signal(&mut self, id: ProcessId, pid: u32, signal: ShutdownSignal) -> Result<()>;
}

/// Real backend used in production.
pub struct RealProcessBackend {
    events: mpsc::Sender<SupervisorEvent>,
    output: OutputMode,
}

impl RealProcessBackend {
    /// Create a backend that reports child exits on `events`.
    pub fn new(events: mpsc::Sender<SupervisorEvent>, output: OutputMode) -> Self {
        Self { events, output }
    }
}

impl ProcessBackend for RealProcessBackend {
    fn spawn(&mut self, id: ProcessId, descriptor: &ServiceDescriptor) -> Result<u32> {
        spawn_service(id, descriptor, self.output, self.events.clone())
    }

    fn signal(&mut self, _id: ProcessId, pid: u32, signal: ShutdownSignal) -> Result<()> {
        send_signal(pid, signal)
    }
}
