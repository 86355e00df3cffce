// src/engine/core.rs

//! Pure core supervisor state machine.
//!
//! This module contains a synchronous, deterministic "core" that consumes
//! [`SupervisorEvent`]s and produces:
//! - an updated process registry
//! - a list of "commands" describing what the IO shell should do next
//!
//! The async/IO-heavy shell (`engine::runtime::Runtime`) is responsible for:
//! - spawning processes through a `ProcessBackend`
//! - reading events from channels
//! - delivering signals to children
//!
//! Because every mutation of the registry goes through [`CoreSupervisor::step`],
//! an exit notification and a shutdown request can never race on one record.

use crate::engine::event_handlers::{
    handle_child_exited, handle_child_lost, handle_shutdown, handle_spawn_failed,
    handle_spawned, CoreStep,
};
use crate::engine::registry::{ManagedProcess, ProcessRegistry};
use crate::engine::SupervisorEvent;
use crate::shutdown::ShutdownSignal;
use crate::supervisor::ServiceDescriptor;

/// Pure core supervisor state.
///
/// It has **no** channels, no Tokio types, and does not perform any IO.
#[derive(Debug)]
pub struct CoreSupervisor {
    registry: ProcessRegistry,
    shutdown: Option<ShutdownSignal>,
}

impl CoreSupervisor {
    pub fn new(descriptors: Vec<ServiceDescriptor>) -> Self {
        Self {
            registry: ProcessRegistry::new(descriptors),
            shutdown: None,
        }
    }

    pub fn registry(&self) -> &ProcessRegistry {
        &self.registry
    }

    /// The first shutdown signal received, if any.
    pub fn shutdown_signal(&self) -> Option<ShutdownSignal> {
        self.shutdown
    }

    pub fn into_processes(self) -> Vec<ManagedProcess> {
        self.registry.into_processes()
    }

    /// Handle a single event, updating the registry and returning the
    /// resulting commands for the IO shell.
    pub fn step(&mut self, event: SupervisorEvent) -> CoreStep {
        match event {
            SupervisorEvent::Spawned { id, pid } => handle_spawned(&mut self.registry, id, pid),
            SupervisorEvent::SpawnFailed { id, reason } => {
                handle_spawn_failed(&mut self.registry, id, reason)
            }
            SupervisorEvent::ChildExited { id, code, signal } => {
                handle_child_exited(&mut self.registry, id, code, signal)
            }
            SupervisorEvent::ChildLost { id, reason } => {
                handle_child_lost(&mut self.registry, id, reason)
            }
            SupervisorEvent::ShutdownRequested(signal) => {
                self.shutdown.get_or_insert(signal);
                handle_shutdown(&mut self.registry, signal)
            }
        }
    }
}
