// src/engine/runtime.rs

use std::fmt;

use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::engine::registry::ManagedProcess;
use crate::errors::Result;
use crate::exec::ProcessBackend;

use super::core::CoreSupervisor;
use super::{CoreCommand, ExitReason, SupervisorEvent, SupervisorExit};

/// Launches the services, then drives the core supervisor in response to
/// `SupervisorEvent`s, delegating process work to a `ProcessBackend`.
///
/// This is a pure IO shell around `CoreSupervisor`: all lifecycle semantics
/// live in the core, and this single loop is the only place that feeds it.
pub struct Runtime<B: ProcessBackend> {
    core: CoreSupervisor,
    event_rx: mpsc::Receiver<SupervisorEvent>,
    backend: B,
    launched: bool,
    exit: Option<ExitReason>,
}

impl<B: ProcessBackend> fmt::Debug for Runtime<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Runtime")
            .field("core", &self.core)
            .field("launched", &self.launched)
            .field("exit", &self.exit)
            .finish_non_exhaustive()
    }
}

impl<B: ProcessBackend> Runtime<B> {
    pub fn new(
        core: CoreSupervisor,
        event_rx: mpsc::Receiver<SupervisorEvent>,
        backend: B,
    ) -> Self {
        Self {
            core,
            event_rx,
            backend,
            launched: false,
            exit: None,
        }
    }

    /// Spawn every service in descriptor order without waiting for readiness.
    ///
    /// A spawn failure only fails that service. Calling this twice is a no-op.
    pub fn launch_all(&mut self) -> &[ManagedProcess] {
        if !self.launched {
            self.launched = true;

            for id in self.core.registry().ids() {
                let Some(descriptor) = self
                    .core
                    .registry()
                    .get(id)
                    .map(|p| p.descriptor().clone())
                else {
                    continue;
                };

                info!(
                    service = %descriptor.tag,
                    command = %descriptor.command_line(),
                    cwd = %descriptor.working_dir.display(),
                    "spawning service"
                );

                let event = match self.backend.spawn(id, &descriptor) {
                    Ok(pid) => SupervisorEvent::Spawned { id, pid },
                    Err(err) => SupervisorEvent::SpawnFailed {
                        id,
                        reason: err.to_string(),
                    },
                };
                self.apply(event);
            }

            info!(
                services = self.core.registry().len(),
                "all services are starting; press Ctrl+C to stop"
            );
        }

        self.core.registry().processes()
    }

    /// Main event loop.
    ///
    /// - Launches all services (if not done yet).
    /// - Consumes `SupervisorEvent`s from `event_rx` until the core asks to stop.
    pub async fn run(mut self) -> Result<SupervisorExit> {
        self.launch_all();

        if self.exit.is_none() && self.core.registry().all_terminal() {
            self.exit = Some(ExitReason::AllStopped {
                failed: self.core.registry().failed_count(),
            });
        }

        while self.exit.is_none() {
            let event = match self.event_rx.recv().await {
                Some(e) => e,
                None => {
                    info!("supervisor event channel closed; exiting");
                    break;
                }
            };

            debug!(?event, "runtime received event");
            self.apply(event);
        }

        let reason = self.exit.unwrap_or(ExitReason::AllStopped {
            failed: self.core.registry().failed_count(),
        });
        info!(?reason, exit_code = reason.exit_code(), "supervisor exiting");

        Ok(SupervisorExit {
            reason,
            processes: self.core.into_processes(),
        })
    }

    /// Feed one event into the core and execute what it asks for.
    fn apply(&mut self, event: SupervisorEvent) {
        let step = self.core.step(event);

        for command in step.commands {
            self.execute_command(command);
        }

        if !step.keep_running && self.exit.is_none() {
            warn!("core stopped without an exit reason");
            self.exit = Some(ExitReason::AllStopped {
                failed: self.core.registry().failed_count(),
            });
        }
    }

    fn execute_command(&mut self, command: CoreCommand) {
        match command {
            CoreCommand::ForwardSignal { id, pid, signal } => {
                let service = self
                    .core
                    .registry()
                    .get(id)
                    .map(|p| p.descriptor().tag.to_string())
                    .unwrap_or_else(|| id.to_string());

                match self.backend.signal(id, pid, signal) {
                    Ok(()) => info!(service = %service, pid, signal = %signal, "forwarded signal"),
                    Err(err) => warn!(
                        service = %service,
                        pid,
                        signal = %signal,
                        error = %err,
                        "failed to forward signal"
                    ),
                }
            }
            CoreCommand::RequestExit(reason) => {
                debug!(?reason, "core issued RequestExit command");
                self.exit.get_or_insert(reason);
            }
        }
    }
}
