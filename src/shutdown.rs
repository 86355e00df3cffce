// src/shutdown.rs

//! Shutdown coordination: turn the supervisor's own interrupt/terminate
//! signals into `ShutdownRequested` events for the runtime.

use std::fmt;

use tokio::sync::mpsc;
use tracing::debug;
#[cfg(not(unix))]
use tracing::warn;

use crate::engine::SupervisorEvent;

/// Signal kinds accepted by the supervisor and forwarded to children.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShutdownSignal {
    /// SIGINT (Ctrl-C).
    Interrupt,
    /// SIGTERM (service manager / orchestrator).
    Terminate,
}

impl ShutdownSignal {
    pub fn name(self) -> &'static str {
        match self {
            ShutdownSignal::Interrupt => "SIGINT",
            ShutdownSignal::Terminate => "SIGTERM",
        }
    }

    #[cfg(unix)]
    pub fn as_nix(self) -> nix::sys::signal::Signal {
        match self {
            ShutdownSignal::Interrupt => nix::sys::signal::Signal::SIGINT,
            ShutdownSignal::Terminate => nix::sys::signal::Signal::SIGTERM,
        }
    }
}

impl fmt::Display for ShutdownSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Listen for interrupt/terminate for the life of the supervisor.
///
/// The OS handlers are installed before this returns, so a signal arriving
/// right after the call is not lost. Every received signal is sent as
/// `ShutdownRequested`, so a second Ctrl-C while shutdown is in progress is
/// forwarded again.
#[cfg(unix)]
pub fn spawn_signal_listener(
    tx: mpsc::Sender<SupervisorEvent>,
) -> std::io::Result<tokio::task::JoinHandle<()>> {
    use tokio::signal::unix::{signal, SignalKind};

    let mut sigint = signal(SignalKind::interrupt())?;
    let mut sigterm = signal(SignalKind::terminate())?;

    Ok(tokio::spawn(async move {
        loop {
            let received = tokio::select! {
                Some(()) = sigint.recv() => ShutdownSignal::Interrupt,
                Some(()) = sigterm.recv() => ShutdownSignal::Terminate,
                else => break,
            };
            debug!(signal = %received, "supervisor received signal");
            if tx.send(SupervisorEvent::ShutdownRequested(received)).await.is_err() {
                break;
            }
        }
        debug!("signal listener finished");
    }))
}

/// Listen for Ctrl+C for the life of the supervisor.
#[cfg(not(unix))]
pub fn spawn_signal_listener(
    tx: mpsc::Sender<SupervisorEvent>,
) -> std::io::Result<tokio::task::JoinHandle<()>> {
    Ok(tokio::spawn(async move {
        loop {
            if let Err(e) = tokio::signal::ctrl_c().await {
                warn!(error = %e, "failed to listen for Ctrl+C");
                return;
            }
            debug!("supervisor received Ctrl+C");
            if tx
                .send(SupervisorEvent::ShutdownRequested(ShutdownSignal::Interrupt))
                .await
                .is_err()
            {
                break;
            }
        }
        debug!("signal listener finished");
    }))
}
