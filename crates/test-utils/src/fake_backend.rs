use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use tokio::sync::mpsc;
use svcrun::engine::{ProcessId, SupervisorEvent};
use svcrun::errors::{Result, SupervisorError};
use svcrun::exec::ProcessBackend;
use svcrun::shutdown::ShutdownSignal;
use svcrun::supervisor::ServiceDescriptor;

/// One signal the runtime asked the backend to deliver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SignalRecord {
    pub id: ProcessId,
    pub pid: u32,
    pub signal: ShutdownSignal,
}

/// Shared view of what a `FakeBackend` was asked to do.
#[derive(Debug, Clone, Default)]
pub struct FakeLog {
    spawned: Arc<Mutex<Vec<String>>>,
    signals: Arc<Mutex<Vec<SignalRecord>>>,
}

impl FakeLog {
    /// Names of services passed to `spawn`, in call order (failures included).
    pub fn spawned(&self) -> Vec<String> {
        self.spawned.lock().unwrap().clone()
    }

    pub fn signals(&self) -> Vec<SignalRecord> {
        self.signals.lock().unwrap().clone()
    }
}

/// A fake backend that:
/// - records which services were spawned and which signals were forwarded
/// - hands out pids starting at 1000
/// - can refuse to spawn a service, or report it as exited straight away.
pub struct FakeBackend {
    events: Option<mpsc::Sender<SupervisorEvent>>,
    fail_spawn: HashSet<String>,
    exit_on_spawn: HashMap<String, i32>,
    next_pid: u32,
    log: FakeLog,
}

impl FakeBackend {
    pub fn new() -> Self {
        Self {
            events: None,
            fail_spawn: HashSet::new(),
            exit_on_spawn: HashMap::new(),
            next_pid: 1000,
            log: FakeLog::default(),
        }
    }

    /// Channel used to report exits configured with [`exit_on_spawn`](Self::exit_on_spawn).
    pub fn with_events(mut self, events: mpsc::Sender<SupervisorEvent>) -> Self {
        self.events = Some(events);
        self
    }

    pub fn fail_spawn(mut self, name: &str) -> Self {
        self.fail_spawn.insert(name.to_string());
        self
    }

    pub fn exit_on_spawn(mut self, name: &str, code: i32) -> Self {
        self.exit_on_spawn.insert(name.to_string(), code);
        self
    }

    pub fn log(&self) -> FakeLog {
        self.log.clone()
    }
}

impl Default for FakeBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl ProcessBackend for FakeBackend {
    fn spawn(&mut self, id: ProcessId, descriptor: &ServiceDescriptor) -> Result<u32> {
        self.log.spawned.lock().unwrap().push(descriptor.name.clone());

        if self.fail_spawn.contains(&descriptor.name) {
            return Err(SupervisorError::SpawnFailure {
                service: descriptor.name.clone(),
                reason: "No such file or directory (os error 2)".to_string(),
            });
        }

        let pid = self.next_pid;
        self.next_pid += 1;

        if let Some(&code) = self.exit_on_spawn.get(&descriptor.name) {
            let events = self.events.as_ref().ok_or_else(|| {
                anyhow::anyhow!("exit_on_spawn configured without an event channel")
            })?;
            events
                .try_send(SupervisorEvent::ChildExited {
                    id,
                    code: Some(code),
                    signal: None,
                })
                .map_err(|e| anyhow::anyhow!("reporting fake exit: {e}"))?;
        }

        Ok(pid)
    }

    fn signal(&mut self, id: ProcessId, pid: u32, signal: ShutdownSignal) -> Result<()> {
        self.log
            .signals
            .lock()
            .unwrap()
            .push(SignalRecord { id, pid, signal });
        Ok(())
    }
}
