// src/exec/process_runner.rs

//! Start one service process and observe it until it exits.

use std::process::{ExitStatus, Stdio};

use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::{Child, Command};
use tokio::sync::mpsc;
use tracing::debug;

use crate::engine::{ProcessId, SupervisorEvent};
use crate::errors::{Result, SupervisorError};
use crate::supervisor::ServiceDescriptor;
use crate::types::{DisplayTag, OutputMode};

/// Spawn the service described by `descriptor` and return its pid.
///
/// The child runs in its working directory, inherits stdin and the
/// environment, and either inherits stdout/stderr or has them re-emitted
/// line by line behind its display tag. An exit observer task reports the
/// outcome on `events`. Dropping the handle does not kill the child; only a
/// forwarded shutdown signal stops it.
pub fn spawn_service(
    id: ProcessId,
    descriptor: &ServiceDescriptor,
    output: OutputMode,
    events: mpsc::Sender<SupervisorEvent>,
) -> Result<u32> {
    let mut cmd = build_command(descriptor);
    cmd.current_dir(&descriptor.working_dir)
        .stdin(Stdio::inherit())
        .kill_on_drop(false);

    match output {
        OutputMode::Inherit => {
            cmd.stdout(Stdio::inherit()).stderr(Stdio::inherit());
        }
        OutputMode::Prefixed => {
            cmd.stdout(Stdio::piped()).stderr(Stdio::piped());
        }
    }

    let mut child = cmd.spawn().map_err(|e| SupervisorError::SpawnFailure {
        service: descriptor.name.clone(),
        reason: e.to_string(),
    })?;

    let pid = child.id().ok_or_else(|| SupervisorError::SpawnFailure {
        service: descriptor.name.clone(),
        reason: "process exited before its pid could be read".to_string(),
    })?;

    if output == OutputMode::Prefixed {
        if let Some(stdout) = child.stdout.take() {
            forward_lines(stdout, descriptor.tag.clone(), false);
        }
        if let Some(stderr) = child.stderr.take() {
            forward_lines(stderr, descriptor.tag.clone(), true);
        }
    }

    debug!(service = %descriptor.name, pid, "attaching exit observer");
    tokio::spawn(observe_exit(id, descriptor.name.clone(), child, events));

    Ok(pid)
}

fn build_command(descriptor: &ServiceDescriptor) -> Command {
    if !descriptor.shell {
        let mut c = Command::new(&descriptor.command);
        c.args(&descriptor.args);
        return c;
    }

    // Build a shell command appropriate for the platform.
    if cfg!(windows) {
        let mut c = Command::new("cmd");
        c.arg("/C").arg(descriptor.command_line());
        c
    } else {
        let mut c = Command::new("sh");
        c.arg("-c").arg(descriptor.command_line());
        c
    }
}

async fn observe_exit(
    id: ProcessId,
    name: String,
    mut child: Child,
    events: mpsc::Sender<SupervisorEvent>,
) {
    let event = match child.wait().await {
        Ok(status) => {
            debug!(service = %name, exit_code = ?status.code(), "child reaped");
            SupervisorEvent::ChildExited {
                id,
                code: status.code(),
                signal: terminating_signal(&status),
            }
        }
        Err(e) => SupervisorEvent::ChildLost {
            id,
            reason: format!("waiting for process failed: {e}"),
        },
    };

    if events.send(event).await.is_err() {
        debug!(service = %name, "runtime no longer listening for exits");
    }
}

#[cfg(unix)]
fn terminating_signal(status: &ExitStatus) -> Option<i32> {
    use std::os::unix::process::ExitStatusExt;
    status.signal()
}

#[cfg(not(unix))]
fn terminating_signal(_status: &ExitStatus) -> Option<i32> {
    None
}

/// Re-emit each line of a child stream behind the service's tag.
fn forward_lines<R>(stream: R, tag: DisplayTag, to_stderr: bool)
where
    R: AsyncRead + Unpin + Send + 'static,
{
    tokio::spawn(async move {
        let mut lines = BufReader::new(stream).lines();
        while let Ok(Some(line)) = lines.next_line().await {
            if to_stderr {
                eprintln!("{tag} {line}");
            } else {
                println!("{tag} {line}");
            }
        }
        debug!(service = %tag.label, stderr = to_stderr, "output stream closed");
    });
}
