// tests/real_processes.rs
#![cfg(unix)]

mod common;
use crate::common::{init_tracing, mkdir, write_file};

use std::error::Error;
use std::path::Path;

use tempfile::tempdir;
use tokio::sync::mpsc;
use tokio::time::{sleep, timeout, Duration};

use svcrun::config::LaunchPlan;
use svcrun::engine::{
    CoreSupervisor, ExitReason, FailureReason, ProcessState, Runtime, SupervisorEvent,
};
use svcrun::exec::{send_signal, RealProcessBackend};
use svcrun::fs::RealFileSystem;
use svcrun::materialize::MaterializeTarget;
use svcrun::shutdown::ShutdownSignal;
use svcrun::supervise;
use svcrun::supervisor::ServiceDescriptor;
use svcrun::types::OutputMode;
use svcrun_test_utils::builders::descriptor;

type TestResult = Result<(), Box<dyn Error>>;

fn sh(name: &str, dir: &Path, script: &str) -> ServiceDescriptor {
    let mut d = descriptor(name, dir);
    d.command = "sh".to_string();
    d.args = vec!["-c".to_string(), script.to_string()];
    d
}

fn pid_alive(pid: u32) -> bool {
    use nix::sys::signal::kill;
    use nix::unistd::Pid;
    kill(Pid::from_raw(pid as i32), None).is_ok()
}

#[tokio::test]
async fn exit_codes_are_classified() -> TestResult {
    init_tracing();

    let dir = tempdir()?;
    let (tx, rx) = mpsc::channel::<SupervisorEvent>(16);
    let backend = RealProcessBackend::new(tx, OutputMode::Inherit);

    let core = CoreSupervisor::new(vec![
        sh("ok", dir.path(), "exit 0"),
        sh("crashy", dir.path(), "exit 3"),
    ]);
    let exit = timeout(Duration::from_secs(5), Runtime::new(core, rx, backend).run())
        .await
        .expect("services did not exit within 5 seconds")?;

    assert_eq!(exit.reason, ExitReason::AllStopped { failed: 1 });
    assert_eq!(*exit.processes[0].state(), ProcessState::Exited(Some(0)));
    assert_eq!(
        *exit.processes[1].state(),
        ProcessState::Failed(FailureReason::AbnormalExit(3))
    );

    Ok(())
}

#[tokio::test]
async fn unknown_command_fails_only_that_service() -> TestResult {
    init_tracing();

    let dir = tempdir()?;
    let (tx, rx) = mpsc::channel::<SupervisorEvent>(16);
    let backend = RealProcessBackend::new(tx, OutputMode::Prefixed);

    let mut missing = descriptor("missing", dir.path());
    missing.command = "svcrun-test-no-such-command".to_string();

    let core = CoreSupervisor::new(vec![missing, sh("ok", dir.path(), "echo hello")]);
    let exit = timeout(Duration::from_secs(5), Runtime::new(core, rx, backend).run())
        .await
        .expect("services did not exit within 5 seconds")?;

    assert!(matches!(
        exit.processes[0].state(),
        ProcessState::Failed(FailureReason::SpawnFailure(_))
    ));
    assert_eq!(*exit.processes[1].state(), ProcessState::Exited(Some(0)));

    Ok(())
}

#[tokio::test]
async fn shutdown_signal_reaches_running_children() -> TestResult {
    init_tracing();

    let dir = tempdir()?;
    let (tx, rx) = mpsc::channel::<SupervisorEvent>(16);
    let backend = RealProcessBackend::new(tx.clone(), OutputMode::Inherit);

    let core = CoreSupervisor::new(vec![
        sh("sleeper-1", dir.path(), "exec sleep 30"),
        sh("sleeper-2", dir.path(), "exec sleep 30"),
    ]);
    let mut runtime = Runtime::new(core, rx, backend);
    let pids: Vec<u32> = runtime
        .launch_all()
        .iter()
        .filter_map(|p| p.pid())
        .collect();
    assert_eq!(pids.len(), 2);

    tx.send(SupervisorEvent::ShutdownRequested(ShutdownSignal::Terminate))
        .await?;

    let exit = timeout(Duration::from_secs(5), runtime.run())
        .await
        .expect("supervisor did not stop within 5 seconds")?;
    assert_eq!(exit.reason, ExitReason::Shutdown(ShutdownSignal::Terminate));
    assert_eq!(exit.exit_code(), 0);

    // The supervisor does not wait; the children go away on their own.
    for pid in pids {
        let mut alive = pid_alive(pid);
        for _ in 0..50 {
            if !alive {
                break;
            }
            sleep(Duration::from_millis(100)).await;
            alive = pid_alive(pid);
        }
        assert!(!alive, "pid {pid} still running after SIGTERM");
    }

    Ok(())
}

#[tokio::test]
async fn signalling_a_process_that_is_gone_is_not_an_error() -> TestResult {
    init_tracing();

    let mut child = tokio::process::Command::new("sh")
        .arg("-c")
        .arg("exit 0")
        .spawn()?;
    let pid = child.id().expect("pid available right after spawn");
    child.wait().await?;

    send_signal(pid, ShutdownSignal::Interrupt)?;
    send_signal(pid, ShutdownSignal::Interrupt)?;

    Ok(())
}

#[tokio::test]
async fn supervise_stages_env_before_children_start() -> TestResult {
    init_tracing();

    let root = tempdir()?;
    let root = root.path();
    write_file(root, ".env/Api.env", "PORT=5000\nMONGODB_URI=foo\n");
    mkdir(root, "api/node_modules");

    let mut api = sh("api", &root.join("api"), "grep -qx 'PORT=5000' .env");
    api.dependency_marker = Some(root.join("api/node_modules"));

    let plan = LaunchPlan {
        env_dir: root.join(".env"),
        targets: vec![MaterializeTarget {
            service_name: "api".to_string(),
            config_file_name: "Api.env".to_string(),
            destination_dir: root.join("api"),
            destination_file_name: ".env".to_string(),
        }],
        descriptors: vec![api],
        output: OutputMode::Inherit,
    };

    let (tx, rx) = mpsc::channel::<SupervisorEvent>(16);
    let backend = RealProcessBackend::new(tx, plan.output);

    let exit = timeout(
        Duration::from_secs(5),
        supervise(&RealFileSystem, plan, backend, rx),
    )
    .await
    .expect("supervise did not finish within 5 seconds")?;

    assert_eq!(exit.reason, ExitReason::AllStopped { failed: 0 });
    assert_eq!(*exit.processes[0].state(), ProcessState::Exited(Some(0)));

    Ok(())
}
