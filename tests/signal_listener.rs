// tests/signal_listener.rs
#![cfg(unix)]

mod common;
use crate::common::init_tracing;

use std::error::Error;

use nix::sys::signal::{raise, Signal};
use tokio::sync::mpsc;

use svcrun::engine::SupervisorEvent;
use svcrun::shutdown::{spawn_signal_listener, ShutdownSignal};
use svcrun_test_utils::with_timeout;

type TestResult = Result<(), Box<dyn Error>>;

// Single test in this binary: the signals below hit the whole test process.
#[tokio::test]
async fn each_os_signal_becomes_one_shutdown_request_of_the_same_kind() -> TestResult {
    init_tracing();

    let (tx, mut rx) = mpsc::channel::<SupervisorEvent>(16);
    let listener = spawn_signal_listener(tx)?;

    raise(Signal::SIGTERM)?;
    assert_eq!(
        with_timeout(rx.recv()).await,
        Some(SupervisorEvent::ShutdownRequested(ShutdownSignal::Terminate))
    );

    raise(Signal::SIGINT)?;
    assert_eq!(
        with_timeout(rx.recv()).await,
        Some(SupervisorEvent::ShutdownRequested(ShutdownSignal::Interrupt))
    );

    // A repeated Ctrl-C during shutdown is reported again.
    raise(Signal::SIGINT)?;
    assert_eq!(
        with_timeout(rx.recv()).await,
        Some(SupervisorEvent::ShutdownRequested(ShutdownSignal::Interrupt))
    );

    assert!(rx.try_recv().is_err());

    // The listener stops once nobody is listening for its events.
    drop(rx);
    raise(Signal::SIGTERM)?;
    with_timeout(listener).await?;

    Ok(())
}
