// src/exec/mod.rs

//! Process execution layer.
//!
//! This module is responsible for actually starting the services, using
//! `tokio::process::Command`, observing their exit, delivering signals, and
//! reporting back to the runtime via `SupervisorEvent`s.
//!
//! - [`backend`] provides the `ProcessBackend` trait and the concrete
//!   `RealProcessBackend` used in production, which tests replace with a
//!   fake implementation.
//! - [`process_runner`] spawns one child and attaches its exit observer and
//!   (optional) output forwarding.
//! - [`signal`] delivers shutdown signals to child pids.

pub mod backend;
pub mod process_runner;
pub mod signal;

pub use backend::{ProcessBackend, RealProcessBackend};
pub use process_runner::spawn_service;
pub use signal::send_signal;
