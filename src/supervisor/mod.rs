// src/supervisor/mod.rs

//! Static service definitions and the checks run before any of them start.

pub mod descriptor;
pub mod preflight;

pub use descriptor::ServiceDescriptor;
pub use preflight::{check_service, preflight};
