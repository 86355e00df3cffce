// src/supervisor/preflight.rs

//! Environment checks that must pass before any service is spawned.
//!
//! A missing working directory or dependency marker means the environment is
//! broken, so the first failure aborts the whole supervisor.

use tracing::{error, info};

use crate::errors::{Result, SupervisorError};
use crate::fs::FileSystem;
use crate::supervisor::ServiceDescriptor;

/// Check every descriptor, in order, before anything is launched.
pub fn preflight(fs: &dyn FileSystem, descriptors: &[ServiceDescriptor]) -> Result<()> {
    for descriptor in descriptors {
        info!(
            service = %descriptor.tag,
            cwd = %descriptor.working_dir.display(),
            "preparing to start service"
        );

        if let Err(err) = check_service(fs, descriptor) {
            error!(service = %descriptor.tag, error = %err, "precondition check failed");
            return Err(err);
        }
    }
    Ok(())
}

/// Working directory first, then the dependency marker inside it.
pub fn check_service(fs: &dyn FileSystem, descriptor: &ServiceDescriptor) -> Result<()> {
    if !fs.is_dir(&descriptor.working_dir) {
        return Err(SupervisorError::PreconditionFailed {
            service: descriptor.name.clone(),
            path: descriptor.working_dir.clone(),
            reason: "working directory does not exist".to_string(),
        });
    }

    if let Some(marker) = &descriptor.dependency_marker {
        if !fs.exists(marker) {
            return Err(SupervisorError::PreconditionFailed {
                service: descriptor.name.clone(),
                path: marker.clone(),
                reason: "dependency marker not found (dependencies not installed?)"
                    .to_string(),
            });
        }
    }

    Ok(())
}
