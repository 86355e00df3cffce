// src/errors.rs

//! Crate-wide error aliases and helpers.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SupervisorError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Precondition failed for service '{service}': {reason}: {}", path.display())]
    PreconditionFailed {
        service: String,
        path: PathBuf,
        reason: String,
    },

    #[error("Failed to spawn service '{service}': {reason}")]
    SpawnFailure { service: String, reason: String },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl SupervisorError {
    /// Process exit status the binary should use for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            SupervisorError::PreconditionFailed { .. } => crate::EXIT_PRECONDITION,
            _ => crate::EXIT_FAILURE,
        }
    }
}

pub type Result<T> = std::result::Result<T, SupervisorError>;
