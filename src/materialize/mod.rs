// src/materialize/mod.rs

//! Stages each service's env file from the shared source directory into the
//! service's working directory before anything is launched.
//!
//! Copies are unconditional byte-for-byte overwrites, so re-running is safe.
//! A missing source or destination only skips that target.

pub mod env_file;

use std::fmt;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::fs::FileSystem;

pub use env_file::{mask_credentials, ConfigEntry, EnvFile};

/// One file to stage: `<source_dir>/<config_file_name>` is copied to
/// `<destination_dir>/<destination_file_name>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaterializeTarget {
    pub service_name: String,
    pub config_file_name: String,
    pub destination_dir: PathBuf,
    pub destination_file_name: String,
}

impl MaterializeTarget {
    pub fn destination(&self) -> PathBuf {
        self.destination_dir.join(&self.destination_file_name)
    }
}

/// Why a target was not copied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// The source env file does not exist.
    ConfigMissing(PathBuf),
    /// The service's working directory does not exist.
    DestinationMissing(PathBuf),
    /// Reading or writing failed.
    Io(String),
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::ConfigMissing(path) => {
                write!(f, "source config file not found: {}", path.display())
            }
            SkipReason::DestinationMissing(path) => {
                write!(f, "destination directory not found: {}", path.display())
            }
            SkipReason::Io(msg) => write!(f, "io error: {msg}"),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct MaterializeReport {
    /// Targets copied, in input order.
    pub copied: Vec<MaterializeTarget>,
    /// Targets skipped, in input order.
    pub skipped: Vec<(MaterializeTarget, SkipReason)>,
    /// Entries read back from successfully copied files that parsed cleanly.
    pub entries: Vec<ConfigEntry>,
}

impl MaterializeReport {
    pub fn copied_count(&self) -> usize {
        self.copied.len()
    }

    pub fn skipped_count(&self) -> usize {
        self.skipped.len()
    }
}

/// Copy every target's env file from `source_dir`, overwriting stale copies.
///
/// Never fails as a whole: each problem is logged and recorded as a skip.
pub fn materialize(
    fs: &dyn FileSystem,
    source_dir: &Path,
    targets: &[MaterializeTarget],
) -> MaterializeReport {
    let mut report = MaterializeReport::default();

    for target in targets {
        match copy_target(fs, source_dir, target) {
            Ok(()) => {
                if let Some(entry) = read_back(fs, target) {
                    report.entries.push(entry);
                }
                report.copied.push(target.clone());
            }
            Err(reason) => {
                warn!(
                    service = %target.service_name,
                    reason = %reason,
                    "skipping config materialization"
                );
                report.skipped.push((target.clone(), reason));
            }
        }
    }

    info!(
        copied = report.copied_count(),
        skipped = report.skipped_count(),
        "config materialization finished"
    );

    report
}

fn copy_target(
    fs: &dyn FileSystem,
    source_dir: &Path,
    target: &MaterializeTarget,
) -> std::result::Result<(), SkipReason> {
    let source = source_dir.join(&target.config_file_name);
    if !fs.is_file(&source) {
        return Err(SkipReason::ConfigMissing(source));
    }
    if !fs.is_dir(&target.destination_dir) {
        return Err(SkipReason::DestinationMissing(target.destination_dir.clone()));
    }

    let bytes = fs.read(&source).map_err(|e| SkipReason::Io(format!("{e:#}")))?;
    let destination = target.destination();
    fs.write(&destination, &bytes)
        .map_err(|e| SkipReason::Io(format!("{e:#}")))?;

    debug!(
        service = %target.service_name,
        from = %source.display(),
        to = %destination.display(),
        bytes = bytes.len(),
        "copied env file"
    );

    Ok(())
}

fn read_back(fs: &dyn FileSystem, target: &MaterializeTarget) -> Option<ConfigEntry> {
    let parsed = fs
        .read_to_string(&target.destination())
        .map_err(crate::errors::SupervisorError::from)
        .and_then(|text| EnvFile::parse(&text))
        .and_then(|env| env.to_entry(&target.service_name));

    match parsed {
        Ok(entry) => {
            info!(
                service = %target.service_name,
                port = entry.listen_port,
                connection = %mask_credentials(&entry.connection_string),
                "staged service config"
            );
            Some(entry)
        }
        Err(e) => {
            warn!(
                service = %target.service_name,
                error = %e,
                "staged env file does not carry a usable port/connection string"
            );
            None
        }
    }
}
