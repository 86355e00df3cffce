// src/supervisor/descriptor.rs

use std::path::PathBuf;

use crate::types::DisplayTag;

/// Static definition of one service to launch.
///
/// Built once from config at startup and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceDescriptor {
    pub name: String,
    pub working_dir: PathBuf,
    pub command: String,
    pub args: Vec<String>,
    pub tag: DisplayTag,
    /// Absolute marker path (e.g. `<cwd>/node_modules`) that must exist
    /// before launch.
    pub dependency_marker: Option<PathBuf>,
    /// Run through `sh -c` (`cmd /C` on Windows) instead of exec'ing directly.
    pub shell: bool,
}

impl ServiceDescriptor {
    /// `command arg1 arg2 ...`, for logs and for shell mode.
    pub fn command_line(&self) -> String {
        std::iter::once(self.command.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}
