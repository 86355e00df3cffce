// src/config/model.rs

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::materialize::MaterializeTarget;
use crate::supervisor::ServiceDescriptor;
use crate::types::{DisplayTag, Mode, OutputMode, TagColor};

/// Top-level configuration as read from a TOML file, before validation.
///
/// ```toml
/// [config]
/// env_dir = ".env"
/// dependency_marker = "node_modules"
///
/// [[service]]
/// name = "membera Backend"
/// cwd = "membera/backend"
/// command = "npm"
/// args = ["start"]
/// dev_args = ["run", "dev"]
/// env_file = "MemberA.env"
/// ```
///
/// Services are an array of tables so that declaration order is launch order.
#[derive(Debug, Clone, Deserialize)]
pub struct RawConfigFile {
    #[serde(default)]
    pub config: ConfigSection,

    #[serde(default)]
    pub service: Vec<ServiceConfig>,
}

/// Validated configuration. Only obtainable through
/// `ConfigFile::try_from(RawConfigFile)`.
#[derive(Debug, Clone)]
pub struct ConfigFile {
    pub config: ConfigSection,
    pub service: Vec<ServiceConfig>,
}

impl ConfigFile {
    pub(crate) fn new_unchecked(config: ConfigSection, service: Vec<ServiceConfig>) -> Self {
        Self { config, service }
    }

    /// Resolve the static service set for `mode`.
    ///
    /// Relative paths are resolved against `root` (normally the directory
    /// holding the config file).
    pub fn launch_plan(&self, mode: Mode, root: &Path) -> LaunchPlan {
        let descriptors: Vec<ServiceDescriptor> = self
            .service
            .iter()
            .enumerate()
            .map(|(index, svc)| svc.descriptor(index, mode, root, &self.config))
            .collect();

        let targets = self
            .service
            .iter()
            .zip(descriptors.iter())
            .filter_map(|(svc, desc)| {
                svc.env_file.as_ref().map(|file| MaterializeTarget {
                    service_name: desc.name.clone(),
                    config_file_name: file.clone(),
                    destination_dir: desc.working_dir.clone(),
                    destination_file_name: self.config.env_target.clone(),
                })
            })
            .collect();

        LaunchPlan {
            env_dir: root.join(&self.config.env_dir),
            targets,
            descriptors,
            output: self.config.output,
        }
    }
}

/// Everything the supervisor needs at startup, with paths resolved.
#[derive(Debug, Clone)]
pub struct LaunchPlan {
    /// Shared source-of-truth directory for per-service env files.
    pub env_dir: PathBuf,
    pub targets: Vec<MaterializeTarget>,
    pub descriptors: Vec<ServiceDescriptor>,
    pub output: OutputMode,
}

/// `[config]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct ConfigSection {
    /// Directory (relative to the config file) holding one env file per service.
    #[serde(default = "default_env_dir")]
    pub env_dir: String,

    /// File name the env file is written to inside each working directory.
    #[serde(default = "default_env_target")]
    pub env_target: String,

    /// Path, relative to each working directory, that must exist before the
    /// service is launched. Services may override it.
    #[serde(default = "default_dependency_marker")]
    pub dependency_marker: Option<String>,

    #[serde(default)]
    pub output: OutputMode,
}

fn default_env_dir() -> String {
    ".env".to_string()
}

fn default_env_target() -> String {
    ".env".to_string()
}

fn default_dependency_marker() -> Option<String> {
    Some("node_modules".to_string())
}

impl Default for ConfigSection {
    fn default() -> Self {
        Self {
            env_dir: default_env_dir(),
            env_target: default_env_target(),
            dependency_marker: default_dependency_marker(),
            output: OutputMode::default(),
        }
    }
}

/// One `[[service]]` entry.
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceConfig {
    /// Human-readable, unique name; also the display tag label.
    pub name: String,

    /// Working directory, relative to the config file.
    pub cwd: String,

    /// Executable to launch.
    pub command: String,

    /// Arguments used in production mode.
    #[serde(default)]
    pub args: Vec<String>,

    /// Arguments used in dev mode; falls back to `args` when absent.
    #[serde(default)]
    pub dev_args: Option<Vec<String>>,

    /// Tag colour; assigned from the palette by position when absent.
    #[serde(default)]
    pub color: Option<TagColor>,

    /// Env file name inside `[config].env_dir` to stage into `cwd`.
    #[serde(default)]
    pub env_file: Option<String>,

    /// Per-service override of `[config].dependency_marker`. An empty string
    /// disables the check for this service.
    #[serde(default)]
    pub dependency_marker: Option<String>,

    /// Run `command` + `args` through the platform shell.
    #[serde(default)]
    pub shell: bool,
}

impl ServiceConfig {
    pub fn effective_args(&self, mode: Mode) -> &[String] {
        match (mode, &self.dev_args) {
            (Mode::Dev, Some(dev)) => dev,
            _ => &self.args,
        }
    }

    pub fn effective_dependency_marker<'a>(&'a self, section: &'a ConfigSection) -> Option<&'a str> {
        self.dependency_marker
            .as_deref()
            .or(section.dependency_marker.as_deref())
            .filter(|marker| !marker.is_empty())
    }

    fn descriptor(
        &self,
        index: usize,
        mode: Mode,
        root: &Path,
        section: &ConfigSection,
    ) -> ServiceDescriptor {
        let color = self.color.unwrap_or_else(|| TagColor::for_index(index));
        let working_dir = root.join(&self.cwd);
        ServiceDescriptor {
            name: self.name.clone(),
            dependency_marker: self
                .effective_dependency_marker(section)
                .map(|marker| working_dir.join(marker)),
            working_dir,
            command: self.command.clone(),
            args: self.effective_args(mode).to_vec(),
            tag: DisplayTag::new(self.name.clone(), color),
            shell: self.shell,
        }
    }
}
