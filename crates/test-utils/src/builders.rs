#![allow(dead_code)]

use std::path::PathBuf;

use svcrun::config::{ConfigFile, ConfigSection, RawConfigFile, ServiceConfig};
use svcrun::supervisor::ServiceDescriptor;
use svcrun::types::{DisplayTag, OutputMode, TagColor};

/// Builder for `ConfigFile` to simplify test setup.
pub struct ConfigFileBuilder {
    config: RawConfigFile,
}

impl ConfigFileBuilder {
    pub fn new() -> Self {
        Self {
            config: RawConfigFile {
                config: ConfigSection::default(),
                service: Vec::new(),
            },
        }
    }

    pub fn with_service(mut self, service: ServiceConfig) -> Self {
        self.config.service.push(service);
        self
    }

    pub fn env_dir(mut self, dir: &str) -> Self {
        self.config.config.env_dir = dir.to_string();
        self
    }

    pub fn env_target(mut self, name: &str) -> Self {
        self.config.config.env_target = name.to_string();
        self
    }

    pub fn dependency_marker(mut self, marker: Option<&str>) -> Self {
        self.config.config.dependency_marker = marker.map(str::to_string);
        self
    }

    pub fn output(mut self, output: OutputMode) -> Self {
        self.config.config.output = output;
        self
    }

    pub fn build_raw(self) -> RawConfigFile {
        self.config
    }

    pub fn build(self) -> ConfigFile {
        ConfigFile::try_from(self.config).expect("Failed to build valid config from builder")
    }
}

impl Default for ConfigFileBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for `ServiceConfig`.
pub struct ServiceConfigBuilder {
    service: ServiceConfig,
}

impl ServiceConfigBuilder {
    pub fn new(name: &str, cwd: &str, command: &str) -> Self {
        Self {
            service: ServiceConfig {
                name: name.to_string(),
                cwd: cwd.to_string(),
                command: command.to_string(),
                args: vec![],
                dev_args: None,
                color: None,
                env_file: None,
                dependency_marker: None,
                shell: false,
            },
        }
    }

    pub fn arg(mut self, arg: &str) -> Self {
        self.service.args.push(arg.to_string());
        self
    }

    pub fn dev_arg(mut self, arg: &str) -> Self {
        self.service
            .dev_args
            .get_or_insert_with(Vec::new)
            .push(arg.to_string());
        self
    }

    pub fn color(mut self, color: TagColor) -> Self {
        self.service.color = Some(color);
        self
    }

    pub fn env_file(mut self, file: &str) -> Self {
        self.service.env_file = Some(file.to_string());
        self
    }

    pub fn dependency_marker(mut self, marker: &str) -> Self {
        self.service.dependency_marker = Some(marker.to_string());
        self
    }

    pub fn shell(mut self, val: bool) -> Self {
        self.service.shell = val;
        self
    }

    pub fn build(self) -> ServiceConfig {
        self.service
    }
}

/// A descriptor with no dependency marker, tagged cyan.
pub fn descriptor(name: &str, working_dir: impl Into<PathBuf>) -> ServiceDescriptor {
    ServiceDescriptor {
        name: name.to_string(),
        working_dir: working_dir.into(),
        command: "true".to_string(),
        args: vec![],
        tag: DisplayTag::new(name, TagColor::Cyan),
        dependency_marker: None,
        shell: false,
    }
}
