// src/config/validate.rs

use std::collections::HashSet;

use crate::config::model::{ConfigFile, RawConfigFile};
use crate::errors::{Result, SupervisorError};

impl TryFrom<RawConfigFile> for ConfigFile {
    type Error = crate::errors::SupervisorError;

    fn try_from(raw: RawConfigFile) -> std::result::Result<Self, Self::Error> {
        validate_raw_config(&raw)?;
        Ok(ConfigFile::new_unchecked(raw.config, raw.service))
    }
}

fn validate_raw_config(cfg: &RawConfigFile) -> Result<()> {
    ensure_has_services(cfg)?;
    validate_global_config(cfg)?;
    validate_services(cfg)?;
    Ok(())
}

fn ensure_has_services(cfg: &RawConfigFile) -> Result<()> {
    if cfg.service.is_empty() {
        return Err(SupervisorError::ConfigError(
            "config must contain at least one [[service]] entry".to_string(),
        ));
    }
    Ok(())
}

fn validate_global_config(cfg: &RawConfigFile) -> Result<()> {
    if cfg.config.env_dir.trim().is_empty() {
        return Err(SupervisorError::ConfigError(
            "[config].env_dir must not be empty".to_string(),
        ));
    }
    if cfg.config.env_target.trim().is_empty() {
        return Err(SupervisorError::ConfigError(
            "[config].env_target must not be empty".to_string(),
        ));
    }
    Ok(())
}

fn validate_services(cfg: &RawConfigFile) -> Result<()> {
    let mut seen = HashSet::new();

    for (index, svc) in cfg.service.iter().enumerate() {
        if svc.name.trim().is_empty() {
            return Err(SupervisorError::ConfigError(format!(
                "service #{} has an empty name",
                index + 1
            )));
        }
        if !seen.insert(svc.name.as_str()) {
            return Err(SupervisorError::ConfigError(format!(
                "duplicate service name '{}'",
                svc.name
            )));
        }
        if svc.command.trim().is_empty() {
            return Err(SupervisorError::ConfigError(format!(
                "service '{}' has an empty command",
                svc.name
            )));
        }
        if let Some(env_file) = &svc.env_file {
            if env_file.trim().is_empty() {
                return Err(SupervisorError::ConfigError(format!(
                    "service '{}' has an empty env_file",
                    svc.name
                )));
            }
        }
    }

    Ok(())
}
