//! Load and validate the Fisheye client configuration.
use std::{env, ffi::OsString, path::PathBuf};

use serde::Deserialize;
use tracing::{error, info};

use crate::lib::errors::ConfigError;

pub mod agent;
pub mod storage;
pub mod telemetry;

pub use agent::{parse_agent_section, AgentSection, RawAgentSection, DEFAULT_AGENT_PROGRAM};
pub use storage::{parse_storage_section, RawStorageSection, StorageSection};

pub(crate) const CONFIG_ENV_KEY: &str = crate::lib::agent::ENV_CONFIG_FILE;

/// Where the configuration path came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigSource {
    Cli,
    Env,
}

/// Top-level configuration container. Built once per invocation and passed by reference.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub agent: AgentSection,
    pub storage: StorageSection,
    /// `None` when running on built-in defaults.
    pub source_path: Option<PathBuf>,
}

#[derive(Debug, Deserialize)]
struct RawClientConfig {
    agent: Option<RawAgentSection>,
    storage: Option<RawStorageSection>,
}

impl ClientConfig {
    /// Resolve the config path (`--configFile` → `FISHEYE_CONFIG_FILE` → none) and load it.
    /// Without a path the built-in defaults are used.
    pub fn bootstrap(cli_path: Option<PathBuf>) -> Result<Self, ConfigError> {
        Self::bootstrap_from(cli_path, env::var_os(CONFIG_ENV_KEY))
    }

    /// `bootstrap` with the environment value supplied by the caller.
    pub fn bootstrap_from(
        cli_path: Option<PathBuf>,
        env_path: Option<OsString>,
    ) -> Result<Self, ConfigError> {
        match resolve_config_path(cli_path, env_path) {
            Some((path, source)) => {
                telemetry::log_source(&path, source);
                Self::load_from_path(path)
            }
            None => {
                telemetry::log_defaults();
                Ok(Self::defaults())
            }
        }
    }

    /// Built-in configuration used when no file is supplied.
    pub fn defaults() -> Self {
        Self {
            agent: AgentSection::default(),
            storage: StorageSection::default(),
            source_path: None,
        }
    }

    /// Load configuration from a specific path.
    pub fn load_from_path(path: PathBuf) -> Result<Self, ConfigError> {
        info!(
            target: "fisheye::config",
            path = %path.display(),
            "Starting configuration load"
        );

        let builder = config::Config::builder().add_source(
            config::File::from(path.clone()).format(config::FileFormat::Toml),
        );
        let document = builder.build().map_err(|err| {
            let error = ConfigError::from_read_error(path.clone(), err);
            error!(
                target: "fisheye::config",
                path = %path.display(),
                reason = %error,
                "Failed to read configuration file"
            );
            error
        })?;

        let raw: RawClientConfig = document.try_deserialize().map_err(|err| {
            let error = ConfigError::from_parse_error(path.clone(), err);
            error!(
                target: "fisheye::config",
                path = %path.display(),
                reason = %error,
                "Failed to parse configuration file"
            );
            error
        })?;

        let config = Self::from_raw(raw, path.clone()).map_err(|err| {
            error!(
                target: "fisheye::config",
                path = %path.display(),
                reason = %err,
                "Failed to validate configuration file"
            );
            err
        })?;

        telemetry::log_loaded(&config);
        Ok(config)
    }

    fn from_raw(raw: RawClientConfig, path: PathBuf) -> Result<Self, ConfigError> {
        let agent = parse_agent_section(raw.agent, &path)?;
        let storage = parse_storage_section(raw.storage, &path)?;

        Ok(Self {
            agent,
            storage,
            source_path: Some(path),
        })
    }
}

fn resolve_config_path(
    cli_path: Option<PathBuf>,
    env_path: Option<OsString>,
) -> Option<(PathBuf, ConfigSource)> {
    if let Some(path) = cli_path {
        return Some((path, ConfigSource::Cli));
    }
    match env_path {
        Some(value) if !value.is_empty() => Some((PathBuf::from(value), ConfigSource::Env)),
        _ => None,
    }
}
