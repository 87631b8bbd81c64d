use std::{io, path::PathBuf};

use config::ConfigError as ConfigLoaderError;
use thiserror::Error;

/// Exit code used for malformed or conflicting command lines.
pub const USAGE_EXIT_CODE: u8 = 2;
/// Exit code used when bootstrap or a subcommand raised an error.
pub const EXECUTION_EXIT_CODE: u8 = 1;

/// Errors that can occur while loading or validating the configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to build (read) the configuration file.
    #[error("Failed to read configuration file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: ConfigLoaderError,
    },
    /// Failed to deserialize TOML into a struct.
    #[error("Failed to parse configuration file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: ConfigLoaderError,
    },
    /// Field failed validation.
    #[error("Configuration file {path} has invalid `{field}`: {message}")]
    InvalidField {
        path: PathBuf,
        field: &'static str,
        message: String,
    },
}

impl ConfigError {
    /// Helper to wrap `config::ConfigError` as a read failure.
    pub fn from_read_error(path: PathBuf, source: ConfigLoaderError) -> Self {
        Self::FileRead { path, source }
    }

    /// Helper to wrap `config::ConfigError` as a parse failure.
    pub fn from_parse_error(path: PathBuf, source: ConfigLoaderError) -> Self {
        Self::Parse { path, source }
    }
}

/// Malformed, conflicting or incomplete command lines.
#[derive(Debug, Error)]
pub enum UsageError {
    /// Rejected by the argument grammar (unknown flag, conflicting group, missing value).
    #[error(transparent)]
    Clap(#[from] clap::Error),
    /// A functional subcommand was given neither `--internal` nor `<HOST> <PORT> <APP>`.
    #[error("`{command}` requires either --internal or <HOST> <PORT> <APP>")]
    MissingTarget { command: &'static str },
    /// Only part of `<HOST> <PORT> <APP>` was supplied.
    #[error("<HOST>, <PORT> and <APP> must be supplied together")]
    IncompleteConnection,
    /// `--olympus` combined with basic credentials.
    #[error("--olympus cannot be combined with --username/--password")]
    ConflictingLogin,
    /// Only one of `--username` and `--password` was supplied.
    #[error("--username and --password must be supplied together")]
    IncompleteCredentials,
    /// The subcommand parsed but has no registered handler.
    #[error("no handler is registered for `{command}`")]
    UnregisteredCommand { command: &'static str },
}

impl UsageError {
    pub const fn exit_code(&self) -> u8 {
        USAGE_EXIT_CODE
    }

    /// One-line description for logs. Rendered clap errors carry the full usage text,
    /// so only their kind is kept.
    pub fn summary(&self) -> String {
        match self {
            UsageError::Clap(err) => err
                .kind()
                .as_str()
                .map(str::to_owned)
                .unwrap_or_else(|| format!("{:?}", err.kind())),
            other => other.to_string(),
        }
    }
}

/// Failures talking to the external Fisheye agent.
#[derive(Debug, Error)]
pub enum AgentError {
    #[error("Failed to start Fisheye agent `{program}`: {source}")]
    Spawn {
        program: PathBuf,
        #[source]
        source: io::Error,
    },
}
