//! Shared helpers for building Fisheye agent commands.

use std::{
    ffi::OsString,
    path::{Path, PathBuf},
    process::Command,
};

use crate::cli::{Authentication, Target};

pub const ENV_MODE: &str = "FISHEYE_MODE";
pub const ENV_HOST: &str = "FISHEYE_HOST";
pub const ENV_PORT: &str = "FISHEYE_PORT";
pub const ENV_APP: &str = "FISHEYE_APP";
pub const ENV_SECURE: &str = "FISHEYE_SECURE";
pub const ENV_SOCKS_PROXY: &str = "FISHEYE_SOCKS_PROXY";
pub const ENV_AUTH: &str = "FISHEYE_AUTH";
pub const ENV_USERNAME: &str = "FISHEYE_USERNAME";
pub const ENV_PASSWORD: &str = "FISHEYE_PASSWORD";
pub const ENV_CONFIG_FILE: &str = "FISHEYE_CONFIG_FILE";
pub const ENV_STORAGE_DIR: &str = "FISHEYE_STORAGE_DIR";

/// Every variable the bridge may set. Inherited values are removed before the
/// invocation's own values are applied.
pub const CONTEXT_ENV_KEYS: &[&str] = &[
    ENV_MODE,
    ENV_HOST,
    ENV_PORT,
    ENV_APP,
    ENV_SECURE,
    ENV_SOCKS_PROXY,
    ENV_AUTH,
    ENV_USERNAME,
    ENV_PASSWORD,
    ENV_CONFIG_FILE,
    ENV_STORAGE_DIR,
];

pub struct AgentCommandConfig<'a> {
    pub program: &'a Path,
    pub base_args: &'a [String],
    pub storage_dir: &'a Path,
    pub config_file: Option<&'a Path>,
}

pub struct AgentCommandRequest<'a> {
    pub command: &'a str,
    pub target: Option<&'a Target>,
    pub forwarded_args: &'a [String],
}

/// Build the agent process command for one subcommand.
///
/// Argument order is `<base_args...> <command> <forwarded_args...>`; the invocation
/// context travels in `FISHEYE_*` environment variables only.
pub fn build_agent_command(
    config: AgentCommandConfig<'_>,
    request: AgentCommandRequest<'_>,
) -> Command {
    let mut command = Command::new(config.program);
    for key in CONTEXT_ENV_KEYS {
        command.env_remove(key);
    }
    for (key, value) in context_env(&config, request.target) {
        command.env(key, value);
    }

    command.args(config.base_args);
    command.arg(request.command);
    command.args(request.forwarded_args);
    command
}

/// Environment variables describing the invocation context.
pub fn context_env(
    config: &AgentCommandConfig<'_>,
    target: Option<&Target>,
) -> Vec<(&'static str, OsString)> {
    let mut env = Vec::new();
    if let Some(path) = config.config_file {
        env.push((ENV_CONFIG_FILE, path.as_os_str().to_owned()));
    }

    match target {
        None => {
            env.push((ENV_STORAGE_DIR, config.storage_dir.as_os_str().to_owned()));
        }
        Some(Target::Internal) => {
            env.push((ENV_MODE, "internal".into()));
            env.push((ENV_STORAGE_DIR, config.storage_dir.as_os_str().to_owned()));
        }
        Some(Target::Remote(remote)) => {
            let connection = &remote.connection;
            let storage_dir: PathBuf =
                crate::lib::paths::app_storage_dir(config.storage_dir, &connection.app);
            env.push((ENV_MODE, "remote".into()));
            env.push((ENV_HOST, connection.host.clone().into()));
            env.push((ENV_PORT, connection.port.to_string().into()));
            env.push((ENV_APP, connection.app.clone().into()));
            env.push((ENV_SECURE, remote.transport.secure.to_string().into()));
            if let Some(proxy) = &remote.transport.socks_proxy {
                env.push((ENV_SOCKS_PROXY, proxy.to_string().into()));
            }
            env.push((ENV_AUTH, remote.authentication.as_str().into()));
            if let Authentication::Basic(credentials) = &remote.authentication {
                env.push((ENV_USERNAME, credentials.username.clone().into()));
                env.push((ENV_PASSWORD, credentials.password().to_owned().into()));
            }
            env.push((ENV_STORAGE_DIR, storage_dir.into_os_string()));
        }
    }
    env
}
