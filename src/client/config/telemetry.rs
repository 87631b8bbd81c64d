use tracing::{debug, info};

use super::{ClientConfig, ConfigSource, CONFIG_ENV_KEY};

pub fn log_source(path: &std::path::Path, source: ConfigSource) {
    match source {
        ConfigSource::Cli => debug!(
            target: "fisheye::config",
            path = %path.display(),
            "Loading configuration from --configFile"
        ),
        ConfigSource::Env => info!(
            target: "fisheye::config",
            path = %path.display(),
            env = CONFIG_ENV_KEY,
            "Loading configuration using FISHEYE_CONFIG_FILE environment variable"
        ),
    }
}

pub fn log_defaults() {
    debug!(
        target: "fisheye::config",
        env = CONFIG_ENV_KEY,
        "No configuration file given; using built-in defaults"
    );
}

pub fn log_loaded(config: &ClientConfig) {
    info!(
        target: "fisheye::config",
        path = %config
            .source_path
            .as_deref()
            .map(|path| path.display().to_string())
            .unwrap_or_default(),
        agent_program = %config.agent.program.display(),
        agent_args = config.agent.args.len(),
        storage_dir = %config.storage.base_dir.display(),
        "Configuration file loaded successfully"
    );
}
