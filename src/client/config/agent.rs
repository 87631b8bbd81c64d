use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::lib::{errors::ConfigError, paths::is_nonempty};

pub const DEFAULT_AGENT_PROGRAM: &str = "fisheye-agent";

/// External agent settings.
#[derive(Debug, Clone)]
pub struct AgentSection {
    pub program: PathBuf,
    /// Placed before the subcommand name on every agent invocation.
    pub args: Vec<String>,
}

impl Default for AgentSection {
    fn default() -> Self {
        Self {
            program: PathBuf::from(DEFAULT_AGENT_PROGRAM),
            args: Vec::new(),
        }
    }
}

#[derive(Debug, Deserialize, Default)]
pub struct RawAgentSection {
    pub program: Option<PathBuf>,
    pub args: Option<Vec<String>>,
}

pub fn parse_agent_section(
    raw: Option<RawAgentSection>,
    path: &Path,
) -> Result<AgentSection, ConfigError> {
    let agent_raw = raw.unwrap_or_default();
    let program = agent_raw
        .program
        .unwrap_or_else(|| PathBuf::from(DEFAULT_AGENT_PROGRAM));
    if !is_nonempty(&program) {
        return Err(ConfigError::InvalidField {
            path: path.to_path_buf(),
            field: "agent.program",
            message: "Set a program name or path for the Fisheye agent".into(),
        });
    }

    Ok(AgentSection {
        program,
        args: agent_raw.args.unwrap_or_default(),
    })
}
