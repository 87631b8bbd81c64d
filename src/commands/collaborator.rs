//! Bridge from registry entries to the external Fisheye agent.
use std::{process::ExitStatus, sync::Arc};

use tracing::debug;

use crate::{
    cli::{CommandName, Invocation},
    client::{
        config::ClientConfig,
        runtime::{CommandContext, CommandHandler},
    },
    lib::{
        agent::{build_agent_command, AgentCommandConfig, AgentCommandRequest},
        errors::AgentError,
    },
};

/// One subcommand execution handed to the agent.
#[derive(Debug, Clone, Copy)]
pub struct AgentRequest<'a> {
    pub command: CommandName,
    pub invocation: &'a Invocation,
    pub config: &'a ClientConfig,
}

/// External component that owns the behavior of the functional subcommands.
pub trait Collaborator {
    /// Run the subcommand and return its status.
    fn execute(&self, request: &AgentRequest<'_>) -> anyhow::Result<i32>;
}

/// Runs the configured agent executable as a child process with inherited stdio.
#[derive(Debug, Clone, Copy, Default)]
pub struct AgentProcess;

impl Collaborator for AgentProcess {
    fn execute(&self, request: &AgentRequest<'_>) -> anyhow::Result<i32> {
        let config = request.config;
        let mut command = build_agent_command(
            AgentCommandConfig {
                program: &config.agent.program,
                base_args: &config.agent.args,
                storage_dir: &config.storage.base_dir,
                config_file: config.source_path.as_deref(),
            },
            AgentCommandRequest {
                command: request.command.as_str(),
                target: request.invocation.target.as_ref(),
                forwarded_args: request.invocation.forwarded_args(),
            },
        );
        debug!(
            target: "fisheye::agent",
            program = %config.agent.program.display(),
            command = request.command.as_str(),
            "Starting Fisheye agent"
        );

        let status = command.status().map_err(|source| AgentError::Spawn {
            program: config.agent.program.clone(),
            source,
        })?;
        Ok(status_code(status))
    }
}

/// Exit code of a finished child. Termination by signal counts as status 1.
fn status_code(status: ExitStatus) -> i32 {
    status.code().unwrap_or(1)
}

/// Registry handler that forwards one subcommand to a collaborator.
pub struct ForwardingHandler {
    command: CommandName,
    collaborator: Arc<dyn Collaborator>,
}

impl ForwardingHandler {
    pub fn new(command: CommandName, collaborator: Arc<dyn Collaborator>) -> Self {
        Self {
            command,
            collaborator,
        }
    }
}

impl CommandHandler for ForwardingHandler {
    fn run(&self, ctx: &CommandContext<'_>) -> anyhow::Result<i32> {
        self.collaborator.execute(&AgentRequest {
            command: self.command,
            invocation: ctx.invocation,
            config: ctx.config,
        })
    }
}
