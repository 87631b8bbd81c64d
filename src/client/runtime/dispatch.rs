use std::{
    ffi::OsString,
    panic::{self, AssertUnwindSafe},
    process::ExitCode,
};

use anyhow::{anyhow, Context};
use clap::FromArgMatches;
use tracing::{debug, error};

use super::{CommandContext, CommandRegistry};
use crate::{
    cli::{Cli, Invocation},
    client::config::ClientConfig,
    lib::{
        errors::{UsageError, EXECUTION_EXIT_CODE},
        telemetry::{self, DispatchTelemetry, InvocationSpan},
    },
};

/// Why an invocation did not finish cleanly.
#[derive(Debug)]
enum Failure {
    /// Help or version output requested; printed to stdout with exit 0.
    Informational(clap::Error),
    Usage { error: UsageError, usage: String },
    /// The handler returned a non-zero status.
    Status(i32),
    Execution(anyhow::Error),
}

/// Outcome of one invocation: the exit code plus what to print for it.
#[derive(Debug)]
pub struct CommandExit {
    exit_code: u8,
    failure: Option<Failure>,
}

impl CommandExit {
    pub fn success() -> Self {
        Self {
            exit_code: 0,
            failure: None,
        }
    }

    fn informational(err: clap::Error) -> Self {
        Self {
            exit_code: 0,
            failure: Some(Failure::Informational(err)),
        }
    }

    pub fn usage(error: UsageError, usage: String) -> Self {
        Self {
            exit_code: error.exit_code(),
            failure: Some(Failure::Usage { error, usage }),
        }
    }

    /// Non-zero handler status. Codes outside 1..=255 map to 1.
    pub fn status(status: i32) -> Self {
        let exit_code = u8::try_from(status)
            .ok()
            .filter(|code| *code != 0)
            .unwrap_or(EXECUTION_EXIT_CODE);
        Self {
            exit_code,
            failure: Some(Failure::Status(status)),
        }
    }

    pub fn from_error(err: impl Into<anyhow::Error>) -> Self {
        Self {
            exit_code: EXECUTION_EXIT_CODE,
            failure: Some(Failure::Execution(err.into())),
        }
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }

    pub fn is_usage_error(&self) -> bool {
        matches!(self.failure, Some(Failure::Usage { .. }))
    }

    pub fn error(&self) -> Option<&anyhow::Error> {
        match &self.failure {
            Some(Failure::Execution(err)) => Some(err),
            _ => None,
        }
    }

    /// Print user-facing output and hand back the process exit code.
    /// Execution failures were already logged by the dispatcher.
    pub fn report(self) -> ExitCode {
        match self.failure {
            Some(Failure::Informational(err)) => {
                let _ = err.print();
            }
            Some(Failure::Usage {
                error: UsageError::Clap(err),
                ..
            }) => {
                let _ = err.print();
            }
            Some(Failure::Usage { error, usage }) => {
                eprintln!("error: {error}\n\n{usage}\n\nFor more information, try '--help'.");
            }
            Some(Failure::Status(_)) | Some(Failure::Execution(_)) | None => {}
        }
        ExitCode::from(self.exit_code)
    }
}

/// Parse `args`, bootstrap configuration once, and run the selected handler.
pub fn run_with<I, T>(args: I, registry: &CommandRegistry) -> CommandExit
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let mut command = registry.cli_command();
    let usage = command.render_usage().to_string();

    let invocation = match parse_invocation(&mut command, args) {
        Ok(invocation) => invocation,
        Err(ParseFailure::Informational(err)) => return CommandExit::informational(err),
        Err(ParseFailure::Usage(err)) => return usage_exit(err, usage),
    };

    let Some(entry) = registry.lookup(invocation.command) else {
        return usage_exit(
            UsageError::UnregisteredCommand {
                command: invocation.command.as_str(),
            },
            usage,
        );
    };
    if entry.requires_target() && invocation.target.is_none() {
        return usage_exit(
            UsageError::MissingTarget {
                command: invocation.command.as_str(),
            },
            usage,
        );
    }

    let config = match ClientConfig::bootstrap(invocation.config_file.clone())
        .context("failed to initialize Fisheye configuration")
    {
        Ok(config) => config,
        Err(err) => return execution_exit(err),
    };

    emit_dispatch(&invocation, &config);
    let span = InvocationSpan::start(invocation.command.as_str());
    let ctx = CommandContext {
        invocation: &invocation,
        config: &config,
    };
    let result = panic::catch_unwind(AssertUnwindSafe(|| entry.handler().run(&ctx)))
        .unwrap_or_else(|payload| Err(anyhow!("command panicked: {}", panic_message(&*payload))));

    match result {
        Ok(0) => {
            span.finish(Some(0));
            CommandExit::success()
        }
        Ok(status) => {
            span.finish(Some(status));
            error!(
                target: "fisheye::dispatch",
                command = invocation.command.as_str(),
                exit_code = status,
                "Command exited with error exit code"
            );
            CommandExit::status(status)
        }
        Err(err) => {
            span.finish(None);
            execution_exit(err.context(format!("`{}` failed", invocation.command)))
        }
    }
}

enum ParseFailure {
    Informational(clap::Error),
    Usage(UsageError),
}

fn parse_invocation<I, T>(command: &mut clap::Command, args: I) -> Result<Invocation, ParseFailure>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let matches = command.try_get_matches_from_mut(args).map_err(|err| {
        if err.use_stderr() {
            ParseFailure::Usage(UsageError::Clap(err))
        } else {
            ParseFailure::Informational(err)
        }
    })?;
    let cli = Cli::from_arg_matches(&matches)
        .map_err(|err| ParseFailure::Usage(UsageError::Clap(err.format(command))))?;
    cli.into_invocation().map_err(ParseFailure::Usage)
}

/// `report` prints the full diagnostic, so the log only carries a summary.
fn usage_exit(err: UsageError, usage: String) -> CommandExit {
    debug!(
        target: "fisheye::dispatch",
        reason = %err.summary(),
        "Invalid command line"
    );
    CommandExit::usage(err, usage)
}

fn execution_exit(err: anyhow::Error) -> CommandExit {
    error!(
        target: "fisheye::dispatch",
        error = ?err,
        "Command execution failed with error"
    );
    CommandExit::from_error(err)
}

fn emit_dispatch(invocation: &Invocation, config: &ClientConfig) {
    let remote = invocation.remote();
    let endpoint = remote.map(|remote| remote.endpoint());
    let socks_proxy = remote
        .and_then(|remote| remote.transport.socks_proxy.as_ref())
        .map(ToString::to_string);
    let config_path = config
        .source_path
        .as_deref()
        .map(|path| path.display().to_string());

    telemetry::emit_dispatch(&DispatchTelemetry {
        command: invocation.command.as_str(),
        mode: invocation
            .target
            .as_ref()
            .map(|target| target.mode())
            .unwrap_or("none"),
        endpoint: endpoint.as_deref(),
        auth: remote
            .map(|remote| remote.authentication.as_str())
            .unwrap_or("none"),
        socks_proxy: socks_proxy.as_deref(),
        config_path: config_path.as_deref(),
        forwarded_args: invocation.forwarded_args().len(),
    });
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic payload".to_string()
    }
}
