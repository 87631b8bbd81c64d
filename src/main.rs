//! Entry point for the Fisheye CLI.
use std::{process::ExitCode, sync::Arc};

use fisheye_cli::{
    client::runtime::{self, CommandExit},
    commands::{self, AgentProcess},
    lib::telemetry,
};

fn main() -> ExitCode {
    bootstrap().report()
}

fn bootstrap() -> CommandExit {
    if let Err(err) = telemetry::init_tracing() {
        eprintln!("{err:?}");
        return CommandExit::from_error(err);
    }
    let registry = commands::standard_registry(Arc::new(AgentProcess));
    runtime::run_with(std::env::args_os(), &registry)
}
