//! Tracing initialization and per-invocation span helpers.

use std::time::Instant;

use anyhow::Result;
use serde::Serialize;
use tracing::{info, info_span, warn, Span};
use tracing_subscriber::{fmt, EnvFilter};
use uuid::Uuid;

/// Default filter when `RUST_LOG` is unset. Info lines would interleave with agent output.
const DEFAULT_FILTER: &str = "warn";

/// Initialize `tracing` and format developer logs on stderr.
pub fn init_tracing() -> Result<()> {
    if tracing::dispatcher::has_been_set() {
        return Ok(());
    }

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    fmt()
        .with_env_filter(env_filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|err| anyhow::anyhow!("failed to initialize tracing: {err}"))
}

/// Span helper to record start and finish of a dispatched subcommand.
pub struct InvocationSpan {
    span: Span,
    started_at: Instant,
    invocation_id: Uuid,
}

impl InvocationSpan {
    /// Start a span for `command`.
    pub fn start(command: &'static str) -> Self {
        let invocation_id = Uuid::new_v4();
        let span = info_span!(
            target: "fisheye::dispatch",
            "fisheye_command",
            %invocation_id,
            command
        );
        Self {
            span,
            started_at: Instant::now(),
            invocation_id,
        }
    }

    /// Close the span while recording the exit code.
    pub fn finish(self, exit_code: Option<i32>) {
        let elapsed_ms = self.started_at.elapsed().as_millis();
        let _entered = self.span.enter();
        info!(
            target: "fisheye::dispatch",
            invocation_id = %self.invocation_id,
            exit_code = exit_code,
            elapsed_ms = elapsed_ms,
            "Completed Fisheye command"
        );
    }
}

/// Payload for logging the resolved session before dispatch.
#[derive(Debug, Serialize)]
pub struct DispatchTelemetry<'a> {
    pub command: &'a str,
    pub mode: &'a str,
    pub endpoint: Option<&'a str>,
    pub auth: &'a str,
    pub socks_proxy: Option<&'a str>,
    pub config_path: Option<&'a str>,
    pub forwarded_args: usize,
}

/// Emit the dispatch decision to `tracing` as a JSON payload.
pub fn emit_dispatch(telemetry: &DispatchTelemetry<'_>) {
    match serde_json::to_string(telemetry) {
        Ok(payload) => info!(
            target: "fisheye::dispatch",
            command = telemetry.command,
            mode = telemetry.mode,
            payload = %payload,
            "Dispatching Fisheye command"
        ),
        Err(err) => warn!(
            target: "fisheye::dispatch",
            command = telemetry.command,
            error = %err,
            "Failed to serialize dispatch telemetry"
        ),
    }
}
