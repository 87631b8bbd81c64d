use std::{
    io,
    path::PathBuf,
    sync::{Arc, Mutex},
};

use anyhow::Result;
use fisheye_cli::{
    cli::{CommandName, Target},
    client::runtime::{CommandContext, CommandHandler},
    commands::{AgentRequest, Collaborator},
};
use tracing_subscriber::fmt::MakeWriter;

pub const BINARY_PATH: &str = env!("CARGO_BIN_EXE_fisheye");

pub fn fixture(relative: &str) -> String {
    let root = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    root.join("tests/fixtures")
        .join(relative)
        .display()
        .to_string()
}

/// One call observed by `RecordingCollaborator`.
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub command: CommandName,
    pub target: Option<Target>,
    pub forwarded_args: Vec<String>,
    pub config_path: Option<PathBuf>,
}

/// Collaborator double that records requests and answers with a fixed status.
#[derive(Debug, Default)]
pub struct RecordingCollaborator {
    status: i32,
    calls: Mutex<Vec<RecordedCall>>,
}

impl RecordingCollaborator {
    pub fn with_status(status: i32) -> Arc<Self> {
        Arc::new(Self {
            status,
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().expect("calls lock").clone()
    }
}

impl Collaborator for RecordingCollaborator {
    fn execute(&self, request: &AgentRequest<'_>) -> Result<i32> {
        self.calls.lock().expect("calls lock").push(RecordedCall {
            command: request.command,
            target: request.invocation.target.clone(),
            forwarded_args: request.invocation.forwarded_args().to_vec(),
            config_path: request.config.source_path.clone(),
        });
        Ok(self.status)
    }
}

/// Handler double that fails in a chosen way.
pub enum FailingHandler {
    Error(&'static str),
    Panic(&'static str),
}

impl CommandHandler for FailingHandler {
    fn run(&self, _ctx: &CommandContext<'_>) -> Result<i32> {
        match self {
            FailingHandler::Error(message) => Err(anyhow::anyhow!(*message)),
            FailingHandler::Panic(message) => panic!("{message}"),
        }
    }
}

/// In-memory log sink for asserting on emitted events.
#[derive(Clone, Default)]
pub struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

impl CapturedLogs {
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().expect("log lock")).into_owned()
    }
}

impl io::Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().expect("log lock").extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for CapturedLogs {
    type Writer = CapturedLogs;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

/// Run `test` with a thread-local subscriber and return its result plus the log text.
pub fn with_captured_logs<T>(test: impl FnOnce() -> T) -> (T, String) {
    let logs = CapturedLogs::default();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(logs.clone())
        .with_ansi(false)
        .with_max_level(tracing::Level::DEBUG)
        .finish();
    let result = tracing::subscriber::with_default(subscriber, test);
    (result, logs.contents())
}
