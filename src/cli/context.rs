//! Typed invocation model built from parsed arguments.
use std::{fmt, path::PathBuf, str::FromStr};

use clap_complete::Shell;

/// Closed set of Fisheye subcommands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandName {
    DumpHeap,
    DumpThreads,
    DumpNativeMemory,
    Profiler,
    Info,
    Process,
    LogConfiguration,
    FileStorage,
    PrepareEnvironment,
    Test,
    GenerateCompletion,
}

impl CommandName {
    /// Subcommands whose behavior lives in the Fisheye agent, in help order.
    pub const FORWARDED: [CommandName; 10] = [
        CommandName::DumpHeap,
        CommandName::DumpThreads,
        CommandName::DumpNativeMemory,
        CommandName::Profiler,
        CommandName::Info,
        CommandName::Process,
        CommandName::LogConfiguration,
        CommandName::FileStorage,
        CommandName::PrepareEnvironment,
        CommandName::Test,
    ];

    pub const fn as_str(&self) -> &'static str {
        match self {
            CommandName::DumpHeap => "dump-heap",
            CommandName::DumpThreads => "dump-threads",
            CommandName::DumpNativeMemory => "dump-native-memory",
            CommandName::Profiler => "profiler",
            CommandName::Info => "info",
            CommandName::Process => "process",
            CommandName::LogConfiguration => "log-configuration",
            CommandName::FileStorage => "file-storage",
            CommandName::PrepareEnvironment => "prepare-environment",
            CommandName::Test => "test",
            CommandName::GenerateCompletion => "generate-completion",
        }
    }
}

impl fmt::Display for CommandName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Host/port/app triple identifying the monitored process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionContext {
    pub host: String,
    pub port: u16,
    /// Namespace for artifacts stored locally.
    pub app: String,
}

/// Username and password for basic login.
#[derive(Clone, PartialEq, Eq)]
pub struct BasicCredentials {
    pub username: String,
    password: String,
}

impl BasicCredentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    pub fn password(&self) -> &str {
        &self.password
    }
}

impl fmt::Debug for BasicCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BasicCredentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Login selector. Olympus and basic credentials never coexist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Authentication {
    None,
    Olympus,
    Basic(BasicCredentials),
}

impl Authentication {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Authentication::None => "none",
            Authentication::Olympus => "olympus",
            Authentication::Basic(_) => "basic",
        }
    }
}

/// SOCKS proxy address in `host:port` form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SocksProxy {
    pub host: String,
    pub port: u16,
}

impl FromStr for SocksProxy {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let (host, port) = value
            .rsplit_once(':')
            .ok_or_else(|| format!("expected host:port, got `{value}`"))?;
        if host.trim().is_empty() {
            return Err(format!("proxy host is empty in `{value}`"));
        }
        let port = port
            .parse::<u16>()
            .ok()
            .filter(|port| *port != 0)
            .ok_or_else(|| format!("proxy port must be in 1-65535, got `{port}`"))?;
        Ok(Self {
            host: host.to_string(),
            port,
        })
    }
}

impl fmt::Display for SocksProxy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

/// `clap` value parser for `--socks`.
pub fn parse_socks_proxy(value: &str) -> Result<SocksProxy, String> {
    value.parse()
}

/// Transport options for remote targets.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Transport {
    pub secure: bool,
    pub socks_proxy: Option<SocksProxy>,
}

/// Everything needed to reach and log into a remote process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteTarget {
    pub connection: ConnectionContext,
    pub authentication: Authentication,
    pub transport: Transport,
}

impl RemoteTarget {
    /// Base URL of the monitored process.
    pub fn endpoint(&self) -> String {
        let scheme = if self.transport.secure {
            "https"
        } else {
            "http"
        };
        format!(
            "{scheme}://{host}:{port}",
            host = self.connection.host,
            port = self.connection.port
        )
    }
}

/// Either internal mode or a remote process, never both.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    Internal,
    Remote(RemoteTarget),
}

impl Target {
    pub const fn mode(&self) -> &'static str {
        match self {
            Target::Internal => "internal",
            Target::Remote(_) => "remote",
        }
    }
}

/// Subcommand-specific arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandArgs {
    /// Passed through to the agent unchanged.
    Forwarded(Vec<String>),
    Completion(Shell),
}

/// Fully parsed and validated command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub command: CommandName,
    pub target: Option<Target>,
    pub config_file: Option<PathBuf>,
    pub args: CommandArgs,
}

impl Invocation {
    pub fn forwarded_args(&self) -> &[String] {
        match &self.args {
            CommandArgs::Forwarded(args) => args,
            CommandArgs::Completion(_) => &[],
        }
    }

    pub fn remote(&self) -> Option<&RemoteTarget> {
        match &self.target {
            Some(Target::Remote(remote)) => Some(remote),
            _ => None,
        }
    }
}
