//! CLI argument definitions and `Invocation` construction.
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;

use super::{
    parse_socks_proxy, Authentication, BasicCredentials, CommandArgs, CommandName,
    ConnectionContext, Invocation, RemoteTarget, SocksProxy, Target, Transport,
};
use crate::lib::errors::UsageError;

/// Every argument that only makes sense when talking to a remote process.
const CONNECTION_ARG_IDS: [&str; 9] = [
    "host",
    "port",
    "app",
    "secure",
    "socks_proxy",
    "config_file",
    "olympus",
    "username",
    "password",
];

/// Command-line arguments.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "fisheye",
    author,
    version,
    about = "Command line interface (CLI) for the Fisheye monitoring tool.",
    long_about = "Command line interface (CLI) for the Fisheye monitoring tool.\nThis CLI connects to a Fisheye enabled Java application that runs on a remote endpoint (hostname:port).",
    disable_help_subcommand = true
)]
pub struct Cli {
    /// Set this option to run commands internal to Fisheye.
    #[arg(long, conflicts_with_all = CONNECTION_ARG_IDS)]
    pub internal: bool,

    #[command(flatten)]
    pub connection: ConnectionArgs,

    #[command(flatten)]
    pub login: LoginArgs,

    #[command(subcommand)]
    pub command: CliCommand,
}

/// Target process coordinates and transport options.
#[derive(Debug, Clone, Args)]
pub struct ConnectionArgs {
    /// Hostname of the machine where the target process is running.
    #[arg(value_name = "HOST", requires_all = ["port", "app"])]
    pub host: Option<String>,

    /// Port on the machine to which the target process is listening for connections.
    #[arg(
        value_name = "PORT",
        value_parser = clap::value_parser!(u16).range(1..),
        requires = "host"
    )]
    pub port: Option<u16>,

    /// Name of the target process. Files exported for local analysis are stored in
    /// directories named after it, so keep it consistent across monitoring sessions.
    #[arg(value_name = "APP", requires = "host")]
    pub app: Option<String>,

    /// Use HTTPS for connecting to the target process.
    #[arg(short = 'S', long, requires = "host")]
    pub secure: bool,

    /// SOCKS proxy used to reach the target process (format: host:port).
    #[arg(
        long = "socks",
        value_name = "HOST:PORT",
        value_parser = parse_socks_proxy,
        requires = "host"
    )]
    pub socks_proxy: Option<SocksProxy>,

    /// Path to Fisheye config file.
    #[arg(long = "configFile", value_name = "PATH", requires = "host")]
    pub config_file: Option<PathBuf>,
}

/// Login options; olympus and basic credentials are mutually exclusive.
#[derive(Debug, Clone, Args)]
pub struct LoginArgs {
    /// Use olympus based login.
    #[arg(
        short = 'O',
        long,
        requires = "host",
        conflicts_with_all = ["username", "password"]
    )]
    pub olympus: bool,

    /// Fisheye username for login.
    #[arg(short = 'U', long, value_name = "USER", requires_all = ["host", "password"])]
    pub username: Option<String>,

    /// Fisheye password for login. Do not share this with anyone.
    #[arg(short = 'P', long, value_name = "PASS", requires_all = ["host", "username"])]
    pub password: Option<String>,
}

/// Fisheye subcommands. Everything except completion generation runs in the agent.
#[derive(Debug, Clone, Subcommand)]
pub enum CliCommand {
    /// Capture a heap dump of the target process.
    DumpHeap(ForwardedArgs),
    /// Capture a thread dump of the target process.
    DumpThreads(ForwardedArgs),
    /// Capture a native memory tracking summary of the target process.
    DumpNativeMemory(ForwardedArgs),
    /// Start, stop or stream the profiler attached to the target process.
    Profiler(ForwardedArgs),
    /// Show information about the target process.
    Info(ForwardedArgs),
    /// Inspect the target process (JVM flags, system properties).
    Process(ForwardedArgs),
    /// Read or change the logging configuration of the target process.
    LogConfiguration(ForwardedArgs),
    /// Manage files exported for local analysis.
    FileStorage(ForwardedArgs),
    /// Prepare the local environment for monitoring sessions.
    PrepareEnvironment(ForwardedArgs),
    /// Check connectivity and credentials against the target process.
    Test(ForwardedArgs),
    /// Generate a shell completion script.
    #[command(hide = true)]
    GenerateCompletion(CompletionArgs),
}

/// Arguments handed to the Fisheye agent unchanged.
#[derive(Debug, Clone, Default, Args)]
pub struct ForwardedArgs {
    /// Subcommand arguments forwarded to the Fisheye agent.
    #[arg(
        value_name = "ARGS",
        trailing_var_arg = true,
        allow_hyphen_values = true
    )]
    pub args: Vec<String>,
}

/// Arguments for `generate-completion`.
#[derive(Debug, Clone, Args)]
pub struct CompletionArgs {
    /// Shell to generate the completion script for.
    #[arg(value_enum, default_value_t = Shell::Bash)]
    pub shell: Shell,
}

impl CliCommand {
    fn split(self) -> (CommandName, CommandArgs) {
        let (name, forwarded) = match self {
            CliCommand::DumpHeap(args) => (CommandName::DumpHeap, args),
            CliCommand::DumpThreads(args) => (CommandName::DumpThreads, args),
            CliCommand::DumpNativeMemory(args) => (CommandName::DumpNativeMemory, args),
            CliCommand::Profiler(args) => (CommandName::Profiler, args),
            CliCommand::Info(args) => (CommandName::Info, args),
            CliCommand::Process(args) => (CommandName::Process, args),
            CliCommand::LogConfiguration(args) => (CommandName::LogConfiguration, args),
            CliCommand::FileStorage(args) => (CommandName::FileStorage, args),
            CliCommand::PrepareEnvironment(args) => (CommandName::PrepareEnvironment, args),
            CliCommand::Test(args) => (CommandName::Test, args),
            CliCommand::GenerateCompletion(args) => {
                return (
                    CommandName::GenerateCompletion,
                    CommandArgs::Completion(args.shell),
                )
            }
        };
        (name, CommandArgs::Forwarded(forwarded.args))
    }
}

impl Cli {
    /// Convert parsed arguments into the typed invocation model.
    pub fn into_invocation(self) -> Result<Invocation, UsageError> {
        let (command, args) = self.command.split();
        let config_file = self.connection.config_file.clone();

        let target = if self.internal {
            Some(Target::Internal)
        } else {
            remote_target(self.connection, self.login)?.map(Target::Remote)
        };

        Ok(Invocation {
            command,
            target,
            config_file,
            args,
        })
    }
}

fn remote_target(
    connection: ConnectionArgs,
    login: LoginArgs,
) -> Result<Option<RemoteTarget>, UsageError> {
    let connection_context = match (connection.host, connection.port, connection.app) {
        (Some(host), Some(port), Some(app)) => ConnectionContext { host, port, app },
        (None, None, None) => return Ok(None),
        _ => return Err(UsageError::IncompleteConnection),
    };

    let authentication = match (login.olympus, login.username, login.password) {
        (true, None, None) => Authentication::Olympus,
        (true, _, _) => return Err(UsageError::ConflictingLogin),
        (false, Some(username), Some(password)) => {
            Authentication::Basic(BasicCredentials::new(username, password))
        }
        (false, None, None) => Authentication::None,
        (false, _, _) => return Err(UsageError::IncompleteCredentials),
    };

    Ok(Some(RemoteTarget {
        connection: connection_context,
        authentication,
        transport: Transport {
            secure: connection.secure,
            socks_proxy: connection.socks_proxy,
        },
    }))
}
