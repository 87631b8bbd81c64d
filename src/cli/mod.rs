//! CLI entrypoint module structure.

pub mod args;
pub mod context;

pub use args::{
    Cli, CliCommand, CompletionArgs, ConnectionArgs, ForwardedArgs, LoginArgs,
};
pub use context::{
    parse_socks_proxy, Authentication, BasicCredentials, CommandArgs, CommandName,
    ConnectionContext, Invocation, RemoteTarget, SocksProxy, Target, Transport,
};
