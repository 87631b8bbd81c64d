//! Subcommand registry and dispatch.
mod dispatch;
mod registry;

pub use dispatch::{run_with, CommandExit};
pub use registry::{CommandContext, CommandHandler, CommandRegistry, RegistryEntry};
