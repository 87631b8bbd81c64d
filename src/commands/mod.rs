//! Subcommand handlers and the standard registry.

pub mod collaborator;
pub mod completion;

use std::sync::Arc;

pub use collaborator::{AgentProcess, AgentRequest, Collaborator, ForwardingHandler};
pub use completion::{write_completion, CompletionHandler};

use crate::{
    cli::CommandName,
    client::runtime::{CommandRegistry, RegistryEntry},
};

/// Build the fixed Fisheye registry: ten agent-backed commands in help order,
/// then the hidden completion generator.
pub fn standard_registry(collaborator: Arc<dyn Collaborator>) -> CommandRegistry {
    CommandName::FORWARDED
        .into_iter()
        .fold(CommandRegistry::new(), |registry, name| {
            registry.register(RegistryEntry::new(
                name,
                ForwardingHandler::new(name, Arc::clone(&collaborator)),
            ))
        })
        .register(
            RegistryEntry::new(CommandName::GenerateCompletion, CompletionHandler)
                .hidden()
                .without_target(),
        )
}
