use clap::CommandFactory;

use crate::{
    cli::{Cli, CommandName, Invocation},
    client::config::ClientConfig,
};

/// Everything a handler may read while running.
#[derive(Debug, Clone, Copy)]
pub struct CommandContext<'a> {
    pub invocation: &'a Invocation,
    pub config: &'a ClientConfig,
}

/// A registered subcommand implementation. Returns the process status on completion.
pub trait CommandHandler {
    fn run(&self, ctx: &CommandContext<'_>) -> anyhow::Result<i32>;
}

/// Registry entry: a handler plus the metadata the dispatcher consults.
pub struct RegistryEntry {
    name: CommandName,
    hidden: bool,
    requires_target: bool,
    handler: Box<dyn CommandHandler>,
}

impl RegistryEntry {
    pub fn new(name: CommandName, handler: impl CommandHandler + 'static) -> Self {
        Self {
            name,
            hidden: false,
            requires_target: true,
            handler: Box::new(handler),
        }
    }

    /// Leave the entry out of `--help` listings. It stays invocable by exact name.
    pub fn hidden(mut self) -> Self {
        self.hidden = true;
        self
    }

    /// Allow running without `--internal` or a connection context.
    pub fn without_target(mut self) -> Self {
        self.requires_target = false;
        self
    }

    pub fn name(&self) -> CommandName {
        self.name
    }

    pub fn is_hidden(&self) -> bool {
        self.hidden
    }

    pub fn requires_target(&self) -> bool {
        self.requires_target
    }

    pub fn handler(&self) -> &dyn CommandHandler {
        self.handler.as_ref()
    }
}

/// Ordered, fixed set of subcommands built once at startup.
#[derive(Default)]
pub struct CommandRegistry {
    entries: Vec<RegistryEntry>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an entry. Registering a name twice replaces the earlier handler in place.
    pub fn register(mut self, entry: RegistryEntry) -> Self {
        match self
            .entries
            .iter_mut()
            .find(|existing| existing.name == entry.name)
        {
            Some(existing) => *existing = entry,
            None => self.entries.push(entry),
        }
        self
    }

    pub fn lookup(&self, name: CommandName) -> Option<&RegistryEntry> {
        self.entries.iter().find(|entry| entry.name == name)
    }

    pub fn entries(&self) -> impl Iterator<Item = &RegistryEntry> {
        self.entries.iter()
    }

    /// Entries shown in help listings.
    pub fn visible(&self) -> impl Iterator<Item = &RegistryEntry> {
        self.entries.iter().filter(|entry| !entry.hidden)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The `clap` command with registry visibility applied.
    pub fn cli_command(&self) -> clap::Command {
        self.entries
            .iter()
            .filter(|entry| entry.hidden)
            .fold(Cli::command(), |command, entry| {
                command.mut_subcommand(entry.name.as_str(), |sub| sub.hide(true))
            })
    }
}
