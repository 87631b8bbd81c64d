//! `generate-completion`: shell completion scripts for `fisheye`.
use std::io::{self, Write};

use anyhow::bail;
use clap::CommandFactory;
use clap_complete::{generate, Shell};

use crate::{
    cli::{Cli, CommandArgs},
    client::runtime::{CommandContext, CommandHandler},
};

const BIN_NAME: &str = "fisheye";

#[derive(Debug, Clone, Copy, Default)]
pub struct CompletionHandler;

impl CommandHandler for CompletionHandler {
    fn run(&self, ctx: &CommandContext<'_>) -> anyhow::Result<i32> {
        let CommandArgs::Completion(shell) = ctx.invocation.args else {
            bail!(
                "completion handler cannot run `{}`",
                ctx.invocation.command
            );
        };
        let mut stdout = io::stdout().lock();
        write_completion(shell, &mut stdout)?;
        stdout.flush()?;
        Ok(0)
    }
}

/// Write the completion script for `shell` to `out`.
pub fn write_completion(shell: Shell, out: &mut dyn Write) -> io::Result<()> {
    let mut command = completion_command();
    generate(shell, &mut command, BIN_NAME, out);
    Ok(())
}

/// The CLI grammar without hidden subcommands. Completion generators list every
/// subcommand they are given, hidden or not.
fn completion_command() -> clap::Command {
    let full = Cli::command();
    clap::Command::new(BIN_NAME)
        .version(env!("CARGO_PKG_VERSION"))
        .disable_help_subcommand(true)
        .args(full.get_arguments().cloned())
        .groups(full.get_groups().cloned())
        .subcommands(
            full.get_subcommands()
                .filter(|sub| !sub.is_hide_set())
                .cloned(),
        )
}
