//! Library crate root re-exporting CLI, client and command modules.

#[path = "lib/mod.rs"]
pub mod lib_mod;
pub use lib_mod as lib;
pub mod cli;
pub mod client;
pub mod commands;
