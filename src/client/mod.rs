//! Client-side configuration and command dispatch.
pub mod config;
pub mod runtime;
