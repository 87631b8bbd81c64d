//! Shared library modules providing error types, path helpers, and telemetry initialization.

pub mod agent;
pub mod errors;
pub mod paths;
pub mod telemetry;
