//! Tooling & Integration Layer
//!
//! Command-line access to the configured store.

pub mod cli;

pub use cli::{Cli, CliContext, Commands};
