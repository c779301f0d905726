//! Tooling & Integration Layer
//!
//! Command-line access to a persistent ledger.

pub mod cli;

pub use cli::{parse_identity, Cli, CliContext, Commands, OutputFormat};
