//! Command implementations for the `fieldset` binary.

pub mod cli;
pub mod commands;

pub use cli::{Cli, Commands};
