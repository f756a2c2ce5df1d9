//! CLI module
//!
//! Command-line interface over the page loader and HTTP source.
//!
//! # Commands
//!
//! - `validate` - Load and check the configuration
//! - `fetch` - Page through the source and print every record
//! - `poll` - Refresh the first page periodically

mod commands;
mod runner;

pub use commands::{Cli, Commands, OutputFormat};
pub use runner::{parse_params, Runner};

#[cfg(test)]
mod tests;
