//! CLI module
//!
//! Command-line interface for the tap.
//!
//! # Commands
//!
//! - `discover` - Print the catalog of available streams
//! - `sync` - Extract records, writing messages to stdout

mod commands;
mod runner;

pub use commands::{Cli, Commands};
pub use runner::Runner;
