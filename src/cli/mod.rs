//! CLI module
//!
//! Command-line interface for querying MDS providers.
//!
//! # Commands
//!
//! - `status-changes` - Fetch status change pages
//! - `trips` - Fetch trip pages
//! - `sql` - Print an INSERT statement loading a staging table
//! - `providers` - List registered providers

mod commands;
mod runner;

pub use commands::{Cli, Commands, FetchArgs, OutputFormat};
pub use runner::Runner;
