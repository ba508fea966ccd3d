//! Command-line interface for clientbook.
//!
//! This module provides the CLI structure for the `clientbook` binary. Each
//! subcommand maps onto one view: `list` is the searchable table, `add` and
//! `edit` are the form, `show` is the detail view.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use commands::{
    client_id, AddCommand, ClearFields, ClientFields, ConfigCommand, DeleteCommand, EditCommand,
    ListCommand, OutputFormat, ShowCommand, StatusCommand,
};

/// clientbook - Keep track of your training clients
///
/// Stores client records locally and suggests exercises from a public
/// exercise catalog.
#[derive(Debug, Parser)]
#[command(name = "clientbook")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to custom configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// The command to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// List clients, optionally filtered by name
    List(ListCommand),

    /// Add a new client
    Add(AddCommand),

    /// Edit an existing client
    Edit(EditCommand),

    /// Delete a client
    Delete(DeleteCommand),

    /// Show one client with exercise suggestions
    Show(ShowCommand),

    /// Show storage status
    Status(StatusCommand),

    /// View or validate configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

impl Cli {
    /// Get the verbosity level based on flags.
    #[must_use]
    pub fn verbosity(&self) -> crate::logging::Verbosity {
        if self.quiet {
            crate::logging::Verbosity::Quiet
        } else {
            match self.verbose {
                0 => crate::logging::Verbosity::Normal,
                1 => crate::logging::Verbosity::Verbose,
                _ => crate::logging::Verbosity::Trace,
            }
        }
    }
}
