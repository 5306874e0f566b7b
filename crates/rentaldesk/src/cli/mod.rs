//! Command-line interface for rentaldesk.
//!
//! This module provides the CLI structure for the `rentdesk` binary and the
//! plain-text rendering of records.

mod commands;
pub mod render;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use commands::{
    CandidatesCommand, ConfigCommand, ListCommand, OutputFormat, ReplaceCommand, ReturnCommand,
};

/// rentdesk - Keep track of the cars at a rental desk
///
/// Shows which cars are out with renters and which are in the pool, and
/// swaps a rented car for one from the pool when it breaks down.
#[derive(Debug, Parser)]
#[command(name = "rentdesk")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to custom configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v for info, -vv for trace)
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
    /// Show rented and available cars
    List(ListCommand),

    /// Show cars that can replace a rented car
    Candidates(CandidatesCommand),

    /// Swap a rented car for one from the pool
    Replace(ReplaceCommand),

    /// Put a car back into the pool
    Return(ReturnCommand),

    /// View or check configuration
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
