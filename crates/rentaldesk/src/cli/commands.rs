//! CLI command definitions.
//!
//! This module defines the structure of all CLI subcommands.

use std::path::PathBuf;

use clap::{Args, Subcommand, ValueEnum};

/// List command arguments.
#[derive(Debug, Args)]
pub struct ListCommand {
    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,
}

/// Candidates command arguments.
#[derive(Debug, Args)]
pub struct CandidatesCommand {
    /// Plate of the rented car that needs replacing
    pub rented_plate: String,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,
}

/// Replace command arguments.
#[derive(Debug, Args)]
pub struct ReplaceCommand {
    /// Plate of the rented car to take back
    pub rented_plate: String,

    /// Plate of the car to hand out instead (first eligible car if omitted)
    pub replacement_plate: Option<String>,

    /// Output the result as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Return command arguments.
#[derive(Debug, Args)]
pub struct ReturnCommand {
    /// Make and model of the returned car
    pub car_name: String,

    /// Plate of the returned car
    pub plate: String,

    /// Vehicle class of the returned car
    #[arg(short = 't', long)]
    pub car_type: Option<String>,
}

/// Configuration commands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Show the configuration file path
    Path,

    /// Validate configuration
    Validate {
        /// Path to configuration file to validate
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
}

/// Output format for commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// One line per car
    #[default]
    Plain,
    /// Aligned columns
    Table,
    /// JSON output
    Json,
}
