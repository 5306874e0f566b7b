//! `rentdesk` - CLI for rentaldesk
//!
//! This binary is the operator's front end: it loads both data files, runs
//! one command against them, and prints the result.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use std::io::{self, Write};

use anyhow::Context;
use clap::Parser;

use rentaldesk::cli::render;
use rentaldesk::cli::{
    CandidatesCommand, Cli, Command, ConfigCommand, ListCommand, ReplaceCommand, ReturnCommand,
};
use rentaldesk::{init_logging, Config, Desk, RecordStore};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    init_logging(cli.verbosity());

    // Load configuration
    let config = Config::load_from(cli.config.clone()).context("loading configuration")?;

    match cli.command {
        Command::List(cmd) => handle_list(&config, &cmd),
        Command::Candidates(cmd) => handle_candidates(&config, &cmd),
        Command::Replace(cmd) => handle_replace(&config, &cmd),
        Command::Return(cmd) => handle_return(&config, &cmd),
        Command::Config(cmd) => handle_config(&config, cmd),
    }
}

/// Load the desk and tell the operator about anything that was off.
fn open_desk(config: &Config) -> anyhow::Result<Desk> {
    let store = RecordStore::from_config(config);
    let (desk, warnings) = Desk::open(store).context("loading rental records")?;
    for warning in &warnings {
        eprintln!("notice: {warning}");
    }
    Ok(desk.with_persist_returns(config.desk.persist_returns))
}

fn handle_list(config: &Config, cmd: &ListCommand) -> anyhow::Result<()> {
    let desk = open_desk(config)?;
    let mut out = io::stdout().lock();
    let schema = desk.store().schema();
    render::write_listing(&mut out, desk.rented(), desk.available(), schema, cmd.format)?;
    Ok(())
}

fn handle_candidates(config: &Config, cmd: &CandidatesCommand) -> anyhow::Result<()> {
    let desk = open_desk(config)?;
    let candidates = desk.eligible_replacements_for(&cmd.rented_plate)?;
    if candidates.is_empty() {
        eprintln!("notice: no replacement available for {}", cmd.rented_plate);
    }
    let mut out = io::stdout().lock();
    render::write_available(&mut out, &candidates, desk.store().schema(), cmd.format)?;
    Ok(())
}

fn handle_replace(config: &Config, cmd: &ReplaceCommand) -> anyhow::Result<()> {
    let mut desk = open_desk(config)?;
    let outcome = match &cmd.replacement_plate {
        Some(plate) => desk.replace(&cmd.rented_plate, plate)?,
        None => desk.replace_with_next(&cmd.rented_plate)?,
    };

    let mut out = io::stdout().lock();
    if cmd.json {
        writeln!(out, "{}", serde_json::to_string_pretty(&outcome)?)?;
    } else {
        writeln!(out, "{outcome}")?;
    }
    Ok(())
}

fn handle_return(config: &Config, cmd: &ReturnCommand) -> anyhow::Result<()> {
    let mut desk = open_desk(config)?;
    let persisted = desk.return_car(&cmd.car_name, &cmd.plate, cmd.car_type.as_deref())?;

    println!("{} ({}) is back in the pool", cmd.car_name, cmd.plate);
    if !persisted {
        eprintln!("notice: returns are not saved; set desk.persist_returns to keep them");
    }
    Ok(())
}

fn handle_config(config: &Config, cmd: ConfigCommand) -> anyhow::Result<()> {
    match cmd {
        ConfigCommand::Show { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(config)?);
            } else {
                println!("Current Configuration");
                println!("=====================");
                println!();
                println!("[Storage]");
                println!("  Data directory:     {}", config.data_dir().display());
                println!("  Rented file:        {}", config.rented_path().display());
                println!("  Available file:     {}", config.available_path().display());
                println!("  Strict rows:        {}", config.storage.strict_rows);
                println!();
                println!("[Schema]");
                println!("  Car type column:    {}", config.schema.car_type_column);
                println!(
                    "  Available only:     {}",
                    config.schema.available_only_at_load
                );
                println!();
                println!("[Desk]");
                println!("  Persist returns:    {}", config.desk.persist_returns);
            }
        }
        ConfigCommand::Path => {
            println!("{}", Config::default_config_path().display());
        }
        ConfigCommand::Validate { file } => {
            let path = file.unwrap_or_else(Config::default_config_path);
            println!("Validating configuration: {}", path.display());
            match Config::load_from(Some(path)) {
                Ok(_) => println!("Configuration is valid."),
                Err(e) => println!("Configuration error: {e}"),
            }
        }
    }
    Ok(())
}
