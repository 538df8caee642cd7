//! CLI commands module.

use crate::config::CliConfig;
use anyhow::{Context, Result};
use clap::Subcommand;
use colored::Colorize;
use recipechain_chain::{Ledger, Verdict};
use std::path::Path;

mod anchor;
mod init;
mod recipe;
mod verify;

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a new ledger
    Init(init::InitArgs),
    /// Seal and append a recipe
    Add(recipe::AddArgs),
    /// List recent records
    List(recipe::ListArgs),
    /// Show one record in full
    Show(recipe::ShowArgs),
    /// Verify one record and the chain it belongs to
    Verify(verify::VerifyArgs),
    /// Validate the whole chain
    Validate(verify::ValidateArgs),
    /// External anchoring: fingerprints and acknowledgments
    Anchor(anchor::AnchorArgs),
}

pub fn run(cmd: Commands) -> Result<()> {
    match cmd {
        Commands::Init(args) => init::run(args),
        Commands::Add(args) => recipe::add(args),
        Commands::List(args) => recipe::list(args),
        Commands::Show(args) => recipe::show(args),
        Commands::Verify(args) => verify::verify(args),
        Commands::Validate(args) => verify::validate(args),
        Commands::Anchor(args) => anchor::run(args),
    }
}

/// Open the ledger in `data_dir` using its saved configuration.
fn open_ledger(data_dir: &Path) -> Result<Ledger> {
    let config = CliConfig::load(data_dir)?;
    Ledger::open(config.ledger_config(data_dir))
        .with_context(|| format!("Failed to open ledger in {}", data_dir.display()))
}

/// Print a verdict in the same shape for every command.
fn print_verdict(verdict: &Verdict) {
    println!();
    if verdict.valid {
        println!("{}  {}", "✓".green().bold(), verdict.message.green());
    } else {
        println!("{}  {}", "✗".red().bold(), verdict.message.red());
    }
    println!();
}
