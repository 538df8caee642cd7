//! Initialize ledger command.

use crate::config::{CliConfig, LEDGER_FILE};
use anyhow::{bail, Context, Result};
use clap::Args;
use colored::Colorize;
use recipechain_chain::Ledger;
use recipechain_consensus::DEFAULT_DIFFICULTY;
use std::path::PathBuf;

#[derive(Args)]
pub struct InitArgs {
    /// Directory to store ledger data
    #[arg(short, long, default_value = "./data")]
    data_dir: PathBuf,

    /// Leading zero hex characters required of every sealed hash
    #[arg(long, default_value_t = DEFAULT_DIFFICULTY)]
    difficulty: usize,

    /// Give up sealing a record after this many nonce attempts
    #[arg(long)]
    max_attempts: Option<u64>,
}

pub fn run(args: InitArgs) -> Result<()> {
    println!("{}", "Initializing recipechain...".bold().cyan());
    println!();

    let ledger_file = args.data_dir.join(LEDGER_FILE);
    if ledger_file.exists() {
        bail!("Ledger already initialized: {}", ledger_file.display());
    }

    let config = CliConfig {
        difficulty: args.difficulty,
        max_attempts: args.max_attempts,
    };

    // Seal genesis before saving the config, so a failed init leaves nothing behind.
    let ledger = Ledger::open(config.ledger_config(&args.data_dir))
        .context("Failed to create genesis record")?;
    let genesis = ledger.latest();

    let config_file = config.save(&args.data_dir)?;
    println!(
        "{}  Saved config to: {}",
        "✓".green().bold(),
        config_file.display().to_string().bright_black()
    );

    println!("{}  Ledger ready", "✓".green().bold());
    println!("    Records:    {}", ledger.len().to_string().bright_cyan());
    println!("    Difficulty: {}", ledger.difficulty().to_string().bright_cyan());
    println!("    Genesis:    {}", genesis.hash.bright_yellow());

    println!();
    println!("Next steps:");
    println!(
        "  • Use {} to add a recipe",
        "recipechain add".bright_cyan()
    );
    println!(
        "  • Use {} to check the chain",
        "recipechain validate".bright_cyan()
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CONFIG_FILE;

    fn init_args(data_dir: &std::path::Path, difficulty: usize, max_attempts: Option<u64>) -> InitArgs {
        InitArgs {
            data_dir: data_dir.to_path_buf(),
            difficulty,
            max_attempts,
        }
    }

    #[test]
    fn test_init_creates_ledger_and_config() {
        let dir = tempfile::tempdir().unwrap();

        run(init_args(dir.path(), 1, None)).unwrap();

        assert!(dir.path().join(LEDGER_FILE).exists());
        let config = CliConfig::load(dir.path()).unwrap();
        assert_eq!(config.difficulty, 1);
        assert!(run(init_args(dir.path(), 1, None)).is_err());
    }

    #[test]
    fn test_failed_init_leaves_no_config() {
        let dir = tempfile::tempdir().unwrap();

        // One attempt will not find twelve leading zeros.
        let result = run(init_args(dir.path(), 12, Some(1)));

        assert!(result.is_err());
        assert!(!dir.path().join(CONFIG_FILE).exists());
        assert!(!dir.path().join(LEDGER_FILE).exists());
    }
}
