//! Verification commands.

use anyhow::{bail, Result};
use clap::Args;
use colored::Colorize;
use std::path::PathBuf;

#[derive(Args)]
pub struct VerifyArgs {
    /// Directory to store ledger data
    #[arg(short, long, default_value = "./data")]
    data_dir: PathBuf,

    /// Record index
    index: u64,
}

#[derive(Args)]
pub struct ValidateArgs {
    /// Directory to store ledger data
    #[arg(short, long, default_value = "./data")]
    data_dir: PathBuf,
}

pub fn verify(args: VerifyArgs) -> Result<()> {
    let ledger = super::open_ledger(&args.data_dir)?;

    println!(
        "{}",
        format!("Verifying record {}...", args.index).bold().cyan()
    );
    let verdict = ledger.verify_record(args.index);
    super::print_verdict(&verdict);

    if !verdict.valid {
        bail!("verification failed");
    }
    Ok(())
}

pub fn validate(args: ValidateArgs) -> Result<()> {
    let ledger = super::open_ledger(&args.data_dir)?;

    println!(
        "{}",
        format!("Validating {} records...", ledger.len()).bold().cyan()
    );
    let verdict = ledger.validate_chain();
    super::print_verdict(&verdict);

    if !verdict.valid {
        bail!("validation failed");
    }
    Ok(())
}
