//! External anchoring commands.
//!
//! The ledger never talks to an anchoring service itself. `fingerprint`
//! prints the value to submit; `attach` records what the service answered.

use anyhow::{bail, Context, Result};
use clap::{Args, Subcommand};
use colored::Colorize;
use recipechain_core::ExternalAck;
use std::path::PathBuf;

#[derive(Args)]
pub struct AnchorArgs {
    #[command(subcommand)]
    command: AnchorCommand,
}

#[derive(Subcommand)]
enum AnchorCommand {
    /// Print the fingerprint to submit for a record
    Fingerprint {
        /// Directory to store ledger data
        #[arg(short, long, default_value = "./data")]
        data_dir: PathBuf,

        /// Record index
        index: u64,
    },
    /// Attach the anchoring service's answer to a record
    Attach {
        /// Directory to store ledger data
        #[arg(short, long, default_value = "./data")]
        data_dir: PathBuf,

        /// Record index
        index: u64,

        /// Confirmation id (e.g. transaction hash) returned by the service
        #[arg(long, conflicts_with = "error", required_unless_present = "error")]
        tx_hash: Option<String>,

        /// Error message returned by the service
        #[arg(long)]
        error: Option<String>,
    },
}

pub fn run(args: AnchorArgs) -> Result<()> {
    match args.command {
        AnchorCommand::Fingerprint { data_dir, index } => {
            let ledger = super::open_ledger(&data_dir)?;
            let fingerprint = ledger.fingerprint(index)?;
            println!("{}", fingerprint);
            Ok(())
        }
        AnchorCommand::Attach {
            data_dir,
            index,
            tx_hash,
            error,
        } => attach(data_dir, index, tx_hash, error),
    }
}

fn attach(
    data_dir: PathBuf,
    index: u64,
    tx_hash: Option<String>,
    error: Option<String>,
) -> Result<()> {
    let ledger = super::open_ledger(&data_dir)?;
    let fingerprint = ledger.fingerprint(index)?;

    let ack = match (tx_hash, error) {
        (Some(confirmation_id), _) => ExternalAck::Confirmed {
            fingerprint,
            confirmation_id,
        },
        (None, Some(error_message)) => ExternalAck::Failed {
            fingerprint,
            error_message,
        },
        (None, None) => bail!("either --tx-hash or --error is required"),
    };

    let record = ledger
        .attach_ack(index, ack)
        .with_context(|| format!("Failed to attach acknowledgment to record {}", index))?;

    println!();
    println!("{}  Acknowledgment attached", "✓".green().bold());
    println!("    Index:       {}", record.index.to_string().bright_cyan());
    println!("    Hash:        {}", record.hash.bright_yellow());
    if let Some(ack) = &record.onchain {
        println!("    Fingerprint: {}", ack.fingerprint().bright_black());
    }
    println!();

    Ok(())
}
