//! Recipe commands: add, list, show.

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use recipechain_core::{ExternalAck, RecipeDraft, Record};
use std::path::PathBuf;

#[derive(Args)]
pub struct AddArgs {
    /// Directory to store ledger data
    #[arg(short, long, default_value = "./data")]
    data_dir: PathBuf,

    /// Recipe title
    #[arg(short, long)]
    title: String,

    /// Ingredient (repeat for each one)
    #[arg(short, long = "ingredient", required = true)]
    ingredients: Vec<String>,

    /// Step (repeat for each one, in order)
    #[arg(short, long = "step", required = true)]
    steps: Vec<String>,

    /// Who created the recipe
    #[arg(short, long)]
    creator: String,
}

#[derive(Args)]
pub struct ListArgs {
    /// Directory to store ledger data
    #[arg(short, long, default_value = "./data")]
    data_dir: PathBuf,

    /// Number of records to show
    #[arg(short, long, default_value = "10")]
    count: usize,
}

#[derive(Args)]
pub struct ShowArgs {
    /// Directory to store ledger data
    #[arg(short, long, default_value = "./data")]
    data_dir: PathBuf,

    /// Record index
    index: u64,
}

pub fn add(args: AddArgs) -> Result<()> {
    let ledger = super::open_ledger(&args.data_dir)?;

    println!("{}", "Sealing recipe...".bold().cyan());
    println!(
        "  Difficulty: {}",
        ledger.difficulty().to_string().bright_black()
    );

    let draft = RecipeDraft::new(args.title, args.ingredients, args.steps, args.creator);
    let record = ledger.append(draft).context("Failed to append recipe")?;

    println!();
    println!("{}  Recipe sealed", "✓".green().bold());
    println!("    Index:       {}", record.index.to_string().bright_cyan());
    println!("    Nonce:       {}", record.nonce.to_string().bright_black());
    println!("    Hash:        {}", record.hash.bright_yellow());
    println!("    Fingerprint: {}", record.fingerprint().bright_black());
    println!();

    Ok(())
}

pub fn list(args: ListArgs) -> Result<()> {
    let ledger = super::open_ledger(&args.data_dir)?;
    let records = ledger.records();

    println!();
    println!("{}", "Recent Records:".bold().cyan());
    println!();

    for record in records.iter().rev().take(args.count) {
        let anchor = match &record.onchain {
            Some(ack) if ack.is_confirmed() => " (anchored)".green(),
            Some(_) => " (anchor failed)".red(),
            None => "".normal(),
        };
        println!(
            "  {} {} {} {}{}",
            format!("#{}", record.index).bright_black(),
            short_hash(&record.hash).bright_yellow(),
            record.title.bold(),
            format!("by {}", record.creator).bright_black(),
            anchor
        );
    }

    println!();
    Ok(())
}

/// First 16 characters of a hash. Stored hashes are untrusted until
/// validated, so this never assumes they are ASCII.
fn short_hash(hash: &str) -> String {
    hash.chars().take(16).collect()
}

pub fn show(args: ShowArgs) -> Result<()> {
    let ledger = super::open_ledger(&args.data_dir)?;
    let record = ledger
        .record(args.index)
        .with_context(|| format!("Record {} not found", args.index))?;

    print_record(&record);
    Ok(())
}

fn print_record(record: &Record) {
    println!();
    println!("{}", "Record Information:".bold().cyan());
    println!();
    println!("  Index:         {}", record.index.to_string().bright_cyan());
    println!("  Title:         {}", record.title.bold());
    println!("  Creator:       {}", record.creator);
    println!(
        "  Timestamp:     {}",
        record.timestamp.to_string().bright_black()
    );
    println!("  Hash:          {}", record.hash.bright_yellow());
    println!("  Previous Hash: {}", record.previous_hash.bright_black());
    println!("  Nonce:         {}", record.nonce.to_string().bright_black());
    println!();

    println!("{}", "Ingredients:".bold());
    for ingredient in &record.ingredients {
        println!("  • {}", ingredient);
    }
    println!();

    println!("{}", "Steps:".bold());
    for (i, step) in record.steps.iter().enumerate() {
        println!("  {} {}", format!("{}.", i + 1).bright_black(), step);
    }
    println!();

    if let Some(ack) = &record.onchain {
        println!("{}", "External Anchor:".bold());
        println!("  Fingerprint:   {}", ack.fingerprint().bright_black());
        match ack {
            ExternalAck::Confirmed {
                confirmation_id, ..
            } => println!("  Confirmation:  {}", confirmation_id.green()),
            ExternalAck::Failed { error_message, .. } => {
                println!("  Error:         {}", error_message.red())
            }
        }
        println!();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LEDGER_FILE;
    use serde_json::Value;
    use std::fs;

    #[test]
    fn test_short_hash() {
        assert_eq!(short_hash(&"ab".repeat(32)), "abababababababab");
        assert_eq!(short_hash("00ff"), "00ff");
        assert_eq!(short_hash("0123456789abcdeé0000"), "0123456789abcdeé");
    }

    #[test]
    fn test_list_survives_non_ascii_hash() {
        let dir = tempfile::tempdir().unwrap();
        let list_args = || ListArgs {
            data_dir: dir.path().to_path_buf(),
            count: 10,
        };
        list(list_args()).unwrap();

        let path = dir.path().join(LEDGER_FILE);
        let mut records: Vec<Value> = serde_json::from_slice(&fs::read(&path).unwrap()).unwrap();
        records[0]["hash"] = Value::from("0123456789abcdeé0000");
        fs::write(&path, serde_json::to_vec_pretty(&records).unwrap()).unwrap();

        list(list_args()).unwrap();
    }
}
