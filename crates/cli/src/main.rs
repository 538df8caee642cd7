//! recipechain CLI entry point.

use clap::Parser;

mod commands;
mod config;
mod logging;

use logging::LogFormat;

#[derive(Parser)]
#[command(name = "recipechain")]
#[command(about = "A tamper-evident recipe ledger", long_about = None)]
struct Cli {
    /// Log output format
    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Pretty)]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Option<commands::Commands>,
}

fn main() {
    let cli = Cli::parse();
    logging::init_logging("info", cli.log_format);

    match cli.command {
        Some(cmd) => {
            if let Err(e) = commands::run(cmd) {
                eprintln!("Error: {:#}", e);
                std::process::exit(1);
            }
        }
        None => {
            println!("recipechain - A tamper-evident recipe ledger");
            println!("Run 'recipechain --help' for usage information.");
        }
    }
}
