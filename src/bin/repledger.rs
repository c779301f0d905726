//! repledger CLI Binary
//!
//! Command-line interface for the agent reputation ledger.

use clap::Parser;
use reputation_ledger::error::LedgerError;
use reputation_ledger::logging::init_logging;
use reputation_ledger::tooling::cli::{Cli, CliContext};
use std::process;

fn report(e: &anyhow::Error) -> ! {
    match e.downcast_ref::<LedgerError>().and_then(LedgerError::code) {
        Some(code) => eprintln!("Error [{}]: {:#}", code, e),
        None => eprintln!("Error: {:#}", e),
    }
    process::exit(1);
}

fn main() {
    let cli = Cli::parse();

    let settings = match CliContext::load_settings(&cli) {
        Ok(settings) => settings,
        Err(e) => report(&e),
    };

    if let Err(e) = init_logging(&settings.logging) {
        eprintln!("Error initializing logging: {}", e);
        process::exit(1);
    }

    let context = match CliContext::new(&cli, settings) {
        Ok(ctx) => ctx,
        Err(e) => report(&e),
    };

    match context.execute(&cli.command) {
        Ok(output) => {
            println!("{}", output);
        }
        Err(e) => report(&e),
    }
}
