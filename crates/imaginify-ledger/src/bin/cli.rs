//! Imaginify ledger standalone binary.

use std::process::ExitCode;

use clap::Parser;
use imaginify_ledger::{LedgerArgs, cli};

#[tokio::main]
async fn main() -> ExitCode {
    let args = LedgerArgs::parse();

    match cli::run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
