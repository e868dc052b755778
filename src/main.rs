//! Unified imaginify CLI.
//!
//! This binary provides a single entry point to the imaginify tooling:
//! - `imaginify accounts` - Manage user accounts and credits
//! - `imaginify placeholder` - Print the shimmer placeholder data URL
//! - `imaginify transformations` - List the transformation catalogue
//!
//! The accounts subcommand can also be run as the standalone
//! `imaginify-ledger` binary.

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use imaginify_core::defaults::DEFAULT_IMAGE_DIMENSION;
use imaginify_ledger::TransformationType;

/// Imaginify unified CLI.
#[derive(Parser)]
#[command(
    name = "imaginify",
    version,
    about = "Account and credit tooling for the Imaginify image editor",
    propagate_version = true
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage user accounts and credit balances.
    #[command(name = "accounts", alias = "ledger")]
    Accounts(Box<imaginify_ledger::LedgerArgs>),

    /// Print the shimmer placeholder image.
    Placeholder {
        #[arg(long, default_value_t = DEFAULT_IMAGE_DIMENSION)]
        width: u32,
        #[arg(long, default_value_t = DEFAULT_IMAGE_DIMENSION)]
        height: u32,
        /// Print the raw SVG instead of a data URL.
        #[arg(long)]
        svg: bool,
    },

    /// List available transformations and their credit fees.
    Transformations,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Accounts(args) => imaginify_ledger::cli::run(*args).await,
        Commands::Placeholder { width, height, svg } => {
            if svg {
                println!("{}", imaginify_util::shimmer_svg(width, height));
            } else {
                println!("{}", imaginify_util::shimmer_data_url(width, height));
            }
            Ok(())
        }
        Commands::Transformations => {
            for kind in TransformationType::ALL {
                println!(
                    "{:<18} {:<20} {} credit(s)  {}",
                    kind.slug(),
                    kind.title(),
                    kind.credit_fee(),
                    kind.subtitle()
                );
            }
            Ok(())
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
