//! Cardkeep CLI - manage a trading card collection from the terminal

mod cli;

use clap::Parser;

fn main() {
    let cli_args = cli::Cli::parse();

    if let Err(e) = cli::CardkeepApp::run(cli_args) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
