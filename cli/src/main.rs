//! Shipyard CLI - single-host container deployments over SSH

use clap::Parser;

use shipyard_cli::cli::Cli;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    if let Err(e) = cli.run().await {
        std::process::exit(e.exit_code());
    }
}
