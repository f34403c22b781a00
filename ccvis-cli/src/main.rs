//! ccvis CLI - builds the concession and population map layers natively.
//!
//! `ccvis inspect` prints point counts, bounds and unmapped categories for a
//! dataset CSV; `ccvis export` writes the layers deck.gl would receive.

use clap::Parser;

#[derive(Parser)]
#[command(
    name = "ccvis",
    version,
    about = "Check and export the point layers of the Mexico water-concession and population maps"
)]
struct Cli {
    #[command(subcommand)]
    command: ccvis_cmd::Command,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    ccvis_cmd::run(cli.command).await
}
