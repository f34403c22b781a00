//! Command implementations for the ccvis CLI.
//!
//! Both subcommands load one dataset of a map configuration and build its
//! layers exactly as the browser apps do, then either summarize them or
//! write them out as JSON.

use clap::Subcommand;
use std::path::PathBuf;

pub mod export;
pub mod inspect;
pub mod layers;

pub use layers::{LayerArgs, Preset};

#[derive(Subcommand)]
pub enum Command {
    /// Build a dataset's layers and print what went into them
    Inspect {
        #[command(flatten)]
        layers: LayerArgs,
    },

    /// Build a dataset's layers and write them as deck.gl-ready JSON
    Export {
        #[command(flatten)]
        layers: LayerArgs,

        /// Output path for the layers JSON
        #[arg(short, long)]
        out: PathBuf,

        /// Indent the JSON output
        #[arg(long)]
        pretty: bool,
    },
}

pub async fn run(command: Command) -> anyhow::Result<()> {
    match command {
        Command::Inspect { layers } => inspect::run_inspect(&layers).await,
        Command::Export {
            layers,
            out,
            pretty,
        } => export::run_export(&layers, &out, pretty).await,
    }
}
