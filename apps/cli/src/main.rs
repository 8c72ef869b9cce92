//! World book CLI: convert pseudo-XML world book entries into Tavo JSON.
//!
//! Reads entries from a file or stdin, converts them on a worker thread,
//! and writes the indented Tavo document to stdout or a file.

mod commands;

use clap::Parser;
use color_eyre::eyre::Result;

use commands::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    commands::init_tracing(&cli);
    commands::run(cli).await
}
