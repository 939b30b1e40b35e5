//! docpack CLI — package rendered documentation into a searchable docset.
//!
//! Mirrors a documentation tree, mines symbol declarations into a
//! persisted index, and injects navigation markers for the documentation
//! browser.

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
