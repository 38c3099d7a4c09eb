//! StoryPlan CLI: turn a scene-plan spreadsheet into per-chapter notes.
//!
//! Also ranks word-frequency exports and reports manuscript word-count
//! statistics.

mod commands;

use clap::Parser;
use color_eyre::eyre::Result;

use commands::Cli;

fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    commands::init_tracing(&cli)?;
    commands::run(cli)
}
