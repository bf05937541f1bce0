pub mod app;
pub mod cli;
pub mod config;
pub mod editor;
pub mod error;
pub mod generation;
pub mod geometry;
pub mod history;
pub mod logging;
pub mod media;
pub mod render;
pub mod state;
pub use error::{AppError, AppResult};

use clap::Parser;

/// Entrypoint used by the binary: parses arguments and runs one command.
pub fn run() -> AppResult<()> {
    logging::init();
    tracing::info!("starting dreamframe");

    let cli = cli::Cli::parse();
    cli::execute(cli)
}
