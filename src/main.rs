//! The main entry point for the remote-console application.
mod app;
mod console;
mod logging;
mod storage;
mod transport;
mod ui;
mod web;

use anyhow::Result;

/// The main function of the application.
///
/// Parses the command line and runs the console until the user exits.
///
/// # Errors
///
/// Returns an error if setup fails or the terminal cannot be driven.
#[tokio::main]
async fn main() -> Result<()> {
    app::launch().await
}
