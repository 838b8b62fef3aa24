//! This module handles the initial setup of the application.
use super::args::AppArgs;
use crate::storage::{HistoryStore, MemoryHistoryStore, SledHistoryStore};
use anyhow::{bail, Context, Result};

/// Contains everything `launch` needs beyond the arguments themselves.
pub struct PreparedApp {
    /// The command-line arguments.
    pub args: AppArgs,
    /// Where the command history is loaded from and saved to.
    pub history_store: Box<dyn HistoryStore>,
}

/// Prepares the application for running.
///
/// This function performs the following steps:
/// 1. Validates argument combinations.
/// 2. Prints a start banner (headless mode only; the terminal UI owns the screen otherwise).
/// 3. Creates the data directory and opens the history database, unless
///    history is ephemeral.
///
/// # Errors
///
/// This function will return an error if the arguments conflict or the
/// database cannot be opened.
pub fn prepare(args: AppArgs) -> Result<PreparedApp> {
    if args.headless && args.web_port.is_none() {
        bail!("--headless requires --web-port, otherwise there is nothing to show");
    }

    if args.headless {
        print_start_banner(&args);
    }

    let history_store: Box<dyn HistoryStore> = if args.ephemeral {
        Box::new(MemoryHistoryStore::new())
    } else {
        std::fs::create_dir_all(&args.data_dir)
            .with_context(|| format!("Failed to create data directory '{}'", args.data_dir))?;

        let db_path = format!("{}/db", args.data_dir);
        let db = sled::open(&db_path)
            .with_context(|| format!("Failed to open history database '{}'", db_path))?;
        Box::new(SledHistoryStore::new(&db)?)
    };

    Ok(PreparedApp {
        args,
        history_store,
    })
}

/// Prints a banner with startup information.
fn print_start_banner(args: &AppArgs) {
    println!("Starting remote console");
    if args.offline {
        println!("Remote: offline");
    } else {
        println!("Remote: {}", args.connect);
    }
    if let Some(port) = args.web_port {
        println!("Web UI: http://127.0.0.1:{}", port);
    }
    if let Some(replay) = &args.replay {
        println!("Replaying: {}", replay.display());
    }
    println!();
}
