//! This module contains the logging setup for the application.
//!
//! In terminal mode, log events are routed into the console's page log by
//! [`ConsoleLogCollector`]. In headless mode they go to stderr.
pub mod collector;

pub use collector::ConsoleLogCollector;

use crate::ui::UIEvent;
use tokio::sync::mpsc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const DEFAULT_FILTER: &str = "info,remote_console=debug";

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Installs a subscriber that feeds the page log through `sender`.
///
/// # Errors
///
/// Returns an error if a global subscriber is already set.
pub fn init_console_logging(
    sender: mpsc::UnboundedSender<UIEvent>,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    tracing_subscriber::registry()
        .with(env_filter())
        .with(ConsoleLogCollector::new(sender))
        .try_init()?;
    Ok(())
}

/// Installs a plain stderr subscriber.
pub fn init_stderr_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(std::io::stderr)
        .try_init();
}
