use crate::console::{ConsoleConfig, LayoutMetrics};
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug, Clone)]
#[command(name = "remote-console")]
#[command(about = "Debug console for a remote application")]
pub struct AppArgs {
    #[arg(
        long,
        default_value = "127.0.0.1:17815",
        help = "Address of the remote application's console endpoint"
    )]
    pub connect: String,

    #[arg(long, default_value = "data", help = "Data directory")]
    pub data_dir: String,

    #[arg(long, default_value_t = 20, help = "Console window height in rows")]
    pub height: u16,

    #[arg(long, help = "Mirror the console to a browser on this port")]
    pub web_port: Option<u16>,

    #[arg(long, help = "Load a capture file into the remote log before connecting")]
    pub replay: Option<PathBuf>,

    #[arg(long, help = "Append every received frame to this file")]
    pub capture: Option<PathBuf>,

    #[arg(long, help = "Keep command history in memory only")]
    pub ephemeral: bool,

    #[arg(long, help = "Do not connect; only show local and replayed logs")]
    pub offline: bool,

    #[arg(long, help = "Run without the terminal UI (requires --web-port)")]
    pub headless: bool,
}

impl AppArgs {
    pub fn from_cli() -> Self {
        <Self as Parser>::parse()
    }

    /// Builds the controller configuration these arguments imply.
    pub fn console_config(&self) -> ConsoleConfig {
        ConsoleConfig {
            layout: LayoutMetrics {
                height: self.height,
                ..LayoutMetrics::default()
            },
            ..ConsoleConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let args = AppArgs::parse_from(["remote-console"]);
        assert_eq!(args.connect, "127.0.0.1:17815");
        assert_eq!(args.data_dir, "data");
        assert!(args.web_port.is_none());
        assert!(!args.headless);

        let config = args.console_config();
        assert_eq!(config.buffer_max_len, 100 * 1024);
        assert_eq!(config.max_commands, 10_000);
        assert_eq!(config.command_prefix, "CONI");
        assert_eq!(config.layout.height, 20);
    }

    #[test]
    fn height_flows_into_layout() {
        let args = AppArgs::parse_from(["remote-console", "--height", "12", "--web-port", "8080"]);
        assert_eq!(args.console_config().layout.height, 12);
        assert_eq!(args.web_port, Some(8080));
    }
}
