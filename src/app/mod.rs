pub mod args;
mod setup;

pub use args::AppArgs;

use crate::console::{ConsolePanes, DebugConsole};
use crate::logging;
use crate::transport::{
    load_log_frames, CaptureWriter, ConnectionTask, OfflineTransport, TcpTransport, Transport,
};
use crate::ui::{spawn_terminal_reader, ConsoleRunner, IntervalTicker, TerminalPane, TerminalUI, UIEvent};
use crate::web::{PaneId, WebMirror};
use anyhow::Result;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, error, info};

pub async fn launch() -> Result<()> {
    launch_with_args(AppArgs::from_cli()).await
}

pub async fn launch_with_args(args: AppArgs) -> Result<()> {
    let (ui_event_tx, ui_event_rx) = mpsc::unbounded_channel::<UIEvent>();

    if args.headless {
        logging::init_stderr_logging();
    } else if let Err(e) = logging::init_console_logging(ui_event_tx.clone()) {
        eprintln!("Failed to initialize console logging: {}", e);
    }

    let setup::PreparedApp {
        args,
        history_store,
    } = setup::prepare(args)?;
    let config = args.console_config();

    let replay_lines = match &args.replay {
        Some(path) => load_log_frames(path).await?,
        None => Vec::new(),
    };

    let (transport, connection): (Arc<dyn Transport>, Option<ConnectionTask>) = if args.offline {
        (Arc::new(OfflineTransport), None)
    } else {
        let capture = match &args.capture {
            Some(path) => Some(CaptureWriter::open(path).await?),
            None => None,
        };
        let (transport, task) = TcpTransport::new(args.connect.clone(), ui_event_tx.clone(), capture);
        (transport, Some(task))
    };

    let page_view = TerminalPane::new();
    let remote_view = TerminalPane::new();
    let mirror = args.web_port.map(|_| WebMirror::new());

    let panes = match (&mirror, args.headless) {
        (Some(mirror), true) => ConsolePanes {
            page: Box::new(mirror.pane(PaneId::Page)),
            remote: Box::new(mirror.pane(PaneId::Remote)),
        },
        (Some(mirror), false) => ConsolePanes {
            page: Box::new((page_view.clone(), mirror.pane(PaneId::Page))),
            remote: Box::new((remote_view.clone(), mirror.pane(PaneId::Remote))),
        },
        (None, _) => ConsolePanes {
            page: Box::new(page_view.clone()),
            remote: Box::new(remote_view.clone()),
        },
    };

    let console = DebugConsole::new(config.clone(), panes, history_store, transport);

    let terminal = if args.headless {
        let shutdown_tx = ui_event_tx.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                let _ = shutdown_tx.send(UIEvent::Shutdown);
            }
        });
        None
    } else {
        spawn_terminal_reader(ui_event_tx.clone());
        let target = if args.offline {
            "offline".to_string()
        } else {
            args.connect.clone()
        };
        Some(TerminalUI::new(page_view, remote_view, target))
    };

    let mut runner = ConsoleRunner::new(
        console,
        terminal,
        ui_event_rx,
        IntervalTicker::new(config.render_interval),
    );

    if !replay_lines.is_empty() {
        runner.replay(replay_lines);
    }

    if let Some(task) = connection {
        debug!("Starting connection to {}", args.connect);
        task.spawn();
    }

    if let (Some(mirror), Some(port)) = (mirror, args.web_port) {
        let web_events = ui_event_tx.clone();
        tokio::spawn(async move {
            if let Err(e) = mirror.serve(port, web_events).await {
                error!("Web console failed: {}", e);
            }
        });
    }

    drop(ui_event_tx);

    let result = runner.run().await;
    info!("Console closed");
    result
}
