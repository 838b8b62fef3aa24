//! Browser mirror of the console panes.
mod html;
pub mod pane;
pub mod websocket;

pub use pane::{PaneSnapshots, WebPane};
pub use websocket::PaneId;

use crate::ui::UIEvent;
use anyhow::Result;
use axum::{response::Html, routing::get, Router};
use std::sync::{Arc, Mutex};
use tokio::sync::{broadcast, mpsc};
use tower_http::cors::CorsLayer;
use tracing::info;
use websocket::{WebSocketMessage, WebSocketState};

const BROADCAST_CAPACITY: usize = 64;

/// Shared handles for building web panes and serving them.
#[derive(Clone)]
pub struct WebMirror {
    broadcast_tx: broadcast::Sender<WebSocketMessage>,
    snapshots: Arc<Mutex<PaneSnapshots>>,
}

impl WebMirror {
    pub fn new() -> Self {
        let (broadcast_tx, _) = broadcast::channel(BROADCAST_CAPACITY);
        Self {
            broadcast_tx,
            snapshots: Arc::new(Mutex::new(PaneSnapshots::default())),
        }
    }

    /// Creates the pane that mirrors `pane` to every connected browser.
    pub fn pane(&self, pane: PaneId) -> WebPane {
        WebPane::new(pane, self.broadcast_tx.clone(), self.snapshots.clone())
    }

    fn router(&self, events: mpsc::UnboundedSender<UIEvent>) -> Router {
        let ws_state = Arc::new(WebSocketState {
            broadcast_tx: self.broadcast_tx.clone(),
            snapshots: self.snapshots.clone(),
            events,
        });

        Router::new()
            .route("/", get(index))
            .route("/ws", get(websocket::ws_handler))
            .with_state(ws_state)
            .layer(CorsLayer::permissive())
    }

    /// Serves the mirror on `127.0.0.1:port` until the process exits.
    pub async fn serve(self, port: u16, events: mpsc::UnboundedSender<UIEvent>) -> Result<()> {
        let addr = format!("127.0.0.1:{}", port);
        let listener = tokio::net::TcpListener::bind(&addr).await?;

        info!("Web console listening on http://{}", addr);

        axum::serve(listener, self.router(events)).await?;
        Ok(())
    }
}

impl Default for WebMirror {
    fn default() -> Self {
        Self::new()
    }
}

async fn index() -> Html<&'static str> {
    Html(html::CONSOLE_HTML)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::console::TextPane;

    #[tokio::test]
    async fn serves_index_page() {
        let mirror = WebMirror::new();
        let (events_tx, _events_rx) = mpsc::unbounded_channel();

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let router = mirror.router(events_tx);
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });

        let mut stream = tokio::net::TcpStream::connect(addr).await.unwrap();
        use tokio::io::{AsyncReadExt, AsyncWriteExt};
        stream
            .write_all(b"GET / HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n")
            .await
            .unwrap();
        let mut response = String::new();
        stream.read_to_string(&mut response).await.unwrap();

        assert!(response.starts_with("HTTP/1.1 200"));
        assert!(response.contains("id=\"remote\""));
    }

    #[test]
    fn panes_share_snapshots() {
        let mirror = WebMirror::new();
        let mut page = mirror.pane(PaneId::Page);
        page.set_content("hello<br>");
        assert_eq!(mirror.snapshots.lock().unwrap().page, "hello<br>");
    }
}
