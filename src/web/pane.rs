//! A console pane mirrored to browser clients.
use super::websocket::{PaneId, WebSocketMessage};
use crate::console::TextPane;
use std::sync::{Arc, Mutex};
use tokio::sync::broadcast;

/// Last content of each pane, handed to clients when they connect.
#[derive(Debug, Default)]
pub struct PaneSnapshots {
    pub page: String,
    pub remote: String,
}

/// A [`TextPane`] that broadcasts every update to connected web clients.
pub struct WebPane {
    pane: PaneId,
    broadcast_tx: broadcast::Sender<WebSocketMessage>,
    snapshots: Arc<Mutex<PaneSnapshots>>,
}

impl WebPane {
    pub fn new(
        pane: PaneId,
        broadcast_tx: broadcast::Sender<WebSocketMessage>,
        snapshots: Arc<Mutex<PaneSnapshots>>,
    ) -> Self {
        Self {
            pane,
            broadcast_tx,
            snapshots,
        }
    }
}

impl TextPane for WebPane {
    fn set_content(&mut self, html: &str) {
        if let Ok(mut snapshots) = self.snapshots.lock() {
            match self.pane {
                PaneId::Page => snapshots.page = html.to_string(),
                PaneId::Remote => snapshots.remote = html.to_string(),
            }
        }
        // No receivers just means no browser is open.
        let _ = self.broadcast_tx.send(WebSocketMessage::SetContent {
            pane: self.pane,
            html: html.to_string(),
        });
    }

    fn scroll_to_bottom(&mut self) {
        let _ = self
            .broadcast_tx
            .send(WebSocketMessage::ScrollToBottom { pane: self.pane });
    }
}
