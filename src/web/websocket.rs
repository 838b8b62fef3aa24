use super::pane::PaneSnapshots;
use crate::console::HistoryDirection;
use crate::ui::UIEvent;
use axum::{
    extract::{ws::Message, ws::WebSocket, State, WebSocketUpgrade},
    response::Response,
};
use futures::{sink::SinkExt, stream::StreamExt};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};
use tokio::sync::{broadcast, mpsc, oneshot};
use tracing::{debug, error, warn};

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PaneId {
    Page,
    Remote,
}

/// Server-to-browser messages.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum WebSocketMessage {
    SetContent { pane: PaneId, html: String },
    ScrollToBottom { pane: PaneId },
    /// Replaces the browser's input box with a recalled command.
    SetInput { text: String },
}

/// Browser-to-server messages.
#[derive(Deserialize, Debug, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    Submit { text: String },
    History { direction: HistoryDirection },
    Focus,
}

pub struct WebSocketState {
    pub broadcast_tx: broadcast::Sender<WebSocketMessage>,
    pub snapshots: Arc<Mutex<PaneSnapshots>>,
    pub events: mpsc::UnboundedSender<UIEvent>,
}

pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<WebSocketState>>,
) -> Response {
    ws.on_upgrade(|socket| handle_socket(socket, state))
}

async fn handle_socket(socket: WebSocket, state: Arc<WebSocketState>) {
    let (mut sender, mut receiver) = socket.split();

    // Subscribe before taking snapshots so no update falls in between.
    let mut broadcast_rx = state.broadcast_tx.subscribe();
    // Replies meant for this browser only.
    let (direct_tx, mut direct_rx) = mpsc::unbounded_channel::<WebSocketMessage>();

    for message in initial_messages(&state.snapshots) {
        if send_json(&mut sender, &message).await.is_err() {
            return;
        }
    }

    let send_task = tokio::spawn(async move {
        loop {
            let msg = tokio::select! {
                direct = direct_rx.recv() => match direct {
                    Some(msg) => msg,
                    None => break,
                },
                broadcast = broadcast_rx.recv() => match broadcast {
                    Ok(msg) => msg,
                    Err(broadcast::error::RecvError::Lagged(n)) => {
                        // Every SetContent carries the full pane, so the next one catches up.
                        warn!("WebSocket lagged by {} messages", n);
                        continue;
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                },
            };
            if send_json(&mut sender, &msg).await.is_err() {
                break;
            }
        }
    });

    while let Some(msg) = receiver.next().await {
        match msg {
            Ok(Message::Text(text)) => match serde_json::from_str::<ClientMessage>(&text) {
                Ok(client_msg) => {
                    if !dispatch_client_message(client_msg, &state.events, &direct_tx).await {
                        break;
                    }
                }
                Err(e) => debug!("Ignoring malformed client message: {}", e),
            },
            Ok(Message::Close(_)) => {
                debug!("WebSocket client disconnected");
                break;
            }
            Err(e) => {
                error!("WebSocket error: {}", e);
                break;
            }
            _ => {}
        }
    }

    send_task.abort();
}

/// Turns one browser message into console events.
///
/// History keys are answered on `direct` so only the asking browser sees the
/// recalled text. Returns `false` once the console has shut down.
async fn dispatch_client_message(
    msg: ClientMessage,
    events: &mpsc::UnboundedSender<UIEvent>,
    direct: &mpsc::UnboundedSender<WebSocketMessage>,
) -> bool {
    match msg {
        ClientMessage::Submit { text } => events.send(UIEvent::Submit(text)).is_ok(),
        ClientMessage::Focus => events.send(UIEvent::Focus).is_ok(),
        ClientMessage::History { direction } => {
            let (reply, recalled) = oneshot::channel();
            if events
                .send(UIEvent::RecallHistory { direction, reply })
                .is_err()
            {
                return false;
            }
            // A dropped reply means the history is empty.
            if let Ok(text) = recalled.await {
                let _ = direct.send(WebSocketMessage::SetInput { text });
            }
            true
        }
    }
}

fn initial_messages(snapshots: &Mutex<PaneSnapshots>) -> Vec<WebSocketMessage> {
    let Ok(snapshots) = snapshots.lock() else {
        return Vec::new();
    };
    [
        (PaneId::Page, snapshots.page.clone()),
        (PaneId::Remote, snapshots.remote.clone()),
    ]
    .into_iter()
    .flat_map(|(pane, html)| {
        [
            WebSocketMessage::SetContent { pane, html },
            WebSocketMessage::ScrollToBottom { pane },
        ]
    })
    .collect()
}

async fn send_json<S>(sender: &mut S, message: &WebSocketMessage) -> Result<(), ()>
where
    S: futures::Sink<Message> + Unpin,
{
    let json = match serde_json::to_string(message) {
        Ok(j) => j,
        Err(e) => {
            error!("Failed to serialize WebSocket message: {}", e);
            return Ok(());
        }
    };
    sender.send(Message::Text(json)).await.map_err(|_| ())
}
