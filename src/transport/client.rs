//! TCP connection to the remote application, kept alive with reconnects.
use super::backoff::Backoff;
use super::capture::CaptureWriter;
use super::frame::{decode_frame, encode_message, FrameError};
use super::Transport;
use crate::ui::UIEvent;
use anyhow::Result;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, trace, warn};

const READ_CHUNK: usize = 8 * 1024;

/// A [`Transport`] backed by a background connection task.
pub struct TcpTransport {
    connected: Arc<AtomicBool>,
    outbound: mpsc::UnboundedSender<String>,
}

impl TcpTransport {
    /// Creates the transport and the task that will drive it.
    ///
    /// Nothing connects until [`ConnectionTask::spawn`] is called, so the
    /// caller can finish work that must see the transport as disconnected.
    /// Log payloads and connection changes are delivered on `events`.
    pub fn new(
        addr: String,
        events: mpsc::UnboundedSender<UIEvent>,
        capture: Option<CaptureWriter>,
    ) -> (Arc<Self>, ConnectionTask) {
        let connected = Arc::new(AtomicBool::new(false));
        let (outbound, outbound_rx) = mpsc::unbounded_channel();

        let task = ConnectionTask {
            addr,
            connected: connected.clone(),
            outbound_rx,
            events,
            capture,
        };
        let transport = Arc::new(Self {
            connected,
            outbound,
        });
        (transport, task)
    }

    /// Creates the transport and starts connecting immediately.
    #[cfg(test)]
    pub fn spawn(
        addr: String,
        events: mpsc::UnboundedSender<UIEvent>,
        capture: Option<CaptureWriter>,
    ) -> Arc<Self> {
        let (transport, task) = Self::new(addr, events, capture);
        task.spawn();
        transport
    }
}

/// The background half of a [`TcpTransport`].
///
/// Keeps reconnecting until the event channel is closed.
pub struct ConnectionTask {
    addr: String,
    connected: Arc<AtomicBool>,
    outbound_rx: mpsc::UnboundedReceiver<String>,
    events: mpsc::UnboundedSender<UIEvent>,
    capture: Option<CaptureWriter>,
}

impl ConnectionTask {
    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(connection_loop(self))
    }
}

impl Transport for TcpTransport {
    fn send(&self, message: &str) {
        if !self.is_connected() {
            debug!("Not connected, dropping message: {}", message);
            return;
        }
        if self.outbound.send(message.to_string()).is_err() {
            debug!("Connection task stopped, dropping message");
        }
    }

    fn is_connected(&self) -> bool {
        self.connected.load(Ordering::Acquire)
    }
}

async fn connection_loop(task: ConnectionTask) {
    let ConnectionTask {
        addr,
        connected,
        mut outbound_rx,
        events,
        mut capture,
    } = task;
    let mut backoff = Backoff::new();

    loop {
        match TcpStream::connect(&addr).await {
            Ok(stream) => {
                info!("Connected to {}", addr);
                backoff.record_success();

                // Anything queued while we were down is stale.
                while outbound_rx.try_recv().is_ok() {}

                connected.store(true, Ordering::Release);
                if events.send(UIEvent::ConnectionChanged(true)).is_err() {
                    break;
                }

                let result =
                    run_connection(stream, &mut outbound_rx, &events, capture.as_mut()).await;

                connected.store(false, Ordering::Release);
                match result {
                    Ok(()) => info!("Disconnected from {}", addr),
                    Err(e) => warn!("Connection to {} lost: {}", addr, e),
                }
                if events.send(UIEvent::ConnectionChanged(false)).is_err() {
                    break;
                }
            }
            Err(e) => {
                debug!("Failed to connect to {}: {}", addr, e);
            }
        }

        if events.is_closed() {
            break;
        }

        let delay = backoff.record_attempt();
        trace!("Reconnecting in {:?}", delay);
        tokio::time::sleep(delay).await;
    }

    debug!("Connection task for {} finished", addr);
}

/// Pumps one established connection until it closes or fails.
async fn run_connection(
    stream: TcpStream,
    outbound_rx: &mut mpsc::UnboundedReceiver<String>,
    events: &mpsc::UnboundedSender<UIEvent>,
    mut capture: Option<&mut CaptureWriter>,
) -> Result<()> {
    let (mut reader, mut writer) = stream.into_split();
    let mut pending: Vec<u8> = Vec::with_capacity(READ_CHUNK);
    let mut chunk = [0u8; READ_CHUNK];

    loop {
        tokio::select! {
            read = reader.read(&mut chunk) => {
                let n = read?;
                if n == 0 {
                    return Ok(());
                }
                pending.extend_from_slice(&chunk[..n]);

                let consumed = dispatch_frames(&pending, events, capture.as_deref_mut()).await?;
                pending.drain(..consumed);
            }
            message = outbound_rx.recv() => {
                match message {
                    Some(message) => {
                        writer.write_all(&encode_message(&message)).await?;
                    }
                    None => return Ok(()),
                }
            }
        }
    }
}

/// Delivers every complete frame in `buf` and returns the bytes consumed.
async fn dispatch_frames(
    buf: &[u8],
    events: &mpsc::UnboundedSender<UIEvent>,
    mut capture: Option<&mut CaptureWriter>,
) -> Result<usize> {
    let mut offset = 0;

    loop {
        match decode_frame(&buf[offset..]) {
            Ok((frame, used)) => {
                if let Some(writer) = capture.as_deref_mut() {
                    if let Err(e) = writer.record(&buf[offset..offset + used]).await {
                        warn!("Failed to write capture: {}", e);
                    }
                }
                offset += used;

                if frame.is_log() {
                    let text = frame.log_text()?;
                    if events.send(UIEvent::RemoteLog(text)).is_err() {
                        return Ok(offset);
                    }
                } else {
                    trace!("Ignoring {} frame ({} bytes)", frame.tag_str(), used);
                }
            }
            Err(FrameError::Incomplete { .. }) => return Ok(offset),
            Err(e) => return Err(e.into()),
        }
    }
}
