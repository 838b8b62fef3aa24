//! Connection to the remote application.
//!
//! The console only needs two things from a connection: a way to send a
//! command string and a way to ask whether the link is currently up. Incoming
//! log text is delivered separately as [`UIEvent`](crate::ui::UIEvent)s.
pub mod backoff;
pub mod capture;
pub mod client;
pub mod frame;

pub use capture::{load_log_frames, CaptureWriter};
pub use client::{ConnectionTask, TcpTransport};
pub use frame::{Frame, FrameError};

/// Outbound half of a message-based connection.
pub trait Transport: Send + Sync {
    /// Queues `message` for delivery. Messages sent while disconnected are dropped.
    fn send(&self, message: &str);

    /// Whether the connection is currently established.
    fn is_connected(&self) -> bool;
}

/// A transport that is never connected, for running against a replay only.
#[derive(Debug, Default, Clone, Copy)]
pub struct OfflineTransport;

impl Transport for OfflineTransport {
    fn send(&self, message: &str) {
        tracing::debug!("Offline, dropping message: {}", message);
    }

    fn is_connected(&self) -> bool {
        false
    }
}
