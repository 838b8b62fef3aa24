//! Recording inbound frames to disk and reading them back for replay.
use super::frame::{decode_frame, FrameError};
use anyhow::{Context, Result};
use std::path::Path;
use tokio::fs::{File, OpenOptions};
use tokio::io::AsyncWriteExt;
use tracing::{trace, warn};

/// Appends raw inbound frames to a capture file.
pub struct CaptureWriter {
    file: File,
}

impl CaptureWriter {
    /// Opens `path` for appending, creating it if needed.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .await
            .with_context(|| format!("Failed to open capture file '{}'", path.display()))?;
        Ok(Self { file })
    }

    /// Writes one encoded frame exactly as it arrived.
    ///
    /// The file is flushed per frame so a capture cut short by exit still
    /// replays up to the last complete frame.
    pub async fn record(&mut self, raw: &[u8]) -> Result<()> {
        self.file.write_all(raw).await?;
        self.file.flush().await?;
        Ok(())
    }
}

/// Reads a capture file and returns the text of every `LOGM` frame in order.
///
/// Frames with other tags are skipped. A truncated final frame, as left by a
/// capture that was interrupted mid-write, is ignored with a warning.
pub async fn load_log_frames(path: impl AsRef<Path>) -> Result<Vec<String>> {
    let path = path.as_ref();
    let bytes = tokio::fs::read(path)
        .await
        .with_context(|| format!("Failed to read capture file '{}'", path.display()))?;

    let mut texts = Vec::new();
    let mut offset = 0;
    while offset < bytes.len() {
        match decode_frame(&bytes[offset..]) {
            Ok((frame, used)) => {
                offset += used;
                if frame.is_log() {
                    texts.push(frame.log_text()?);
                } else {
                    trace!("Skipping {} frame in capture", frame.tag_str());
                }
            }
            Err(FrameError::Incomplete { needed }) => {
                warn!(
                    "Capture '{}' ends with a partial frame ({} bytes missing)",
                    path.display(),
                    needed
                );
                break;
            }
            Err(e) => {
                return Err(e).with_context(|| {
                    format!("Corrupt capture '{}' at offset {}", path.display(), offset)
                })
            }
        }
    }

    Ok(texts)
}
