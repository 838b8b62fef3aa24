//! Wire format for the console connection.
//!
//! Inbound frames are `tag[4] | total_len: u32 LE | payload`, where
//! `total_len` counts the 8 header bytes. A `LOGM` payload is a
//! length-prefixed string. Outbound messages are just a length-prefixed
//! string whose first four characters name the command.
use thiserror::Error;

pub const HEADER_LEN: usize = 8;
/// Frames larger than this are treated as a corrupt stream.
pub const MAX_FRAME_LEN: usize = 16 * 1024 * 1024;
/// Tag of frames carrying remote log text.
pub const LOG_TAG: [u8; 4] = *b"LOGM";

#[derive(Debug, Error)]
pub enum FrameError {
    #[error("incomplete frame, {needed} more bytes required")]
    Incomplete { needed: usize },
    #[error("frame of {0} bytes exceeds the 16 MiB limit")]
    TooLarge(usize),
    #[error("invalid length field {0}")]
    BadLength(usize),
}

/// One inbound message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub tag: [u8; 4],
    pub payload: Vec<u8>,
}

impl Frame {
    /// Builds a `LOGM` frame carrying `text`.
    #[cfg(test)]
    pub fn log(text: &str) -> Self {
        Self {
            tag: LOG_TAG,
            payload: encode_string(text),
        }
    }

    pub fn is_log(&self) -> bool {
        self.tag == LOG_TAG
    }

    pub fn tag_str(&self) -> String {
        String::from_utf8_lossy(&self.tag).into_owned()
    }

    /// Reads the string a `LOGM` payload carries.
    pub fn log_text(&self) -> Result<String, FrameError> {
        let (text, _) = decode_string(&self.payload)?;
        Ok(text)
    }

    pub fn encode(&self) -> Vec<u8> {
        let total = HEADER_LEN + self.payload.len();
        let mut out = Vec::with_capacity(total);
        out.extend_from_slice(&self.tag);
        out.extend_from_slice(&(total as u32).to_le_bytes());
        out.extend_from_slice(&self.payload);
        out
    }
}

/// Decodes one frame from the front of `buf`.
///
/// Returns the frame and the number of bytes it occupied. When `buf` holds
/// only part of a frame, returns [`FrameError::Incomplete`] and the caller
/// should retry once more bytes arrive.
pub fn decode_frame(buf: &[u8]) -> Result<(Frame, usize), FrameError> {
    if buf.len() < HEADER_LEN {
        return Err(FrameError::Incomplete {
            needed: HEADER_LEN - buf.len(),
        });
    }

    let mut tag = [0u8; 4];
    tag.copy_from_slice(&buf[..4]);
    let total = read_u32(&buf[4..8]) as usize;

    if total < HEADER_LEN {
        return Err(FrameError::BadLength(total));
    }
    if total > MAX_FRAME_LEN {
        return Err(FrameError::TooLarge(total));
    }
    if buf.len() < total {
        return Err(FrameError::Incomplete {
            needed: total - buf.len(),
        });
    }

    let payload = buf[HEADER_LEN..total].to_vec();
    Ok((Frame { tag, payload }, total))
}

/// Encodes an outbound message.
pub fn encode_message(text: &str) -> Vec<u8> {
    encode_string(text)
}

/// Decodes an outbound message from the front of `buf`.
#[cfg(test)]
pub fn decode_message(buf: &[u8]) -> Result<(String, usize), FrameError> {
    decode_string(buf)
}

fn encode_string(text: &str) -> Vec<u8> {
    let bytes = text.as_bytes();
    let mut out = Vec::with_capacity(4 + bytes.len());
    out.extend_from_slice(&(bytes.len() as u32).to_le_bytes());
    out.extend_from_slice(bytes);
    out
}

fn decode_string(buf: &[u8]) -> Result<(String, usize), FrameError> {
    if buf.len() < 4 {
        return Err(FrameError::Incomplete {
            needed: 4 - buf.len(),
        });
    }
    let len = read_u32(&buf[..4]) as usize;
    if len > MAX_FRAME_LEN {
        return Err(FrameError::TooLarge(len));
    }
    let end = 4 + len;
    if buf.len() < end {
        return Err(FrameError::Incomplete {
            needed: end - buf.len(),
        });
    }
    let text = String::from_utf8_lossy(&buf[4..end]).into_owned();
    Ok((text, end))
}

fn read_u32(bytes: &[u8]) -> u32 {
    let mut raw = [0u8; 4];
    raw.copy_from_slice(&bytes[..4]);
    u32::from_le_bytes(raw)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_frame_layout() {
        let encoded = Frame::log("hi").encode();
        assert_eq!(&encoded[..4], b"LOGM");
        assert_eq!(&encoded[4..8], &14u32.to_le_bytes());
        assert_eq!(&encoded[8..12], &2u32.to_le_bytes());
        assert_eq!(&encoded[12..], b"hi");
    }

    #[test]
    fn decodes_back_to_back_frames() {
        let mut stream = Frame::log("one").encode();
        stream.extend(Frame::log("two").encode());

        let (first, used) = decode_frame(&stream).unwrap();
        assert_eq!(first.log_text().unwrap(), "one");
        let (second, rest) = decode_frame(&stream[used..]).unwrap();
        assert_eq!(second.log_text().unwrap(), "two");
        assert_eq!(used + rest, stream.len());
    }

    #[test]
    fn partial_input_is_incomplete() {
        let encoded = Frame::log("partial").encode();
        for cut in [0, 3, HEADER_LEN, encoded.len() - 1] {
            match decode_frame(&encoded[..cut]) {
                Err(FrameError::Incomplete { needed }) => assert!(needed > 0),
                other => panic!("expected Incomplete at {cut}, got {other:?}"),
            }
        }
    }

    #[test]
    fn rejects_bad_lengths() {
        let mut header = b"LOGM".to_vec();
        header.extend_from_slice(&3u32.to_le_bytes());
        assert!(matches!(decode_frame(&header), Err(FrameError::BadLength(3))));

        let mut huge = b"LOGM".to_vec();
        huge.extend_from_slice(&u32::MAX.to_le_bytes());
        assert!(matches!(decode_frame(&huge), Err(FrameError::TooLarge(_))));
    }

    #[test]
    fn other_tags_are_not_logs() {
        let frame = Frame {
            tag: *b"SMPL",
            payload: vec![1, 2, 3],
        };
        let (decoded, _) = decode_frame(&frame.encode()).unwrap();
        assert!(!decoded.is_log());
        assert_eq!(decoded.tag_str(), "SMPL");
    }

    #[test]
    fn invalid_utf8_is_replaced() {
        let frame = Frame {
            tag: LOG_TAG,
            payload: vec![2, 0, 0, 0, 0xff, b'a'],
        };
        assert_eq!(frame.log_text().unwrap(), "\u{fffd}a");
    }

    #[test]
    fn outbound_message_is_length_prefixed() {
        let encoded = encode_message("CONIping");
        assert_eq!(&encoded[..4], &8u32.to_le_bytes());
        let (text, used) = decode_message(&encoded).unwrap();
        assert_eq!(text, "CONIping");
        assert_eq!(used, encoded.len());
    }
}
