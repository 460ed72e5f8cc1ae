//! Binary event-stream frame decoding
//!
//! Frames are laid out as
//! `[u32 BE total][u32 BE header_len][headers][payload][u32 checksum]` with
//! the payload at offset `8 + header_len` and `total - header_len - 12` bytes
//! long. The decoder buffers until a whole frame is present, treats any
//! impossible length as corruption, and resynchronizes by sliding one byte at
//! a time until a plausible frame boundary reappears. Headers are skipped as
//! opaque bytes; the trailing checksum is length-validated but not verified.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use bytes::{Bytes, BytesMut};
use serde_json::Value;

/// Smallest total length a well-formed frame may declare
pub const MIN_FRAME_SIZE: usize = 16;

/// Largest total length accepted before treating the prelude as corrupt
pub const MAX_FRAME_SIZE: usize = 16 * 1024 * 1024;

/// Incremental frame decoder
pub struct EventStreamDecoder {
    buf: BytesMut,
}

impl EventStreamDecoder {
    /// Create a fresh decoder for one response body
    pub fn new() -> Self {
        Self {
            buf: BytesMut::new(),
        }
    }

    /// Feed bytes in, get completed frame payloads out
    pub fn feed(&mut self, data: &[u8]) -> Vec<Bytes> {
        self.buf.extend_from_slice(data);

        let mut payloads = Vec::new();
        while let Some(payload) = self.next_frame() {
            payloads.push(payload);
        }
        payloads
    }

    /// Bytes currently buffered without a complete frame
    pub fn pending(&self) -> usize {
        self.buf.len()
    }

    fn next_frame(&mut self) -> Option<Bytes> {
        loop {
            if self.buf.len() < 8 {
                return None;
            }

            let total = u32::from_be_bytes([self.buf[0], self.buf[1], self.buf[2], self.buf[3]])
                as usize;
            if !(MIN_FRAME_SIZE..=MAX_FRAME_SIZE).contains(&total) {
                // Corrupt prelude: slide one byte and look again
                let _ = self.buf.split_to(1);
                continue;
            }

            let header_len =
                u32::from_be_bytes([self.buf[4], self.buf[5], self.buf[6], self.buf[7]]) as usize;
            let payload_offset = 8 + header_len;
            if payload_offset + 4 > total {
                let _ = self.buf.split_to(1);
                continue;
            }

            if self.buf.len() < total {
                return None;
            }

            let frame = self.buf.split_to(total).freeze();
            return Some(frame.slice(payload_offset..total - 4));
        }
    }
}

impl Default for EventStreamDecoder {
    fn default() -> Self {
        Self::new()
    }
}

/// Unwrap a frame payload into the inner event JSON
///
/// The payload is JSON whose `bytes` field base64-encodes the actual event.
/// Anything that does not follow that shape yields `None` and the caller
/// skips the frame.
pub fn decode_event_payload(payload: &[u8]) -> Option<Value> {
    let outer: Value = serde_json::from_slice(payload).ok()?;
    let encoded = outer.get("bytes")?.as_str()?;
    let decoded = BASE64.decode(encoded).ok()?;
    serde_json::from_slice(&decoded).ok()
}

/// Assemble a frame around `headers` and `payload` (checksum bytes are zero)
#[cfg(test)]
pub(crate) fn encode_frame(headers: &[u8], payload: &[u8]) -> Vec<u8> {
    let total = 12 + headers.len() + payload.len();
    let mut frame = Vec::with_capacity(total);
    frame.extend_from_slice(&(total as u32).to_be_bytes());
    frame.extend_from_slice(&(headers.len() as u32).to_be_bytes());
    frame.extend_from_slice(headers);
    frame.extend_from_slice(payload);
    frame.extend_from_slice(&[0u8; 4]);
    frame
}
