//! Server-sent events decoding

use crate::decode::lines::LineBuffer;

/// One decoded SSE unit
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SseEvent {
    /// Payload of a `data:` line
    Data(String),
    /// The literal `[DONE]` sentinel
    Done,
}

/// Incremental SSE decoder
///
/// Only `data:` lines matter to the backends this gateway speaks to; comments,
/// `event:` and `id:` lines are dropped. After the `[DONE]` sentinel all
/// further input is ignored.
pub struct SseDecoder {
    lines: LineBuffer,
    done: bool,
}

impl SseDecoder {
    /// Create a fresh decoder for one response body
    pub fn new() -> Self {
        Self {
            lines: LineBuffer::new(),
            done: false,
        }
    }

    /// Feed bytes in, get completed events out
    pub fn feed(&mut self, data: &[u8]) -> Vec<SseEvent> {
        let mut events = Vec::new();
        for line in self.lines.add_data(data) {
            if let Some(event) = self.decode_line(&line) {
                events.push(event);
            }
        }
        events
    }

    /// Decode any unterminated tail at end of body
    pub fn finish(&mut self) -> Option<SseEvent> {
        let tail = self.lines.flush()?;
        self.decode_line(&tail)
    }

    /// Whether the `[DONE]` sentinel has been seen
    pub fn is_done(&self) -> bool {
        self.done
    }

    fn decode_line(&mut self, line: &str) -> Option<SseEvent> {
        if self.done {
            return None;
        }
        let payload = line.strip_prefix("data:")?.trim_start();
        if payload == "[DONE]" {
            self.done = true;
            return Some(SseEvent::Done);
        }
        Some(SseEvent::Data(payload.to_string()))
    }
}

impl Default for SseDecoder {
    fn default() -> Self {
        Self::new()
    }
}
