//! Newline-delimited JSON decoding

use crate::decode::lines::LineBuffer;
use serde_json::Value;

/// Incremental NDJSON decoder
///
/// One JSON object per line. A line that fails to parse is skipped rather
/// than failing the stream; an object carrying `"done": true` is terminal and
/// everything after it is ignored.
pub struct NdjsonDecoder {
    lines: LineBuffer,
    finished: bool,
}

impl NdjsonDecoder {
    /// Create a fresh decoder for one response body
    pub fn new() -> Self {
        Self {
            lines: LineBuffer::new(),
            finished: false,
        }
    }

    /// Feed bytes in, get completed objects out
    pub fn feed(&mut self, data: &[u8]) -> Vec<Value> {
        let mut objects = Vec::new();
        for line in self.lines.add_data(data) {
            if let Some(value) = self.decode_line(&line) {
                objects.push(value);
            }
        }
        objects
    }

    /// Decode any unterminated tail at end of body
    pub fn finish(&mut self) -> Option<Value> {
        let tail = self.lines.flush()?;
        self.decode_line(&tail)
    }

    /// Whether the terminal `done` object has been seen
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    fn decode_line(&mut self, line: &str) -> Option<Value> {
        if self.finished {
            return None;
        }
        let value: Value = serde_json::from_str(line).ok()?;
        if value.get("done").and_then(Value::as_bool) == Some(true) {
            self.finished = true;
        }
        Some(value)
    }
}

impl Default for NdjsonDecoder {
    fn default() -> Self {
        Self::new()
    }
}
