//! Buffer management for line-based streaming protocols

/// Reassembles whole lines from arbitrary byte deliveries
///
/// Network chunks split anywhere, including mid-codepoint; the buffer holds
/// raw bytes and converts to text only once a closing newline makes the line
/// complete, so a codepoint straddling two deliveries survives intact.
pub struct LineBuffer {
    buffer: Vec<u8>,
}

impl LineBuffer {
    /// Create a new line buffer
    pub fn new() -> Self {
        Self { buffer: Vec::new() }
    }

    /// Add data to the buffer and return the complete lines
    ///
    /// Lines come back trimmed; blank lines are dropped.
    pub fn add_data(&mut self, data: &[u8]) -> Vec<String> {
        self.buffer.extend_from_slice(data);

        let mut lines = Vec::new();
        let mut consumed = 0;
        while let Some(pos) = self.buffer[consumed..].iter().position(|&b| b == b'\n') {
            let end = consumed + pos;
            let line = String::from_utf8_lossy(&self.buffer[consumed..end]);
            let line = line.trim();
            if !line.is_empty() {
                lines.push(line.to_string());
            }
            consumed = end + 1;
        }
        self.buffer.drain(..consumed);

        lines
    }

    /// Take any unterminated tail out of the buffer
    pub fn flush(&mut self) -> Option<String> {
        let tail = std::mem::take(&mut self.buffer);
        let tail = String::from_utf8_lossy(&tail);
        let tail = tail.trim();
        if tail.is_empty() {
            None
        } else {
            Some(tail.to_string())
        }
    }
}

impl Default for LineBuffer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lines_split_across_deliveries() {
        let mut buf = LineBuffer::new();
        assert!(buf.add_data(b"first li").is_empty());
        let lines = buf.add_data(b"ne\nsecond\npart");
        assert_eq!(lines, vec!["first line", "second"]);
        assert_eq!(buf.flush(), Some("part".to_string()));
        assert_eq!(buf.flush(), None);
    }

    #[test]
    fn blank_lines_are_dropped() {
        let mut buf = LineBuffer::new();
        let lines = buf.add_data(b"a\n\n\nb\n");
        assert_eq!(lines, vec!["a", "b"]);
    }

    #[test]
    fn multibyte_codepoint_split_across_deliveries() {
        let mut buf = LineBuffer::new();
        let bytes = "héllo\n".as_bytes();
        // Split inside the two-byte `é`
        assert!(buf.add_data(&bytes[..2]).is_empty());
        let lines = buf.add_data(&bytes[2..]);
        assert_eq!(lines, vec!["héllo"]);
    }

    #[test]
    fn multibyte_tail_flushes_intact() {
        let mut buf = LineBuffer::new();
        let bytes = "日本語".as_bytes();
        assert!(buf.add_data(&bytes[..4]).is_empty());
        assert!(buf.add_data(&bytes[4..]).is_empty());
        assert_eq!(buf.flush(), Some("日本語".to_string()));
    }
}
