//! Streaming chunk types and accumulation

/// One increment of a streamed response
///
/// The sum is deliberately closed: adding a variant must break every consumer
/// match. Usage may arrive before, between, or after content chunks; zero or
/// more usage chunks may appear and the last one is authoritative. Stream end
/// is the end of the sequence itself, not a chunk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamChunk {
    /// A fragment of generated text, in emission order
    Content(String),
    /// Cumulative token counts as last reported by the backend
    Usage {
        /// Prompt tokens
        input: u32,
        /// Completion tokens
        output: u32,
    },
}

/// Folds a chunk sequence into the final text and token counts
///
/// Completion never requires a usage chunk; `usage()` stays `None` when the
/// backend reported nothing.
#[derive(Debug, Default)]
pub struct StreamAccumulator {
    content: String,
    usage: Option<(u32, u32)>,
}

impl StreamAccumulator {
    /// Create an empty accumulator
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one chunk in
    pub fn push(&mut self, chunk: &StreamChunk) {
        match chunk {
            StreamChunk::Content(text) => self.content.push_str(text),
            StreamChunk::Usage { input, output } => self.usage = Some((*input, *output)),
        }
    }

    /// The accumulated text so far
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Last reported (input, output) token counts, if any
    pub fn usage(&self) -> Option<(u32, u32)> {
        self.usage
    }

    /// Consume the accumulator, returning the text
    pub fn into_content(self) -> String {
        self.content
    }
}
