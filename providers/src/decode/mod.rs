//! Wire-format decoders
//!
//! Three synchronous, allocation-bounded state machines turn raw bytes into
//! protocol units: SSE `data:` events, NDJSON objects, and binary
//! event-stream frames. Decoders own nothing beyond the unconsumed tail of
//! one response body; every request constructs a fresh one.

mod eventstream;
mod lines;
mod ndjson;
mod sse;

pub use eventstream::{decode_event_payload, EventStreamDecoder, MAX_FRAME_SIZE, MIN_FRAME_SIZE};
pub use lines::LineBuffer;
pub use ndjson::NdjsonDecoder;
pub use sse::{SseDecoder, SseEvent};

#[cfg(test)]
pub(crate) use eventstream::encode_frame;
