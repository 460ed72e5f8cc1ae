//! Ollama NDJSON stream adaptation

use crate::decode::NdjsonDecoder;
use crate::error::network_error;
use crate::http::ResponseStream;
use crate::ollama::payload::OllamaChunk;
use futures_core::Stream;
use serde_json::Value;
use std::collections::VecDeque;
use std::pin::Pin;
use std::task::{Context, Poll};
use switchboard_core::{Error, Result, StreamChunk};
use tracing::debug;

/// Turns the daemon's NDJSON body into the unified chunk stream
///
/// Each line is one object carrying a `message.content` delta; the terminal
/// `done` line carries the eval counts, which become the single usage chunk.
/// Lines that fail to parse are skipped; a daemon `error` field terminates
/// the stream as a server error.
pub struct OllamaStream {
    inner: ResponseStream,
    decoder: NdjsonDecoder,
    pending: VecDeque<Result<StreamChunk>>,
    done: bool,
}

impl OllamaStream {
    pub(crate) fn new(inner: ResponseStream) -> Self {
        Self {
            inner,
            decoder: NdjsonDecoder::new(),
            pending: VecDeque::new(),
            done: false,
        }
    }

    fn handle_object(&mut self, value: Value) {
        let chunk: OllamaChunk = match serde_json::from_value(value) {
            Ok(chunk) => chunk,
            Err(e) => {
                debug!(error = %e, "skipping malformed stream line");
                return;
            }
        };

        if let Some(error) = chunk.error {
            self.pending.push_back(Err(Error::server(500, error)));
            self.done = true;
            return;
        }

        if let Some(message) = chunk.message {
            if !message.content.is_empty() {
                self.pending
                    .push_back(Ok(StreamChunk::Content(message.content)));
            }
        }

        if chunk.done {
            if chunk.eval_count.is_some() || chunk.prompt_eval_count.is_some() {
                self.pending.push_back(Ok(StreamChunk::Usage {
                    input: chunk.prompt_eval_count.unwrap_or(0),
                    output: chunk.eval_count.unwrap_or(0),
                }));
            }
            self.done = true;
        }
    }
}

impl Stream for OllamaStream {
    type Item = Result<StreamChunk>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        loop {
            if let Some(item) = self.pending.pop_front() {
                return Poll::Ready(Some(item));
            }
            if self.done {
                return Poll::Ready(None);
            }

            match self.inner.as_mut().poll_next(cx) {
                Poll::Ready(Some(Ok(bytes))) => {
                    let objects = self.decoder.feed(&bytes);
                    for object in objects {
                        self.handle_object(object);
                    }
                }
                Poll::Ready(Some(Err(e))) => {
                    self.done = true;
                    return Poll::Ready(Some(Err(network_error(e))));
                }
                Poll::Ready(None) => {
                    if let Some(object) = self.decoder.finish() {
                        self.handle_object(object);
                    }
                    self.done = true;
                }
                Poll::Pending => return Poll::Pending,
            }
        }
    }
}
