//! Anthropic SSE stream adaptation

use crate::anthropic::payload::{map_api_error, AnthropicStreamEvent, ContentDelta};
use crate::decode::{SseDecoder, SseEvent};
use crate::error::network_error;
use crate::http::ResponseStream;
use futures_core::Stream;
use std::collections::VecDeque;
use std::pin::Pin;
use std::task::{Context, Poll};
use switchboard_core::{Result, StreamChunk};
use tracing::debug;

/// Turns the raw SSE body into the unified chunk stream
///
/// Malformed event payloads are skipped; a top-level `error` event terminates
/// the stream with its mapped kind. Usage is re-emitted whenever the backend
/// updates a count, so the last usage chunk is the complete one.
pub struct AnthropicStream {
    inner: ResponseStream,
    decoder: SseDecoder,
    pending: VecDeque<Result<StreamChunk>>,
    input_tokens: u32,
    output_tokens: u32,
    done: bool,
}

impl AnthropicStream {
    pub(crate) fn new(inner: ResponseStream) -> Self {
        Self {
            inner,
            decoder: SseDecoder::new(),
            pending: VecDeque::new(),
            input_tokens: 0,
            output_tokens: 0,
            done: false,
        }
    }

    fn handle_event(&mut self, event: SseEvent) {
        match event {
            SseEvent::Data(data) => self.handle_data(&data),
            SseEvent::Done => self.done = true,
        }
    }

    fn handle_data(&mut self, data: &str) {
        let event: AnthropicStreamEvent = match serde_json::from_str(data) {
            Ok(event) => event,
            Err(e) => {
                debug!(error = %e, "skipping malformed stream event");
                return;
            }
        };

        match event {
            AnthropicStreamEvent::MessageStart { message } => {
                if let Some(usage) = message.usage {
                    if let Some(input) = usage.input_tokens {
                        self.input_tokens = input;
                    }
                    if let Some(output) = usage.output_tokens {
                        self.output_tokens = output;
                    }
                    self.push_usage();
                }
            }
            AnthropicStreamEvent::ContentBlockDelta { delta } => {
                if let ContentDelta::TextDelta { text } = delta {
                    if !text.is_empty() {
                        self.pending.push_back(Ok(StreamChunk::Content(text)));
                    }
                }
            }
            AnthropicStreamEvent::MessageDelta { usage } => {
                if let Some(usage) = usage {
                    if let Some(input) = usage.input_tokens {
                        self.input_tokens = input;
                    }
                    if let Some(output) = usage.output_tokens {
                        self.output_tokens = output;
                    }
                    self.push_usage();
                }
            }
            AnthropicStreamEvent::MessageStop => self.done = true,
            AnthropicStreamEvent::Error { error } => {
                self.pending.push_back(Err(map_api_error(&error)));
                self.done = true;
            }
            AnthropicStreamEvent::ContentBlockStart
            | AnthropicStreamEvent::ContentBlockStop
            | AnthropicStreamEvent::Ping => {}
        }
    }

    fn push_usage(&mut self) {
        self.pending.push_back(Ok(StreamChunk::Usage {
            input: self.input_tokens,
            output: self.output_tokens,
        }));
    }
}

impl Stream for AnthropicStream {
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
                    let events = self.decoder.feed(&bytes);
                    for event in events {
                        self.handle_event(event);
                    }
                }
                Poll::Ready(Some(Err(e))) => {
                    self.done = true;
                    return Poll::Ready(Some(Err(network_error(e))));
                }
                Poll::Ready(None) => {
                    if let Some(event) = self.decoder.finish() {
                        self.handle_event(event);
                    }
                    self.done = true;
                }
                Poll::Pending => return Poll::Pending,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;
    use futures::StreamExt;
    use pretty_assertions::assert_eq;
    use switchboard_core::Error;

    fn byte_stream(chunks: Vec<&'static [u8]>) -> ResponseStream {
        Box::pin(futures::stream::iter(
            chunks.into_iter().map(|c| Ok(Bytes::from_static(c))),
        ))
    }

    #[tokio::test]
    async fn deltas_become_content_chunks() {
        let body: &[u8] = b"data: {\"type\":\"message_start\",\"message\":{\"usage\":{\"input_tokens\":12}}}\n\
            data: {\"type\":\"content_block_delta\",\"index\":0,\"delta\":{\"type\":\"text_delta\",\"text\":\"Hel\"}}\n\
            data: {\"type\":\"content_block_delta\",\"index\":0,\"delta\":{\"type\":\"text_delta\",\"text\":\"lo\"}}\n\
            data: {\"type\":\"message_delta\",\"delta\":{\"stop_reason\":\"end_turn\"},\"usage\":{\"output_tokens\":2}}\n\
            data: {\"type\":\"message_stop\"}\n";

        let chunks: Vec<_> = AnthropicStream::new(byte_stream(vec![body]))
            .collect::<Vec<Result<StreamChunk>>>()
            .await;

        let chunks: Vec<_> = chunks.into_iter().map(|c| c.unwrap()).collect();
        assert_eq!(
            chunks,
            vec![
                StreamChunk::Usage {
                    input: 12,
                    output: 0
                },
                StreamChunk::Content("Hel".to_string()),
                StreamChunk::Content("lo".to_string()),
                StreamChunk::Usage {
                    input: 12,
                    output: 2
                },
            ]
        );
    }

    #[tokio::test]
    async fn malformed_events_are_skipped() {
        let body: &[u8] = b"data: {not json\n\
            data: {\"type\":\"content_block_delta\",\"index\":0,\"delta\":{\"type\":\"text_delta\",\"text\":\"ok\"}}\n\
            data: {\"type\":\"message_stop\"}\n";

        let chunks: Vec<_> = AnthropicStream::new(byte_stream(vec![body]))
            .collect::<Vec<Result<StreamChunk>>>()
            .await;

        assert_eq!(chunks.len(), 1);
        assert_eq!(
            chunks[0].as_ref().unwrap(),
            &StreamChunk::Content("ok".to_string())
        );
    }

    #[tokio::test]
    async fn error_event_terminates_with_mapped_kind() {
        let body: &[u8] = b"data: {\"type\":\"content_block_delta\",\"index\":0,\"delta\":{\"type\":\"text_delta\",\"text\":\"part\"}}\n\
            data: {\"type\":\"error\",\"error\":{\"type\":\"overloaded_error\",\"message\":\"busy\"}}\n";

        let chunks: Vec<_> = AnthropicStream::new(byte_stream(vec![body]))
            .collect::<Vec<Result<StreamChunk>>>()
            .await;

        assert_eq!(chunks.len(), 2);
        assert!(chunks[0].is_ok());
        assert!(matches!(
            chunks[1].as_ref().unwrap_err(),
            Error::Server { status: 529, .. }
        ));
    }

    #[tokio::test]
    async fn events_split_across_network_chunks() {
        let chunks: Vec<_> = AnthropicStream::new(byte_stream(vec![
            b"data: {\"type\":\"content_block_delta\",\"index\":0,\"delta\":{\"ty",
            b"pe\":\"text_delta\",\"text\":\"joined\"}}\ndata: {\"type\":\"message_stop\"}\n",
        ]))
        .collect::<Vec<Result<StreamChunk>>>()
        .await;

        assert_eq!(chunks.len(), 1);
        assert_eq!(
            chunks[0].as_ref().unwrap(),
            &StreamChunk::Content("joined".to_string())
        );
    }
}
