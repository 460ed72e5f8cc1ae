//! Bedrock binary event-stream adaptation

use crate::anthropic::payload::{map_api_error, AnthropicStreamEvent, ContentDelta};
use crate::decode::{decode_event_payload, EventStreamDecoder};
use crate::error::network_error;
use crate::http::ResponseStream;
use futures_core::Stream;
use std::collections::VecDeque;
use std::pin::Pin;
use std::task::{Context, Poll};
use switchboard_core::{Result, StreamChunk};
use tracing::debug;

/// Turns the binary frame body into the unified chunk stream
///
/// Each frame payload base64-wraps one Anthropic-family event; frames that
/// do not unwrap, and events that do not parse, are skipped. Usage tracking
/// mirrors the direct Anthropic stream: counts are re-emitted whenever the
/// backend updates one, last chunk authoritative.
pub struct BedrockStream {
    inner: ResponseStream,
    decoder: EventStreamDecoder,
    pending: VecDeque<Result<StreamChunk>>,
    input_tokens: u32,
    output_tokens: u32,
    done: bool,
}

impl BedrockStream {
    pub(crate) fn new(inner: ResponseStream) -> Self {
        Self {
            inner,
            decoder: EventStreamDecoder::new(),
            pending: VecDeque::new(),
            input_tokens: 0,
            output_tokens: 0,
            done: false,
        }
    }

    fn handle_payload(&mut self, payload: &[u8]) {
        let Some(value) = decode_event_payload(payload) else {
            debug!("skipping frame with unrecognized payload shape");
            return;
        };

        let event: AnthropicStreamEvent = match serde_json::from_value(value) {
            Ok(event) => event,
            Err(e) => {
                debug!(error = %e, "skipping unparseable frame event");
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

impl Stream for BedrockStream {
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
                    let payloads = self.decoder.feed(&bytes);
                    for payload in payloads {
                        self.handle_payload(&payload);
                    }
                }
                Poll::Ready(Some(Err(e))) => {
                    self.done = true;
                    return Poll::Ready(Some(Err(network_error(e))));
                }
                Poll::Ready(None) => self.done = true,
                Poll::Pending => return Poll::Pending,
            }
        }
    }
}
