//! Per-request streaming state machine

use futures::StreamExt;
use futures_core::Stream;
use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::{Duration, Instant};
use switchboard_core::{ChunkStream, Error, Result, StreamAccumulator, StreamChunk};
use tokio_util::sync::CancellationToken;
use tracing::debug;
use uuid::Uuid;

/// Where a turn currently stands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnPhase {
    /// Request dispatched, no chunk seen yet
    Sending,
    /// At least one chunk has arrived
    Streaming,
    /// The backend signalled completion
    Completed,
    /// The caller cancelled; partial content is preserved
    Cancelled,
    /// The stream terminated with an error; chunks emitted before it remain
    /// valid
    Failed,
}

/// One in-flight streamed request
///
/// Yields the adapter's chunks unchanged while accumulating text and the
/// last-seen usage. Cancellation is cooperative: once the token fires, the
/// inner byte source is dropped and no further decoder work happens. The
/// decoders live inside the dropped stream, so nothing leaks into the next
/// request.
pub struct Turn {
    id: Uuid,
    provider: String,
    model: String,
    started: Instant,
    inner: Option<ChunkStream>,
    token: CancellationToken,
    acc: StreamAccumulator,
    phase: TurnPhase,
}

/// Everything a finished turn produced
#[derive(Debug)]
pub struct TurnOutcome {
    /// Request id assigned at dispatch
    pub id: Uuid,
    /// Adapter that served the turn
    pub provider: String,
    /// Model the request asked for
    pub model: String,
    /// Accumulated text, partial on cancellation or failure
    pub text: String,
    /// Last-seen prompt token count
    pub input_tokens: Option<u32>,
    /// Last-seen completion token count
    pub output_tokens: Option<u32>,
    /// Wall-clock time from dispatch to the end of the stream
    pub latency: Duration,
    /// Terminal phase: `Completed`, `Cancelled`, or `Failed`
    pub phase: TurnPhase,
    /// The terminating error, when the phase is `Failed`
    pub error: Option<Error>,
}

impl std::fmt::Debug for Turn {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Turn")
            .field("id", &self.id)
            .field("provider", &self.provider)
            .field("model", &self.model)
            .field("phase", &self.phase)
            .finish_non_exhaustive()
    }
}

impl Turn {
    /// `started` is the dispatch instant, captured before stream setup so
    /// the latency includes connection time
    pub(crate) fn new(
        provider: String,
        model: String,
        inner: ChunkStream,
        token: CancellationToken,
        started: Instant,
    ) -> Self {
        let id = Uuid::new_v4();
        debug!(turn = %id, provider = %provider, "turn dispatched");
        Self {
            id,
            provider,
            model,
            started,
            inner: Some(inner),
            token,
            acc: StreamAccumulator::new(),
            phase: TurnPhase::Sending,
        }
    }

    /// Request id assigned at dispatch
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Where the turn currently stands
    pub fn phase(&self) -> TurnPhase {
        self.phase
    }

    /// Text accumulated so far
    pub fn text(&self) -> &str {
        self.acc.content()
    }

    /// Token handle that cancels this turn
    pub fn cancellation_token(&self) -> CancellationToken {
        self.token.clone()
    }

    fn transition(&mut self, phase: TurnPhase) {
        if self.phase != phase {
            debug!(turn = %self.id, from = ?self.phase, to = ?phase, "turn transition");
            self.phase = phase;
        }
    }

    /// Drain the rest of the stream and fold everything into an outcome
    ///
    /// Partial content survives errors and cancellation; the terminating
    /// error, if any, rides along instead of being swallowed.
    pub async fn finish(mut self) -> TurnOutcome {
        let mut error = None;
        while let Some(item) = self.next().await {
            if let Err(e) = item {
                error = Some(e);
            }
        }
        let usage = self.acc.usage();
        TurnOutcome {
            id: self.id,
            provider: self.provider,
            model: self.model,
            text: self.acc.into_content(),
            input_tokens: usage.map(|(input, _)| input),
            output_tokens: usage.map(|(_, output)| output),
            latency: self.started.elapsed(),
            phase: self.phase,
            error,
        }
    }
}

impl Stream for Turn {
    type Item = Result<StreamChunk>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        if matches!(
            self.phase,
            TurnPhase::Completed | TurnPhase::Cancelled | TurnPhase::Failed
        ) {
            return Poll::Ready(None);
        }

        if self.token.is_cancelled() {
            // Dropping the inner stream closes the byte source; in-flight
            // bytes are discarded
            self.inner = None;
            self.transition(TurnPhase::Cancelled);
            return Poll::Ready(None);
        }

        let Some(inner) = self.inner.as_mut() else {
            self.transition(TurnPhase::Completed);
            return Poll::Ready(None);
        };

        match inner.as_mut().poll_next(cx) {
            Poll::Ready(Some(Ok(chunk))) => {
                self.acc.push(&chunk);
                self.transition(TurnPhase::Streaming);
                Poll::Ready(Some(Ok(chunk)))
            }
            Poll::Ready(Some(Err(e))) => {
                self.inner = None;
                self.transition(TurnPhase::Failed);
                Poll::Ready(Some(Err(e)))
            }
            Poll::Ready(None) => {
                self.inner = None;
                self.transition(TurnPhase::Completed);
                Poll::Ready(None)
            }
            Poll::Pending => Poll::Pending,
        }
    }
}
