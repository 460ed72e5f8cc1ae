//! End-to-end tests over the facade: registry, orchestrator, and the
//! uniform streaming contract, exercised with in-process stub adapters.

use async_trait::async_trait;
use pretty_assertions::assert_eq;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use switchboard::client::{compare, Client, TurnPhase};
use switchboard::prelude::*;
use tokio_util::sync::CancellationToken;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

struct StubProvider {
    info: ProviderInfo,
    sends: Mutex<VecDeque<Result<ChatResponse>>>,
    streams: Mutex<VecDeque<Vec<Result<StreamChunk>>>>,
}

impl StubProvider {
    fn new(id: &str, supports_streaming: bool) -> Self {
        let mut info = ProviderInfo::new(id, id);
        info.supports_streaming = supports_streaming;
        info.models = vec![format!("{id}-default")];
        Self {
            info,
            sends: Mutex::new(VecDeque::new()),
            streams: Mutex::new(VecDeque::new()),
        }
    }

    fn queue_send(&self, result: Result<ChatResponse>) {
        self.sends.lock().unwrap().push_back(result);
    }

    fn queue_stream(&self, chunks: Vec<Result<StreamChunk>>) {
        self.streams.lock().unwrap().push_back(chunks);
    }
}

#[async_trait]
impl Provider for StubProvider {
    fn info(&self) -> &ProviderInfo {
        &self.info
    }

    fn default_settings(&self) -> ModelSettings {
        ModelSettings::for_model(format!("{}-default", self.info.id))
    }

    fn is_configured(&self) -> bool {
        true
    }

    async fn send(&self, _request: ChatRequest) -> Result<ChatResponse> {
        self.sends
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(ChatResponse::text("default")))
    }

    async fn stream(&self, request: ChatRequest) -> Result<ChunkStream> {
        let scripted = self.streams.lock().unwrap().pop_front();
        match scripted {
            Some(chunks) => Ok(Box::pin(futures::stream::iter(chunks))),
            None => {
                let response = self.send(request).await?;
                Ok(switchboard::single_yield(response))
            }
        }
    }
}

fn content(text: &str) -> Result<StreamChunk> {
    Ok(StreamChunk::Content(text.to_string()))
}

fn wired(provider: StubProvider) -> (Client, Arc<StubProvider>) {
    init_tracing();
    let provider = Arc::new(provider);
    let registry = Arc::new(ProviderRegistry::new(provider.info().id.clone()));
    registry.register(provider.clone());
    (Client::new(registry), provider)
}

#[tokio::test]
async fn streamed_content_accumulates_without_needing_usage() {
    let provider = StubProvider::new("stub", true);
    provider.queue_stream(vec![content("Hel"), content("lo"), content(" world")]);
    let (client, _) = wired(provider);

    let outcome = client.stream("say hello", &[]).await.unwrap().finish().await;

    assert_eq!(outcome.text, "Hello world");
    assert_eq!(outcome.phase, TurnPhase::Completed);
    assert_eq!(outcome.input_tokens, None);
    assert_eq!(outcome.output_tokens, None);
    assert!(outcome.error.is_none());
}

#[tokio::test]
async fn rate_limit_hint_survives_to_the_caller() {
    let provider = StubProvider::new("stub", false);
    provider.queue_send(Err(Error::RateLimited {
        retry_after: Some(30),
    }));
    let (client, _) = wired(provider);

    let err = client.request("hi", &[]).await.unwrap_err();
    match err {
        Error::RateLimited { retry_after } => assert_eq!(retry_after, Some(30)),
        other => panic!("expected RateLimited(30), got {other:?}"),
    }
}

#[tokio::test]
async fn mid_stream_failure_keeps_already_emitted_content() {
    let provider = StubProvider::new("stub", true);
    provider.queue_stream(vec![
        content("kept "),
        content("text"),
        Err(Error::server(502, "upstream gone")),
    ]);
    let (client, _) = wired(provider);

    let outcome = client.stream("hi", &[]).await.unwrap().finish().await;

    assert_eq!(outcome.text, "kept text");
    assert_eq!(outcome.phase, TurnPhase::Failed);
    assert!(matches!(
        outcome.error,
        Some(Error::Server { status: 502, .. })
    ));
}

#[tokio::test]
async fn cancellation_preserves_partial_content() {
    use futures::StreamExt;

    let provider = StubProvider::new("stub", true);
    provider.queue_stream(vec![content("partial"), content(" never consumed")]);
    let (client, _) = wired(provider);

    let token = CancellationToken::new();
    let mut turn = client
        .stream_with("hi", &[], token.clone())
        .await
        .unwrap();

    let first = turn.next().await.unwrap().unwrap();
    assert_eq!(first, StreamChunk::Content("partial".to_string()));

    token.cancel();
    let outcome = turn.finish().await;
    assert_eq!(outcome.phase, TurnPhase::Cancelled);
    assert_eq!(outcome.text, "partial");
}

#[tokio::test]
async fn switching_backends_snapshots_and_restores_settings() {
    init_tracing();
    let alpha = Arc::new(StubProvider::new("alpha", true));
    let beta = Arc::new(StubProvider::new("beta", true));
    let registry = Arc::new(ProviderRegistry::new("alpha"));
    registry.register(alpha);
    registry.register(beta);

    registry.update_settings(|s| {
        s.temperature = 0.2;
        s.system_prompt = "terse".to_string();
    });
    let before = registry.active().unwrap().1;

    registry.set_active("beta").unwrap();
    assert_eq!(registry.active().unwrap().1.model, "beta-default");

    registry.set_active("alpha").unwrap();
    assert_eq!(registry.active().unwrap().1, before);
}

#[tokio::test]
async fn duplicate_registration_leaves_the_count_unchanged() {
    init_tracing();
    let registry = Arc::new(ProviderRegistry::new("alpha"));
    registry.register(Arc::new(StubProvider::new("alpha", true)));
    registry.register(Arc::new(StubProvider::new("alpha", true)));
    assert_eq!(registry.len(), 1);
}

#[tokio::test(flavor = "multi_thread")]
async fn compare_ranks_all_attempts_by_latency() {
    init_tracing();
    let quick = StubProvider::new("quick", false);
    quick.queue_send(Ok(ChatResponse::text("quick answer")));
    let failing = StubProvider::new("failing", false);
    failing.queue_send(Err(Error::network("unreachable")));

    let registry = Arc::new(ProviderRegistry::new("quick"));
    registry.register(Arc::new(quick));
    registry.register(Arc::new(failing));

    let entries = compare(&registry, &["failing", "quick"], "hi", &[]).await;

    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].rank, 1);
    assert_eq!(entries[0].provider, "quick");
    assert!(entries[0].outcome.is_ok());
    assert_eq!(entries[1].rank, 2);
    assert!(entries[1].outcome.is_err());
}
