//! Multi-backend compare: one prompt, N adapters, ranked by latency

use futures::future::join_all;
use std::sync::Arc;
use std::time::{Duration, Instant};
use switchboard_core::{ChatRequest, ChatResponse, Error, Message, Result};
use switchboard_registry::ProviderRegistry;
use tracing::debug;

/// One adapter's attempt in a compare run
#[derive(Debug)]
pub struct CompareEntry {
    /// 1-based position after sorting
    pub rank: usize,
    /// Adapter id
    pub provider: String,
    /// Wall-clock time of this attempt, measured locally
    pub latency: Duration,
    /// The unified response, or the failure that ended the attempt
    pub outcome: Result<ChatResponse>,
}

/// Send the same prompt to every listed adapter concurrently
///
/// Requests are fully independent: no completion-order guarantee exists while
/// they run. Only after every attempt has completed or failed are entries
/// sorted (successes before failures, then by measured latency, id as the
/// deterministic tie-break) and given 1-based ranks.
pub async fn compare(
    registry: &Arc<ProviderRegistry>,
    ids: &[&str],
    prompt: &str,
    history: &[Message],
) -> Vec<CompareEntry> {
    let tasks: Vec<_> = ids
        .iter()
        .map(|id| {
            let id = (*id).to_string();
            let registry = Arc::clone(registry);
            let prompt = prompt.to_string();
            let history = history.to_vec();
            tokio::spawn(async move { attempt(&registry, id, &prompt, history).await })
        })
        .collect();

    let mut entries: Vec<CompareEntry> = ids
        .iter()
        .zip(join_all(tasks).await)
        .map(|(id, joined)| {
            joined.unwrap_or_else(|e| CompareEntry {
                rank: 0,
                provider: (*id).to_string(),
                latency: Duration::ZERO,
                outcome: Err(Error::network(format!("compare task failed: {e}"))),
            })
        })
        .collect();

    entries.sort_by(|a, b| {
        (a.outcome.is_err(), a.latency, &a.provider).cmp(&(
            b.outcome.is_err(),
            b.latency,
            &b.provider,
        ))
    });
    for (index, entry) in entries.iter_mut().enumerate() {
        entry.rank = index + 1;
    }
    entries
}

async fn attempt(
    registry: &Arc<ProviderRegistry>,
    id: String,
    prompt: &str,
    mut history: Vec<Message>,
) -> CompareEntry {
    let started = Instant::now();

    let prepared = registry.provider(&id).and_then(|provider| {
        registry
            .settings_for(&id)
            .ok()
            .map(|settings| (provider, settings))
    });
    let Some((provider, settings)) = prepared else {
        return CompareEntry {
            rank: 0,
            provider: id.clone(),
            latency: started.elapsed(),
            outcome: Err(Error::Unsupported {
                provider: id,
                feature: "compare (not registered)".to_string(),
            }),
        };
    };

    history.push(Message::user(prompt));
    let outcome = provider.send(ChatRequest::new(history, settings)).await;
    let latency = started.elapsed();
    debug!(provider = %id, ok = outcome.is_ok(), ?latency, "compare attempt finished");

    CompareEntry {
        rank: 0,
        provider: id,
        latency,
        outcome,
    }
}
