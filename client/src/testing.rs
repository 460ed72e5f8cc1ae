//! Scripted provider double for orchestrator tests

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;
use switchboard_core::{
    single_yield, ChatRequest, ChatResponse, ChunkStream, Error, ModelSettings, Provider,
    ProviderInfo, Result, StreamChunk,
};

/// One scripted reaction, consumed in FIFO order
pub(crate) enum Step {
    /// `send` answers with this text
    Respond(&'static str),
    /// `send` answers with this text after sleeping
    RespondAfter(&'static str, Duration),
    /// `send` fails
    Fail(Error),
    /// `stream` yields these content chunks then completes
    StreamContent(Vec<&'static str>),
    /// `stream` yields these raw items then completes
    StreamItems(Vec<Result<StreamChunk>>),
    /// `stream` setup fails
    StreamFail(Error),
}

/// Provider whose behavior is a queue of [`Step`]s
///
/// Records every request it receives; an unscripted call fails loudly.
pub(crate) struct ScriptedProvider {
    info: ProviderInfo,
    steps: Mutex<VecDeque<Step>>,
    requests: Mutex<Vec<ChatRequest>>,
}

impl ScriptedProvider {
    pub fn new(id: &str, supports_streaming: bool) -> Self {
        let mut info = ProviderInfo::new(id, id);
        info.supports_streaming = supports_streaming;
        info.models = vec![format!("{id}-model")];
        Self {
            info,
            steps: Mutex::new(VecDeque::new()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn script(&self, step: Step) {
        self.steps.lock().unwrap().push_back(step);
    }

    pub fn requests(&self) -> Vec<ChatRequest> {
        self.requests.lock().unwrap().clone()
    }

    fn pop(&self) -> Option<Step> {
        self.steps.lock().unwrap().pop_front()
    }

    fn response(&self, text: &str) -> ChatResponse {
        let mut response = ChatResponse::text(text);
        response.provider = self.info.id.clone();
        response.model = format!("{}-model", self.info.id);
        response
    }
}

#[async_trait]
impl Provider for ScriptedProvider {
    fn info(&self) -> &ProviderInfo {
        &self.info
    }

    fn default_settings(&self) -> ModelSettings {
        ModelSettings::for_model(format!("{}-model", self.info.id))
    }

    fn is_configured(&self) -> bool {
        true
    }

    async fn send(&self, request: ChatRequest) -> Result<ChatResponse> {
        self.requests.lock().unwrap().push(request);
        match self.pop() {
            Some(Step::Respond(text)) => Ok(self.response(text)),
            Some(Step::RespondAfter(text, delay)) => {
                tokio::time::sleep(delay).await;
                Ok(self.response(text))
            }
            Some(Step::Fail(error)) => Err(error),
            _ => Err(Error::network("scripted provider: unscripted send")),
        }
    }

    async fn stream(&self, request: ChatRequest) -> Result<ChunkStream> {
        let step = {
            let steps = self.steps.lock().unwrap();
            matches!(
                steps.front(),
                Some(Step::StreamContent(_) | Step::StreamItems(_) | Step::StreamFail(_))
            )
        };
        if !step {
            // No stream step scripted: behave like the single-yield fallback
            let response = self.send(request).await?;
            return Ok(single_yield(response));
        }

        self.requests.lock().unwrap().push(request);
        match self.pop() {
            Some(Step::StreamContent(parts)) => {
                let items: Vec<Result<StreamChunk>> = parts
                    .into_iter()
                    .map(|p| Ok(StreamChunk::Content(p.to_string())))
                    .collect();
                Ok(Box::pin(futures::stream::iter(items)))
            }
            Some(Step::StreamItems(items)) => Ok(Box::pin(futures::stream::iter(items))),
            Some(Step::StreamFail(error)) => Err(error),
            _ => unreachable!("front was checked to be a stream step"),
        }
    }
}
