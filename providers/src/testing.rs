//! Mock transport for adapter tests

use crate::http::{HttpClient, ResponseStream};
use bytes::Bytes;
use reqwest::header::HeaderMap;
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::Mutex;
use switchboard_core::{Error, Result};

/// Scripted [`HttpClient`] that records every call
///
/// Responses are consumed in FIFO order; an unscripted call fails loudly so a
/// test never silently passes on a default.
pub(crate) struct MockHttp {
    posts: Mutex<Vec<(String, HeaderMap, Vec<u8>)>>,
    gets: Mutex<Vec<(String, HeaderMap)>>,
    results: Mutex<VecDeque<Result<Value>>>,
    streams: Mutex<VecDeque<Result<Vec<Bytes>>>>,
}

impl MockHttp {
    pub fn new() -> Self {
        Self {
            posts: Mutex::new(Vec::new()),
            gets: Mutex::new(Vec::new()),
            results: Mutex::new(VecDeque::new()),
            streams: Mutex::new(VecDeque::new()),
        }
    }

    pub fn respond_with(&self, value: Value) {
        self.results.lock().unwrap().push_back(Ok(value));
    }

    pub fn fail_with(&self, error: Error) {
        self.results.lock().unwrap().push_back(Err(error));
    }

    pub fn stream_with(&self, chunks: Vec<&[u8]>) {
        let chunks = chunks.into_iter().map(Bytes::copy_from_slice).collect();
        self.streams.lock().unwrap().push_back(Ok(chunks));
    }

    pub fn posts(&self) -> Vec<(String, HeaderMap, Vec<u8>)> {
        self.posts.lock().unwrap().clone()
    }

    pub fn gets(&self) -> Vec<(String, HeaderMap)> {
        self.gets.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.posts.lock().unwrap().len() + self.gets.lock().unwrap().len()
    }

    fn next_result(&self) -> Result<Value> {
        self.results
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(Error::network("mock transport: unscripted call")))
    }
}

#[async_trait::async_trait]
impl HttpClient for MockHttp {
    async fn get(&self, url: &str, headers: HeaderMap) -> Result<Value> {
        self.gets.lock().unwrap().push((url.to_string(), headers));
        self.next_result()
    }

    async fn post(&self, url: &str, headers: HeaderMap, body: Vec<u8>) -> Result<Value> {
        self.posts
            .lock()
            .unwrap()
            .push((url.to_string(), headers, body));
        self.next_result()
    }

    async fn post_stream(
        &self,
        url: &str,
        headers: HeaderMap,
        body: Vec<u8>,
    ) -> Result<ResponseStream> {
        self.posts
            .lock()
            .unwrap()
            .push((url.to_string(), headers, body));

        let chunks = self
            .streams
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(Error::network("mock transport: unscripted stream")))?;

        Ok(Box::pin(futures::stream::iter(
            chunks.into_iter().map(Ok),
        )))
    }
}
