//! Mock HTTP client for testing.
//!
//! Replays scripted response bodies chunk by chunk so tests can control
//! exactly where network reads split the byte stream.

use async_trait::async_trait;
use bytes::Bytes;
use futures::future;
use futures::stream;
use futures::StreamExt;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::traits::{ByteStream, Headers, HttpClient, HttpError};

/// A recorded HTTP request for verification in tests.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    /// Request URL
    pub url: String,
    /// Request headers
    pub headers: Headers,
    /// Request body
    pub body: String,
}

/// Configuration for a mock response.
#[derive(Debug, Clone)]
pub enum MockResponse {
    /// Stream these chunks, then end the body
    Stream(Vec<Bytes>),
    /// Stream these chunks, then fail the read with an error
    StreamThenError(Vec<Bytes>, HttpError),
    /// Stream these chunks, then never yield again
    StreamThenHang(Vec<Bytes>),
    /// Fail before any body is returned
    Error(HttpError),
    /// Never answer the request
    Hang,
}

impl MockResponse {
    /// Convenience for a body split into the given string chunks.
    pub fn chunks<I, S>(chunks: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        MockResponse::Stream(
            chunks
                .into_iter()
                .map(|c| Bytes::from(c.into()))
                .collect(),
        )
    }

    /// A non-2xx status with the given body.
    pub fn status(status: u16, body: &str) -> Self {
        MockResponse::Error(HttpError::ServerError {
            status,
            message: body.to_string(),
        })
    }
}

/// Mock HTTP client for testing.
///
/// # Example
///
/// ```ignore
/// use streamchat::adapters::mock::{MockHttpClient, MockResponse};
///
/// let client = MockHttpClient::new();
/// client.set_response(
///     "http://test/v1/chat/completions",
///     MockResponse::chunks(["data: [DONE]\n"]),
/// );
/// ```
#[derive(Debug, Clone, Default)]
pub struct MockHttpClient {
    /// Configured responses by URL; each URL holds a queue consumed in order
    responses: Arc<Mutex<HashMap<String, Vec<MockResponse>>>>,
    /// Response used when no queued response matches
    default_response: Arc<Mutex<Option<MockResponse>>>,
    /// Recorded requests for verification
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl MockHttpClient {
    /// Create a new mock HTTP client.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a response for a specific URL.
    ///
    /// Responses for the same URL are served first-in first-out.
    pub fn set_response(&self, url: &str, response: MockResponse) {
        let mut responses = self.responses.lock().unwrap();
        responses.entry(url.to_string()).or_default().push(response);
    }

    /// Set a default response for URLs without queued responses.
    pub fn set_default_response(&self, response: MockResponse) {
        let mut default = self.default_response.lock().unwrap();
        *default = Some(response);
    }

    /// Get all recorded requests.
    pub fn get_requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    fn record_request(&self, url: &str, headers: &Headers, body: &str) {
        let mut requests = self.requests.lock().unwrap();
        requests.push(RecordedRequest {
            url: url.to_string(),
            headers: headers.clone(),
            body: body.to_string(),
        });
    }

    fn next_response(&self, url: &str) -> Option<MockResponse> {
        let mut responses = self.responses.lock().unwrap();
        if let Some(queue) = responses.get_mut(url) {
            if !queue.is_empty() {
                return Some(queue.remove(0));
            }
        }
        drop(responses);

        self.default_response.lock().unwrap().clone()
    }
}

#[async_trait]
impl HttpClient for MockHttpClient {
    async fn post_stream(
        &self,
        url: &str,
        body: &str,
        headers: &Headers,
    ) -> Result<ByteStream, HttpError> {
        self.record_request(url, headers, body);

        match self.next_response(url) {
            Some(MockResponse::Stream(chunks)) => {
                Ok(Box::pin(stream::iter(chunks.into_iter().map(Ok::<Bytes, HttpError>))))
            }
            Some(MockResponse::StreamThenError(chunks, err)) => {
                let body = stream::iter(chunks.into_iter().map(Ok::<Bytes, HttpError>))
                    .chain(stream::once(async move { Err(err) }));
                Ok(Box::pin(body))
            }
            Some(MockResponse::StreamThenHang(chunks)) => {
                let body = stream::iter(chunks.into_iter().map(Ok::<Bytes, HttpError>))
                    .chain(stream::pending());
                Ok(Box::pin(body))
            }
            Some(MockResponse::Error(err)) => Err(err),
            Some(MockResponse::Hang) => future::pending().await,
            None => Err(HttpError::Other(format!("No mock response for URL: {}", url))),
        }
    }
}
