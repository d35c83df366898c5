//! Common test utilities for integration tests.

#![allow(dead_code)]

use bytes::Bytes;
use futures::stream::{self, Stream};

pub use streamchat::adapters::mock::{MockHttpClient, MockResponse};
use streamchat::config::ChatConfig;
use streamchat::conversation::Conversation;
use streamchat::traits::HttpError;

pub const TEST_URL: &str = "http://mock.test/v1/chat/completions";

/// One `data:` line carrying a content delta, newline terminated.
pub fn delta_line(text: &str) -> String {
    format!(
        "data: {}\n",
        serde_json::json!({ "choices": [{ "delta": { "content": text } }] })
    )
}

pub const DONE_LINE: &str = "data: [DONE]\n";

/// A complete event-stream body: each delta followed by a blank line, then
/// the sentinel.
pub fn sse_body(deltas: &[&str]) -> String {
    let mut body = String::new();
    for text in deltas {
        body.push_str(&delta_line(text));
        body.push('\n');
    }
    body.push_str(DONE_LINE);
    body
}

/// Split `body` into chunks at the given byte offsets.
pub fn split_at_offsets(body: &[u8], offsets: &[usize]) -> Vec<Bytes> {
    let mut chunks = Vec::new();
    let mut start = 0;
    for &offset in offsets {
        chunks.push(Bytes::copy_from_slice(&body[start..offset]));
        start = offset;
    }
    chunks.push(Bytes::copy_from_slice(&body[start..]));
    chunks
}

/// A body stream that yields the given chunks and then ends.
pub fn body_stream(chunks: Vec<Bytes>) -> impl Stream<Item = Result<Bytes, HttpError>> + Unpin {
    stream::iter(chunks.into_iter().map(Ok::<Bytes, HttpError>))
}

/// A conversation against a mock client posting to [`TEST_URL`].
pub fn mock_conversation(client: &MockHttpClient) -> Conversation<MockHttpClient> {
    Conversation::new(client.clone(), ChatConfig::new().with_endpoint(TEST_URL))
}
