//! Reqwest-based HTTP client adapter.
//!
//! Production implementation of [`HttpClient`] streaming the response body
//! with `reqwest::Response::bytes_stream`.

use async_trait::async_trait;
use futures_util::StreamExt;

use crate::traits::{ByteStream, Headers, HttpClient, HttpError};

/// HTTP client implementation using reqwest.
///
/// # Example
///
/// ```ignore
/// use streamchat::adapters::ReqwestHttpClient;
/// use streamchat::traits::{Headers, HttpClient};
///
/// let client = ReqwestHttpClient::new();
/// let body = client.post_stream("http://localhost:8000/v1/chat/completions", "{}", &Headers::new()).await?;
/// ```
#[derive(Debug, Clone)]
pub struct ReqwestHttpClient {
    client: reqwest::Client,
}

impl ReqwestHttpClient {
    /// Create a new ReqwestHttpClient with default settings.
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }

    /// Create a new ReqwestHttpClient with a custom reqwest::Client.
    ///
    /// Use this to configure connect timeouts or TLS settings. A total
    /// request timeout would cut long replies short, so callers that want a
    /// deadline should cancel the send instead.
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }

    /// Get a reference to the underlying reqwest::Client.
    pub fn inner(&self) -> &reqwest::Client {
        &self.client
    }

    /// Convert a reqwest error raised while issuing the request.
    fn convert_error(err: reqwest::Error) -> HttpError {
        if err.is_timeout() {
            HttpError::Timeout(err.to_string())
        } else if err.is_connect() {
            HttpError::ConnectionFailed(err.to_string())
        } else if err.is_builder() {
            HttpError::InvalidUrl(err.to_string())
        } else {
            HttpError::Other(err.to_string())
        }
    }

    /// Convert a reqwest error raised while reading the body.
    fn convert_body_error(err: reqwest::Error) -> HttpError {
        if err.is_timeout() {
            HttpError::Timeout(err.to_string())
        } else {
            HttpError::Io(err.to_string())
        }
    }

    /// Apply headers to a request builder.
    fn apply_headers(
        builder: reqwest::RequestBuilder,
        headers: &Headers,
    ) -> reqwest::RequestBuilder {
        let mut builder = builder;
        for (key, value) in headers {
            builder = builder.header(key, value);
        }
        builder
    }
}

impl Default for ReqwestHttpClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HttpClient for ReqwestHttpClient {
    async fn post_stream(
        &self,
        url: &str,
        body: &str,
        headers: &Headers,
    ) -> Result<ByteStream, HttpError> {
        let builder = self.client.post(url).body(body.to_string());
        let builder = Self::apply_headers(builder, headers);

        let response = builder.send().await.map_err(Self::convert_error)?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response.text().await.unwrap_or_default();
            tracing::debug!("POST {} rejected with status {}", url, status);
            return Err(HttpError::ServerError { status, message });
        }

        let stream = response
            .bytes_stream()
            .map(|result| result.map_err(Self::convert_body_error));

        Ok(Box::pin(stream))
    }
}
