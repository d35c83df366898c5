//! HTTP client trait abstraction.
//!
//! The assembler only needs one operation from the transport: POST a body and
//! hand back the response body as a stream of byte chunks. Connection setup,
//! TLS and header construction stay behind this seam.

use async_trait::async_trait;
use bytes::Bytes;
use futures::Stream;
use std::collections::HashMap;
use std::pin::Pin;

/// HTTP headers represented as a key-value map.
pub type Headers = HashMap<String, String>;

/// A response body delivered incrementally.
pub type ByteStream = Pin<Box<dyn Stream<Item = Result<Bytes, HttpError>> + Send>>;

/// HTTP client errors.
#[derive(Debug, Clone, PartialEq)]
pub enum HttpError {
    /// Connection failed
    ConnectionFailed(String),
    /// Request timeout
    Timeout(String),
    /// Server returned a non-success status before streaming began.
    /// `message` is the raw response body, possibly empty.
    ServerError { status: u16, message: String },
    /// IO error while reading the body
    Io(String),
    /// Invalid URL
    InvalidUrl(String),
    /// Other error
    Other(String),
}

impl std::fmt::Display for HttpError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HttpError::ConnectionFailed(msg) => write!(f, "Connection failed: {}", msg),
            HttpError::Timeout(msg) => write!(f, "Request timeout: {}", msg),
            HttpError::ServerError { status, message } => {
                write!(f, "Server error ({}): {}", status, message)
            }
            HttpError::Io(msg) => write!(f, "IO error: {}", msg),
            HttpError::InvalidUrl(msg) => write!(f, "Invalid URL: {}", msg),
            HttpError::Other(msg) => write!(f, "HTTP error: {}", msg),
        }
    }
}

impl std::error::Error for HttpError {}

/// Trait for issuing the streaming chat request.
///
/// Implementations include the production reqwest-based client and a
/// scriptable mock for tests.
///
/// # Example
///
/// ```ignore
/// use futures_util::StreamExt;
/// use streamchat::traits::{Headers, HttpClient};
///
/// async fn dump<C: HttpClient>(client: &C) {
///     let mut body = client
///         .post_stream("http://localhost:8000/v1/chat/completions", "{}", &Headers::new())
///         .await
///         .unwrap();
///     while let Some(chunk) = body.next().await {
///         println!("{:?}", chunk);
///     }
/// }
/// ```
#[async_trait]
pub trait HttpClient: Send + Sync {
    /// Perform a POST request and return the response body as a stream.
    ///
    /// # Arguments
    /// * `url` - The URL to request
    /// * `body` - Request body as a string
    /// * `headers` - Request headers
    ///
    /// # Returns
    /// The body stream, or [`HttpError::ServerError`] carrying the buffered
    /// body when the status is not 2xx.
    async fn post_stream(
        &self,
        url: &str,
        body: &str,
        headers: &Headers,
    ) -> Result<ByteStream, HttpError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_error_display() {
        assert_eq!(
            HttpError::ConnectionFailed("refused".to_string()).to_string(),
            "Connection failed: refused"
        );
        assert_eq!(
            HttpError::Timeout("30s".to_string()).to_string(),
            "Request timeout: 30s"
        );
        assert_eq!(
            HttpError::ServerError {
                status: 500,
                message: "Internal Error".to_string()
            }
            .to_string(),
            "Server error (500): Internal Error"
        );
        assert_eq!(
            HttpError::Io("reset".to_string()).to_string(),
            "IO error: reset"
        );
        assert_eq!(
            HttpError::InvalidUrl("bad url".to_string()).to_string(),
            "Invalid URL: bad url"
        );
        assert_eq!(
            HttpError::Other("unknown".to_string()).to_string(),
            "HTTP error: unknown"
        );
    }
}
