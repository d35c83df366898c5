//! Mock implementations for testing.
//!
//! - [`MockHttpClient`] - Streaming HTTP client with scripted bodies

pub mod http;

pub use http::{MockHttpClient, MockResponse, RecordedRequest};
