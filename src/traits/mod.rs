//! Trait abstractions for dependency injection and testability.
//!
//! # Traits
//!
//! - [`HttpClient`] - Issues the streaming chat request

pub mod http;

pub use http::{ByteStream, Headers, HttpClient, HttpError};
