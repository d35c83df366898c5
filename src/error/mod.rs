//! Error handling for streamed chat sends.
//!
//! - **Error Categories**: High-level classification for handling decisions
//! - **`ChatError`**: the terminal failure of one send
//! - **`ChatResult<T>`**: result alias used across the crate
//!
//! | Variant | Category | Retryable |
//! |---------|----------|-----------|
//! | Transport | Network | Yes |
//! | HttpStatus 5xx / 429 | Server | Yes |
//! | HttpStatus other | Client | No |
//! | Cancelled | User | No |
//! | InvalidRequest | Client | No |
//!
//! Recoverable decode problems inside a stream (see [`crate::sse::DeltaError`])
//! never surface here.

mod category;
mod chat_error;

pub use category::ErrorCategory;
pub use chat_error::{error_message_from_body, ChatError, ChatResult};
