//! Conversation data types shared by the transcript, the stream driver and
//! the request issuer.

mod message;
mod request;

pub use message::*;
pub use request::{ChatRequest, RequestMessage};
