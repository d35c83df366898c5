//! streamchat - incremental assembler and terminal client for token-streamed
//! chat completions.
//!
//! Bytes from a `text/event-stream` response flow one way through the crate:
//! [`sse`] turns them into lines, events and text deltas, [`transcript`]
//! folds the deltas into conversation turns, and [`stream`] drives one
//! response to a terminal state. [`conversation::Conversation`] ties these to
//! an [`traits::HttpClient`].

pub mod adapters;
pub mod attachments;
pub mod cli;
pub mod config;
pub mod conversation;
pub mod error;
pub mod models;
pub mod sse;
pub mod stream;
pub mod traits;
pub mod transcript;
