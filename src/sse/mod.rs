//! Server-sent event decoding for token-streamed chat responses.
//!
//! Data flows one way through three stages:
//! - `frame` - raw bytes to complete text lines, buffering partial lines
//! - `line` - classifies each line (blank, comment, data, unrecognized)
//! - `delta` - pulls `choices[0].delta.content` out of a data payload
//!
//! Retrying a payload that failed to decode is the stream driver's decision,
//! not something these stages do on their own.

mod delta;
mod frame;
mod line;

pub use delta::{extract, ChunkChoice, ChunkDelta, ChunkPayload, DeltaError};
pub use frame::{FrameReader, Frames};
pub use line::{classify, EventLine, DONE_SENTINEL};
