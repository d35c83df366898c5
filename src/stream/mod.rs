//! Stream driver: consumes a response body and folds it into the transcript.
//!
//! State machine for one send:
//!
//! ```text
//! Idle -> Streaming -> Completed   ([DONE] sentinel or end of body)
//!                   -> Failed      (body I/O error or cancellation)
//! ```
//!
//! Reads are strictly sequential. Chunk N+1 is only requested after every
//! line of chunk N has been classified and reconciled, and the only
//! suspension point is the chunk read itself.

mod driver;
mod session;

pub use driver::{run_stream, Completion, CompletionReason};
pub use session::{Flow, StreamSession};

/// Lifecycle of the most recent send.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StreamState {
    /// No send has been made yet
    #[default]
    Idle,
    /// A response is being consumed
    Streaming,
    /// The last send finished cleanly
    Completed,
    /// The last send ended with an error or was cancelled
    Failed,
}
