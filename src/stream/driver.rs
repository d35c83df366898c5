//! Drives one response body to a terminal state.

use bytes::Bytes;
use futures::{Stream, StreamExt};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::session::{Flow, StreamSession};
use crate::error::{ChatError, ChatResult};
use crate::models::TurnId;
use crate::traits::HttpError;
use crate::transcript::Transcript;

/// How a successful stream ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionReason {
    /// The server sent `data: [DONE]`
    Sentinel,
    /// The body ended without a sentinel
    StreamEnded,
}

/// Result of a stream that reached `Completed`.
#[derive(Debug, Clone, PartialEq)]
pub struct Completion {
    pub reason: CompletionReason,
    /// The assistant turn this stream produced, if any text arrived
    pub turn_id: Option<TurnId>,
    /// Full text of that turn
    pub text: String,
}

/// Consume `body` until the sentinel, the end of the body, an I/O error or
/// cancellation.
///
/// Deltas are reconciled into `transcript` as they arrive. On failure the
/// partial assistant turn is kept and sealed, and a synthetic error turn is
/// appended after it.
pub async fn run_stream<S>(
    transcript: &mut Transcript,
    mut body: S,
    cancel: &CancellationToken,
) -> ChatResult<Completion>
where
    S: Stream<Item = Result<Bytes, HttpError>> + Unpin,
{
    let mut session = StreamSession::new();

    loop {
        let next = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                return Err(fail(session, transcript, ChatError::Cancelled));
            }
            next = body.next() => next,
        };

        match next {
            Some(Ok(chunk)) => {
                debug!("Received chunk of {} bytes", chunk.len());
                if session.feed(transcript, &chunk) == Flow::Done {
                    return Ok(complete(session, transcript, CompletionReason::Sentinel));
                }
            }
            Some(Err(err)) => {
                return Err(fail(session, transcript, ChatError::transport(err.to_string())));
            }
            None => {
                let reason = match session.drain(transcript) {
                    Flow::Done => CompletionReason::Sentinel,
                    Flow::Continue => CompletionReason::StreamEnded,
                };
                return Ok(complete(session, transcript, reason));
            }
        }
    }
}

fn complete(
    session: StreamSession,
    transcript: &mut Transcript,
    reason: CompletionReason,
) -> Completion {
    let deltas = session.delta_count();
    let (turn_id, text) = session.seal(transcript);
    info!(
        "Stream completed ({:?}) after {} deltas, {} bytes",
        reason,
        deltas,
        text.len()
    );
    Completion {
        reason,
        turn_id,
        text,
    }
}

fn fail(session: StreamSession, transcript: &mut Transcript, err: ChatError) -> ChatError {
    let deltas = session.delta_count();
    session.seal(transcript);
    warn!(
        "Stream failed [{}] after {} deltas: {:?}",
        err.error_code(),
        deltas,
        err
    );
    transcript.push_error(err.user_message());
    err
}
