//! Per-request streaming state.

use tracing::{debug, warn};

use crate::models::TurnId;
use crate::sse::{classify, extract, DeltaError, EventLine, FrameReader};
use crate::transcript::{OpenTurn, Transcript};

/// Whether the driver should keep reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    /// The `[DONE]` sentinel was seen
    Done,
}

/// State scoped to one outstanding request.
///
/// Owns the frame buffer, the open assistant turn and at most one carried
/// line awaiting repair. It is consumed when the stream reaches a terminal
/// state, which seals the open turn.
#[derive(Debug, Default)]
pub struct StreamSession {
    frames: FrameReader,
    lines: LineState,
}

#[derive(Debug, Default)]
struct LineState {
    open: OpenTurn,
    /// A data line whose JSON failed to parse, kept for one joined retry
    carry: Option<String>,
    deltas: usize,
}

impl StreamSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one chunk of the body.
    ///
    /// Returns [`Flow::Done`] as soon as the sentinel is seen; lines after it
    /// in the same chunk are left unprocessed.
    pub fn feed(&mut self, transcript: &mut Transcript, chunk: &[u8]) -> Flow {
        for line in self.frames.feed(chunk) {
            if self.lines.process(transcript, line) == Flow::Done {
                return Flow::Done;
            }
        }
        Flow::Continue
    }

    /// Process the unterminated tail left when the body ends.
    pub fn drain(&mut self, transcript: &mut Transcript) -> Flow {
        match self.frames.flush() {
            Some(line) => self.lines.process(transcript, line),
            None => Flow::Continue,
        }
    }

    /// Number of deltas reconciled so far.
    pub fn delta_count(&self) -> usize {
        self.lines.deltas
    }

    /// Whether a malformed line is waiting for its continuation.
    #[cfg(test)]
    fn has_carry(&self) -> bool {
        self.lines.carry.is_some()
    }

    /// End the session, sealing the open turn. Returns the streamed text.
    pub fn seal(self, transcript: &mut Transcript) -> (Option<TurnId>, String) {
        let LineState { open, carry, .. } = self.lines;
        if let Some(carry) = carry {
            warn!(
                "Dropping undecodable frame at end of stream ({} bytes)",
                carry.len()
            );
        }
        let id = open.id().cloned();
        let text = transcript.seal(open);
        (id, text)
    }
}

impl LineState {
    fn process(&mut self, transcript: &mut Transcript, line: String) -> Flow {
        let line = match self.carry.take() {
            Some(mut joined) => {
                joined.push_str(&line);
                match self.apply(transcript, &joined) {
                    Ok(flow) => {
                        debug!("Repaired split frame ({} bytes)", joined.len());
                        return flow;
                    }
                    Err(err) => {
                        // One retry only: give up on the carried fragment
                        warn!("Dropping unrepairable frame: {}", err);
                        line
                    }
                }
            }
            None => line,
        };

        match self.apply(transcript, &line) {
            Ok(flow) => flow,
            Err(err) => {
                debug!("Re-buffering frame for retry: {}", err);
                self.carry = Some(line);
                Flow::Continue
            }
        }
    }

    /// Classify one line and reconcile its delta.
    ///
    /// Only malformed JSON is returned as an error; everything else that
    /// carries no text is a no-op.
    fn apply(&mut self, transcript: &mut Transcript, line: &str) -> Result<Flow, DeltaError> {
        let event = classify(line);
        if event.is_done() {
            return Ok(Flow::Done);
        }

        let payload = match event {
            EventLine::Data(payload) => payload,
            EventLine::Blank | EventLine::Comment(_) => return Ok(Flow::Continue),
            EventLine::Unrecognized(other) => {
                debug!("Ignoring unrecognized line: {}", other);
                return Ok(Flow::Continue);
            }
        };

        match extract(payload) {
            Ok(Some(fragment)) => {
                transcript.append_delta(&mut self.open, &fragment);
                self.deltas += 1;
                Ok(Flow::Continue)
            }
            Ok(None) => Ok(Flow::Continue),
            Err(DeltaError::Shape(msg)) => {
                debug!("Ignoring chunk with unexpected shape: {}", msg);
                Ok(Flow::Continue)
            }
            Err(err) => Err(err),
        }
    }
}
