//! Incremental printing of streamed replies.

use std::io::{self, Write};

use crate::models::TurnRole;
use crate::transcript::TranscriptEvent;

/// Writes only the text each transcript event adds to the streaming reply.
///
/// User turns and synthetic error turns are never echoed; errors are
/// reported from the send result instead.
pub struct DeltaPrinter<W: Write> {
    out: W,
    /// Index of the assistant turn being printed and how many bytes of it
    /// are already on screen
    current: Option<(usize, usize)>,
}

impl<W: Write> DeltaPrinter<W> {
    pub fn new(out: W) -> Self {
        Self { out, current: None }
    }

    pub fn handle(&mut self, event: &TranscriptEvent) -> io::Result<()> {
        match event {
            TranscriptEvent::TurnAppended { index, turn }
                if turn.role == TurnRole::Assistant && !turn.is_error =>
            {
                self.out.write_all(turn.content.as_bytes())?;
                self.current = Some((*index, turn.content.len()));
            }
            TranscriptEvent::TurnUpdated { index, turn } => {
                if let Some((open, printed)) = self.current.as_mut() {
                    if *open == *index {
                        let suffix = turn.content.get(*printed..).unwrap_or_default();
                        self.out.write_all(suffix.as_bytes())?;
                        *printed = turn.content.len();
                    }
                }
            }
            TranscriptEvent::TurnSealed { index, .. } => {
                if matches!(self.current, Some((open, _)) if open == *index) {
                    self.out.write_all(b"\n")?;
                    self.current = None;
                }
            }
            TranscriptEvent::Reset => self.current = None,
            TranscriptEvent::TurnAppended { .. } => {}
        }
        self.out.flush()
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}
