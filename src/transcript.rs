//! The ordered list of conversation turns and the reconciler that folds
//! streamed deltas into it.
//!
//! Every mutation is published as a [`TranscriptEvent`] carrying a snapshot of
//! the affected turn, so a presentation layer can re-render without holding a
//! borrow on the transcript.

use tokio::sync::mpsc;

use crate::models::{ConversationTurn, TurnId, TurnRole};

/// Notification that the transcript changed.
#[derive(Debug, Clone, PartialEq)]
pub enum TranscriptEvent {
    /// A turn was added at `index`
    TurnAppended { index: usize, turn: ConversationTurn },
    /// The open assistant turn at `index` grew
    TurnUpdated { index: usize, turn: ConversationTurn },
    /// The assistant turn at `index` stopped accepting deltas
    TurnSealed { index: usize, turn: ConversationTurn },
    /// All turns were removed
    Reset,
}

/// The assistant turn a streaming session is currently extending.
///
/// Lives inside the session, never on the transcript, so a finished or
/// cancelled session cannot leave a marker behind for a later stray delta.
#[derive(Debug, Default)]
pub struct OpenTurn {
    id: Option<TurnId>,
    /// Full text received so far in this session
    accumulated: String,
}

impl OpenTurn {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn id(&self) -> Option<&TurnId> {
        self.id.as_ref()
    }

    pub fn text(&self) -> &str {
        &self.accumulated
    }

    pub fn into_text(self) -> String {
        self.accumulated
    }
}

/// Chronologically ordered conversation turns.
#[derive(Debug, Default)]
pub struct Transcript {
    turns: Vec<ConversationTurn>,
    observers: Vec<mpsc::UnboundedSender<TranscriptEvent>>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an observer for transcript changes.
    pub fn subscribe(&mut self) -> mpsc::UnboundedReceiver<TranscriptEvent> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.observers.push(tx);
        rx
    }

    pub fn turns(&self) -> &[ConversationTurn] {
        &self.turns
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    pub fn last(&self) -> Option<&ConversationTurn> {
        self.turns.last()
    }

    /// Append a complete user turn.
    pub fn push_user(&mut self, content: impl Into<String>) -> TurnId {
        self.push(ConversationTurn::user(content))
    }

    /// Append a synthetic error turn after a failed send.
    pub fn push_error(&mut self, message: impl Into<String>) -> TurnId {
        self.push(ConversationTurn::error(message))
    }

    /// Fold one delta into the session's open assistant turn.
    ///
    /// The first delta of a session opens a new assistant turn at the end of
    /// the transcript. Later deltas replace that turn in place (same id, same
    /// position) with the fragment appended.
    ///
    /// If a turn was pushed after the open one, the stale turn is sealed and
    /// the session continues in a fresh assistant turn whose text starts over.
    pub fn append_delta(&mut self, open: &mut OpenTurn, fragment: &str) -> &ConversationTurn {
        let index = open.id.as_ref().and_then(|id| self.open_index(id));
        match index {
            Some(index) => {
                open.accumulated.push_str(fragment);
                self.turns[index].append_token(fragment);
                self.publish(TranscriptEvent::TurnUpdated {
                    index,
                    turn: self.turns[index].clone(),
                });
                &self.turns[index]
            }
            None => {
                if let Some(stale) = open.id.take() {
                    self.seal_turn(&stale);
                }
                open.accumulated = fragment.to_string();
                let turn = ConversationTurn::streaming_assistant(fragment);
                open.id = Some(turn.id.clone());
                self.push(turn);
                let index = self.turns.len() - 1;
                &self.turns[index]
            }
        }
    }

    /// Stop the session's open turn from accepting further deltas.
    ///
    /// Consumes the open-turn marker and returns the text accumulated during
    /// the session. A session that never received a delta seals nothing.
    pub fn seal(&mut self, open: OpenTurn) -> String {
        if let Some(id) = open.id() {
            self.seal_turn(id);
        }
        open.into_text()
    }

    /// Remove every turn.
    pub fn reset(&mut self) {
        self.turns.clear();
        self.publish(TranscriptEvent::Reset);
    }

    pub fn index_of(&self, id: &TurnId) -> Option<usize> {
        self.turns.iter().rposition(|t| &t.id == id)
    }

    /// Index of `id` if it is still the appendable turn: the most recent
    /// turn, an assistant turn, and not yet sealed.
    fn open_index(&self, id: &TurnId) -> Option<usize> {
        let index = self.turns.len().checked_sub(1)?;
        let last = &self.turns[index];
        (&last.id == id && last.role == TurnRole::Assistant && last.is_streaming).then_some(index)
    }

    fn seal_turn(&mut self, id: &TurnId) {
        let Some(index) = self.index_of(id) else {
            return;
        };
        let turn = &mut self.turns[index];
        if turn.is_streaming {
            turn.seal();
            self.publish(TranscriptEvent::TurnSealed {
                index,
                turn: self.turns[index].clone(),
            });
        }
    }

    fn push(&mut self, turn: ConversationTurn) -> TurnId {
        let id = turn.id.clone();
        self.turns.push(turn);
        let index = self.turns.len() - 1;
        self.publish(TranscriptEvent::TurnAppended {
            index,
            turn: self.turns[index].clone(),
        });
        id
    }

    fn publish(&mut self, event: TranscriptEvent) {
        // Drop observers whose receiver is gone
        self.observers.retain(|tx| tx.send(event.clone()).is_ok());
    }
}
