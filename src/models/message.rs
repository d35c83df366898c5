use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Opaque identifier of a conversation turn.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TurnId(String);

impl TurnId {
    /// Mint a fresh, globally unique identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for TurnId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TurnId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Role of a turn in a conversation
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TurnRole {
    User,
    Assistant,
}

impl TurnRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            TurnRole::User => "user",
            TurnRole::Assistant => "assistant",
        }
    }
}

/// One message in the transcript.
///
/// User turns are created complete. Assistant turns are opened empty by the
/// reconciler and only ever grow by appending to `content`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ConversationTurn {
    pub id: TurnId,
    pub role: TurnRole,
    pub content: String,
    /// When the turn was created
    pub created_at: DateTime<Utc>,
    /// Whether the turn is still receiving deltas
    #[serde(default)]
    pub is_streaming: bool,
    /// Synthetic turn describing a failed send; never sent back upstream
    #[serde(default)]
    pub is_error: bool,
}

impl ConversationTurn {
    /// Create a complete user turn.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            id: TurnId::new(),
            role: TurnRole::User,
            content: content.into(),
            created_at: Utc::now(),
            is_streaming: false,
            is_error: false,
        }
    }

    /// Open an assistant turn that will receive streamed deltas.
    pub fn streaming_assistant(content: impl Into<String>) -> Self {
        Self {
            id: TurnId::new(),
            role: TurnRole::Assistant,
            content: content.into(),
            created_at: Utc::now(),
            is_streaming: true,
            is_error: false,
        }
    }

    /// Create a synthetic error turn shown after a failed send.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            id: TurnId::new(),
            role: TurnRole::Assistant,
            content: message.into(),
            created_at: Utc::now(),
            is_streaming: false,
            is_error: true,
        }
    }

    /// Append a streamed token
    pub fn append_token(&mut self, token: &str) {
        self.content.push_str(token);
    }

    /// Stop accepting deltas.
    pub fn seal(&mut self) {
        self.is_streaming = false;
    }
}
