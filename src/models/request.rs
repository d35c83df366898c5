use serde::{Deserialize, Serialize};

use super::message::{ConversationTurn, TurnRole};

/// One `{role, content}` entry of the outgoing request body
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RequestMessage {
    pub role: TurnRole,
    pub content: String,
}

impl From<&ConversationTurn> for RequestMessage {
    fn from(turn: &ConversationTurn) -> Self {
        Self {
            role: turn.role,
            content: turn.content.clone(),
        }
    }
}

/// Request body for the streaming chat endpoint
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatRequest {
    /// Model name, omitted when the server picks its default
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    /// Always true; the assembler only understands streamed responses
    pub stream: bool,
    pub messages: Vec<RequestMessage>,
}

impl ChatRequest {
    /// Build a request from transcript turns, skipping synthetic error turns.
    pub fn from_turns<'a, I>(turns: I) -> Self
    where
        I: IntoIterator<Item = &'a ConversationTurn>,
    {
        Self {
            model: None,
            stream: true,
            messages: turns
                .into_iter()
                .filter(|t| !t.is_error)
                .map(RequestMessage::from)
                .collect(),
        }
    }

    pub fn with_model(mut self, model: Option<String>) -> Self {
        self.model = model;
        self
    }
}
