//! Terminal failure of a streamed send.

use thiserror::Error;

use super::category::ErrorCategory;
use crate::traits::HttpError;

/// Type alias for Results using ChatError.
pub type ChatResult<T> = Result<T, ChatError>;

/// Why a send ended in the `Failed` state.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ChatError {
    /// The request could not be issued or the body stream broke.
    #[error("connection problem")]
    Transport { detail: String },

    /// The server answered with a non-success status before streaming.
    #[error("{message}")]
    HttpStatus { status: u16, message: String },

    /// The send was cancelled by the caller.
    #[error("cancelled")]
    Cancelled,

    /// The request was rejected locally and never sent.
    #[error("invalid request: {message}")]
    InvalidRequest { message: String },
}

impl ChatError {
    pub fn transport(detail: impl Into<String>) -> Self {
        ChatError::Transport {
            detail: detail.into(),
        }
    }

    /// Build an HTTP status failure, probing the body for a message.
    pub fn http_status(status: u16, body: &str) -> Self {
        ChatError::HttpStatus {
            status,
            message: error_message_from_body(status, body),
        }
    }

    /// Get the category of this error.
    pub fn category(&self) -> ErrorCategory {
        match self {
            ChatError::Transport { .. } => ErrorCategory::Network,
            ChatError::HttpStatus { status, .. } if *status >= 500 || *status == 429 => {
                ErrorCategory::Server
            }
            ChatError::HttpStatus { .. } => ErrorCategory::Client,
            ChatError::Cancelled => ErrorCategory::User,
            ChatError::InvalidRequest { .. } => ErrorCategory::Client,
        }
    }

    /// Whether sending the same request again may succeed.
    pub fn is_retryable(&self) -> bool {
        self.category().is_retryable()
    }

    /// Get a short error code for logging.
    pub fn error_code(&self) -> &'static str {
        match self {
            ChatError::Transport { .. } => "E_CHAT_TRANSPORT",
            ChatError::HttpStatus { .. } => "E_CHAT_HTTP",
            ChatError::Cancelled => "E_CHAT_CANCELLED",
            ChatError::InvalidRequest { .. } => "E_CHAT_INVALID",
        }
    }

    /// Message shown to the user, also used as the synthetic error turn.
    pub fn user_message(&self) -> String {
        self.to_string()
    }
}

impl From<HttpError> for ChatError {
    fn from(err: HttpError) -> Self {
        match err {
            HttpError::ServerError { status, message } => ChatError::http_status(status, &message),
            other => ChatError::transport(other.to_string()),
        }
    }
}

impl From<serde_json::Error> for ChatError {
    fn from(err: serde_json::Error) -> Self {
        ChatError::InvalidRequest {
            message: err.to_string(),
        }
    }
}

/// Pick the failure message for a non-success response.
///
/// A JSON body with an `error` string (or an `error.message` string) wins;
/// anything else falls back to the decimal status code.
pub fn error_message_from_body(status: u16, body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|json| {
            let error = json.get("error")?;
            error
                .as_str()
                .or_else(|| error.get("message").and_then(|m| m.as_str()))
                .map(str::to_string)
        })
        .filter(|message| !message.trim().is_empty())
        .unwrap_or_else(|| status.to_string())
}
