//! Error category classification.

use std::fmt;

/// High-level categorization of errors for handling decisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Connection could not be made or the body stream broke.
    /// Generally transient and retryable.
    Network,

    /// The server rejected the request with a 5xx or rate-limit status.
    /// Generally transient and retryable after delay.
    Server,

    /// The request itself was refused (4xx) or could not be built.
    Client,

    /// The user stopped the operation.
    User,
}

impl ErrorCategory {
    /// Returns true if errors in this category are generally transient
    /// and the operation can be retried.
    pub fn is_retryable(&self) -> bool {
        matches!(self, ErrorCategory::Network | ErrorCategory::Server)
    }

    /// Returns a short label for the category suitable for logging.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCategory::Network => "network",
            ErrorCategory::Server => "server",
            ErrorCategory::Client => "client",
            ErrorCategory::User => "user",
        }
    }

    /// Returns suggested recovery actions for this category.
    pub fn recovery_hint(&self) -> &'static str {
        match self {
            ErrorCategory::Network => "Check your connection and send the message again",
            ErrorCategory::Server => {
                "The server may be busy or experiencing issues. Please try again later"
            }
            ErrorCategory::Client => "Check the endpoint, model and API key settings",
            ErrorCategory::User => "Send the message again to get a new reply",
        }
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
