//! Event decoder: classifies one frame.

/// Terminal payload marking the intentional end of a response.
pub const DONE_SENTINEL: &str = "[DONE]";

const DATA_PREFIX: &str = "data:";

/// A classified line of the event stream
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventLine<'a> {
    /// Empty (after trimming) - event boundary marker
    Blank,
    /// Starts with ':' - keep-alive or server comment
    Comment(&'a str),
    /// `data:` line; payload is everything after the prefix and one optional space
    Data(&'a str),
    /// Any other field (`event:`, `id:`, `retry:` ...) - ignored
    Unrecognized(&'a str),
}

impl EventLine<'_> {
    /// Whether this is a data line carrying the end-of-stream sentinel.
    pub fn is_done(&self) -> bool {
        matches!(self, EventLine::Data(payload) if is_done_sentinel(payload))
    }
}

/// Classify a single line (without its terminator).
pub fn classify(line: &str) -> EventLine<'_> {
    if line.trim().is_empty() {
        return EventLine::Blank;
    }

    if let Some(comment) = line.strip_prefix(':') {
        return EventLine::Comment(comment);
    }

    if let Some(rest) = line.strip_prefix(DATA_PREFIX) {
        let payload = rest.strip_prefix(' ').unwrap_or(rest);
        return EventLine::Data(payload);
    }

    EventLine::Unrecognized(line)
}

/// Whether a data payload is the terminal `[DONE]` marker.
fn is_done_sentinel(payload: &str) -> bool {
    payload.trim() == DONE_SENTINEL
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_lines() {
        assert_eq!(classify(""), EventLine::Blank);
        assert_eq!(classify("   "), EventLine::Blank);
        assert_eq!(classify("\t"), EventLine::Blank);
    }

    #[test]
    fn test_comment_lines() {
        assert_eq!(classify(":keep-alive"), EventLine::Comment("keep-alive"));
        assert_eq!(classify(": OPENROUTER PROCESSING"), EventLine::Comment(" OPENROUTER PROCESSING"));
        assert_eq!(classify(":"), EventLine::Comment(""));
    }

    #[test]
    fn test_data_prefix_with_and_without_space() {
        assert_eq!(classify("data: {\"a\":1}"), EventLine::Data("{\"a\":1}"));
        assert_eq!(classify("data:{\"a\":1}"), EventLine::Data("{\"a\":1}"));
        // Only one space is part of the prefix
        assert_eq!(classify("data:  x"), EventLine::Data(" x"));
        assert_eq!(classify("data:"), EventLine::Data(""));
    }

    #[test]
    fn test_unrecognized_lines() {
        assert_eq!(classify("event: message"), EventLine::Unrecognized("event: message"));
        assert_eq!(classify("id: 7"), EventLine::Unrecognized("id: 7"));
        assert_eq!(classify("b\"}}]}"), EventLine::Unrecognized("b\"}}]}"));
        // Field names are case sensitive
        assert_eq!(classify("DATA: x"), EventLine::Unrecognized("DATA: x"));
    }

    #[test]
    fn test_done_sentinel() {
        assert!(classify("data: [DONE]").is_done());
        assert!(classify("data:[DONE]").is_done());
        assert!(classify("data: [DONE]  ").is_done());
        assert!(!classify("data: [DONE]x").is_done());
        assert!(!classify(": [DONE]").is_done());
        assert!(!classify("[DONE]").is_done());
    }
}
