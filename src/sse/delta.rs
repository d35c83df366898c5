//! Delta extractor: reads `choices[0].delta.content` from a data payload.
//!
//! Every field of the payload is optional, so unknown or missing fields never
//! fail decoding. Only syntactically broken JSON is reported as malformed.

use serde::Deserialize;
use serde_json::error::Category;

/// Streamed chat-completion chunk. Everything except the delta is ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChunkPayload {
    #[serde(default)]
    pub choices: Vec<ChunkChoice>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChunkChoice {
    #[serde(default)]
    pub delta: Option<ChunkDelta>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChunkDelta {
    #[serde(default)]
    pub content: Option<String>,
}

impl ChunkPayload {
    /// The text increment carried by the first choice, if any.
    pub fn into_fragment(self) -> Option<String> {
        self.choices
            .into_iter()
            .next()
            .and_then(|choice| choice.delta)
            .and_then(|delta| delta.content)
            .filter(|content| !content.is_empty())
    }
}

/// Why a payload produced no fragment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeltaError {
    /// Not valid JSON, typically a value cut short by a stray line break.
    /// The driver may retry it joined with the next line.
    Malformed(String),
    /// Valid JSON whose shape does not match a chunk (e.g. `choices` is a
    /// string). Treated as a no-op.
    Shape(String),
}

impl DeltaError {
    pub fn is_malformed(&self) -> bool {
        matches!(self, DeltaError::Malformed(_))
    }
}

impl std::fmt::Display for DeltaError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DeltaError::Malformed(msg) => write!(f, "Malformed chunk JSON: {}", msg),
            DeltaError::Shape(msg) => write!(f, "Unexpected chunk shape: {}", msg),
        }
    }
}

impl std::error::Error for DeltaError {}

impl From<serde_json::Error> for DeltaError {
    fn from(err: serde_json::Error) -> Self {
        match err.classify() {
            Category::Syntax | Category::Eof | Category::Io => {
                DeltaError::Malformed(err.to_string())
            }
            Category::Data => DeltaError::Shape(err.to_string()),
        }
    }
}

/// Extract the incremental text from one data payload.
///
/// Returns `Ok(None)` for well-formed frames without content (role-only or
/// control frames, empty deltas).
pub fn extract(payload: &str) -> Result<Option<String>, DeltaError> {
    let chunk: ChunkPayload = serde_json::from_str(payload)?;
    Ok(chunk.into_fragment())
}
