//! Text files attached to a prompt.
//!
//! Attachments are inlined into the user turn as fenced blocks, so the
//! request body stays a plain list of role/content messages.

use std::path::Path;

use tracing::debug;

use crate::error::{ChatError, ChatResult};

/// A named piece of text sent along with a prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    /// Display name, usually the file name
    pub name: String,
    pub text: String,
}

impl Attachment {
    pub fn new(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            text: text.into(),
        }
    }

    /// Read a file from disk. Invalid UTF-8 is replaced, not rejected.
    pub async fn load(path: impl AsRef<Path>) -> ChatResult<Self> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| ChatError::InvalidRequest {
                message: format!("cannot read attachment {}: {}", path.display(), e),
            })?;

        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        debug!("Loaded attachment {} ({} bytes)", name, bytes.len());

        Ok(Self {
            name,
            text: String::from_utf8_lossy(&bytes).into_owned(),
        })
    }
}

/// Append each attachment to the prompt as a fenced block headed by its name.
pub fn merge_attachments(prompt: &str, attachments: &[Attachment]) -> String {
    let mut content = prompt.to_string();
    for attachment in attachments {
        if !content.is_empty() {
            content.push_str("\n\n");
        }
        content.push_str("Attachment: ");
        content.push_str(&attachment.name);
        content.push_str("\n```\n");
        content.push_str(&attachment.text);
        if !attachment.text.ends_with('\n') {
            content.push('\n');
        }
        content.push_str("```");
    }
    content
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_merge_without_attachments() {
        assert_eq!(merge_attachments("hello", &[]), "hello");
    }

    #[test]
    fn test_merge_single() {
        let merged = merge_attachments("review this", &[Attachment::new("a.rs", "fn main() {}")]);
        assert_eq!(
            merged,
            "review this\n\nAttachment: a.rs\n```\nfn main() {}\n```"
        );
    }

    #[test]
    fn test_merge_with_empty_prompt() {
        let merged = merge_attachments("", &[Attachment::new("notes.txt", "x\n")]);
        assert_eq!(merged, "Attachment: notes.txt\n```\nx\n```");
    }

    #[test]
    fn test_merge_preserves_order() {
        let merged = merge_attachments(
            "p",
            &[Attachment::new("one", "1"), Attachment::new("two", "2")],
        );
        let one = merged.find("Attachment: one").unwrap();
        let two = merged.find("Attachment: two").unwrap();
        assert!(one < two);
    }

    #[tokio::test]
    async fn test_load_file() {
        let mut file = tempfile::Builder::new().suffix(".txt").tempfile().unwrap();
        file.write_all(b"line one\nline two\n").unwrap();

        let attachment = Attachment::load(file.path()).await.unwrap();

        let expected_name = file.path().file_name().unwrap().to_string_lossy();
        assert_eq!(attachment.name, expected_name);
        assert_eq!(attachment.text, "line one\nline two\n");
    }

    #[tokio::test]
    async fn test_load_invalid_utf8_is_lossy() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(&[b'o', b'k', 0xFF]).unwrap();

        let attachment = Attachment::load(file.path()).await.unwrap();
        assert_eq!(attachment.text, "ok\u{FFFD}");
    }

    #[tokio::test]
    async fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = Attachment::load(dir.path().join("nope.txt")).await.unwrap_err();
        assert!(matches!(err, ChatError::InvalidRequest { .. }));
    }
}
