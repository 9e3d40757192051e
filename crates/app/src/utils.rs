//! Helper functions for the Vibe Code app

use anyhow::{Context, Result};
use shared::{data_url, Entry, EntryKind};
use std::path::Path;

/// Transcript message shown when a chat turn fails.
pub const CHAT_FAILURE_MESSAGE: &str =
    "Sorry, I ran into an issue. Please check the console for details.";

/// Format an AI failure for a notice, with a hint for the usual causes.
///
/// `action` names what was attempted, e.g. "AI Analyze" or "scaffolding".
pub fn format_error_message(action: &str, error: &str) -> String {
    let error_lower = error.to_lowercase();

    // API key issues
    if error_lower.contains("api key")
        || error_lower.contains("401")
        || error_lower.contains("403")
        || error_lower.contains("unauthorized")
        || error_lower.contains("permission_denied")
    {
        return format!(
            "An error occurred during {}: the Gemini API key looks missing or invalid. \
            Open Settings to add one.\n\nError: {}",
            action, error
        );
    }

    // Rate limiting
    if error_lower.contains("rate limit")
        || error_lower.contains("429")
        || error_lower.contains("resource_exhausted")
    {
        return format!(
            "The AI service is temporarily busy. Please wait a moment and try again.\n\nError: {}",
            error
        );
    }

    // Network issues
    if error_lower.contains("connection")
        || error_lower.contains("network")
        || error_lower.contains("timed out")
        || error_lower.contains("timeout")
        || error_lower.contains("dns")
    {
        return format!(
            "I'm having trouble reaching the AI service. Please check your network connection.\n\nError: {}",
            error
        );
    }

    format!(
        "An error occurred during {}. Please check the console and try again.\n\nError: {}",
        action, error
    )
}

/// Read a file from disk and turn it into a workspace entry.
pub fn read_upload(path: &Path) -> Result<Entry> {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .context("dropped path has no file name")?;
    let bytes =
        std::fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
    Ok(shared::workspace::upload_entry(&name, &bytes)?)
}

/// Bytes written when downloading an entry: text as-is, images decoded.
pub fn entry_bytes(entry: &Entry) -> Result<Vec<u8>> {
    match &entry.kind {
        EntryKind::File { content, .. } => Ok(content.as_bytes().to_vec()),
        EntryKind::Image { content, .. } => Ok(data_url::decode(content)?.bytes),
        EntryKind::Folder => anyhow::bail!("\"{}\" is a folder", entry.name),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_error_categories() {
        let msg = format_error_message("AI Analyze", "gemini error: 401 Unauthorized");
        assert!(msg.contains("API key"));
        assert!(msg.contains("AI Analyze"));

        let msg = format_error_message("scaffolding", "gemini error: 429 Too Many Requests");
        assert!(msg.starts_with("The AI service is temporarily busy"));

        let msg = format_error_message("AI Refactor", "error sending request: operation timed out");
        assert!(msg.contains("network connection"));
    }

    #[test]
    fn test_format_error_generic() {
        let msg = format_error_message("scaffolding", "AI returned an invalid structure: EOF");
        assert_eq!(
            msg,
            "An error occurred during scaffolding. Please check the console and try again.\n\n\
             Error: AI returned an invalid structure: EOF"
        );
    }

    #[test]
    fn test_read_upload() {
        let dir = tempfile::tempdir().unwrap();
        let text = dir.path().join("notes.md");
        std::fs::write(&text, "# Notes").unwrap();
        let binary = dir.path().join("blob.bin");
        std::fs::write(&binary, [0xff, 0xfe, 0x00]).unwrap();

        let entry = read_upload(&text).unwrap();
        assert_eq!(entry.id, "notes.md");
        assert_eq!(entry.language(), Some("markdown"));

        assert!(read_upload(&binary).is_err());
        assert!(read_upload(&dir.path().join("missing.txt")).is_err());
    }

    #[test]
    fn test_entry_bytes() {
        let file = Entry::file("a.txt", "hello");
        assert_eq!(entry_bytes(&file).unwrap(), b"hello");

        let image = Entry::image("assets/x.png", data_url::encode("image/png", &[1, 2, 3]));
        assert_eq!(entry_bytes(&image).unwrap(), vec![1, 2, 3]);

        assert!(entry_bytes(&Entry::folder("src")).is_err());
    }
}
