//! Application state for the editor: entries, selection and chat transcript.
//!
//! `Workspace` is treated as a value. Every update borrows the current state
//! and returns a new one, so the UI can swap states atomically and a failed
//! update leaves the previous state untouched.

use crate::agent_api::{AiMode, ChatMessage};
use crate::data_url;
use crate::entry::{file_name, language_for, Entry, EntryKind};
use crate::error::WorkspaceError;
use crate::scaffold::{materialize, ScaffoldFile, ScaffoldSummary};
use crate::tree::{build_tree, render_outline, TreeNode};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

pub const GREETING: &str =
    "Hey! I'm Vibe Bot. Ask me anything about your code or general questions.";

const WELCOME_JS: &str = r#"// Welcome to Vibe Code!
// Use the AI tools in the editor header to analyze or refactor your code.
// Ask the Vibe Bot anything in the chat panel on the right.
// You can now create folders and upload images!

function greet(name) {
  console.log(`Hello, ${name}! Let's start coding.`);
}

greet('Developer');
"#;

const README_MD: &str = r#"# Vibe Code

This is a demo of an AI-powered code editor.

**Features:**

*   File and Folder Management
*   Code Editor
*   Live Markdown Preview
*   AI Chat Bot
*   AI Code Analysis & Refactoring

Try opening this file and clicking the **Preview** toggle in the editor header!
"#;

/// Kinds a user can create from the tree panel.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NewEntryKind {
    File,
    Folder,
}

/// Result of an upload attempt.
#[derive(Clone, Debug)]
pub enum UploadOutcome {
    Inserted(Workspace),
    /// The id is taken; the caller has to confirm before [`Workspace::overwrite`].
    Conflict { id: String, name: String },
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Workspace {
    entries: Vec<Entry>,
    active_id: Option<String>,
    transcript: Vec<ChatMessage>,
}

impl Workspace {
    pub fn new(entries: Vec<Entry>) -> Self {
        Self {
            entries,
            active_id: None,
            transcript: Vec::new(),
        }
    }

    /// The starting workspace: a welcome script, a README and an `assets` folder.
    pub fn with_welcome_files() -> Self {
        Self {
            entries: vec![
                Entry::file("welcome.js", WELCOME_JS),
                Entry::file("README.md", README_MD),
                Entry::folder("assets"),
            ],
            active_id: Some("welcome.js".to_string()),
            transcript: vec![ChatMessage::model(GREETING)],
        }
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn get(&self, id: &str) -> Option<&Entry> {
        self.entries.iter().find(|e| e.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    pub fn active_id(&self) -> Option<&str> {
        self.active_id.as_deref()
    }

    pub fn active_entry(&self) -> Option<&Entry> {
        self.active_id.as_deref().and_then(|id| self.get(id))
    }

    pub fn transcript(&self) -> &[ChatMessage] {
        &self.transcript
    }

    pub fn tree(&self) -> Vec<TreeNode> {
        build_tree(&self.entries)
    }

    pub fn select(&self, id: &str) -> Result<Self, WorkspaceError> {
        if !self.contains(id) {
            return Err(WorkspaceError::NotFound {
                path: id.to_string(),
            });
        }
        let mut next = self.clone();
        next.active_id = Some(id.to_string());
        Ok(next)
    }

    /// Create an empty file or folder at `path` and select it.
    pub fn create_entry(&self, path: &str, kind: NewEntryKind) -> Result<Self, WorkspaceError> {
        let path = validate_path(path)?;
        if self.contains(&path) {
            return Err(WorkspaceError::AlreadyExists { path });
        }

        let entry = match kind {
            NewEntryKind::File => {
                let content = format!("// New file: {}", file_name(&path));
                Entry::file(path, content)
            }
            NewEntryKind::Folder => Entry::folder(path),
        };
        tracing::debug!(id = %entry.id, ?kind, "Created entry");

        Ok(self.inserted(entry))
    }

    /// Insert an uploaded entry, or report a conflict for the caller to confirm.
    pub fn upload(&self, entry: Entry) -> Result<UploadOutcome, WorkspaceError> {
        validate_path(&entry.id)?;
        if self.contains(&entry.id) {
            return Ok(UploadOutcome::Conflict {
                id: entry.id,
                name: entry.name,
            });
        }
        tracing::debug!(id = %entry.id, "Uploaded entry");
        Ok(UploadOutcome::Inserted(self.inserted(entry)))
    }

    /// Replace the entry with the same id in place and select it.
    pub fn overwrite(&self, entry: Entry) -> Result<Self, WorkspaceError> {
        let pos = self
            .entries
            .iter()
            .position(|e| e.id == entry.id)
            .ok_or_else(|| WorkspaceError::NotFound {
                path: entry.id.clone(),
            })?;

        let mut next = self.clone();
        next.active_id = Some(entry.id.clone());
        next.entries[pos] = entry;
        Ok(next)
    }

    /// Replace the text of a file entry.
    pub fn update_content(&self, id: &str, content: &str) -> Result<Self, WorkspaceError> {
        let pos = self
            .entries
            .iter()
            .position(|e| e.id == id)
            .ok_or_else(|| WorkspaceError::NotFound {
                path: id.to_string(),
            })?;

        let mut next = self.clone();
        match &mut next.entries[pos].kind {
            EntryKind::File { content: text, .. } => {
                *text = content.to_string();
                Ok(next)
            }
            _ => Err(WorkspaceError::NotEditable {
                path: id.to_string(),
            }),
        }
    }

    /// Store an analysis/refactor result as a new markdown file and select it.
    pub fn insert_ai_result(
        &self,
        mode: AiMode,
        source_id: Option<&str>,
        result: &str,
        at: DateTime<Utc>,
    ) -> Self {
        let stem = format!("{}-response-{}", mode.slug(), at.timestamp_millis());
        let mut id = format!("{}.md", stem);
        let mut suffix = 2;
        while self.contains(&id) {
            id = format!("{}-{}.md", stem, suffix);
            suffix += 1;
        }

        let content = format!(
            "## AI {} Result for {}\n\n---\n\n{}",
            mode.label(),
            source_id.unwrap_or("untitled"),
            result
        );
        self.inserted(Entry::file_with_language(id, content, "markdown"))
    }

    /// Insert a scaffold batch: implied folders first, then files.
    ///
    /// Ids that already exist are skipped, never overwritten. The first newly
    /// created file becomes active.
    pub fn apply_scaffold(
        &self,
        files: &[ScaffoldFile],
    ) -> Result<(Self, ScaffoldSummary), WorkspaceError> {
        let batch = materialize(files);
        if batch.files.is_empty() {
            return Err(WorkspaceError::EmptyScaffold);
        }

        let mut next = self.clone();
        let mut existing: HashSet<String> = self.entries.iter().map(|e| e.id.clone()).collect();
        let mut summary = ScaffoldSummary {
            rejected: batch.rejected,
            ..ScaffoldSummary::default()
        };
        let mut first_file: Option<String> = None;

        for entry in batch.folders.into_iter().chain(batch.files) {
            if !existing.insert(entry.id.clone()) {
                // Existing folders are expected (e.g. `src`); only report clashes on files.
                if !entry.is_folder() {
                    summary.skipped.push(entry.id);
                }
                continue;
            }
            if entry.is_folder() {
                summary.folders_created += 1;
            } else {
                summary.files_created += 1;
                first_file.get_or_insert_with(|| entry.id.clone());
            }
            next.entries.push(entry);
        }

        if let Some(id) = first_file {
            next.active_id = Some(id);
        }
        tracing::info!(
            files = summary.files_created,
            folders = summary.folders_created,
            skipped = summary.skipped.len(),
            "Applied scaffold"
        );
        if tracing::enabled!(tracing::Level::DEBUG) {
            tracing::debug!(outline = %render_outline(&next.tree()), "Workspace tree after scaffold");
        }
        Ok((next, summary))
    }

    pub fn push_message(&self, message: ChatMessage) -> Self {
        let mut next = self.clone();
        next.transcript.push(message);
        next
    }

    fn inserted(&self, entry: Entry) -> Self {
        let mut next = self.clone();
        next.active_id = Some(entry.id.clone());
        next.entries.push(entry);
        next
    }
}

fn validate_path(raw: &str) -> Result<String, WorkspaceError> {
    let path = raw.trim();
    if path.is_empty() {
        return Err(WorkspaceError::EmptyPath);
    }
    if path.split('/').any(|segment| segment.is_empty()) {
        return Err(WorkspaceError::InvalidPath {
            path: path.to_string(),
        });
    }
    Ok(path.to_string())
}

/// Build the entry for an uploaded file.
///
/// Images land under `assets/` as data URLs; everything else must be UTF-8
/// text and lands at the root.
pub fn upload_entry(file_name: &str, bytes: &[u8]) -> Result<Entry, WorkspaceError> {
    if let Some(mime) = data_url::mime_for_name(file_name) {
        let url = data_url::encode(mime, bytes);
        return Ok(Entry::image(format!("assets/{}", file_name), url));
    }

    let text = std::str::from_utf8(bytes).map_err(|_| WorkspaceError::NotText {
        name: file_name.to_string(),
    })?;
    Ok(Entry::file_with_language(
        file_name,
        text,
        language_for(file_name),
    ))
}
