//! Workspace entries: files, folders and images keyed by their full path.
//!
//! The path (`id`) is the only source of hierarchy. Parent/child links are
//! never stored; see [`crate::tree`] for how they are derived.

use serde::{Deserialize, Serialize};

/// The closed set of entry kinds, without payload.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryType {
    File,
    Folder,
    Image,
}

/// Entry payload. Only files and images carry content.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EntryKind {
    Folder,
    /// UTF-8 text content plus a language tag (e.g. "javascript", "markdown")
    File { content: String, language: String },
    /// Base64 data URL plus the extension-derived language tag
    Image { content: String, language: String },
}

/// One node of the flat workspace collection.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    /// Full slash-delimited path, e.g. `assets/logo.png`
    pub id: String,
    /// Final path segment, used as the display label
    pub name: String,
    #[serde(flatten)]
    pub kind: EntryKind,
}

impl Entry {
    pub fn folder(path: impl Into<String>) -> Self {
        let id = path.into();
        Self {
            name: file_name(&id).to_string(),
            id,
            kind: EntryKind::Folder,
        }
    }

    /// Text file; the language is derived from the extension.
    pub fn file(path: impl Into<String>, content: impl Into<String>) -> Self {
        let id = path.into();
        let name = file_name(&id).to_string();
        Self {
            kind: EntryKind::File {
                content: content.into(),
                language: language_for(&name),
            },
            name,
            id,
        }
    }

    /// Text file with an explicit language tag.
    pub fn file_with_language(
        path: impl Into<String>,
        content: impl Into<String>,
        language: impl Into<String>,
    ) -> Self {
        let id = path.into();
        Self {
            name: file_name(&id).to_string(),
            id,
            kind: EntryKind::File {
                content: content.into(),
                language: language.into(),
            },
        }
    }

    /// Image whose content is a `data:` URL.
    pub fn image(path: impl Into<String>, data_url: impl Into<String>) -> Self {
        let id = path.into();
        let name = file_name(&id).to_string();
        let language = extension(&name)
            .map(|e| e.to_lowercase())
            .unwrap_or_else(|| "image".to_string());
        Self {
            kind: EntryKind::Image {
                content: data_url.into(),
                language,
            },
            name,
            id,
        }
    }

    pub fn entry_type(&self) -> EntryType {
        match self.kind {
            EntryKind::Folder => EntryType::Folder,
            EntryKind::File { .. } => EntryType::File,
            EntryKind::Image { .. } => EntryType::Image,
        }
    }

    pub fn is_folder(&self) -> bool {
        matches!(self.kind, EntryKind::Folder)
    }

    pub fn content(&self) -> Option<&str> {
        match &self.kind {
            EntryKind::Folder => None,
            EntryKind::File { content, .. } | EntryKind::Image { content, .. } => Some(content),
        }
    }

    pub fn language(&self) -> Option<&str> {
        match &self.kind {
            EntryKind::Folder => None,
            EntryKind::File { language, .. } | EntryKind::Image { language, .. } => {
                Some(language)
            }
        }
    }

    /// Parent id derived from the path, if the path has a `/`.
    pub fn parent_id(&self) -> Option<&str> {
        parent_path(&self.id)
    }
}

/// Everything after the last `/`, or the whole path when there is none.
pub fn file_name(path: &str) -> &str {
    match path.rfind('/') {
        Some(idx) => &path[idx + 1..],
        None => path,
    }
}

/// Everything before the last `/`. `None` means the path is root-level.
pub fn parent_path(path: &str) -> Option<&str> {
    path.rfind('/').map(|idx| &path[..idx])
}

fn extension(name: &str) -> Option<&str> {
    match name.rfind('.') {
        Some(idx) if idx + 1 < name.len() => Some(&name[idx + 1..]),
        _ => None,
    }
}

/// Language tag for a file name.
///
/// Well-known extensions map to the names the editor and previewers use;
/// anything else falls back to the lowercased extension, or `text`.
pub fn language_for(name: &str) -> String {
    let Some(ext) = extension(name) else {
        return "text".to_string();
    };
    let ext = ext.to_lowercase();
    let language = match ext.as_str() {
        "md" | "markdown" => "markdown",
        "html" | "htm" => "html",
        "js" | "mjs" | "cjs" | "jsx" => "javascript",
        "ts" | "tsx" => "typescript",
        "py" => "python",
        "rs" => "rust",
        "css" => "css",
        "json" => "json",
        "txt" => "text",
        "sh" | "bash" => "shell",
        "yml" | "yaml" => "yaml",
        "toml" => "toml",
        _ => return ext,
    };
    language.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_helpers() {
        assert_eq!(file_name("assets/logo.png"), "logo.png");
        assert_eq!(file_name("README.md"), "README.md");
        assert_eq!(parent_path("src/components/Button.tsx"), Some("src/components"));
        assert_eq!(parent_path("README.md"), None);
    }

    #[test]
    fn test_language_for() {
        assert_eq!(language_for("README.md"), "markdown");
        assert_eq!(language_for("index.HTML"), "html");
        assert_eq!(language_for("welcome.js"), "javascript");
        assert_eq!(language_for("main.go"), "go");
        assert_eq!(language_for("Makefile"), "text");
        assert_eq!(language_for("trailing."), "text");
    }

    #[test]
    fn test_constructors_derive_name() {
        let entry = Entry::file("src/app.ts", "export {}");
        assert_eq!(entry.name, "app.ts");
        assert_eq!(entry.language(), Some("typescript"));
        assert_eq!(entry.parent_id(), Some("src"));
        assert_eq!(entry.entry_type(), EntryType::File);

        let folder = Entry::folder("src/components");
        assert_eq!(folder.name, "components");
        assert!(folder.content().is_none());
        assert!(folder.language().is_none());

        let image = Entry::image("assets/Logo.PNG", "data:image/png;base64,AA==");
        assert_eq!(image.language(), Some("png"));
        assert_eq!(image.entry_type(), EntryType::Image);
    }

    #[test]
    fn test_entry_serializes_with_type_tag() {
        let value = serde_json::to_value(Entry::folder("assets")).unwrap();
        assert_eq!(value["type"], "folder");
        assert_eq!(value["id"], "assets");

        let value = serde_json::to_value(Entry::file("a.md", "# hi")).unwrap();
        assert_eq!(value["type"], "file");
        assert_eq!(value["language"], "markdown");
    }
}
