//! Turning an AI scaffold batch into workspace entries.
//!
//! The model only returns file paths. Every ancestor directory those paths
//! imply has to exist as a folder entry, otherwise the new files would be
//! shown at the root.

use crate::entry::{parent_path, Entry};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// One item of a structured scaffold response.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScaffoldFile {
    pub path: String,
    pub content: String,
}

/// Entries produced from a scaffold batch, before they meet the workspace.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ScaffoldBatch {
    /// Implied folders, parents before children
    pub folders: Vec<Entry>,
    /// File entries in response order
    pub files: Vec<Entry>,
    /// Raw paths that could not be used
    pub rejected: Vec<String>,
}

/// What a scaffold did to the workspace.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ScaffoldSummary {
    pub files_created: usize,
    pub folders_created: usize,
    /// Ids that already existed and were left alone
    pub skipped: Vec<String>,
    pub rejected: Vec<String>,
}

/// Clean up a model-supplied relative path.
///
/// Strips surrounding whitespace, `./` and leading `/`. Paths with empty
/// segments (`a//b`, trailing `/`) or `.`/`..` segments are rejected.
pub fn normalize_path(raw: &str) -> Option<String> {
    let mut path = raw.trim();
    loop {
        if let Some(rest) = path.strip_prefix("./") {
            path = rest;
        } else if let Some(rest) = path.strip_prefix('/') {
            path = rest;
        } else {
            break;
        }
    }

    if path.is_empty() {
        return None;
    }
    let valid = path
        .split('/')
        .all(|segment| !segment.is_empty() && segment != "." && segment != "..");
    valid.then(|| path.to_string())
}

/// Build folder and file entries for a batch.
pub fn materialize(files: &[ScaffoldFile]) -> ScaffoldBatch {
    let mut batch = ScaffoldBatch::default();
    let mut seen_files: HashSet<String> = HashSet::new();
    let mut seen_folders: HashSet<String> = HashSet::new();

    for file in files {
        let Some(path) = normalize_path(&file.path) else {
            tracing::warn!(path = %file.path, "Rejected scaffold path");
            batch.rejected.push(file.path.clone());
            continue;
        };
        if !seen_files.insert(path.clone()) {
            tracing::debug!(path = %path, "Duplicate scaffold path, keeping first");
            continue;
        }

        let mut ancestors = Vec::new();
        let mut current = parent_path(&path);
        while let Some(dir) = current {
            ancestors.push(dir);
            current = parent_path(dir);
        }
        for dir in ancestors.into_iter().rev() {
            if seen_folders.insert(dir.to_string()) {
                batch.folders.push(Entry::folder(dir));
            }
        }

        batch.files.push(Entry::file(path, file.content.clone()));
    }

    batch
}
