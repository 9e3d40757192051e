//! Native file dialogs using rfd (rust file dialog).

use std::path::PathBuf;

/// Filter for file types.
#[derive(Clone, Debug)]
pub struct FileFilter {
    pub name: String,
    pub extensions: Vec<String>,
}

impl FileFilter {
    pub fn new(name: impl Into<String>, extensions: &[&str]) -> Self {
        Self {
            name: name.into(),
            extensions: extensions.iter().map(|s| s.to_string()).collect(),
        }
    }

    pub fn images() -> Self {
        Self::new("Images", &["png", "jpg", "jpeg", "gif", "webp", "bmp", "svg", "ico"])
    }

    pub fn code() -> Self {
        Self::new(
            "Code & Text",
            &["js", "ts", "tsx", "jsx", "py", "rs", "html", "css", "json", "md", "txt", "toml", "yaml", "yml"],
        )
    }

    /// Filter matching a single file's extension, for save dialogs.
    pub fn for_file_name(name: &str) -> Option<Self> {
        let (_, ext) = name.rsplit_once('.')?;
        if ext.is_empty() {
            return None;
        }
        Some(Self::new(ext.to_uppercase(), &[ext]))
    }

    fn apply(&self, dialog: rfd::FileDialog) -> rfd::FileDialog {
        let ext_refs: Vec<&str> = self.extensions.iter().map(|s| s.as_str()).collect();
        dialog.add_filter(&self.name, &ext_refs)
    }
}

/// Blocking "Upload File/Image" dialog.
pub fn pick_upload_file() -> Option<PathBuf> {
    let dialog = rfd::FileDialog::new().set_title("Upload File/Image");
    let dialog = FileFilter::code().apply(dialog);
    let dialog = FileFilter::images().apply(dialog);
    dialog.pick_file()
}

/// Blocking save dialog pre-filled with `file_name`.
pub fn save_file_dialog(file_name: &str) -> Option<PathBuf> {
    let mut dialog = rfd::FileDialog::new()
        .set_title("Download")
        .set_file_name(file_name);
    if let Some(filter) = FileFilter::for_file_name(file_name) {
        dialog = filter.apply(dialog);
    }
    dialog.save_file()
}
