//! Error types for workspace bookkeeping.

/// Errors raised by [`crate::workspace::Workspace`] updates.
///
/// These are all user-facing: the app shows the `Display` text as a notice.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum WorkspaceError {
    #[error("Please enter a name")]
    EmptyPath,

    #[error("\"{path}\" is not a valid path")]
    InvalidPath { path: String },

    #[error("An entry with the path \"{path}\" already exists.")]
    AlreadyExists { path: String },

    #[error("No entry with the path \"{path}\"")]
    NotFound { path: String },

    #[error("\"{path}\" cannot be edited as text")]
    NotEditable { path: String },

    #[error("\"{name}\" is not a text file or a supported image")]
    NotText { name: String },

    #[error("The AI did not return any usable files")]
    EmptyScaffold,
}

/// Errors from decoding `data:` URLs.
#[derive(Debug, thiserror::Error)]
pub enum DataUrlError {
    #[error("not a data URL")]
    MissingPrefix,

    #[error("data URL is not base64 encoded")]
    NotBase64,

    #[error("invalid base64 payload: {0}")]
    Payload(#[from] base64::DecodeError),
}
