//! Reusable widgets for the editor window.

pub mod drag_drop;
pub mod file_picker;

pub use drag_drop::{DragDropHandler, DroppedUpload};
pub use file_picker::{pick_upload_file, save_file_dialog};
