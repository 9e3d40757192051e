//! Content viewers for Vibe Code
//!
//! Everything here renders an in-memory entry, never a path on disk:
//! - Markdown (rendered preview, also used for chat bubbles)
//! - HTML (highlighted source + open in browser)
//! - Images (data URL → texture, zoom/pan)

pub mod html_viewer;
pub mod image_viewer;
pub mod markdown_viewer;

use shared::{Entry, EntryType};

/// Languages whose files get a Preview toggle in the editor.
pub const PREVIEWABLE_LANGUAGES: &[&str] = &["markdown", "html"];

/// How a previewable file is rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreviewKind {
    Markdown,
    Html,
}

impl PreviewKind {
    pub fn for_language(language: &str) -> Option<Self> {
        match language {
            "markdown" => Some(PreviewKind::Markdown),
            "html" => Some(PreviewKind::Html),
            _ => None,
        }
    }

    /// Only text files are previewable; images and folders never are.
    pub fn for_entry(entry: &Entry) -> Option<Self> {
        if entry.entry_type() != EntryType::File {
            return None;
        }
        entry.language().and_then(Self::for_language)
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            PreviewKind::Markdown => "Markdown",
            PreviewKind::Html => "HTML",
        }
    }
}

/// Trait for viewers that support zoom functionality
pub trait Zoomable {
    const MIN_ZOOM: f32 = 0.1;
    const MAX_ZOOM: f32 = 10.0;
    /// Multiplicative step for the +/- buttons
    const ZOOM_STEP: f32 = 1.25;

    /// Set zoom level (will be clamped to valid range)
    fn set_zoom(&mut self, zoom: f32);

    fn zoom(&self) -> f32;

    fn reset_zoom(&mut self) {
        self.set_zoom(1.0);
    }

    fn zoom_in(&mut self) {
        self.set_zoom(self.zoom() * Self::ZOOM_STEP);
    }

    fn zoom_out(&mut self) {
        self.set_zoom(self.zoom() / Self::ZOOM_STEP);
    }

    fn clamp_zoom(zoom: f32) -> f32 {
        zoom.clamp(Self::MIN_ZOOM, Self::MAX_ZOOM)
    }

    /// Ctrl+scroll zoom
    fn handle_zoom_input(&mut self, ui: &egui::Ui) {
        if ui.input(|i| i.modifiers.ctrl) {
            let scroll_delta = ui.input(|i| i.raw_scroll_delta.y);
            if scroll_delta.abs() > 0.0 {
                let factor = if scroll_delta > 0.0 { 1.1 } else { 0.9 };
                self.set_zoom(self.zoom() * factor);
            }
        }
    }
}
