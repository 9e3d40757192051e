//! Drag and drop handler: files dropped on the window are uploaded.
//!
//! Uses egui's dropped_files functionality to handle file drops.

use egui::{Context, DroppedFile, Id, Rect, Vec2};
use std::path::PathBuf;
use std::sync::Arc;

/// A dropped file, either on disk or already in memory (web/portal drops).
#[derive(Debug, Clone, PartialEq)]
pub enum DroppedUpload {
    Path(PathBuf),
    Bytes { name: String, bytes: Arc<[u8]> },
}

impl DroppedUpload {
    pub fn from_dropped(file: &DroppedFile) -> Option<Self> {
        if let Some(path) = &file.path {
            return Some(DroppedUpload::Path(path.clone()));
        }
        match &file.bytes {
            Some(bytes) if !file.name.is_empty() => Some(DroppedUpload::Bytes {
                name: file.name.clone(),
                bytes: bytes.clone(),
            }),
            _ => None,
        }
    }
}

/// Handler for drag and drop file operations.
pub struct DragDropHandler {
    dropped: Vec<DroppedUpload>,
    /// Whether files are currently being dragged over the window
    hovering: bool,
    id: Id,
}

impl DragDropHandler {
    pub fn new(id: impl std::hash::Hash) -> Self {
        Self {
            dropped: Vec::new(),
            hovering: false,
            id: Id::new(id),
        }
    }

    /// Capture hover state and dropped files. Call once per frame.
    pub fn update(&mut self, ctx: &Context) {
        ctx.input(|i| {
            self.hovering = !i.raw.hovered_files.is_empty();
            self.dropped
                .extend(i.raw.dropped_files.iter().filter_map(DroppedUpload::from_dropped));
        });
    }

    pub fn take_dropped(&mut self) -> Vec<DroppedUpload> {
        std::mem::take(&mut self.dropped)
    }

    pub fn is_hovering(&self) -> bool {
        self.hovering
    }

    /// Overlay shown while files are dragged over the window.
    pub fn show_drag_overlay(&self, ctx: &Context) {
        if !self.is_hovering() {
            return;
        }

        egui::Area::new(self.id.with("overlay"))
            .order(egui::Order::Foreground)
            .anchor(egui::Align2::CENTER_CENTER, Vec2::ZERO)
            .show(ctx, |ui| {
                let screen_rect = ctx.screen_rect();
                ui.painter()
                    .rect_filled(screen_rect, 0.0, egui::Color32::from_black_alpha(100));

                let indicator_rect =
                    Rect::from_center_size(screen_rect.center(), Vec2::new(300.0, 150.0));
                ui.painter().rect(
                    indicator_rect,
                    8.0,
                    ui.visuals().extreme_bg_color,
                    egui::Stroke::new(3.0, ui.visuals().selection.bg_fill),
                );
                ui.painter().text(
                    indicator_rect.center(),
                    egui::Align2::CENTER_CENTER,
                    "📥 Drop files to upload",
                    egui::FontId::proportional(18.0),
                    ui.visuals().strong_text_color(),
                );
            });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drag_drop_handler_creation() {
        let mut handler = DragDropHandler::new("test");
        assert!(!handler.is_hovering());
        assert!(handler.take_dropped().is_empty());
    }

    #[test]
    fn test_from_dropped() {
        let on_disk = DroppedFile {
            path: Some(PathBuf::from("/tmp/logo.png")),
            name: "logo.png".to_string(),
            ..Default::default()
        };
        assert_eq!(
            DroppedUpload::from_dropped(&on_disk),
            Some(DroppedUpload::Path(PathBuf::from("/tmp/logo.png")))
        );

        let in_memory = DroppedFile {
            name: "notes.md".to_string(),
            bytes: Some(Arc::from(&b"# hi"[..])),
            ..Default::default()
        };
        assert!(matches!(
            DroppedUpload::from_dropped(&in_memory),
            Some(DroppedUpload::Bytes { ref name, .. }) if name == "notes.md"
        ));

        assert_eq!(DroppedUpload::from_dropped(&DroppedFile::default()), None);
    }
}
