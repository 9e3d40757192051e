//! Modal dialogs for the editor.
//!
//! Each dialog keeps its own open flag and result; the app polls
//! `take_result()` after calling `update()` each frame.

pub mod confirm;
pub mod settings_dialog;
pub mod text_prompt;

pub use confirm::ConfirmDialog;
pub use settings_dialog::SettingsDialog;
pub use text_prompt::TextPromptDialog;

use egui::{Align2, Area, Context, Id, Vec2};

/// Trait for modal dialogs.
pub trait Modal {
    /// Update and render the modal. Returns true if the modal should close.
    fn update(&mut self, ctx: &Context) -> bool;

    fn is_open(&self) -> bool;

    fn close(&mut self);
}

/// Result from a modal dialog.
#[derive(Debug, Clone, PartialEq)]
pub enum ModalResult<T> {
    /// User hasn't made a decision yet
    Pending,
    Confirmed(T),
    Cancelled,
}

impl<T> ModalResult<T> {
    pub fn is_pending(&self) -> bool {
        matches!(self, ModalResult::Pending)
    }

    pub fn take_value(self) -> Option<T> {
        match self {
            ModalResult::Confirmed(v) => Some(v),
            _ => None,
        }
    }
}

/// Dim everything behind a modal and swallow clicks on it.
pub(crate) fn show_overlay(ctx: &Context, id: Id) {
    Area::new(id.with("overlay"))
        .anchor(Align2::LEFT_TOP, Vec2::ZERO)
        .show(ctx, |ui| {
            let screen_rect = ctx.screen_rect();
            ui.allocate_response(screen_rect.size(), egui::Sense::click());
            ui.painter()
                .rect_filled(screen_rect, 0.0, egui::Color32::from_black_alpha(160));
        });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_modal_result() {
        assert!(ModalResult::<String>::Pending.is_pending());
        assert_eq!(
            ModalResult::Confirmed("a.js".to_string()).take_value(),
            Some("a.js".to_string())
        );
        assert_eq!(ModalResult::<String>::Cancelled.take_value(), None);
    }
}
