//! Yes/no confirmation, e.g. before overwriting an uploaded file.

use super::{show_overlay, Modal, ModalResult};
use egui::{Align2, Context, Id, Key, Vec2};

pub struct ConfirmDialog {
    is_open: bool,
    title: String,
    message: String,
    confirm_label: String,
    result: ModalResult<()>,
    id: Id,
}

impl ConfirmDialog {
    pub fn new(id: impl std::hash::Hash) -> Self {
        Self {
            is_open: false,
            title: String::new(),
            message: String::new(),
            confirm_label: "OK".to_string(),
            result: ModalResult::Pending,
            id: Id::new(id),
        }
    }

    pub fn open_with(
        &mut self,
        title: impl Into<String>,
        message: impl Into<String>,
        confirm_label: impl Into<String>,
    ) {
        self.is_open = true;
        self.title = title.into();
        self.message = message.into();
        self.confirm_label = confirm_label.into();
        self.result = ModalResult::Pending;
    }

    pub fn take_result(&mut self) -> ModalResult<()> {
        std::mem::replace(&mut self.result, ModalResult::Pending)
    }
}

impl Modal for ConfirmDialog {
    fn update(&mut self, ctx: &Context) -> bool {
        if !self.is_open {
            return false;
        }

        let mut should_close = false;
        show_overlay(ctx, self.id);

        egui::Window::new(self.title.as_str())
            .id(self.id.with("window"))
            .collapsible(false)
            .resizable(false)
            .anchor(Align2::CENTER_CENTER, Vec2::ZERO)
            .show(ctx, |ui| {
                ui.set_min_width(320.0);
                ui.add_space(4.0);
                ui.label(&self.message);
                ui.add_space(12.0);

                ui.horizontal(|ui| {
                    if ui.button("Cancel").clicked() {
                        self.result = ModalResult::Cancelled;
                        should_close = true;
                    }
                    ui.add_space(8.0);
                    if ui.button(self.confirm_label.as_str()).clicked() {
                        self.result = ModalResult::Confirmed(());
                        should_close = true;
                    }
                });
            });

        if ctx.input(|i| i.key_pressed(Key::Escape)) {
            self.result = ModalResult::Cancelled;
            should_close = true;
        }

        if should_close {
            self.is_open = false;
        }
        should_close
    }

    fn is_open(&self) -> bool {
        self.is_open
    }

    fn close(&mut self) {
        self.is_open = false;
        self.result = ModalResult::Cancelled;
    }
}
