//! Single text-input dialog, used for entry names and scaffold requests.

use super::{show_overlay, Modal, ModalResult};
use egui::{Align2, Context, Id, Key, RichText, TextEdit, Vec2};

pub struct TextPromptDialog {
    is_open: bool,
    title: String,
    message: String,
    hint: String,
    value: String,
    /// Multi-line input; Enter inserts a newline and Ctrl+Enter submits
    multiline: bool,
    submit_label: String,
    result: ModalResult<String>,
    id: Id,
}

impl TextPromptDialog {
    pub fn new(id: impl std::hash::Hash) -> Self {
        Self {
            is_open: false,
            title: String::new(),
            message: String::new(),
            hint: String::new(),
            value: String::new(),
            multiline: false,
            submit_label: "OK".to_string(),
            result: ModalResult::Pending,
            id: Id::new(id),
        }
    }

    pub fn multiline(mut self, multiline: bool) -> Self {
        self.multiline = multiline;
        self
    }

    pub fn open_with(
        &mut self,
        title: impl Into<String>,
        message: impl Into<String>,
        hint: impl Into<String>,
        submit_label: impl Into<String>,
    ) {
        self.is_open = true;
        self.title = title.into();
        self.message = message.into();
        self.hint = hint.into();
        self.submit_label = submit_label.into();
        self.value.clear();
        self.result = ModalResult::Pending;
    }

    pub fn take_result(&mut self) -> ModalResult<String> {
        std::mem::replace(&mut self.result, ModalResult::Pending)
    }

    fn submit(&mut self) -> bool {
        let value = self.value.trim();
        if value.is_empty() {
            return false;
        }
        self.result = ModalResult::Confirmed(value.to_string());
        true
    }
}

impl Modal for TextPromptDialog {
    fn update(&mut self, ctx: &Context) -> bool {
        if !self.is_open {
            return false;
        }

        let mut should_close = false;
        show_overlay(ctx, self.id);

        egui::Window::new(RichText::new(&self.title).strong())
            .id(self.id.with("window"))
            .collapsible(false)
            .resizable(false)
            .anchor(Align2::CENTER_CENTER, Vec2::ZERO)
            .show(ctx, |ui| {
                ui.set_min_width(if self.multiline { 480.0 } else { 320.0 });
                ui.add_space(4.0);

                if !self.message.is_empty() {
                    ui.label(&self.message);
                    ui.add_space(8.0);
                }

                let response = if self.multiline {
                    ui.add(
                        TextEdit::multiline(&mut self.value)
                            .desired_rows(6)
                            .desired_width(f32::INFINITY)
                            .hint_text(self.hint.as_str()),
                    )
                } else {
                    ui.add(
                        TextEdit::singleline(&mut self.value)
                            .desired_width(f32::INFINITY)
                            .hint_text(self.hint.as_str()),
                    )
                };
                if !response.has_focus() && self.value.is_empty() {
                    response.request_focus();
                }

                let enter_submits = if self.multiline {
                    ui.input(|i| i.modifiers.command && i.key_pressed(Key::Enter))
                } else {
                    response.lost_focus() && ui.input(|i| i.key_pressed(Key::Enter))
                };
                if enter_submits && self.submit() {
                    should_close = true;
                }

                ui.add_space(12.0);

                ui.horizontal(|ui| {
                    if ui.button("Cancel").clicked() {
                        self.result = ModalResult::Cancelled;
                        should_close = true;
                    }
                    ui.add_space(8.0);
                    let submit_enabled = !self.value.trim().is_empty();
                    if ui
                        .add_enabled(submit_enabled, egui::Button::new(self.submit_label.as_str()))
                        .clicked()
                        && self.submit()
                    {
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
        self.value.clear();
        self.result = ModalResult::Cancelled;
    }
}
