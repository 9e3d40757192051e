//! Settings dialog: Gemini API key and model choices.
//!
//! The key field is masked and its buffer is zeroed when the dialog closes.

use super::{show_overlay, Modal, ModalResult};
use egui::{Align2, Context, Id, Key, RichText, TextEdit, Vec2};
use shared::settings::AppSettings;
use zeroize::Zeroizing;

pub struct SettingsDialog {
    is_open: bool,
    /// Settings the dialog was opened with
    base: AppSettings,
    api_key: Zeroizing<String>,
    chat_model: String,
    analyze_model: String,
    refactor_model: String,
    scaffold_model: String,
    dark_mode: bool,
    result: ModalResult<AppSettings>,
    id: Id,
}

impl SettingsDialog {
    pub fn new(id: impl std::hash::Hash) -> Self {
        Self {
            is_open: false,
            base: AppSettings::default(),
            api_key: Zeroizing::new(String::new()),
            chat_model: String::new(),
            analyze_model: String::new(),
            refactor_model: String::new(),
            scaffold_model: String::new(),
            dark_mode: true,
            result: ModalResult::Pending,
            id: Id::new(id),
        }
    }

    pub fn open_with(&mut self, settings: &AppSettings) {
        let model = &settings.model;
        self.is_open = true;
        self.base = settings.clone();
        self.api_key = Zeroizing::new(model.gemini_auth.api_key.clone().unwrap_or_default());
        self.chat_model = model.chat_model.clone();
        self.analyze_model = model.analyze_model.clone();
        self.refactor_model = model.refactor_model.clone();
        self.scaffold_model = model.scaffold_model.clone();
        self.dark_mode = settings.dark_mode;
        self.result = ModalResult::Pending;
    }

    pub fn take_result(&mut self) -> ModalResult<AppSettings> {
        std::mem::replace(&mut self.result, ModalResult::Pending)
    }

    /// The opened-with settings with the edited fields applied.
    fn edited(&self) -> AppSettings {
        let mut settings = self.base.clone();
        let model = &mut settings.model;
        let key = self.api_key.trim();
        model.gemini_auth.api_key = (!key.is_empty()).then(|| key.to_string());

        for (field, value) in [
            (&mut model.chat_model, &self.chat_model),
            (&mut model.analyze_model, &self.analyze_model),
            (&mut model.refactor_model, &self.refactor_model),
            (&mut model.scaffold_model, &self.scaffold_model),
        ] {
            // Blank model names keep the previous choice
            if !value.trim().is_empty() {
                *field = value.trim().to_string();
            }
        }
        settings.dark_mode = self.dark_mode;
        settings
    }

    fn clear_secret(&mut self) {
        self.api_key = Zeroizing::new(String::new());
    }
}

impl Modal for SettingsDialog {
    fn update(&mut self, ctx: &Context) -> bool {
        if !self.is_open {
            return false;
        }

        let mut should_close = false;
        show_overlay(ctx, self.id);

        egui::Window::new("Settings")
            .id(self.id.with("window"))
            .collapsible(false)
            .resizable(false)
            .anchor(Align2::CENTER_CENTER, Vec2::ZERO)
            .show(ctx, |ui| {
                ui.set_min_width(420.0);

                egui::Grid::new(self.id.with("grid"))
                    .num_columns(2)
                    .spacing([12.0, 8.0])
                    .show(ui, |ui| {
                        ui.label("Gemini API key");
                        ui.add(
                            TextEdit::singleline(&mut *self.api_key)
                                .password(true)
                                .desired_width(260.0)
                                .hint_text("or set GEMINI_API_KEY"),
                        );
                        ui.end_row();

                        for (label, value) in [
                            ("Chat model", &mut self.chat_model),
                            ("Analyze model", &mut self.analyze_model),
                            ("Refactor model", &mut self.refactor_model),
                            ("Scaffold model", &mut self.scaffold_model),
                        ] {
                            ui.label(label);
                            ui.add(TextEdit::singleline(value).desired_width(260.0));
                            ui.end_row();
                        }

                        ui.label("Theme");
                        ui.checkbox(&mut self.dark_mode, "Dark mode");
                        ui.end_row();
                    });

                ui.add_space(12.0);

                ui.horizontal(|ui| {
                    if ui.button("Cancel").clicked() {
                        self.result = ModalResult::Cancelled;
                        should_close = true;
                    }
                    ui.add_space(8.0);
                    if ui.button("Save").clicked() {
                        self.result = ModalResult::Confirmed(self.edited());
                        should_close = true;
                    }
                });

                ui.add_space(8.0);
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Min), |ui| {
                    ui.label(
                        RichText::new("🔒 The key is stored in your local settings file")
                            .small()
                            .weak(),
                    );
                });
            });

        if ctx.input(|i| i.key_pressed(Key::Escape)) {
            self.result = ModalResult::Cancelled;
            should_close = true;
        }

        if should_close {
            self.is_open = false;
            self.clear_secret();
        }
        should_close
    }

    fn is_open(&self) -> bool {
        self.is_open
    }

    fn close(&mut self) {
        self.is_open = false;
        self.clear_secret();
        self.result = ModalResult::Cancelled;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edited_settings() {
        let mut dialog = SettingsDialog::new("test");
        dialog.open_with(&AppSettings::default());

        *dialog.api_key = "  new-key ".to_string();
        dialog.chat_model = "gemini-2.0-flash".to_string();
        dialog.refactor_model = "   ".to_string();

        let edited = dialog.edited();
        assert_eq!(edited.model.gemini_auth.api_key.as_deref(), Some("new-key"));
        assert_eq!(edited.model.chat_model, "gemini-2.0-flash");
        assert_eq!(edited.model.refactor_model, "gemini-2.5-pro");
    }

    #[test]
    fn test_blank_key_clears_and_close_zeroes() {
        let mut settings = AppSettings::default();
        settings.model.gemini_auth.api_key = Some("old".to_string());

        let mut dialog = SettingsDialog::new("test");
        dialog.open_with(&settings);
        assert_eq!(dialog.api_key.as_str(), "old");

        dialog.api_key.clear();
        assert_eq!(dialog.edited().model.gemini_auth.api_key, None);

        *dialog.api_key = "secret".to_string();
        dialog.close();
        assert!(dialog.api_key.is_empty());
        assert!(!dialog.is_open());
    }
}
