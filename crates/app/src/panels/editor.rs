//! Editor pane: header with AI actions, then the code, preview or image view.

use crate::types::AppState;
use eframe::egui::{self, RichText};
use shared::agent_api::AiMode;
use shared::{Entry, EntryKind};
use viewers::markdown_viewer::render_markdown;
use viewers::PreviewKind;

pub fn show(ui: &mut egui::Ui, s: &mut AppState) {
    let Some(entry) = s.workspace.active_entry().cloned() else {
        ui.centered_and_justified(|ui| {
            ui.label(RichText::new("Select a file to start editing").weak());
        });
        return;
    };

    header(ui, s, &entry);
    ui.separator();

    match &entry.kind {
        EntryKind::Folder => {
            let count = s
                .workspace
                .entries()
                .iter()
                .filter(|e| e.parent_id() == Some(entry.id.as_str()))
                .count();
            ui.centered_and_justified(|ui| {
                ui.label(
                    RichText::new(format!(
                        "📁 {}\n\n{} item(s). Select a file in the tree to edit it.",
                        entry.name, count
                    ))
                    .weak(),
                );
            });
        }
        EntryKind::Image { content, .. } => {
            if !s.image_viewer.is_showing(&entry.id) {
                s.image_viewer.load(&entry.id, content, ui.ctx());
            }
            s.image_viewer.ui(ui);
        }
        EntryKind::File { content, .. } => match s.active_preview().filter(|_| s.preview_enabled) {
            Some(PreviewKind::Markdown) => {
                let color = ui.visuals().text_color();
                egui::ScrollArea::vertical()
                    .auto_shrink([false, false])
                    .show(ui, |ui| render_markdown(ui, content, color));
            }
            Some(PreviewKind::Html) => s.html_viewer.ui(ui, content),
            None => code_editor(ui, s, content),
        },
    }
}

fn header(ui: &mut egui::Ui, s: &mut AppState, entry: &Entry) {
    ui.horizontal(|ui| {
        ui.label(RichText::new(&entry.id).monospace().strong());

        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            if ui.button("⬇ Download").clicked() {
                s.download_active();
            }
            if ui.button("💾 Save").clicked() {
                s.save_active();
            }

            if let Some(kind) = s.active_preview() {
                ui.toggle_value(&mut s.preview_enabled, "👁 Preview")
                    .on_hover_text(format!("Render as {}", kind.display_name()));
            }

            let is_file = matches!(entry.kind, EntryKind::File { .. });
            let enabled = is_file && !s.is_busy();
            if ui
                .add_enabled(enabled, egui::Button::new("🛠 Refactor"))
                .on_hover_text("Refactor with a thinking model")
                .clicked()
            {
                s.run_action(AiMode::Refactor);
            }
            if ui
                .add_enabled(enabled, egui::Button::new("🔍 Analyze"))
                .on_hover_text("Quick overview of this file")
                .clicked()
            {
                s.run_action(AiMode::Analyze);
            }

            if s.is_busy() {
                ui.label(RichText::new(s.ai_status).weak());
                ui.spinner();
            }
        });
    });
}

fn code_editor(ui: &mut egui::Ui, s: &mut AppState, content: &str) {
    let mut text = content.to_string();
    let response = egui::ScrollArea::both()
        .auto_shrink([false, false])
        .show(ui, |ui| {
            ui.add_sized(
                ui.available_size(),
                egui::TextEdit::multiline(&mut text)
                    .code_editor()
                    .desired_width(f32::INFINITY)
                    .lock_focus(true),
            )
        })
        .inner;

    if response.changed() {
        s.update_active_content(&text);
    }
}
