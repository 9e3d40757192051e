//! Chat pane: transcript with Vibe Bot and the message box.

use super::ACCENT;
use crate::types::AppState;
use eframe::egui::{self, RichText};
use shared::agent_api::ChatRole;
use viewers::markdown_viewer::render_markdown;

pub fn show(ui: &mut egui::Ui, s: &mut AppState) {
    ui.add_space(6.0);
    ui.label(RichText::new("Vibe Bot").size(18.0).strong().color(ACCENT));
    ui.add_space(6.0);
    ui.separator();

    egui::TopBottomPanel::bottom("chat_input")
        .resizable(false)
        .show_inside(ui, |ui| input_row(ui, s));

    let dark = ui.visuals().dark_mode;
    let (user_bg, bot_bg) = if dark {
        (egui::Color32::from_rgb(76, 58, 130), egui::Color32::from_rgb(45, 48, 58))
    } else {
        (egui::Color32::from_rgb(233, 226, 255), egui::Color32::from_rgb(241, 243, 246))
    };
    let text_color = ui.visuals().text_color();

    egui::ScrollArea::vertical()
        .auto_shrink([false, false])
        .stick_to_bottom(true)
        .show(ui, |ui| {
            for message in s.workspace.transcript() {
                let (fill, align) = match message.role {
                    ChatRole::User => (user_bg, egui::Align::Max),
                    ChatRole::Model => (bot_bg, egui::Align::Min),
                };
                ui.with_layout(egui::Layout::top_down(align), |ui| {
                    egui::Frame::none()
                        .fill(fill)
                        .rounding(egui::Rounding::same(8.0))
                        .inner_margin(egui::Margin::symmetric(10.0, 8.0))
                        .show(ui, |ui| {
                            ui.set_max_width(ui.available_width() * 0.9);
                            match message.role {
                                ChatRole::User => {
                                    ui.label(RichText::new(&message.content).color(text_color));
                                }
                                ChatRole::Model => render_markdown(ui, &message.content, text_color),
                            }
                        });
                });
                ui.add_space(6.0);
            }

            if s.is_busy() {
                ui.horizontal(|ui| {
                    ui.spinner();
                    ui.label(RichText::new(s.ai_status).weak());
                });
            }
        });
}

fn input_row(ui: &mut egui::Ui, s: &mut AppState) {
    ui.add_space(6.0);
    let busy = s.is_busy();
    let response = ui.add_enabled(
        !busy,
        egui::TextEdit::multiline(&mut s.chat_input)
            .desired_rows(2)
            .desired_width(f32::INFINITY)
            .hint_text("Ask Vibe Bot... (Enter to send, Shift+Enter for a new line)"),
    );

    // Enter sends; the newline it typed is trimmed away by send_chat
    let enter_pressed = response.has_focus()
        && ui.input(|i| i.key_pressed(egui::Key::Enter) && !i.modifiers.shift);

    ui.horizontal(|ui| {
        let can_send = !busy && !s.chat_input.trim().is_empty();
        let clicked = ui.add_enabled(can_send, egui::Button::new("Send")).clicked();
        if (clicked || enter_pressed) && can_send {
            s.send_chat();
        }
    });
    ui.add_space(6.0);
}
