use eframe::egui;
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

mod config;
mod modals;
mod panels;
mod state;
mod types;
mod utils;
mod widgets;

use modals::{Modal, ModalResult};
use types::*;

fn main() -> eframe::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let settings = config::load_settings_or_default();
    tracing::info!(
        chat_model = %settings.model.chat_model,
        has_key = settings.model.gemini_auth.api_key.is_some(),
        "Starting Vibe Code"
    );

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Vibe Code")
            .with_inner_size([1280.0, 800.0])
            .with_min_inner_size([900.0, 600.0])
            .with_drag_and_drop(true),
        vsync: true,
        ..Default::default()
    };
    eframe::run_native(
        "Vibe Code",
        options,
        Box::new(move |cc| {
            cc.egui_ctx.set_visuals(visuals_for(settings.dark_mode));
            Box::new(VibeCodeApp {
                state: Arc::new(Mutex::new(AppState::new(settings))),
            })
        }),
    )
}

fn visuals_for(dark_mode: bool) -> egui::Visuals {
    if dark_mode {
        egui::Visuals::dark()
    } else {
        egui::Visuals::light()
    }
}

struct VibeCodeApp {
    state: Arc<Mutex<AppState>>,
}

impl eframe::App for VibeCodeApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let mut s = self.state.lock();

        // Poll for AI response (non-blocking)
        s.poll_ai_response();
        if s.is_busy() {
            ctx.request_repaint_after(Duration::from_millis(100));
        }

        // Dropped files are uploads
        s.drag_drop.update(ctx);
        for dropped in s.drag_drop.take_dropped() {
            s.upload_dropped(dropped);
        }

        if s.notice.as_ref().is_some_and(Notice::is_expired) {
            s.notice = None;
        } else if s.notice.is_some() {
            ctx.request_repaint_after(Duration::from_millis(500));
        }

        if ctx.input(|i| i.modifiers.command && i.key_pressed(egui::Key::S)) {
            s.save_active();
        }

        egui::TopBottomPanel::top("header").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label(egui::RichText::new("Vibe Code").strong());
                ui.label(egui::RichText::new(&s.settings.model.chat_model).weak().small());
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui.button("⚙ Settings").clicked() {
                        let settings = s.settings.clone();
                        s.settings_dialog.open_with(&settings);
                    }
                });
            });
        });

        if let Some(notice) = s.notice.clone() {
            egui::TopBottomPanel::bottom("notice").show(ctx, |ui| {
                let color = match notice.kind {
                    NoticeKind::Error => egui::Color32::from_rgb(220, 80, 80),
                    NoticeKind::Success => egui::Color32::from_rgb(80, 180, 120),
                    NoticeKind::Info => ui.visuals().text_color(),
                };
                ui.horizontal(|ui| {
                    ui.colored_label(color, &notice.text);
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if ui.small_button("✕").clicked() {
                            s.notice = None;
                        }
                    });
                });
            });
        }

        egui::SidePanel::left("file_tree")
            .default_width(260.0)
            .width_range(200.0..=420.0)
            .show(ctx, |ui| panels::file_tree::show(ui, &mut s));

        egui::SidePanel::right("chat")
            .default_width(380.0)
            .width_range(280.0..=560.0)
            .show(ctx, |ui| panels::chat::show(ui, &mut s));

        egui::CentralPanel::default().show(ctx, |ui| panels::editor::show(ui, &mut s));

        handle_modals(ctx, &mut s);
        s.drag_drop.show_drag_overlay(ctx);
    }
}

fn handle_modals(ctx: &egui::Context, s: &mut AppState) {
    if s.name_prompt.update(ctx) {
        if let Some(path) = s.name_prompt.take_result().take_value() {
            let kind = s.pending_new_kind;
            s.create_entry(&path, kind);
        }
    }

    if s.scaffold_prompt.update(ctx) {
        if let Some(prompt) = s.scaffold_prompt.take_result().take_value() {
            s.start_scaffold(prompt);
        }
    }

    if s.overwrite_confirm.update(ctx) {
        let confirmed = matches!(s.overwrite_confirm.take_result(), ModalResult::Confirmed(()));
        s.resolve_overwrite(confirmed);
    }

    if s.settings_dialog.update(ctx) {
        if let Some(settings) = s.settings_dialog.take_result().take_value() {
            ctx.set_visuals(visuals_for(settings.dark_mode));
            s.apply_settings(settings);
        }
    }
}
