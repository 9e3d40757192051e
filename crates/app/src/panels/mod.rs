//! The three panes of the editor window.

pub mod chat;
pub mod editor;
pub mod file_tree;

use eframe::egui;

/// Accent used for headings and the selected entry.
pub const ACCENT: egui::Color32 = egui::Color32::from_rgb(167, 139, 250);
