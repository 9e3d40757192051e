//! Workspace tree: entry actions on top, the nested entries below.

use super::ACCENT;
use crate::types::AppState;
use crate::widgets::pick_upload_file;
use eframe::egui::{self, RichText};
use shared::{EntryType, NewEntryKind, TreeNode};
use std::collections::HashSet;

const INDENT: f32 = 14.0;

pub fn show(ui: &mut egui::Ui, s: &mut AppState) {
    ui.add_space(6.0);
    ui.label(RichText::new("Vibe Code").size(20.0).strong().color(ACCENT));
    ui.add_space(6.0);
    ui.separator();

    ui.columns(2, |cols| {
        if cols[0]
            .add_sized([cols[0].available_width(), 28.0], egui::Button::new("📄 New File"))
            .clicked()
        {
            s.pending_new_kind = NewEntryKind::File;
            s.name_prompt
                .open_with("New File", "Enter file name:", "src/utils.js", "Create");
        }
        if cols[1]
            .add_sized([cols[1].available_width(), 28.0], egui::Button::new("📁 New Folder"))
            .clicked()
        {
            s.pending_new_kind = NewEntryKind::Folder;
            s.name_prompt
                .open_with("New Folder", "Enter folder name:", "src/components", "Create");
        }
    });

    let width = ui.available_width();
    if ui
        .add_sized([width, 28.0], egui::Button::new("⬆ Upload File/Image"))
        .clicked()
    {
        if let Some(path) = pick_upload_file() {
            s.upload_path(&path);
        }
    }

    let busy = s.is_busy();
    if ui
        .add_enabled_ui(!busy, |ui| {
            ui.add_sized([width, 28.0], egui::Button::new("✨ Scaffold with AI"))
        })
        .inner
        .clicked()
    {
        s.scaffold_prompt.open_with(
            "Scaffold with AI",
            "Describe the feature or project you want to create:",
            "e.g. a React login form with email and password validation",
            "Generate",
        );
    }

    ui.separator();

    ui.horizontal(|ui| {
        if ui.small_button("⊞ Expand all").clicked() {
            s.expand_all();
        }
        if ui.small_button("⊟ Collapse all").clicked() {
            s.collapse_all();
        }
    });

    let tree = s.workspace.tree();
    let mut clicked: Option<String> = None;
    egui::ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui| {
            let active = s.workspace.active_id();
            for node in &tree {
                tree_item(ui, node, 0, active, &s.expanded_folders, &mut clicked);
            }
        });

    if let Some(id) = clicked {
        s.select_entry(&id);
    }
}

fn tree_item(
    ui: &mut egui::Ui,
    node: &TreeNode,
    depth: usize,
    active: Option<&str>,
    expanded: &HashSet<String>,
    clicked: &mut Option<String>,
) {
    let entry = &node.entry;
    let is_expanded = expanded.contains(&entry.id);
    let icon = match entry.entry_type() {
        EntryType::Folder if is_expanded => "📂",
        EntryType::Folder => "📁",
        EntryType::Image => "🖼",
        EntryType::File => "📄",
    };

    ui.horizontal(|ui| {
        ui.add_space(depth as f32 * INDENT);
        let selected = active == Some(entry.id.as_str());
        let mut text = RichText::new(format!("{} {}", icon, entry.name));
        if selected {
            text = text.color(ACCENT);
        }
        let hover = if node.is_folder() {
            format!("{} ({} items)", entry.id, node.descendant_count())
        } else {
            entry.id.clone()
        };
        let response = ui.selectable_label(selected, text).on_hover_text(hover);
        if response.clicked() {
            *clicked = Some(entry.id.clone());
        }
    });

    if node.is_folder() && is_expanded {
        for child in &node.children {
            tree_item(ui, child, depth + 1, active, expanded, clicked);
        }
    }
}
