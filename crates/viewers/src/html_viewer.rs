//! HTML Viewer - highlighted source with option to open in browser

use anyhow::Result;
use egui::{self, ScrollArea};
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

const MIN_TEXT_WIDTH: usize = 20;
const SOURCE_FONT_SIZE: f32 = 13.0;

/// Highlighting class of a source segment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment {
    Text,
    Tag,
    Attr,
    Str,
}

pub struct HtmlViewer {
    show_source: bool,
    /// Last buffer handed to the browser; removed when replaced or dropped
    export: Option<NamedTempFile>,
    last_error: Option<String>,
}

impl Default for HtmlViewer {
    fn default() -> Self {
        Self {
            show_source: true,
            export: None,
            last_error: None,
        }
    }
}

impl HtmlViewer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Write `html` to a temporary `.html` file and open it with the system browser.
    pub fn open_in_browser(&mut self, html: &str) -> Result<()> {
        let path = self.export(html)?;
        open::that(&path)?;
        tracing::info!(path = %path.display(), "Opened HTML preview in browser");
        Ok(())
    }

    fn export(&mut self, html: &str) -> Result<std::path::PathBuf> {
        let mut file = tempfile::Builder::new()
            .prefix("vibe-preview-")
            .suffix(".html")
            .tempfile()?;
        file.write_all(html.as_bytes())?;
        file.flush()?;
        let path = file.path().to_path_buf();
        self.export = Some(file);
        Ok(path)
    }

    pub fn exported_path(&self) -> Option<&Path> {
        self.export.as_ref().map(|f| f.path())
    }

    pub fn ui(&mut self, ui: &mut egui::Ui, content: &str) {
        // Toolbar
        ui.horizontal(|ui| {
            ui.label("HTML Preview");
            ui.separator();

            if ui.button("Open in Browser").clicked() {
                self.last_error = match self.open_in_browser(content) {
                    Ok(()) => None,
                    Err(e) => {
                        tracing::warn!(error = %e, "Failed to open HTML preview");
                        Some(format!("Could not open browser: {}", e))
                    }
                };
            }

            ui.checkbox(&mut self.show_source, "Show Source");

            if let Some(path) = self.exported_path() {
                ui.label(egui::RichText::new(path.display().to_string()).weak().small())
                    .on_hover_text("Last copy opened in the browser");
            }
        });

        if let Some(err) = &self.last_error {
            ui.colored_label(egui::Color32::from_rgb(220, 80, 80), err);
        }

        ui.separator();

        ScrollArea::vertical()
            .auto_shrink([false, false])
            .show(ui, |ui| {
                if self.show_source {
                    ui.label(layout_source(content, ui.visuals().text_color()));
                } else {
                    let font = egui::FontId::monospace(SOURCE_FONT_SIZE);
                    let glyph = ui.fonts(|f| f.glyph_width(&font, 'm')).max(1.0);
                    let columns = (ui.available_width() / glyph) as usize;
                    ui.label(egui::RichText::new(visible_text(content, columns)).font(font));
                }
            });
    }
}

fn layout_source(html: &str, text_color: egui::Color32) -> egui::text::LayoutJob {
    let mut job = egui::text::LayoutJob::default();
    for (kind, chunk) in highlight(html) {
        let color = match kind {
            Segment::Text => text_color,
            Segment::Tag => egui::Color32::from_rgb(86, 156, 214),
            Segment::Attr => egui::Color32::from_rgb(156, 220, 254),
            Segment::Str => egui::Color32::from_rgb(206, 145, 120),
        };
        job.append(
            chunk,
            0.0,
            egui::TextFormat {
                font_id: egui::FontId::monospace(SOURCE_FONT_SIZE),
                color,
                ..Default::default()
            },
        );
    }
    job
}

/// Split HTML source into highlighted segments.
///
/// Inside a tag, quoted attribute values are strings and the text before them
/// is attribute text; the closing `>` ends a tag segment.
pub fn highlight(html: &str) -> Vec<(Segment, &str)> {
    let mut segments = Vec::new();
    let mut start = 0;
    let mut in_tag = false;
    let mut in_string = false;

    for (i, ch) in html.char_indices() {
        match ch {
            '<' if !in_string => {
                if start < i {
                    segments.push((Segment::Text, &html[start..i]));
                    start = i;
                }
                in_tag = true;
            }
            '>' if in_tag && !in_string => {
                segments.push((Segment::Tag, &html[start..=i]));
                start = i + 1;
                in_tag = false;
            }
            '"' if in_tag => {
                if in_string {
                    segments.push((Segment::Str, &html[start..=i]));
                    start = i + 1;
                } else {
                    if start < i {
                        segments.push((Segment::Attr, &html[start..i]));
                    }
                    start = i;
                }
                in_string = !in_string;
            }
            _ => {}
        }
    }

    if start < html.len() {
        let kind = if in_tag { Segment::Tag } else { Segment::Text };
        segments.push((kind, &html[start..]));
    }
    segments
}

/// Rendered text of the document, wrapped to `width` columns.
pub fn visible_text(html: &str, width: usize) -> String {
    html2text::from_read(html.as_bytes(), width.max(MIN_TEXT_WIDTH))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_highlight_tags_and_attributes() {
        let segments = highlight(r#"<a href="/x">Home</a>"#);
        assert_eq!(
            segments,
            vec![
                (Segment::Attr, "<a href="),
                (Segment::Str, "\"/x\""),
                (Segment::Tag, ">"),
                (Segment::Text, "Home"),
                (Segment::Tag, "</a>"),
            ]
        );
    }

    #[test]
    fn test_highlight_covers_whole_input() {
        let html = "<!doctype html>\n<p class=\"a>b\">x &amp; y</p>\n<p";
        let joined: String = highlight(html).iter().map(|(_, s)| *s).collect();
        assert_eq!(joined, html);
        assert_eq!(highlight(html).last(), Some(&(Segment::Tag, "<p")));
    }

    #[test]
    fn test_visible_text() {
        let html = "<html><body><h1>Title</h1><p>Fish &amp; chips</p>\
                    <ul><li>one</li><li>two</li></ul></body></html>";
        let text = visible_text(html, 80);

        assert!(text.contains("Title"), "{}", text);
        assert!(text.contains("Fish & chips"), "{}", text);
        assert!(text.contains("one") && text.contains("two"), "{}", text);
        assert!(!text.contains("<p>"), "{}", text);
    }

    #[test]
    fn test_visible_text_decodes_entities() {
        let text = visible_text("<p>It&#39;s &copy; 2024 &mdash; ok</p>", 80);
        assert_eq!(text.trim(), "It's \u{a9} 2024 \u{2014} ok");
    }

    #[test]
    fn test_visible_text_wraps_to_width() {
        let html = format!("<p>{}</p>", "word ".repeat(40));
        let text = visible_text(&html, 30);

        assert!(text.lines().count() > 1);
        assert!(text.lines().all(|l| l.chars().count() <= 30), "{}", text);
    }

    #[test]
    fn test_export_writes_html_file() {
        let mut viewer = HtmlViewer::new();
        let path = viewer.export("<p>hi</p>").unwrap();

        assert_eq!(path.extension().and_then(|e| e.to_str()), Some("html"));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "<p>hi</p>");
        assert_eq!(viewer.exported_path(), Some(path.as_path()));

        // A new export replaces (and removes) the previous file
        let second = viewer.export("<p>bye</p>").unwrap();
        assert!(!path.exists());
        assert!(second.exists());
    }
}
