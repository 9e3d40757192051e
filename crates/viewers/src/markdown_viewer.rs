//! Lightweight markdown renderer for the preview pane and chat bubbles.
//!
//! Handles the subset of markdown that AI models actually produce:
//! - `# Heading` through `#### Heading`
//! - `**bold**`, `` `inline code` `` and `[text](url)` links
//! - `- bullet` and `* bullet` list items
//! - fenced code blocks and `---` rules
//!
//! Parsing is kept separate from drawing so it can be tested without a UI.

/// A line-level markdown element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block<'a> {
    Heading { level: u8, text: &'a str },
    Bullet(&'a str),
    Paragraph(&'a str),
    CodeBlock { language: &'a str, code: String },
    Rule,
    Blank,
}

/// An inline span within a heading, bullet or paragraph.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Inline<'a> {
    Text(&'a str),
    Bold(&'a str),
    Code(&'a str),
    Link { text: &'a str, url: &'a str },
}

#[derive(Debug, Clone, Copy)]
enum Marker {
    Bold, // **
    Code, // `
    Link, // [
}

pub fn parse_blocks(text: &str) -> Vec<Block<'_>> {
    let mut blocks = Vec::new();
    let mut lines = text.lines();

    while let Some(line) = lines.next() {
        let trimmed = line.trim();

        if let Some(language) = trimmed.strip_prefix("```") {
            // Unterminated fences run to the end of the text
            let code = lines
                .by_ref()
                .take_while(|l| l.trim() != "```")
                .collect::<Vec<_>>()
                .join("\n");
            blocks.push(Block::CodeBlock {
                language: language.trim(),
                code,
            });
            continue;
        }

        let block = if trimmed.is_empty() {
            Block::Blank
        } else if trimmed == "---" || trimmed == "***" {
            Block::Rule
        } else if let Some((level, text)) = heading(trimmed) {
            Block::Heading { level, text }
        } else if let Some(rest) = trimmed
            .strip_prefix("- ")
            .or_else(|| trimmed.strip_prefix("* "))
        {
            Block::Bullet(rest)
        } else {
            Block::Paragraph(trimmed)
        };
        blocks.push(block);
    }

    blocks
}

fn heading(line: &str) -> Option<(u8, &str)> {
    let level = line.chars().take_while(|c| *c == '#').count();
    if !(1..=4).contains(&level) {
        return None;
    }
    let text = line[level..].strip_prefix(' ')?;
    Some((level as u8, text.trim()))
}

/// Split a line into inline spans. Unclosed markers are kept as plain text.
pub fn parse_inline(line: &str) -> Vec<Inline<'_>> {
    let mut spans = Vec::new();
    let mut remaining = line;

    while !remaining.is_empty() {
        let Some((pos, marker)) = find_next_marker(remaining) else {
            spans.push(Inline::Text(remaining));
            break;
        };
        if pos > 0 {
            spans.push(Inline::Text(&remaining[..pos]));
        }

        let parsed = match marker {
            Marker::Bold => {
                let after = &remaining[pos + 2..];
                after
                    .find("**")
                    .map(|end| (Inline::Bold(&after[..end]), &after[end + 2..]))
            }
            Marker::Code => {
                let after = &remaining[pos + 1..];
                after
                    .find('`')
                    .map(|end| (Inline::Code(&after[..end]), &after[end + 1..]))
            }
            Marker::Link => {
                let after = &remaining[pos + 1..];
                after.find("](").and_then(|close| {
                    let rest = &after[close + 2..];
                    rest.find(')').map(|end| {
                        (
                            Inline::Link {
                                text: &after[..close],
                                url: &rest[..end],
                            },
                            &rest[end + 1..],
                        )
                    })
                })
            }
        };

        match parsed {
            Some((span, rest)) => {
                spans.push(span);
                remaining = rest;
            }
            None => {
                spans.push(Inline::Text(&remaining[pos..]));
                break;
            }
        }
    }

    spans
}

fn find_next_marker(text: &str) -> Option<(usize, Marker)> {
    let bold = text.find("**").map(|pos| (pos, Marker::Bold));
    let code = text.find('`').map(|pos| (pos, Marker::Code));
    // Only treat as link if followed by ]( somewhere
    let link = text
        .find('[')
        .filter(|&pos| text[pos..].contains("]("))
        .map(|pos| (pos, Marker::Link));

    [bold, code, link]
        .into_iter()
        .flatten()
        .min_by_key(|(pos, _)| *pos)
}

/// Render markdown text into an egui UI region.
///
/// `base_color` is the default text color.
pub fn render_markdown(ui: &mut egui::Ui, text: &str, base_color: egui::Color32) {
    let code_bg = if base_color.r() > 128 {
        egui::Color32::from_rgb(60, 60, 70)
    } else {
        egui::Color32::from_rgb(230, 232, 236)
    };

    for block in parse_blocks(text) {
        match block {
            Block::Blank => ui.add_space(6.0),
            Block::Rule => {
                ui.separator();
            }
            Block::Heading { level, text } => {
                let size = match level {
                    1 => 18.0,
                    2 => 16.0,
                    3 => 15.0,
                    _ => 14.0,
                };
                ui.add_space(8.0 - level as f32);
                ui.label(
                    egui::RichText::new(text)
                        .strong()
                        .size(size)
                        .color(base_color),
                );
                ui.add_space(2.0);
            }
            Block::Bullet(text) => {
                ui.horizontal_wrapped(|ui| {
                    ui.label(egui::RichText::new("  •  ").size(14.0).color(base_color));
                    render_inline(ui, text, base_color, code_bg);
                });
            }
            Block::Paragraph(text) => {
                ui.horizontal_wrapped(|ui| {
                    render_inline(ui, text, base_color, code_bg);
                });
            }
            Block::CodeBlock { code, .. } => {
                egui::Frame::none()
                    .fill(code_bg)
                    .rounding(egui::Rounding::same(4.0))
                    .inner_margin(egui::Margin::same(6.0))
                    .show(ui, |ui| {
                        ui.set_width(ui.available_width());
                        ui.label(egui::RichText::new(code).monospace().color(base_color));
                    });
            }
        }
    }
}

fn render_inline(ui: &mut egui::Ui, text: &str, base_color: egui::Color32, code_bg: egui::Color32) {
    let link_color = egui::Color32::from_rgb(100, 170, 240);
    let base_size = 14.0;
    ui.spacing_mut().item_spacing.x = 0.0;

    for span in parse_inline(text) {
        match span {
            Inline::Text(text) => {
                ui.label(egui::RichText::new(text).size(base_size).color(base_color));
            }
            Inline::Bold(text) => {
                ui.label(
                    egui::RichText::new(text)
                        .size(base_size)
                        .strong()
                        .color(base_color),
                );
            }
            Inline::Code(text) => {
                egui::Frame::none()
                    .fill(code_bg)
                    .rounding(egui::Rounding::same(3.0))
                    .inner_margin(egui::Margin::symmetric(4.0, 1.0))
                    .show(ui, |ui| {
                        ui.label(
                            egui::RichText::new(text)
                                .size(base_size)
                                .monospace()
                                .color(base_color),
                        );
                    });
            }
            Inline::Link { text, url } => {
                ui.add(egui::Hyperlink::from_label_and_url(
                    egui::RichText::new(text)
                        .size(base_size)
                        .color(link_color)
                        .underline(),
                    url,
                ))
                .on_hover_text(url);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inline_markers() {
        assert_eq!(
            parse_inline("Use **cargo** and `rustc`, see [docs](https://doc.rust-lang.org)."),
            vec![
                Inline::Text("Use "),
                Inline::Bold("cargo"),
                Inline::Text(" and "),
                Inline::Code("rustc"),
                Inline::Text(", see "),
                Inline::Link {
                    text: "docs",
                    url: "https://doc.rust-lang.org"
                },
                Inline::Text("."),
            ]
        );
    }

    #[test]
    fn test_unclosed_markers_stay_text() {
        assert_eq!(
            parse_inline("a **b"),
            vec![Inline::Text("a "), Inline::Text("**b")]
        );
        assert_eq!(parse_inline("`x"), vec![Inline::Text("`x")]);
        assert_eq!(parse_inline("[a] b"), vec![Inline::Text("[a] b")]);
        assert_eq!(parse_inline("[a](b"), vec![Inline::Text("[a](b")]);
        assert!(parse_inline("").is_empty());
    }

    #[test]
    fn test_blocks() {
        let text = "## AI Analyze Result for welcome.js\n\n---\n\n- one\n* two\nplain **text**";
        assert_eq!(
            parse_blocks(text),
            vec![
                Block::Heading {
                    level: 2,
                    text: "AI Analyze Result for welcome.js"
                },
                Block::Blank,
                Block::Rule,
                Block::Blank,
                Block::Bullet("one"),
                Block::Bullet("two"),
                Block::Paragraph("plain **text**"),
            ]
        );
    }

    #[test]
    fn test_code_fence() {
        let text = "Here:\n```js\nconst a = 1;\n\n// done\n```\nafter";
        let blocks = parse_blocks(text);

        assert_eq!(
            blocks[1],
            Block::CodeBlock {
                language: "js",
                code: "const a = 1;\n\n// done".to_string()
            }
        );
        assert_eq!(blocks[2], Block::Paragraph("after"));

        // Unterminated fence swallows the rest
        let blocks = parse_blocks("```\n# not a heading");
        assert_eq!(blocks.len(), 1);
        assert_eq!(
            blocks[0],
            Block::CodeBlock {
                language: "",
                code: "# not a heading".to_string()
            }
        );
    }

    #[test]
    fn test_heading_needs_space() {
        assert_eq!(parse_blocks("#hashtag"), vec![Block::Paragraph("#hashtag")]);
        assert_eq!(
            parse_blocks("##### deep"),
            vec![Block::Paragraph("##### deep")]
        );
    }
}
