//! Image viewer with zoom and pan, fed from an entry's data URL

use anyhow::{Context, Result};

use crate::Zoomable;

/// Decode a `data:` URL into pixels egui can upload.
pub fn decode_image(data_url: &str) -> Result<egui::ColorImage> {
    let decoded = shared::data_url::decode(data_url)?;
    let image = image::load_from_memory(&decoded.bytes)
        .with_context(|| format!("cannot decode {} image", decoded.mime))?;
    let rgba = image.to_rgba8();
    let size = [rgba.width() as usize, rgba.height() as usize];
    Ok(egui::ColorImage::from_rgba_unmultiplied(size, rgba.as_raw()))
}

/// Image viewer state
pub struct ImageViewer {
    /// Entry id the texture was built from
    source_id: Option<String>,
    texture: Option<egui::TextureHandle>,
    image_size: Option<[usize; 2]>,
    error: Option<String>,
    zoom: f32,
    pan_offset: egui::Vec2,
    fit_to_window: bool,
}

impl Default for ImageViewer {
    fn default() -> Self {
        Self::new()
    }
}

impl Zoomable for ImageViewer {
    fn set_zoom(&mut self, zoom: f32) {
        self.zoom = Self::clamp_zoom(zoom);
        self.fit_to_window = false;
    }

    fn zoom(&self) -> f32 {
        self.zoom
    }
}

impl ImageViewer {
    pub fn new() -> Self {
        Self {
            source_id: None,
            texture: None,
            image_size: None,
            error: None,
            zoom: 1.0,
            pan_offset: egui::Vec2::ZERO,
            fit_to_window: true,
        }
    }

    /// Whether the viewer already holds the image for `id`.
    pub fn is_showing(&self, id: &str) -> bool {
        self.source_id.as_deref() == Some(id)
    }

    /// Load the image for entry `id`. A decode failure is kept and shown in place of the image.
    pub fn load(&mut self, id: &str, data_url: &str, ctx: &egui::Context) {
        self.source_id = Some(id.to_string());
        self.zoom = 1.0;
        self.pan_offset = egui::Vec2::ZERO;
        self.fit_to_window = true;

        match decode_image(data_url) {
            Ok(color_image) => {
                self.image_size = Some(color_image.size);
                self.texture =
                    Some(ctx.load_texture(id, color_image, egui::TextureOptions::LINEAR));
                self.error = None;
            }
            Err(e) => {
                tracing::warn!(id, error = %e, "Failed to decode image entry");
                self.texture = None;
                self.image_size = None;
                self.error = Some(format!("{:#}", e));
            }
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.texture.is_some()
    }

    pub fn ui(&mut self, ui: &mut egui::Ui) {
        // Toolbar
        ui.horizontal(|ui| {
            if ui.button("-").clicked() {
                self.zoom_out();
            }
            ui.label(format!("{:.0}%", self.zoom * 100.0));
            if ui.button("+").clicked() {
                self.zoom_in();
            }
            ui.separator();
            if ui.button("Fit").clicked() {
                self.fit_to_window = true;
                self.pan_offset = egui::Vec2::ZERO;
            }
            if ui.button("100%").clicked() {
                self.reset_zoom();
                self.pan_offset = egui::Vec2::ZERO;
            }

            if let Some(size) = self.image_size {
                ui.separator();
                ui.label(format!("{}x{}", size[0], size[1]));
            }
        });

        ui.separator();

        let Some(texture) = self.texture.clone() else {
            ui.centered_and_justified(|ui| match &self.error {
                Some(err) => ui.label(format!("Cannot display this image: {}", err)),
                None => ui.label("No image loaded"),
            });
            return;
        };

        let available_size = ui.available_size();
        let image_size = texture.size_vec2();

        let display_size = if self.fit_to_window {
            let scale_x = available_size.x / image_size.x;
            let scale_y = available_size.y / image_size.y;
            let scale = scale_x.min(scale_y).min(1.0);
            self.zoom = scale;
            image_size * scale
        } else {
            image_size * self.zoom
        };

        self.handle_zoom_input(ui);

        egui::ScrollArea::both()
            .auto_shrink([false, false])
            .show(ui, |ui| {
                let (rect, response) =
                    ui.allocate_exact_size(display_size.max(available_size), egui::Sense::drag());

                if response.dragged() {
                    self.pan_offset += response.drag_delta();
                    self.fit_to_window = false;
                }

                let image_rect =
                    egui::Rect::from_center_size(rect.center() + self.pan_offset, display_size);

                ui.painter().image(
                    texture.id(),
                    image_rect,
                    egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
                    egui::Color32::WHITE,
                );
            });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn png_data_url(width: u32, height: u32) -> String {
        let img = image::DynamicImage::ImageRgba8(image::RgbaImage::from_pixel(
            width,
            height,
            image::Rgba([255, 0, 0, 255]),
        ));
        let mut bytes = Vec::new();
        img.write_to(&mut Cursor::new(&mut bytes), image::ImageOutputFormat::Png)
            .unwrap();
        shared::data_url::encode("image/png", &bytes)
    }

    #[test]
    fn test_decode_png_data_url() {
        let image = decode_image(&png_data_url(3, 2)).unwrap();

        assert_eq!(image.size, [3, 2]);
        assert_eq!(image.pixels[0], egui::Color32::from_rgb(255, 0, 0));
    }

    #[test]
    fn test_decode_errors() {
        assert!(decode_image("not a data url").is_err());

        let garbage = shared::data_url::encode("image/png", b"not really a png");
        let err = decode_image(&garbage).unwrap_err();
        assert!(format!("{:#}", err).contains("cannot decode image/png image"));
    }

    #[test]
    fn test_zoom_leaves_fit_mode() {
        let mut viewer = ImageViewer::new();
        assert!(viewer.fit_to_window);

        viewer.zoom_in();
        assert!(!viewer.fit_to_window);
        assert!(viewer.zoom() > 1.0);
        assert!(!viewer.is_showing("assets/logo.png"));
    }
}
