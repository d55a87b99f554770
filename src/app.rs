use egui::{TextureHandle, TextureOptions};

use crate::acquire::{AcquiredFile, FileSource};
use crate::catalog::SampleCatalog;
use crate::config::UploaderConfig;
use crate::loader::{PlatformLoader, platform_loader};
use crate::state::UploadProps;
use crate::upload::ImageUpload;

/// Largest side of the decoded preview.
const PREVIEW_SIDE: u32 = 1024;

/// Host application: embeds the upload control and plays the role of the
/// downstream pipeline by generating a preview for each acquired file.
pub struct UploaderApp {
    config: UploaderConfig,
    upload: ImageUpload<PlatformLoader>,

    /// The file last handed over by the control. Replaced, never merged.
    active: Option<AcquiredFile>,
    preview: Option<TextureHandle>,
    /// Preview generation for `active` has not run yet.
    preview_pending: bool,
    alert: Option<String>,
    error: Option<String>,
}

impl UploaderApp {
    /// Called once before the first frame.
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        // Only settings are persisted; acquired files and UI state start fresh.
        let config: UploaderConfig = cc
            .storage
            .and_then(|storage| eframe::get_value(storage, eframe::APP_KEY))
            .unwrap_or_default();
        #[cfg(not(target_arch = "wasm32"))]
        let config = config.with_env_overrides();

        #[cfg(not(target_arch = "wasm32"))]
        let catalog = SampleCatalog::load_or_builtin(&config.catalog_path());
        #[cfg(target_arch = "wasm32")]
        let catalog = SampleCatalog::builtin();

        log::info!(
            "{} samples, build root '{}', public root '{}'",
            catalog.len(),
            config.build_root,
            config.effective_public_root()
        );

        cc.egui_ctx.set_visuals(egui::Visuals::dark());

        let upload = ImageUpload::new(catalog, platform_loader(&config), &config);
        Self {
            config,
            upload,
            active: None,
            preview: None,
            preview_pending: false,
            alert: None,
            error: None,
        }
    }

    fn generate_preview(&mut self, ctx: &egui::Context) {
        if !self.preview_pending {
            return;
        }
        self.preview_pending = false;
        let Some(file) = &self.active else {
            return;
        };
        match crate::preview::decode(file.bytes(), Some(PREVIEW_SIDE)) {
            Ok(image) => {
                self.preview = Some(ctx.load_texture("upload_preview", image, TextureOptions::LINEAR));
                self.error = None;
            }
            Err(e) => {
                log::warn!("Could not decode '{}': {e}", file.name());
                self.preview = None;
                self.error = Some(format!("Could not decode '{}': {e}", file.name()));
            }
        }
    }

    fn preview_ui(&self, ui: &mut egui::Ui) {
        if let Some(err) = &self.error {
            ui.colored_label(egui::Color32::RED, err);
        }
        let (Some(file), Some(texture)) = (&self.active, &self.preview) else {
            return;
        };

        ui.separator();
        ui.horizontal(|ui| {
            ui.strong(file.name());
            ui.label(format!("{} KiB", file.len().div_ceil(1024)));
            if let FileSource::Sample { location, .. } = file.source() {
                ui.weak(format!("from {location}"));
            }
        });

        ui.vertical_centered(|ui| {
            // Fit the preview into available space while preserving aspect ratio
            let avail = ui.available_size();
            let size = texture.size_vec2();
            let max_w = (avail.x - 20.0).max(10.0);
            let max_h = (avail.y - 20.0).max(10.0);
            let scale = (max_w / size.x).min(max_h / size.y).clamp(0.1, 1.0);
            ui.add(egui::Image::new((texture.id(), size * scale)));
        });
    }

    fn alert_ui(&mut self, ctx: &egui::Context) {
        let Some(message) = &self.alert else {
            return;
        };
        let mut dismissed = false;
        let modal = egui::Modal::new(egui::Id::new("upload_alert")).show(ctx, |ui| {
            ui.set_width(320.0);
            ui.heading("Sample unavailable");
            ui.label(message.as_str());
            ui.add_space(8.0);
            if ui.button("OK").clicked() {
                dismissed = true;
            }
        });
        if dismissed || modal.should_close() {
            self.alert = None;
        }
    }
}

impl eframe::App for UploaderApp {
    /// Called by the framework to save state before shutdown.
    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        eframe::set_value(storage, eframe::APP_KEY, &self.config);
    }

    /// Called each time the UI needs repainting, which may be many times per second.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.generate_preview(ctx);

        egui::TopBottomPanel::top("top_panel").show(ctx, |ui| {
            egui::MenuBar::new().ui(ui, |ui| {
                // NOTE: no File->Quit on web pages!
                let is_web = cfg!(target_arch = "wasm32");
                if !is_web {
                    ui.menu_button("File", |ui| {
                        if ui.button("Quit").clicked() {
                            ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                        }
                    });
                    ui.add_space(16.0);
                }

                egui::widgets::global_theme_preference_buttons(ui);
            });
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.heading("Image Upload");
            ui.separator();

            let props = UploadProps {
                image_preview: self.preview.is_some(),
                loading: self.preview_pending,
            };
            let Self {
                upload,
                active,
                preview_pending,
                alert,
                ..
            } = self;
            upload.ui(
                ui,
                props,
                &mut |file: AcquiredFile| {
                    *active = Some(file);
                    *preview_pending = true;
                },
                &mut |message: &str| *alert = Some(message.to_owned()),
            );
            if *preview_pending {
                ctx.request_repaint();
            }

            self.preview_ui(ui);
        });

        self.alert_ui(ctx);
    }
}
