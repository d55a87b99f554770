//! The image upload control: a drop/click target, a sample gallery toggle
//! and the gallery itself.
//!
//! Every user action maps onto one handler method. Handlers hand acquired
//! files to an [`UploadSink`] and report failures through a [`Notifier`];
//! what happens to the file afterwards (preview, submission) belongs to the
//! caller.

use std::collections::{HashMap, HashSet};
use std::rc::Rc;

use egui::{
    Align2, Color32, ColorImage, CursorIcon, FontId, Margin, Rect, RichText, Sense, Stroke,
    TextureHandle, TextureOptions, vec2,
};

use crate::acquire::{self, ACCEPTED_EXTENSIONS, AcquiredFile};
use crate::catalog::{SampleCatalog, SampleEntry};
use crate::config::UploaderConfig;
use crate::error::ResolveError;
use crate::loader::AssetLoader;
use crate::resolver::{AssetRoots, resolve_sample};
use crate::state::{ThumbnailState, ThumbnailTracker, ThumbnailTransition, UiState, UploadProps, View};
use crate::tasks::TaskQueue;
use crate::{file_picker, placeholder, preview};

const CARD_WIDTH: f32 = 160.0;
const THUMBNAIL_HEIGHT: f32 = 110.0;
/// Thumbnails are decoded no larger than this on either side.
const THUMBNAIL_SIDE: u32 = 256;
const GALLERY_MAX_HEIGHT: f32 = 420.0;
const SUCCESS_GREEN: Color32 = Color32::from_rgb(0x4c, 0xaf, 0x50);

/// Receives every file the control acquires.
pub trait UploadSink {
    fn on_upload(&mut self, file: AcquiredFile);
}

impl<F: FnMut(AcquiredFile)> UploadSink for F {
    fn on_upload(&mut self, file: AcquiredFile) {
        self(file);
    }
}

/// Shows a blocking message to the user.
pub trait Notifier {
    fn notify(&mut self, message: &str);
}

impl<F: FnMut(&str)> Notifier for F {
    fn notify(&mut self, message: &str) {
        self(message);
    }
}

enum Completion {
    Sample {
        id: String,
        result: Result<AcquiredFile, ResolveError>,
    },
    Thumbnail {
        id: String,
        attempt: usize,
        image: Result<ColorImage, String>,
    },
}

pub struct ImageUpload<L> {
    state: UiState,
    catalog: Rc<SampleCatalog>,
    loader: Rc<L>,
    roots: AssetRoots,
    thumbnails: ThumbnailTracker,
    /// Thumbnail loads started but not yet applied, as (id, attempt).
    in_flight: HashSet<(String, usize)>,
    decoded: Vec<(String, ColorImage)>,
    textures: HashMap<String, TextureHandle>,
    tasks: TaskQueue<Completion>,
}

impl<L: AssetLoader + 'static> ImageUpload<L> {
    pub fn new(catalog: SampleCatalog, loader: L, config: &UploaderConfig) -> Self {
        Self {
            state: UiState::default(),
            catalog: Rc::new(catalog),
            loader: Rc::new(loader),
            roots: config.roots(),
            thumbnails: ThumbnailTracker::new(config.thumbnail_attempts()),
            in_flight: HashSet::new(),
            decoded: Vec::new(),
            textures: HashMap::new(),
            tasks: TaskQueue::default(),
        }
    }

    pub fn state(&self) -> &UiState {
        &self.state
    }

    pub fn loader(&self) -> &L {
        &self.loader
    }

    pub fn thumbnail_state(&self, id: &str) -> ThumbnailState {
        self.thumbnails.state(id)
    }

    pub fn sync_props(&mut self, props: UploadProps) {
        self.state.sync(props);
    }

    /// The "Show/Hide Sample Images" button.
    pub fn toggle_gallery(&mut self) -> bool {
        self.state.toggle_gallery()
    }

    /// Forward the first of `files` to the sink. Everything after the first
    /// is discarded. Returns whether a file was delivered.
    pub fn handle_files(
        &mut self,
        files: impl IntoIterator<Item = AcquiredFile>,
        sink: &mut impl UploadSink,
    ) -> bool {
        if self.state.is_loading {
            log::debug!("Ignoring files while loading");
            return false;
        }
        let Some(file) = files.into_iter().next() else {
            return false;
        };
        self.deliver(file, sink);
        true
    }

    fn deliver(&mut self, file: AcquiredFile, sink: &mut impl UploadSink) {
        log::info!("Acquired '{}' ({} bytes)", file.name(), file.len());
        sink.on_upload(file);
        self.state.acquisition_completed();
    }

    /// Start resolving the sample `id`. The outcome is applied by
    /// [`Self::process_completions`]. Returns false while loading.
    pub fn select_sample(&mut self, id: &str) -> bool {
        if self.state.is_loading {
            log::debug!("Ignoring sample selection while loading");
            return false;
        }
        let entry = self.catalog.get(id).cloned();
        let loader = Rc::clone(&self.loader);
        let roots = self.roots.clone();
        let id = id.to_owned();
        self.tasks.spawn(async move {
            let result = match entry {
                Some(entry) => resolve_sample(&*loader, &entry, &roots).await,
                None => Err(ResolveError::UnknownSample { id: id.clone() }),
            };
            Completion::Sample { id, result }
        });
        true
    }

    /// Start loading the current candidate of thumbnail `id`, unless it is
    /// settled or already loading.
    pub fn request_thumbnail(&mut self, id: &str) -> bool {
        let ThumbnailState::Pending { attempt } = self.thumbnails.state(id) else {
            return false;
        };
        let Some(entry) = self.catalog.get(id) else {
            return false;
        };
        let Some(location) = self
            .roots
            .thumbnail_candidates(entry, self.thumbnails.attempts())
            .into_iter()
            .nth(attempt)
        else {
            return false;
        };
        if !self.in_flight.insert((id.to_owned(), attempt)) {
            return false;
        }

        let loader = Rc::clone(&self.loader);
        let id = id.to_owned();
        self.tasks.spawn(async move {
            let image = match loader.load(&location).await {
                Some(bytes) => preview::decode(&bytes, Some(THUMBNAIL_SIDE))
                    .map_err(|e| format!("{location}: {e}")),
                None => Err(format!("{location}: not found")),
            };
            Completion::Thumbnail { id, attempt, image }
        });
        true
    }

    /// Apply every finished resolution and thumbnail load.
    pub fn process_completions(&mut self, sink: &mut impl UploadSink, notifier: &mut impl Notifier) {
        for completion in self.tasks.drain() {
            match completion {
                Completion::Sample { id, result } => match result {
                    Ok(file) => self.deliver(file, sink),
                    Err(e) => {
                        match &e {
                            ResolveError::Exhausted { .. } => log::warn!("Sample '{id}': {e}"),
                            ResolveError::UnknownSample { .. } => {
                                log::error!("Error selecting sample: {e}");
                            }
                        }
                        notifier.notify(&e.user_message());
                    }
                },
                Completion::Thumbnail { id, attempt, image } => {
                    self.in_flight.remove(&(id.clone(), attempt));
                    if self.thumbnails.state(&id) != (ThumbnailState::Pending { attempt }) {
                        continue;
                    }
                    match image {
                        Ok(image) => {
                            self.thumbnails.on_loaded(&id);
                            self.decoded.push((id, image));
                        }
                        Err(e) => {
                            log::debug!("Thumbnail '{id}' failed: {e}");
                            if self.thumbnails.on_error(&id) == ThumbnailTransition::FallbackShown {
                                log::info!("Thumbnail '{id}' replaced by placeholder");
                            }
                        }
                    }
                }
            }
        }
    }

    fn upload_textures(&mut self, ctx: &egui::Context) {
        for (id, image) in self.decoded.drain(..) {
            let texture = ctx.load_texture(format!("sample_thumb_{id}"), image, TextureOptions::LINEAR);
            self.textures.insert(id, texture);
        }
    }

    /// Draw the control and handle this frame's input.
    pub fn ui(
        &mut self,
        ui: &mut egui::Ui,
        props: UploadProps,
        sink: &mut impl UploadSink,
        notifier: &mut impl Notifier,
    ) {
        self.tasks.attach(ui.ctx());
        self.sync_props(props);
        self.process_completions(sink, notifier);
        self.upload_textures(ui.ctx());

        if let Some(file) = file_picker::take_picked_file() {
            self.handle_files([file], sink);
        }

        self.drop_area_ui(ui, sink);

        ui.add_space(8.0);
        let label = if self.state.gallery_visible {
            "🖼 Hide Sample Images"
        } else {
            "🖼 Show Sample Images"
        };
        if ui
            .add_enabled(!self.state.is_loading, egui::Button::new(label))
            .clicked()
        {
            self.toggle_gallery();
        }

        if self.state.gallery_visible {
            self.gallery_ui(ui);
        }
    }

    fn drop_area_ui(&mut self, ui: &mut egui::Ui, sink: &mut impl UploadSink) {
        let enabled = !self.state.is_loading;
        let drag_active = enabled && ui.ctx().input(|i| !i.raw.hovered_files.is_empty());
        let view = self.state.view();

        let visuals = ui.visuals();
        let (stroke, fill) = if drag_active {
            (
                Stroke::new(2.0, visuals.selection.stroke.color),
                visuals.selection.bg_fill.gamma_multiply(0.3),
            )
        } else {
            (visuals.widgets.noninteractive.bg_stroke, visuals.extreme_bg_color)
        };

        let response = egui::Frame::group(ui.style())
            .stroke(stroke)
            .fill(fill)
            .inner_margin(Margin::same(24))
            .show(ui, |ui| {
                ui.set_min_width(ui.available_width());
                ui.add_enabled_ui(enabled, |ui| {
                    ui.vertical_centered(|ui| drop_area_contents(ui, view));
                });
            })
            .response
            .interact(if enabled { Sense::click() } else { Sense::hover() });

        if !enabled {
            return;
        }

        if response.on_hover_cursor(CursorIcon::PointingHand).clicked() {
            #[cfg(all(not(target_arch = "wasm32"), not(target_os = "android")))]
            if let Some(file) = acquire::pick_file() {
                self.handle_files([file], sink);
            }
            #[cfg(target_arch = "wasm32")]
            file_picker::open_image_picker(ui.ctx());
        }

        let dropped = ui.ctx().input(|i| i.raw.dropped_files.clone());
        if !dropped.is_empty() {
            self.handle_files(acquire::accepted_dropped(&dropped), sink);
        }
    }

    fn gallery_ui(&mut self, ui: &mut egui::Ui) {
        let catalog = Rc::clone(&self.catalog);
        let mut selected = None;

        ui.add_space(8.0);
        egui::Frame::group(ui.style()).show(ui, |ui| {
            ui.strong("🖼 Choose a Sample Image");
            ui.add_space(4.0);
            egui::ScrollArea::vertical()
                .max_height(GALLERY_MAX_HEIGHT)
                .show(ui, |ui| {
                    ui.horizontal_wrapped(|ui| {
                        for entry in catalog.entries() {
                            if self.card_ui(ui, entry).clicked() {
                                selected = Some(entry.id.as_str());
                            }
                        }
                    });
                });
        });

        if let Some(id) = selected {
            self.select_sample(id);
        }
    }

    fn card_ui(&mut self, ui: &mut egui::Ui, entry: &SampleEntry) -> egui::Response {
        let enabled = !self.state.is_loading;
        let card = egui::Frame::group(ui.style())
            .inner_margin(Margin::same(6))
            .show(ui, |ui| {
                ui.set_width(CARD_WIDTH);
                ui.vertical(|ui| {
                    let (rect, _) =
                        ui.allocate_exact_size(vec2(CARD_WIDTH, THUMBNAIL_HEIGHT), Sense::hover());
                    self.paint_thumbnail(ui, rect, &entry.id);
                    ui.label(RichText::new(&entry.name).strong());
                    ui.label(RichText::new(&entry.description).small());
                    ui.label(
                        RichText::new(&entry.category)
                            .small()
                            .color(Color32::WHITE)
                            .background_color(placeholder::GRADIENT_START),
                    );
                    rect
                })
                .inner
            });

        let thumbnail_rect = card.inner;
        let response = card
            .response
            .interact(if enabled { Sense::click() } else { Sense::hover() });
        if enabled && response.hovered() {
            let painter = ui.painter();
            painter.rect_filled(thumbnail_rect, 4.0, Color32::from_black_alpha(140));
            painter.text(
                thumbnail_rect.center(),
                Align2::CENTER_CENTER,
                "🖼 Use This",
                FontId::proportional(14.0),
                Color32::WHITE,
            );
            return response.on_hover_cursor(CursorIcon::PointingHand);
        }
        response
    }

    fn paint_thumbnail(&mut self, ui: &egui::Ui, rect: Rect, id: &str) {
        let background = ui.visuals().extreme_bg_color;
        match self.thumbnails.state(id) {
            ThumbnailState::Loaded => {
                ui.painter().rect_filled(rect, 4.0, background);
                if let Some(texture) = self.textures.get(id) {
                    let size = texture.size_vec2();
                    let scale = (rect.width() / size.x).min(rect.height() / size.y);
                    let fitted = Rect::from_center_size(rect.center(), size * scale);
                    egui::Image::new((texture.id(), fitted.size())).paint_at(ui, fitted);
                }
            }
            ThumbnailState::FallbackShown => placeholder::paint(&ui.painter_at(rect), rect),
            ThumbnailState::Pending { .. } => {
                self.request_thumbnail(id);
                ui.painter().rect_filled(rect, 4.0, background);
                egui::Spinner::new().paint_at(ui, Rect::from_center_size(rect.center(), vec2(20.0, 20.0)));
            }
        }
    }
}

fn file_types_label() -> String {
    ACCEPTED_EXTENSIONS
        .iter()
        .map(|ext| ext.to_uppercase())
        .collect::<Vec<_>>()
        .join(", ")
}

fn drop_area_contents(ui: &mut egui::Ui, view: View) {
    match view {
        View::Prompt => {
            ui.label(RichText::new("☁").size(40.0));
            ui.heading("Upload Image");
            ui.label("Drag & drop or click to browse");
            ui.label(RichText::new(file_types_label()).small().weak());
        }
        View::Success => {
            ui.label(RichText::new("✔").size(40.0).color(SUCCESS_GREEN));
            ui.heading("Image Uploaded!");
            ui.label("Click to change image");
            ui.label(
                RichText::new("Ready to Process")
                    .small()
                    .color(Color32::WHITE)
                    .background_color(SUCCESS_GREEN),
            );
        }
    }
}
