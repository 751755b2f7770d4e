//! Main viewer application with eframe/egui integration.
//!
//! Handles UI rendering and user interaction; all compositing happens on
//! the worker thread.

use std::path::PathBuf;
use std::sync::mpsc::{channel, Receiver, Sender};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use egui::{Color32, ColorImage, TextureHandle, TextureOptions};
use mockup_core::params::{QUALITY_MAX, QUALITY_MIN, QUALITY_STEP, SCALE_MAX, SCALE_MIN};
use mockup_core::{ImageSource, Registry, Surface};
use mockup_io::export::export;
use mockup_io::FileSink;
use mockup_ops::{RenderSlot, ThumbnailCache};
use tracing::{debug, error, info, trace, warn};

use crate::handler::ViewerHandler;
use crate::messages::{ViewerEvent, ViewerMsg};
use crate::state::{accepts_drop, ViewerState};

/// Logical width of a style-picker thumbnail.
const THUMB_POINTS: f32 = 120.0;

/// Poll interval while the worker still owes results.
const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Configuration for launching the viewer.
#[derive(Debug, Clone)]
pub struct ViewerConfig {
    /// Mockups to offer.
    pub registry: Registry,
    /// Directory backgrounds and overlays are resolved against.
    pub assets: PathBuf,
    /// Mockup to start on.
    pub mockup: Option<String>,
    /// User image to start with.
    pub image: Option<ImageSource>,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            registry: Registry::builtin(),
            assets: PathBuf::from("assets"),
            mockup: None,
            image: None,
        }
    }
}

/// A committed preview: the surface for export, the texture for display.
struct Preview {
    mockup: String,
    surface: Surface,
    texture: TextureHandle,
}

/// Main viewer application.
pub struct ViewerApp {
    /// Sender for commands to worker thread.
    tx: Sender<ViewerMsg>,
    /// Receiver for results from worker thread.
    rx: Receiver<ViewerEvent>,
    /// Worker thread handle (Option for Drop).
    worker: Option<JoinHandle<()>>,

    registry: Registry,
    state: ViewerState,

    /// Preview shown; late results of older triggers are dropped.
    preview: RenderSlot<Preview>,
    /// Style-picker thumbnails for the current user image.
    thumbnails: ThumbnailCache<TextureHandle>,
}

impl ViewerApp {
    /// Creates a new viewer application.
    pub fn new(cc: &eframe::CreationContext<'_>, config: ViewerConfig) -> Self {
        // Create bidirectional channels
        let (tx_to_worker, rx_in_worker) = channel();
        let (tx_to_ui, rx_from_worker) = channel();

        let registry = config.registry;
        let worker_registry = registry.clone();
        let assets = config.assets;
        let worker = thread::Builder::new()
            .name("mockup-render".into())
            .spawn(move || ViewerHandler::new(rx_in_worker, tx_to_ui, worker_registry, assets).run())
            .map_err(|e| error!(error = %e, "failed to spawn render worker"))
            .ok();

        let mut state = ViewerState::new(&registry, config.mockup.as_deref());
        state.pixel_ratio = f64::from(cc.egui_ctx.pixels_per_point());

        let mut app = Self {
            tx: tx_to_worker,
            rx: rx_from_worker,
            worker,
            registry,
            state,
            preview: RenderSlot::new(),
            thumbnails: ThumbnailCache::new(),
        };

        // Everything up to Regenerate is one trigger.
        let generation = app.preview.begin();
        app.send(ViewerMsg::SyncGeneration(generation));
        app.send(ViewerMsg::SetPixelRatio(app.state.pixel_ratio));
        app.send(ViewerMsg::SelectMockup(app.state.params.selected_mockup.clone()));
        if let Some(image) = config.image {
            app.send(ViewerMsg::LoadImage(image));
        }
        app.send(ViewerMsg::Regenerate);

        app
    }

    fn send(&self, msg: ViewerMsg) {
        let _ = self.tx.send(msg);
    }

    /// Sends a message that re-renders the preview, stamped with a fresh
    /// generation.
    fn trigger(&mut self, msg: ViewerMsg) {
        let generation = self.preview.begin();
        self.send(ViewerMsg::SyncGeneration(generation));
        self.send(msg);
    }

    /// Open file dialog and load selected image.
    fn open_file_dialog(&mut self) {
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("Images", &["png", "jpg", "jpeg"])
            .pick_file()
        {
            self.trigger(ViewerMsg::LoadImage(ImageSource::file(path)));
        }
    }

    fn select(&mut self, name: &str) {
        if self.state.select(name) {
            self.trigger(ViewerMsg::SelectMockup(name.to_string()));
        }
    }

    fn remove_image(&mut self) {
        if self.state.params.user_image.take().is_none() {
            return;
        }
        self.state.user_dims = None;
        self.thumbnails.sync_user_image(None);
        self.trigger(ViewerMsg::RemoveImage);
    }

    /// Saves the shown preview through a save dialog.
    fn download(&mut self) {
        let Some(preview) = self.preview.current() else {
            return;
        };
        let Some(path) = rfd::FileDialog::new()
            .set_file_name(self.state.download_name())
            .add_filter("PNG", &["png"])
            .add_filter("JPEG", &["jpg", "jpeg"])
            .save_file()
        else {
            return;
        };

        let options = self.state.export_options_for(&path);
        match export(&preview.surface, &preview.mockup, &options, &FileSink::new(path)) {
            Ok(report) => {
                self.state.status = Some(format!(
                    "Saved {} ({:.1} KB)",
                    report.path.display(),
                    report.size as f64 / 1024.0
                ));
            }
            Err(e) => {
                warn!(error = %e, "export failed");
                self.state.error = Some(format!("Export failed: {e}"));
            }
        }
    }

    fn texture(ctx: &egui::Context, name: String, surface: &Surface) -> TextureHandle {
        let (w, h) = surface.dimensions();
        let image = ColorImage::from_rgba_unmultiplied([w as usize, h as usize], surface.as_bytes());
        ctx.load_texture(name, image, TextureOptions::LINEAR)
    }

    /// Process all pending events from worker. Returns true if any events were processed.
    fn process_events(&mut self, ctx: &egui::Context) -> bool {
        let mut had_events = false;
        while let Ok(event) = self.rx.try_recv() {
            had_events = true;
            match event {
                ViewerEvent::PreviewReady { generation, mockup, surface } => {
                    if !self.preview.is_current(generation) {
                        trace!(generation, latest = self.preview.latest(), "stale preview dropped");
                        continue;
                    }
                    let texture = Self::texture(ctx, "mockup_preview".into(), &surface);
                    self.preview.commit(generation, Preview { mockup, surface, texture });
                    self.state.error = None;
                }
                ViewerEvent::ThumbnailReady { user_key, mockup, surface } => {
                    let texture = Self::texture(ctx, format!("thumb_{mockup}"), &surface);
                    if !self.thumbnails.insert(mockup, user_key.as_ref(), texture) {
                        trace!("thumbnail for previous image dropped");
                    }
                }
                ViewerEvent::ImageLoaded { source, dims } => {
                    info!(image = %source.label(), ?dims, "using user image");
                    self.thumbnails.sync_user_image(Some(source.key()));
                    self.state.params.user_image = Some(source);
                    self.state.user_dims = Some(dims);
                }
                ViewerEvent::ImageRejected { generation, label, reason } => {
                    self.preview.fail(generation);
                    self.state.error = Some(format!("Could not load {label}: {reason}"));
                }
                ViewerEvent::RenderFailed { generation, mockup, error } => {
                    if self.preview.fail(generation) {
                        self.state.error = Some(format!("{mockup}: {error}"));
                    }
                }
            }
        }
        had_events
    }

    /// Re-renders when the window moves to a display with another scale.
    fn sync_pixel_ratio(&mut self, ctx: &egui::Context) {
        let ratio = f64::from(ctx.pixels_per_point());
        if (ratio - self.state.pixel_ratio).abs() > f64::EPSILON {
            debug!(from = self.state.pixel_ratio, to = ratio, "pixel ratio changed");
            self.state.pixel_ratio = ratio;
            self.trigger(ViewerMsg::SetPixelRatio(ratio));
        }
    }

    /// Handle keyboard input. Returns true if should exit.
    fn handle_input(&mut self, ctx: &egui::Context) -> bool {
        let (exit, open, remove, download) = ctx.input(|i| {
            (
                i.key_pressed(egui::Key::Escape),
                i.key_pressed(egui::Key::O) && !i.modifiers.command,
                i.key_pressed(egui::Key::Delete),
                i.key_pressed(egui::Key::S) && i.modifiers.command,
            )
        });

        if open {
            self.open_file_dialog();
        }
        if remove {
            self.remove_image();
        }
        if download {
            self.download();
        }
        exit
    }

    /// Check for dropped files. Only images are accepted.
    fn handle_dropped_files(&mut self, ctx: &egui::Context) {
        let Some(file) = ctx.input(|i| i.raw.dropped_files.first().cloned()) else {
            return;
        };
        if !accepts_drop(&file.mime, file.path.as_deref()) {
            warn!(name = %file.name, mime = %file.mime, "ignoring dropped non-image");
            self.state.error = Some(format!("{} is not an image", file.name));
            return;
        }
        let source = match (file.path, file.bytes) {
            (Some(path), _) => ImageSource::file(path),
            (None, Some(bytes)) => ImageSource::memory(file.name, bytes),
            (None, None) => return,
        };
        self.trigger(ViewerMsg::LoadImage(source));
    }

    /// Draw top control panel.
    fn draw_controls(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("controls").show(ctx, |ui| {
            ui.horizontal(|ui| {
                if ui.button("Upload").clicked() {
                    self.open_file_dialog();
                }
                let has_image = self.state.params.user_image.is_some();
                if ui.add_enabled(has_image, egui::Button::new("Remove image")).clicked() {
                    self.remove_image();
                }

                ui.separator();

                ui.label("Scale:").on_hover_text(
                    "Enlarges the image inside the frame.\n\
                    Rotated frames get extra padding on top."
                );
                let mut scale = self.state.params.scale_factor();
                let scale_slider = ui.add(
                    egui::Slider::new(&mut scale, SCALE_MIN..=SCALE_MAX)
                        .step_by(0.05)
                        .fixed_decimals(2),
                );
                if scale_slider.changed() && self.state.params.set_scale_factor(scale) {
                    self.trigger(ViewerMsg::SetScaleFactor(scale));
                }

                ui.separator();

                ui.label("Quality:").on_hover_text(
                    "Export quality.\n\
                    Only affects JPEG downloads, never the preview."
                );
                let mut quality = self.state.params.export_quality();
                if ui
                    .add(
                        egui::Slider::new(&mut quality, QUALITY_MIN..=QUALITY_MAX)
                            .step_by(QUALITY_STEP)
                            .fixed_decimals(2),
                    )
                    .changed()
                {
                    self.state.params.set_export_quality(quality);
                }

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    let ready = self.preview.current().is_some();
                    if ui.add_enabled(ready, egui::Button::new("Download")).clicked() {
                        self.download();
                    }
                });
            });
        });
    }

    /// Draw the style picker.
    fn draw_styles(&mut self, ctx: &egui::Context) {
        let mut clicked = None;
        egui::SidePanel::left("styles")
            .resizable(false)
            .exact_width(THUMB_POINTS + 24.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    for mockup in &self.registry {
                        let selected = mockup.name == self.state.params.selected_mockup;
                        ui.vertical_centered(|ui| {
                            if let Some(texture) = self.thumbnails.get(&mockup.name) {
                                let size = texture.size_vec2() * (THUMB_POINTS / texture.size_vec2().x);
                                let image = egui::Image::new((texture.id(), size));
                                if ui.add(egui::ImageButton::new(image).selected(selected)).clicked() {
                                    clicked = Some(mockup.name.clone());
                                }
                            } else {
                                ui.add_sized([THUMB_POINTS, THUMB_POINTS * 0.6], egui::Spinner::new());
                            }
                            if ui.selectable_label(selected, mockup.label()).clicked() {
                                clicked = Some(mockup.name.clone());
                            }
                        });
                        ui.add_space(8.0);
                    }
                });
            });

        if let Some(name) = clicked {
            self.select(&name);
        }
    }

    /// Draw bottom status panel.
    fn draw_status(&self, ctx: &egui::Context) {
        egui::TopBottomPanel::bottom("status").show(ctx, |ui| {
            ui.horizontal(|ui| {
                if let Some(err) = &self.state.error {
                    ui.colored_label(Color32::RED, err);
                    ui.separator();
                } else if let Some(status) = &self.state.status {
                    ui.label(status);
                    ui.separator();
                }
                if let (Some(source), Some((w, h))) = (&self.state.params.user_image, self.state.user_dims) {
                    ui.label(format!("{} {w}x{h}", source.label()));
                    ui.separator();
                }
                ui.label("O: Open | Del: Remove | Ctrl+S: Download | Esc: Exit");
            });
        });
    }

    /// Draw the preview, with a spinner while a render is in flight.
    fn draw_preview(&mut self, ctx: &egui::Context) {
        egui::CentralPanel::default().show(ctx, |ui| {
            let available = ui.available_size();
            let (rect, response) = ui.allocate_exact_size(available, egui::Sense::click());
            let painter = ui.painter_at(rect);

            if let Some(preview) = self.preview.current() {
                // The surface has pixel_ratio device pixels per point.
                let size = preview.texture.size_vec2() / self.state.pixel_ratio as f32;
                let fit = (rect.width() / size.x).min(rect.height() / size.y).min(1.0);
                let image_rect = egui::Rect::from_center_size(rect.center(), size * fit);
                painter.image(
                    preview.texture.id(),
                    image_rect,
                    egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
                    Color32::WHITE,
                );
            } else if !self.preview.is_loading() {
                painter.text(
                    rect.center(),
                    egui::Align2::CENTER_CENTER,
                    "Double-click or drop a screenshot to start",
                    egui::FontId::default(),
                    ui.visuals().text_color(),
                );
            }

            if self.preview.is_loading() {
                let spinner = egui::Rect::from_center_size(rect.center(), egui::vec2(48.0, 48.0));
                ui.put(spinner, egui::Spinner::new().size(48.0));
            }

            if response.double_clicked() {
                self.open_file_dialog();
            }
        });
    }
}

impl eframe::App for ViewerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let had_events = self.process_events(ctx);
        self.sync_pixel_ratio(ctx);
        self.handle_dropped_files(ctx);

        if self.handle_input(ctx) {
            self.send(ViewerMsg::Close);
            ctx.send_viewport_cmd(egui::ViewportCommand::Close);
            return;
        }

        self.draw_controls(ctx);
        self.draw_styles(ctx);
        self.draw_status(ctx);
        self.draw_preview(ctx);

        if had_events {
            ctx.request_repaint();
        } else if self.preview.is_loading() || self.thumbnails.len() < self.registry.len() {
            ctx.request_repaint_after(POLL_INTERVAL);
        }
    }
}

impl Drop for ViewerApp {
    fn drop(&mut self) {
        // Signal worker to stop
        let _ = self.tx.send(ViewerMsg::Close);

        // Wait for worker thread to finish
        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }
    }
}
