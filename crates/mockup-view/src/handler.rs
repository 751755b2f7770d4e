//! Worker thread handler for rendering.
//!
//! Owns the compositor and the render parameters. Queued messages are
//! applied as one batch before rendering, so a burst of slider moves costs
//! a single render. Backgrounds stay decoded in a [`CachingLoader`].

use std::collections::VecDeque;
use std::path::PathBuf;
use std::sync::mpsc::{Receiver, Sender};

use mockup_core::{ImageSource, Registry, RenderParameters};
use mockup_io::loader::DEFAULT_CACHE_ENTRIES;
use mockup_io::{CachingLoader, DecodingLoader, ImageLoader};
use mockup_ops::{Compositor, RenderTarget};
use tracing::{debug, info, warn};

use crate::messages::{Generation, ViewerEvent, ViewerMsg};

/// What a batch of messages asks the worker to do.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
struct Pending {
    preview: bool,
    thumbnails: bool,
    close: bool,
}

/// Worker thread handler.
pub struct ViewerHandler {
    rx: Receiver<ViewerMsg>,
    tx: Sender<ViewerEvent>,
    backlog: VecDeque<ViewerMsg>,

    compositor: Compositor<CachingLoader>,
    registry: Registry,
    params: RenderParameters,
    pixel_ratio: f64,

    generation: Generation,
}

impl ViewerHandler {
    /// Creates a handler rendering `registry` with backgrounds from `assets`.
    pub fn new(
        rx: Receiver<ViewerMsg>,
        tx: Sender<ViewerEvent>,
        registry: Registry,
        assets: PathBuf,
    ) -> Self {
        let loader = CachingLoader::new(DecodingLoader::with_base_dir(assets), DEFAULT_CACHE_ENTRIES);
        let params = RenderParameters::new(registry.first().name.clone());
        Self {
            rx,
            tx,
            backlog: VecDeque::new(),
            compositor: Compositor::new(loader),
            registry,
            params,
            pixel_ratio: 1.0,
            generation: 0,
        }
    }

    /// Main event loop.
    pub fn run(mut self) {
        while let Some(msg) = self.next_message() {
            let mut pending = Pending::default();
            self.apply(msg, &mut pending);
            self.drain();
            while let Some(msg) = self.backlog.pop_front() {
                self.apply(msg, &mut pending);
            }

            if pending.close {
                break;
            }
            if pending.preview {
                self.render_preview();
            }
            if pending.thumbnails {
                self.render_thumbnails();
            }
        }
        let stats = self.compositor.loader().stats();
        debug!(hits = stats.hits, misses = stats.misses, "viewer worker stopped");
    }

    fn next_message(&mut self) -> Option<ViewerMsg> {
        self.backlog.pop_front().or_else(|| self.rx.recv().ok())
    }

    /// Moves everything already queued into the backlog.
    fn drain(&mut self) {
        self.backlog.extend(self.rx.try_iter());
    }

    fn send(&self, event: ViewerEvent) {
        let _ = self.tx.send(event);
    }

    fn apply(&mut self, msg: ViewerMsg, pending: &mut Pending) {
        match msg {
            ViewerMsg::Close => pending.close = true,
            ViewerMsg::SyncGeneration(g) => self.generation = self.generation.max(g),
            ViewerMsg::SelectMockup(name) => {
                self.params.selected_mockup = name;
                pending.preview = true;
            }
            ViewerMsg::LoadImage(source) => {
                if self.load_image(source) {
                    pending.preview = true;
                    pending.thumbnails = true;
                }
            }
            ViewerMsg::RemoveImage => {
                if self.params.user_image.take().is_some() {
                    pending.thumbnails = true;
                }
                pending.preview = true;
            }
            ViewerMsg::SetScaleFactor(v) => {
                self.params.set_scale_factor(v);
                pending.preview = true;
            }
            ViewerMsg::SetPixelRatio(ratio) => {
                if ratio.is_finite() && ratio > 0.0 {
                    self.pixel_ratio = ratio;
                } else {
                    warn!(ratio, "ignoring invalid pixel ratio");
                }
                pending.preview = true;
            }
            ViewerMsg::Regenerate => {
                pending.preview = true;
                pending.thumbnails = true;
            }
        }
    }

    /// Decodes a new user image up front so a bad upload never replaces
    /// the current one.
    fn load_image(&mut self, source: ImageSource) -> bool {
        match self.compositor.loader().load(&source) {
            Ok(image) => {
                info!(image = %source.label(), width = image.width(), height = image.height(), "user image loaded");
                self.send(ViewerEvent::ImageLoaded {
                    source: source.clone(),
                    dims: image.dimensions(),
                });
                self.params.user_image = Some(source);
                true
            }
            Err(e) => {
                warn!(image = %source.label(), error = %e, "user image rejected");
                self.send(ViewerEvent::ImageRejected {
                    generation: self.generation,
                    label: source.label(),
                    reason: e.to_string(),
                });
                false
            }
        }
    }

    fn render_preview(&self) {
        let generation = self.generation;
        let name = self.params.selected_mockup.clone();
        let result = self
            .registry
            .require(&name)
            .map_err(|e| e.to_string())
            .and_then(|mockup| {
                self.compositor
                    .render_with(&RenderTarget::preview(self.pixel_ratio), mockup, &self.params)
                    .map_err(|e| e.to_string())
            });

        match result {
            Ok(surface) => self.send(ViewerEvent::PreviewReady {
                generation,
                mockup: name,
                surface,
            }),
            Err(error) => {
                warn!(mockup = %name, generation, %error, "preview failed");
                self.send(ViewerEvent::RenderFailed {
                    generation,
                    mockup: name,
                    error,
                });
            }
        }
    }

    /// Renders thumbnails one at a time, stopping early when the user image
    /// changes underneath.
    fn render_thumbnails(&mut self) {
        let user_key = self.params.user_image.as_ref().map(ImageSource::key);
        for index in 0..self.registry.len() {
            self.drain();
            if self.image_change_queued() {
                debug!("thumbnail pass superseded");
                return;
            }

            let Some(mockup) = self.registry.iter().nth(index) else {
                return;
            };
            match self.compositor.render_thumbnail(mockup, self.params.user_image.as_ref()) {
                Ok(surface) => self.send(ViewerEvent::ThumbnailReady {
                    user_key: user_key.clone(),
                    mockup: mockup.name.clone(),
                    surface,
                }),
                Err(e) => warn!(mockup = %mockup.name, error = %e, "thumbnail skipped"),
            }
        }
    }

    fn image_change_queued(&self) -> bool {
        self.backlog
            .iter()
            .any(|m| matches!(m, ViewerMsg::LoadImage(_) | ViewerMsg::RemoveImage | ViewerMsg::Close))
    }
}
