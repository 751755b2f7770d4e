//! Message types for UI <-> worker communication.
//!
//! The UI sends commands, the worker answers with events. Preview results
//! carry the generation they were rendered for so the UI can drop late ones.

use mockup_core::{ImageSource, SourceKey, Surface};

pub use mockup_ops::Generation;

/// Messages from UI thread to worker thread.
#[derive(Debug, Clone)]
pub enum ViewerMsg {
    /// Switch the preview to another mockup.
    SelectMockup(String),

    /// Decode and use a new user image.
    LoadImage(ImageSource),

    /// Drop the user image.
    RemoveImage,

    /// Set the user scale factor.
    SetScaleFactor(f64),

    /// Set the display pixel ratio.
    SetPixelRatio(f64),

    /// Re-render preview and thumbnails.
    Regenerate,

    /// Sync generation counter.
    SyncGeneration(Generation),

    /// Close viewer.
    Close,
}

/// Events from worker thread to UI thread.
#[derive(Debug)]
pub enum ViewerEvent {
    /// Preview surface ready.
    PreviewReady {
        generation: Generation,
        mockup: String,
        surface: Surface,
    },

    /// One style-picker thumbnail ready, rendered for `user_key`.
    ThumbnailReady {
        user_key: Option<SourceKey>,
        mockup: String,
        surface: Surface,
    },

    /// A user image was decoded and is now in use.
    ImageLoaded {
        source: ImageSource,
        dims: (u32, u32),
    },

    /// A user image could not be decoded; the previous one stays.
    ImageRejected {
        generation: Generation,
        label: String,
        reason: String,
    },

    /// The preview render pass was aborted.
    RenderFailed {
        generation: Generation,
        mockup: String,
        error: String,
    },
}
