//! # mockup-ops
//!
//! The device mockup compositor.
//!
//! Maps a user image into an arbitrarily positioned, rotated frame of a
//! mockup and renders background plus image at preview or thumbnail size.
//!
//! # Modules
//!
//! - [`target`] - Render targets and their geometry
//! - [`fit`] - Contain-fit with rotation padding
//! - [`draw`] - Affine drawing with bilinear sampling
//! - [`resize`] - Premultiplied separable downscaling
//! - [`compositor`] - The render pass
//! - [`slot`] - Last-trigger-wins result slots
//! - [`thumbnails`] - Thumbnail cache
//!
//! # Example
//!
//! ```rust
//! use mockup_core::{Frame, MockupDefinition, Size};
//! use mockup_io::DecodingLoader;
//! use mockup_ops::{Compositor, RenderTarget};
//!
//! let compositor = Compositor::new(DecodingLoader::new());
//! let mockup = MockupDefinition::new(
//!     "demo", "Demo", "missing.png",
//!     Size::new(1600.0, 900.0),
//!     Frame::new(600.0, 100.0, 400.0, 700.0, 0.0),
//! );
//! // The background file does not exist, so the pass is aborted.
//! let err = compositor.render(&RenderTarget::preview(1.0), &mockup, None, 1.3).unwrap_err();
//! assert!(err.to_string().contains("background"));
//! ```
//!
//! # Feature Flags
//!
//! - `parallel` - Row-parallel drawing and resampling with rayon (default)

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

mod error;
mod parallel;
pub mod compositor;
pub mod draw;
pub mod fit;
pub mod resize;
pub mod slot;
pub mod target;
pub mod thumbnails;

pub use compositor::{layout, Compositor, Layout};
pub use error::{ImageRole, OpsError, OpsResult};
pub use fit::{rotation_impact, FitPolicy, Placement};
pub use resize::Filter;
pub use slot::{Generation, RenderSlot};
pub use target::{RenderTarget, TargetGeometry, TargetKind, PREVIEW_WIDTH, THUMBNAIL_WIDTH};
pub use thumbnails::ThumbnailCache;
