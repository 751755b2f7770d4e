//! # mockup-core
//!
//! Core types for device mockup compositing.
//!
//! This crate provides the data the rest of the workspace works on:
//!
//! - [`Surface`] - RGBA8 pixel buffer that renders are written into
//! - [`Size`], [`Frame`] - Native-space geometry of a mockup
//! - [`MockupDefinition`] - One device-frame mockup (artwork + frame)
//! - [`Registry`] - The ordered, read-only list of mockups
//! - [`ImageSource`] - Where image bytes come from (file, memory, data URL)
//! - [`RenderParameters`] - User-adjustable render state
//!
//! ## Crate Structure
//!
//! ```text
//! mockup-core (this crate)
//!    ^
//!    |
//!    +-- mockup-io (decode, export)
//!    +-- mockup-ops (compositor)
//!    +-- mockup-view (viewer)
//!    +-- mockup-cli (binary)
//! ```
//!
//! ## Coordinate System
//!
//! All geometry uses screen convention: origin at the top-left corner,
//! X to the right, Y downward. Rotations are in degrees and positive
//! angles turn clockwise on screen.

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod error;
pub mod geometry;
pub mod mockup;
pub mod params;
pub mod registry;
pub mod source;
pub mod surface;

pub use error::{CoreError, CoreResult};
pub use geometry::{Frame, Size};
pub use mockup::MockupDefinition;
pub use params::{
    RenderParameters, DEFAULT_EXPORT_QUALITY, DEFAULT_SCALE_FACTOR, QUALITY_MAX, QUALITY_MIN,
    QUALITY_STEP, SCALE_MAX, SCALE_MIN,
};
pub use registry::Registry;
pub use source::{ImageSource, SourceKey};
pub use surface::Surface;

/// Prelude module for convenient imports.
///
/// ```
/// use mockup_core::prelude::*;
/// ```
pub mod prelude {
    pub use crate::error::{CoreError, CoreResult};
    pub use crate::geometry::{Frame, Size};
    pub use crate::mockup::MockupDefinition;
    pub use crate::params::RenderParameters;
    pub use crate::registry::Registry;
    pub use crate::source::{ImageSource, SourceKey};
    pub use crate::surface::Surface;
}
