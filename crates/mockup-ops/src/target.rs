//! Render targets.
//!
//! A target fixes the logical output width. Height always follows the
//! mockup's aspect ratio, and the pixel ratio multiplies both into device
//! pixels:
//!
//! ```text
//! scale          = width / canvas.width
//! logical_height = canvas.height * scale
//! pixel size     = round(logical * ratio), at least 1
//! ```

use mockup_core::Size;

use crate::fit::FitPolicy;
use crate::resize::Filter;
use crate::{OpsError, OpsResult};

/// Logical width of the main preview.
pub const PREVIEW_WIDTH: f64 = 800.0;
/// Logical width of a style-picker thumbnail.
pub const THUMBNAIL_WIDTH: f64 = 120.0;

/// Preview or thumbnail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TargetKind {
    /// Full-fidelity preview, also the export source
    Preview,
    /// Low-fidelity style-picker thumbnail
    Thumbnail,
}

/// Where a render goes: kind, logical width, device pixel ratio.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderTarget {
    /// Kind of target; selects fit policy and smoothing
    pub kind: TargetKind,
    /// Logical (CSS-pixel) width
    pub width: f64,
    /// Device pixels per logical pixel
    pub pixel_ratio: f64,
}

/// Sizes and scale of one target for one mockup.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TargetGeometry {
    /// Native-to-logical scale
    pub scale: f64,
    /// Logical width
    pub logical_width: f64,
    /// Logical height
    pub logical_height: f64,
    /// Surface width in device pixels
    pub pixel_width: u32,
    /// Surface height in device pixels
    pub pixel_height: u32,
    /// Device pixels per logical pixel
    pub pixel_ratio: f64,
}

impl RenderTarget {
    /// 800-wide preview at the given device pixel ratio.
    pub fn preview(pixel_ratio: f64) -> Self {
        Self {
            kind: TargetKind::Preview,
            width: PREVIEW_WIDTH,
            pixel_ratio,
        }
    }

    /// 120-wide thumbnail at ratio 1.
    pub fn thumbnail() -> Self {
        Self {
            kind: TargetKind::Thumbnail,
            width: THUMBNAIL_WIDTH,
            pixel_ratio: 1.0,
        }
    }

    /// Same kind and ratio with a different logical width.
    pub fn with_width(mut self, width: f64) -> Self {
        self.width = width;
        self
    }

    /// Fit policy for this kind. Thumbnails ignore the scale factor.
    pub fn fit_policy(&self, scale_factor: f64) -> FitPolicy {
        match self.kind {
            TargetKind::Preview => FitPolicy::Preview { scale_factor },
            TargetKind::Thumbnail => FitPolicy::Thumbnail,
        }
    }

    /// Prefilter used when a source is shrunk by more than 2x.
    pub fn smoothing(&self) -> Filter {
        match self.kind {
            TargetKind::Preview => Filter::Lanczos3,
            TargetKind::Thumbnail => Filter::Bilinear,
        }
    }

    /// Computes the target's geometry for a mockup canvas.
    ///
    /// # Errors
    ///
    /// [`OpsError::InvalidParameter`] for a non-positive width or ratio,
    /// [`OpsError::InvalidDimensions`] for an unusable canvas.
    pub fn geometry(&self, canvas: Size) -> OpsResult<TargetGeometry> {
        if !(self.width.is_finite() && self.width > 0.0) {
            return Err(OpsError::InvalidParameter(format!(
                "target width must be positive, got {}",
                self.width
            )));
        }
        if !(self.pixel_ratio.is_finite() && self.pixel_ratio > 0.0) {
            return Err(OpsError::InvalidParameter(format!(
                "pixel ratio must be positive, got {}",
                self.pixel_ratio
            )));
        }
        if !canvas.is_valid() {
            return Err(OpsError::InvalidDimensions(format!(
                "canvas {}x{}",
                canvas.width, canvas.height
            )));
        }

        let scale = self.width / canvas.width;
        let logical_height = canvas.height * scale;
        Ok(TargetGeometry {
            scale,
            logical_width: self.width,
            logical_height,
            pixel_width: to_pixels(self.width * self.pixel_ratio),
            pixel_height: to_pixels(logical_height * self.pixel_ratio),
            pixel_ratio: self.pixel_ratio,
        })
    }
}

fn to_pixels(v: f64) -> u32 {
    v.round().clamp(1.0, u32::MAX as f64) as u32
}
