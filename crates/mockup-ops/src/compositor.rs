//! The compositor.
//!
//! A render pass is strictly sequential:
//!
//! 1. size the target surface and fill it white
//! 2. load the background (abort on failure)
//! 3. scale the frame into target space
//! 4. load and fit the user image, if any (abort on failure)
//! 5. draw the user image, rotated about the frame center
//! 6. draw the background over it, so only the frame cutout shows through
//! 7. draw the overlay, if the mockup has one
//!
//! Drawing happens in logical coordinates under a device transform scaled
//! by the target's pixel ratio.

use glam::{DAffine2, DVec2};
use mockup_core::surface::WHITE;
use mockup_core::{
    Frame, ImageSource, MockupDefinition, Registry, RenderParameters, Surface, DEFAULT_SCALE_FACTOR,
};
use mockup_io::ImageLoader;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::draw::{draw_image, rect_transform};
use crate::error::ImageRole;
use crate::fit::{fit, Placement};
use crate::target::{RenderTarget, TargetGeometry};
use crate::{OpsError, OpsResult};

/// Everything about a render that can be computed without pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Layout {
    /// Target sizes and scale
    pub geometry: TargetGeometry,
    /// Frame in logical target coordinates
    pub frame: Frame,
    /// Where the user image goes, when there is one
    pub placement: Option<Placement>,
}

/// Computes the layout of `mockup` on `target` for a user image of
/// `user_size` pixels.
///
/// # Errors
///
/// Fails on invalid target parameters, a non-positive scale factor or a
/// zero-sized user image.
pub fn layout(
    target: &RenderTarget,
    mockup: &MockupDefinition,
    user_size: Option<(u32, u32)>,
    scale_factor: f64,
) -> OpsResult<Layout> {
    if !(scale_factor.is_finite() && scale_factor > 0.0) {
        return Err(OpsError::InvalidParameter(format!(
            "scale factor must be positive, got {scale_factor}"
        )));
    }
    let geometry = target.geometry(mockup.canvas_size)?;
    let frame = mockup.frame.scaled(geometry.scale);
    let placement = user_size
        .map(|(w, h)| fit(&frame, w, h, target.fit_policy(scale_factor)))
        .transpose()?;
    Ok(Layout {
        geometry,
        frame,
        placement,
    })
}

/// Renders mockups through an [`ImageLoader`].
///
/// # Example
///
/// ```rust,no_run
/// use mockup_core::{ImageSource, Registry};
/// use mockup_io::{CachingLoader, DecodingLoader};
/// use mockup_ops::{Compositor, RenderTarget};
///
/// let compositor = Compositor::new(CachingLoader::new(DecodingLoader::with_base_dir("assets"), 8));
/// let registry = Registry::builtin();
/// let shot = ImageSource::file("screenshot.png");
/// let preview = compositor
///     .render(&RenderTarget::preview(1.0), registry.first(), Some(&shot), 1.3)
///     .unwrap();
/// assert_eq!(preview.width(), 800);
/// ```
#[derive(Debug)]
pub struct Compositor<L> {
    loader: L,
}

impl<L: ImageLoader> Compositor<L> {
    /// Creates a compositor backed by `loader`.
    pub fn new(loader: L) -> Self {
        Self { loader }
    }

    /// The image loader.
    pub fn loader(&self) -> &L {
        &self.loader
    }

    /// Renders `mockup` onto `target`.
    ///
    /// Without a user image the result is the background-only render.
    ///
    /// # Errors
    ///
    /// - [`OpsError::Decode`] if the background, user image or overlay
    ///   cannot be loaded; nothing is returned for the pass
    /// - [`OpsError::InvalidDimensions`] for a zero-sized user image
    /// - [`OpsError::InvalidParameter`] for a bad target or scale factor
    pub fn render(
        &self,
        target: &RenderTarget,
        mockup: &MockupDefinition,
        user_image: Option<&ImageSource>,
        scale_factor: f64,
    ) -> OpsResult<Surface> {
        let base = layout(target, mockup, None, scale_factor)?;
        let geometry = base.geometry;
        debug!(
            mockup = %mockup.name,
            kind = ?target.kind,
            width = geometry.pixel_width,
            height = geometry.pixel_height,
            "render started"
        );

        let mut surface = Surface::filled(geometry.pixel_width, geometry.pixel_height, WHITE)?;
        let device = DAffine2::from_scale(DVec2::splat(geometry.pixel_ratio));
        let smoothing = target.smoothing();

        let background = self.load(ImageRole::Background, &ImageSource::File(mockup.background.clone()))?;

        if let Some(source) = user_image {
            let image = self.load(ImageRole::UserImage, source)?;
            let placement = fit(
                &base.frame,
                image.width(),
                image.height(),
                target.fit_policy(scale_factor),
            )?;
            let local = rect_transform(
                image.width(),
                image.height(),
                -placement.width / 2.0,
                -placement.height / 2.0,
                placement.width,
                placement.height,
            );
            draw_image(&mut surface, &image, device * placement.local_to_frame() * local, smoothing)?;
            debug!(mockup = %mockup.name, constraint = ?placement.constraint, "drew user image");
        }

        let full = |s: &Surface| {
            device * rect_transform(s.width(), s.height(), 0.0, 0.0, geometry.logical_width, geometry.logical_height)
        };
        draw_image(&mut surface, &background, full(&background), smoothing)?;

        if let Some(path) = &mockup.overlay {
            let overlay = self.load(ImageRole::Overlay, &ImageSource::File(path.clone()))?;
            draw_image(&mut surface, &overlay, full(&overlay), smoothing)?;
        }

        debug!(mockup = %mockup.name, kind = ?target.kind, "render finished");
        Ok(surface)
    }

    /// Renders using the user image and scale factor from `params`.
    pub fn render_with(
        &self,
        target: &RenderTarget,
        mockup: &MockupDefinition,
        params: &RenderParameters,
    ) -> OpsResult<Surface> {
        self.render(target, mockup, params.user_image.as_ref(), params.scale_factor())
    }

    /// Renders one style-picker thumbnail.
    pub fn render_thumbnail(
        &self,
        mockup: &MockupDefinition,
        user_image: Option<&ImageSource>,
    ) -> OpsResult<Surface> {
        // Thumbnails ignore the scale factor; any valid value works.
        self.render(&RenderTarget::thumbnail(), mockup, user_image, DEFAULT_SCALE_FACTOR)
    }

    /// Renders a thumbnail for every mockup, one after another, in registry
    /// order. Failing mockups are logged and skipped.
    pub fn render_thumbnails(
        &self,
        registry: &Registry,
        user_image: Option<&ImageSource>,
    ) -> Vec<(String, Surface)> {
        registry
            .iter()
            .filter_map(|mockup| match self.render_thumbnail(mockup, user_image) {
                Ok(surface) => Some((mockup.name.clone(), surface)),
                Err(e) => {
                    warn!(mockup = %mockup.name, error = %e, "thumbnail skipped");
                    None
                }
            })
            .collect()
    }

    fn load(&self, role: ImageRole, source: &ImageSource) -> OpsResult<Arc<Surface>> {
        self.loader
            .load(source)
            .map_err(|e| OpsError::decode(role, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use mockup_core::Size;

    #[test]
    fn test_layout_without_image() {
        let registry = Registry::builtin();
        let l = layout(&RenderTarget::preview(1.0), registry.first(), None, 1.3).unwrap();
        assert!(l.placement.is_none());
        assert_relative_eq!(l.frame.x, 1980.0 * 800.0 / 5824.0);
        assert_eq!(l.geometry.pixel_height, 448);
    }

    #[test]
    fn test_layout_rejects_bad_scale() {
        let registry = Registry::builtin();
        let target = RenderTarget::preview(1.0);
        assert!(layout(&target, registry.first(), None, 0.0).is_err());
        assert!(layout(&target, registry.first(), None, f64::NAN).is_err());
    }

    #[test]
    fn test_layout_thumbnail_ignores_scale() {
        let mockup = MockupDefinition::new(
            "t",
            "T",
            "t.png",
            Size::new(1200.0, 600.0),
            Frame::new(100.0, 100.0, 200.0, 400.0, 6.0),
        );
        let target = RenderTarget::thumbnail();
        let a = layout(&target, &mockup, Some((10, 20)), 0.8).unwrap();
        let b = layout(&target, &mockup, Some((10, 20)), 1.5).unwrap();
        assert_eq!(a.placement, b.placement);
        assert_relative_eq!(a.placement.unwrap().effective_scale, 1.4);
    }
}
