//! Fitting the user image into a frame.
//!
//! The image is sized against the unrotated frame, enlarged by an
//! effective scale, then rotated with the frame about the frame's center.
//!
//! Two policies exist on purpose:
//!
//! - **Preview**: contain-fit times `scale_factor * (cos θ + sin θ)` with
//!   `θ = |rotation|`
//! - **Thumbnail**: cover-fit times `1.4` for any rotation, `1.0`
//!   otherwise; the user's scale factor is ignored
//!
//! # Example
//!
//! ```rust
//! use mockup_core::Frame;
//! use mockup_ops::fit::{fit, FitPolicy};
//!
//! let frame = Frame::new(0.0, 0.0, 100.0, 200.0, 0.0);
//! let p = fit(&frame, 1000, 1000, FitPolicy::Preview { scale_factor: 1.0 }).unwrap();
//! assert_eq!((p.width, p.height), (100.0, 100.0));
//! ```

use glam::{DAffine2, DVec2};
use mockup_core::Frame;
use tracing::trace;

use crate::{OpsError, OpsResult};

/// Fixed padding applied to rotated frames in thumbnails.
pub const THUMBNAIL_ROTATION_PADDING: f64 = 1.4;

/// How the fitted image is enlarged.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FitPolicy {
    /// Continuous rotation padding times the user's scale factor
    Preview {
        /// User scale factor (0.8-1.5)
        scale_factor: f64,
    },
    /// Cover-fit with fixed padding, scale factor ignored
    Thumbnail,
}

impl FitPolicy {
    /// Multiplier applied to the base fit for a frame rotated by
    /// `rotation_degrees`.
    pub fn effective_scale(&self, rotation_degrees: f64) -> f64 {
        match *self {
            FitPolicy::Preview { scale_factor } => scale_factor * rotation_impact(rotation_degrees),
            FitPolicy::Thumbnail => {
                if rotation_degrees != 0.0 {
                    THUMBNAIL_ROTATION_PADDING
                } else {
                    1.0
                }
            }
        }
    }
}

/// `cos θ + sin θ` for `θ = |rotation|`; 1 at 0°, above 1 otherwise.
#[inline]
pub fn rotation_impact(rotation_degrees: f64) -> f64 {
    let theta = rotation_degrees.abs().to_radians();
    theta.cos() + theta.sin()
}

/// Which frame dimension the draw size was derived from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Constraint {
    /// Width matches `frame.width * scale`
    Width,
    /// Height matches `frame.height * scale`
    Height,
}

/// Where the user image is drawn: a rectangle centered on the frame center,
/// rotated by the frame's rotation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    /// Center (the frame center)
    pub center: (f64, f64),
    /// Draw width before rotation
    pub width: f64,
    /// Draw height before rotation
    pub height: f64,
    /// Rotation in degrees, clockwise on screen
    pub rotation: f64,
    /// Multiplier that was applied to the base fit
    pub effective_scale: f64,
    /// Constraining dimension
    pub constraint: Constraint,
}

impl Placement {
    /// Maps the image's local rectangle `[-w/2, -h/2, w, h]` into the
    /// frame's coordinate space.
    pub fn local_to_frame(&self) -> DAffine2 {
        DAffine2::from_translation(DVec2::new(self.center.0, self.center.1))
            * DAffine2::from_angle(self.rotation.to_radians())
    }

    /// Corners of the rotated rectangle, clockwise from the local top-left.
    pub fn corners(&self) -> [(f64, f64); 4] {
        let m = self.local_to_frame();
        let (hw, hh) = (self.width / 2.0, self.height / 2.0);
        [(-hw, -hh), (hw, -hh), (hw, hh), (-hw, hh)].map(|(x, y)| {
            let p = m.transform_point2(DVec2::new(x, y));
            (p.x, p.y)
        })
    }

    /// Axis-aligned bounds of the rotated rectangle as `(min_x, min_y, max_x, max_y)`.
    pub fn bounds(&self) -> (f64, f64, f64, f64) {
        self.corners().iter().fold(
            (f64::INFINITY, f64::INFINITY, f64::NEG_INFINITY, f64::NEG_INFINITY),
            |(x0, y0, x1, y1), &(x, y)| (x0.min(x), y0.min(y), x1.max(x), y1.max(y)),
        )
    }

    /// True if `point` lies inside the rotated rectangle (edges included,
    /// within `eps`).
    pub fn contains_point(&self, point: (f64, f64), eps: f64) -> bool {
        let local = self
            .local_to_frame()
            .inverse()
            .transform_point2(DVec2::new(point.0, point.1));
        local.x.abs() <= self.width / 2.0 + eps && local.y.abs() <= self.height / 2.0 + eps
    }

    /// True if every corner of the unrotated `frame` rectangle is inside
    /// this placement, i.e. no background gap shows at the frame edges.
    pub fn covers(&self, frame: &Frame, eps: f64) -> bool {
        frame.corners().iter().all(|&p| self.contains_point(p, eps))
    }

    /// True if this placement's bounds lie within the unrotated `frame`.
    pub fn is_within(&self, frame: &Frame, eps: f64) -> bool {
        let (x0, y0, x1, y1) = self.bounds();
        x0 >= frame.x - eps
            && y0 >= frame.y - eps
            && x1 <= frame.x + frame.width + eps
            && y1 <= frame.y + frame.height + eps
    }
}

/// Fits an image of `image_width` x `image_height` into `frame`.
///
/// `frame` must already be in target (logical) coordinates.
///
/// # Errors
///
/// [`OpsError::InvalidDimensions`] for a zero-sized image or a degenerate
/// frame.
pub fn fit(frame: &Frame, image_width: u32, image_height: u32, policy: FitPolicy) -> OpsResult<Placement> {
    if image_width == 0 || image_height == 0 {
        return Err(OpsError::InvalidDimensions(format!(
            "user image is {image_width}x{image_height}"
        )));
    }
    if !frame.is_valid() {
        return Err(OpsError::InvalidDimensions(format!("degenerate frame {frame:?}")));
    }

    let frame_aspect = frame.aspect();
    let user_aspect = image_width as f64 / image_height as f64;
    let effective_scale = policy.effective_scale(frame.rotation);

    // Contain matches the width of images wider than the frame; cover
    // matches their height so the other side overflows.
    let wider = user_aspect > frame_aspect;
    let constraint = match (policy, wider) {
        (FitPolicy::Preview { .. }, true) | (FitPolicy::Thumbnail, false) => Constraint::Width,
        (FitPolicy::Preview { .. }, false) | (FitPolicy::Thumbnail, true) => Constraint::Height,
    };
    let (width, height) = match constraint {
        Constraint::Width => {
            let w = frame.width * effective_scale;
            (w, w / user_aspect)
        }
        Constraint::Height => {
            let h = frame.height * effective_scale;
            (h * user_aspect, h)
        }
    };

    let placement = Placement {
        center: frame.center(),
        width,
        height,
        rotation: frame.rotation,
        effective_scale,
        constraint,
    };
    trace!(?policy, frame_aspect, user_aspect, ?placement, "fitted user image");
    Ok(placement)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_rotation_impact() {
        assert_relative_eq!(rotation_impact(0.0), 1.0);
        assert_relative_eq!(rotation_impact(-6.0), rotation_impact(6.0));
        assert_relative_eq!(rotation_impact(6.0), 1.0990, epsilon = 1e-4);
        assert_relative_eq!(rotation_impact(45.0), 2f64.sqrt(), epsilon = 1e-12);
    }

    #[test]
    fn test_thumbnail_policy_ignores_scale() {
        assert_eq!(FitPolicy::Thumbnail.effective_scale(0.0), 1.0);
        assert_eq!(FitPolicy::Thumbnail.effective_scale(-6.0), 1.4);
        let preview = FitPolicy::Preview { scale_factor: 1.3 };
        assert_relative_eq!(preview.effective_scale(0.0), 1.3);
    }

    #[test]
    fn test_width_constrained() {
        let frame = Frame::new(0.0, 0.0, 100.0, 100.0, 0.0);
        let p = fit(&frame, 400, 200, FitPolicy::Preview { scale_factor: 1.0 }).unwrap();
        assert_eq!(p.constraint, Constraint::Width);
        assert_relative_eq!(p.width, 100.0);
        assert_relative_eq!(p.height, 50.0);
        assert_eq!(p.center, (50.0, 50.0));
    }

    #[test]
    fn test_equal_aspect_is_height_constrained() {
        let frame = Frame::new(0.0, 0.0, 50.0, 100.0, 0.0);
        let p = fit(&frame, 5, 10, FitPolicy::Preview { scale_factor: 1.0 }).unwrap();
        assert_eq!(p.constraint, Constraint::Height);
        assert_relative_eq!(p.height, 100.0);
        assert_relative_eq!(p.width, 50.0);
    }

    #[test]
    fn test_thumbnail_covers_instead_of_contains() {
        let frame = Frame::new(0.0, 0.0, 100.0, 100.0, 0.0);

        // Wider image: height matches, width overflows.
        let p = fit(&frame, 400, 200, FitPolicy::Thumbnail).unwrap();
        assert_eq!(p.constraint, Constraint::Height);
        assert_relative_eq!(p.height, 100.0);
        assert_relative_eq!(p.width, 200.0);

        // Taller image: width matches, height overflows.
        let p = fit(&frame, 200, 400, FitPolicy::Thumbnail).unwrap();
        assert_eq!(p.constraint, Constraint::Width);
        assert_relative_eq!(p.width, 100.0);
        assert_relative_eq!(p.height, 200.0);
        assert!(p.covers(&frame, 1e-9));

        // Rotated frames get the fixed padding on top.
        let tilted = Frame::new(0.0, 0.0, 100.0, 100.0, -6.0);
        let p = fit(&tilted, 200, 400, FitPolicy::Thumbnail).unwrap();
        assert_relative_eq!(p.width, 140.0);
        assert_relative_eq!(p.height, 280.0);
        assert!(p.covers(&tilted, 1e-9));
    }

    #[test]
    fn test_zero_sized_image_rejected() {
        let frame = Frame::new(0.0, 0.0, 50.0, 100.0, 0.0);
        assert!(matches!(
            fit(&frame, 0, 10, FitPolicy::Thumbnail),
            Err(OpsError::InvalidDimensions(_))
        ));
        assert!(fit(&frame, 10, 0, FitPolicy::Thumbnail).is_err());
    }

    #[test]
    fn test_corners_rotate_clockwise() {
        let p = Placement {
            center: (0.0, 0.0),
            width: 2.0,
            height: 2.0,
            rotation: 90.0,
            effective_scale: 1.0,
            constraint: Constraint::Height,
        };
        // Local top-left (-1,-1) turns clockwise on screen to (1,-1).
        let (x, y) = p.corners()[0];
        assert_relative_eq!(x, 1.0, epsilon = 1e-12);
        assert_relative_eq!(y, -1.0, epsilon = 1e-12);
    }
}
