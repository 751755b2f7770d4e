//! Native-space geometry for mockups.
//!
//! Mockup artwork is authored at a large native resolution. Every coordinate
//! here is a floating-point pixel position in that space, so authored values
//! such as `443.5` survive unchanged until a render target scales them.
//!
//! ```text
//! (0,0) ────────► X
//!   │      frame.x
//!   │     ┌────────┐  frame.y
//!   │     │ frame  │  rotated about its own center,
//!   │     │        │  clockwise for positive degrees
//!   │     └────────┘
//!   ▼
//!   Y
//! ```

use serde::{Deserialize, Serialize};

/// Width and height in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    /// Width in pixels
    pub width: f64,
    /// Height in pixels
    pub height: f64,
}

impl Size {
    /// Creates a new size.
    #[inline]
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Width divided by height.
    #[inline]
    pub fn aspect(&self) -> f64 {
        self.width / self.height
    }

    /// Both dimensions are finite and strictly positive.
    #[inline]
    pub fn is_valid(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }

    /// Returns this size multiplied uniformly by `scale`.
    #[inline]
    pub fn scaled(&self, scale: f64) -> Self {
        Self::new(self.width * scale, self.height * scale)
    }
}

/// The region of a mockup where the user's image shows through.
///
/// `x`, `y`, `width` and `height` describe the unrotated rectangle;
/// `rotation` turns it about its center.
///
/// # Example
///
/// ```rust
/// use mockup_core::Frame;
///
/// let frame = Frame::new(100.0, 50.0, 200.0, 400.0, 0.0);
/// assert_eq!(frame.center(), (200.0, 250.0));
///
/// let half = frame.scaled(0.5);
/// assert_eq!(half.width, 100.0);
/// assert_eq!(half.rotation, 0.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Frame {
    /// Left edge of the unrotated rectangle
    pub x: f64,
    /// Top edge of the unrotated rectangle
    pub y: f64,
    /// Width of the unrotated rectangle
    pub width: f64,
    /// Height of the unrotated rectangle
    pub height: f64,
    /// Rotation in degrees, clockwise-positive on screen
    #[serde(default)]
    pub rotation: f64,
}

impl Frame {
    /// Creates a new frame.
    #[inline]
    pub const fn new(x: f64, y: f64, width: f64, height: f64, rotation: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
            rotation,
        }
    }

    /// Scales position and size uniformly. Rotation is scale-invariant.
    #[inline]
    pub fn scaled(&self, scale: f64) -> Self {
        Self {
            x: self.x * scale,
            y: self.y * scale,
            width: self.width * scale,
            height: self.height * scale,
            rotation: self.rotation,
        }
    }

    /// Center of the rectangle, the pivot for rotation.
    #[inline]
    pub fn center(&self) -> (f64, f64) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Width divided by height.
    #[inline]
    pub fn aspect(&self) -> f64 {
        self.width / self.height
    }

    /// Rotation converted to radians (sign preserved).
    #[inline]
    pub fn rotation_radians(&self) -> f64 {
        self.rotation.to_radians()
    }

    /// True for any non-zero rotation.
    #[inline]
    pub fn is_rotated(&self) -> bool {
        self.rotation != 0.0
    }

    /// Corners of the unrotated rectangle, clockwise from top-left.
    pub fn corners(&self) -> [(f64, f64); 4] {
        let (l, t) = (self.x, self.y);
        let (r, b) = (self.x + self.width, self.y + self.height);
        [(l, t), (r, t), (r, b), (l, b)]
    }

    /// Size of the unrotated rectangle.
    #[inline]
    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// All components finite and the size strictly positive.
    pub fn is_valid(&self) -> bool {
        [self.x, self.y, self.rotation].iter().all(|v| v.is_finite()) && self.size().is_valid()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_size_aspect() {
        let size = Size::new(5824.0, 3264.0);
        assert_relative_eq!(size.aspect(), 5824.0 / 3264.0);
        assert!(size.is_valid());
        assert!(!Size::new(0.0, 10.0).is_valid());
        assert!(!Size::new(f64::NAN, 10.0).is_valid());
    }

    #[test]
    fn test_frame_scaling_is_uniform() {
        let frame = Frame::new(1980.0, 443.5, 1863.0, 2377.0, -6.0);
        let scale = 800.0 / 5824.0;
        let scaled = frame.scaled(scale);

        assert_relative_eq!(scaled.x, 1980.0 * scale);
        assert_relative_eq!(scaled.y, 443.5 * scale);
        assert_relative_eq!(scaled.aspect(), frame.aspect(), epsilon = 1e-12);
        assert_eq!(scaled.rotation, -6.0);
    }

    #[test]
    fn test_frame_corners() {
        let frame = Frame::new(10.0, 20.0, 30.0, 40.0, 0.0);
        assert_eq!(
            frame.corners(),
            [(10.0, 20.0), (40.0, 20.0), (40.0, 60.0), (10.0, 60.0)]
        );
        assert!(!frame.is_rotated());
    }
}
