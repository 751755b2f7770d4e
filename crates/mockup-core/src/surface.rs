//! RGBA8 pixel surfaces.
//!
//! A [`Surface`] is a tightly packed, row-major buffer with four bytes per
//! pixel in straight (non-premultiplied) alpha. Decoded images, rendered
//! previews and thumbnails all use it.

use crate::error::{CoreError, CoreResult};

/// Bytes per pixel.
pub const CHANNELS: usize = 4;

/// Opaque white, the canvas background of every render.
pub const WHITE: [u8; 4] = [255, 255, 255, 255];

/// An owned RGBA8 image.
///
/// # Example
///
/// ```rust
/// use mockup_core::Surface;
///
/// let mut s = Surface::new(4, 2).unwrap();
/// s.set_pixel(1, 1, [10, 20, 30, 255]);
/// assert_eq!(s.pixel(1, 1), [10, 20, 30, 255]);
/// assert_eq!(s.as_bytes().len(), 4 * 2 * 4);
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct Surface {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl Surface {
    /// Creates a fully transparent surface.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidDimensions`] if either dimension is zero.
    pub fn new(width: u32, height: u32) -> CoreResult<Self> {
        Self::filled(width, height, [0, 0, 0, 0])
    }

    /// Creates a surface with every pixel set to `color`.
    pub fn filled(width: u32, height: u32, color: [u8; 4]) -> CoreResult<Self> {
        let len = checked_len(width, height)?;
        let data = color.iter().copied().cycle().take(len).collect();
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Wraps an existing RGBA8 buffer.
    ///
    /// # Errors
    ///
    /// Fails when the dimensions are zero or the buffer length does not
    /// equal `width * height * 4`.
    pub fn from_rgba(width: u32, height: u32, data: Vec<u8>) -> CoreResult<Self> {
        let expected = checked_len(width, height)?;
        if data.len() != expected {
            return Err(CoreError::BufferSize {
                expected,
                got: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Width in pixels.
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// `(width, height)`.
    #[inline]
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Overwrites every pixel with `color`.
    pub fn fill(&mut self, color: [u8; 4]) {
        for px in self.data.chunks_exact_mut(CHANNELS) {
            px.copy_from_slice(&color);
        }
    }

    /// Reads a pixel. Panics when out of bounds.
    #[inline]
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        let i = self.index(x, y);
        [
            self.data[i],
            self.data[i + 1],
            self.data[i + 2],
            self.data[i + 3],
        ]
    }

    /// Writes a pixel. Panics when out of bounds.
    #[inline]
    pub fn set_pixel(&mut self, x: u32, y: u32, color: [u8; 4]) {
        let i = self.index(x, y);
        self.data[i..i + CHANNELS].copy_from_slice(&color);
    }

    /// Row stride in bytes.
    #[inline]
    pub fn stride(&self) -> usize {
        self.width as usize * CHANNELS
    }

    /// Raw pixel bytes.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Mutable raw pixel bytes.
    #[inline]
    pub fn as_bytes_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// Consumes the surface, returning its buffer.
    #[inline]
    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }

    /// True when every pixel has alpha 255.
    pub fn is_opaque(&self) -> bool {
        self.data.chunks_exact(CHANNELS).all(|px| px[3] == 255)
    }

    #[inline]
    fn index(&self, x: u32, y: u32) -> usize {
        assert!(
            x < self.width && y < self.height,
            "pixel ({x}, {y}) outside {}x{}",
            self.width,
            self.height
        );
        (y as usize * self.width as usize + x as usize) * CHANNELS
    }
}

impl std::fmt::Debug for Surface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Surface")
            .field("width", &self.width)
            .field("height", &self.height)
            .finish_non_exhaustive()
    }
}

fn checked_len(width: u32, height: u32) -> CoreResult<usize> {
    if width == 0 || height == 0 {
        return Err(CoreError::invalid_dimensions(width, height, "zero-sized surface"));
    }
    (width as usize)
        .checked_mul(height as usize)
        .and_then(|n| n.checked_mul(CHANNELS))
        .ok_or_else(|| CoreError::invalid_dimensions(width, height, "surface too large"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_dimensions_rejected() {
        assert!(matches!(
            Surface::new(0, 10),
            Err(CoreError::InvalidDimensions { .. })
        ));
        assert!(Surface::filled(10, 0, WHITE).is_err());
    }

    #[test]
    fn test_from_rgba_length_check() {
        assert!(Surface::from_rgba(2, 2, vec![0; 16]).is_ok());
        assert!(matches!(
            Surface::from_rgba(2, 2, vec![0; 15]),
            Err(CoreError::BufferSize {
                expected: 16,
                got: 15
            })
        ));
    }

    #[test]
    fn test_fill_and_opacity() {
        let mut s = Surface::new(3, 3).unwrap();
        assert!(!s.is_opaque());
        s.fill(WHITE);
        assert!(s.is_opaque());
        assert_eq!(s.pixel(2, 2), WHITE);
    }

    #[test]
    #[should_panic]
    fn test_out_of_bounds_panics() {
        let s = Surface::new(2, 2).unwrap();
        let _ = s.pixel(2, 0);
    }
}
