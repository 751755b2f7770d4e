//! Separable downscaling.
//!
//! Mockup backgrounds are drawn at a small fraction of their native size.
//! Point-sampling them would alias badly, so sources shrunk by more than
//! 2x are first resampled with a proper filter. Filtering happens in
//! premultiplied alpha so transparent cutouts do not bleed dark fringes.
//!
//! # Filters
//!
//! - [`Filter::Bilinear`] - Triangle filter ("medium" smoothing)
//! - [`Filter::Lanczos3`] - Windowed sinc ("high" smoothing)
//!
//! # Example
//!
//! ```rust
//! use mockup_core::Surface;
//! use mockup_ops::resize::{downscale, Filter};
//!
//! let src = Surface::filled(64, 64, [10, 20, 30, 255]).unwrap();
//! let dst = downscale(&src, 16, 16, Filter::Lanczos3).unwrap();
//! assert_eq!(dst.pixel(8, 8), [10, 20, 30, 255]);
//! ```

use mockup_core::Surface;

use crate::parallel::for_each_row;
use crate::{OpsError, OpsResult};

/// Resampling filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Filter {
    /// Bilinear (triangle) filter.
    Bilinear,
    /// Lanczos-3 (best for strong downscaling).
    #[default]
    Lanczos3,
}

impl Filter {
    /// Returns the support radius for this filter.
    #[inline]
    pub fn support(&self) -> f32 {
        match self {
            Filter::Bilinear => 1.0,
            Filter::Lanczos3 => 3.0,
        }
    }

    /// Evaluates the filter kernel at position x.
    #[inline]
    pub fn weight(&self, x: f32) -> f32 {
        match self {
            Filter::Bilinear => {
                let ax = x.abs();
                if ax < 1.0 { 1.0 - ax } else { 0.0 }
            }
            Filter::Lanczos3 => lanczos_weight(x, 3.0),
        }
    }
}

#[inline]
fn lanczos_weight(x: f32, a: f32) -> f32 {
    let ax = x.abs();
    if ax < 1e-8 {
        1.0
    } else if ax < a {
        let pi_x = std::f32::consts::PI * ax;
        let pi_x_a = pi_x / a;
        (pi_x.sin() / pi_x) * (pi_x_a.sin() / pi_x_a)
    } else {
        0.0
    }
}

/// Source taps for one output sample.
struct Taps {
    start: usize,
    weights: Vec<f32>,
}

/// Normalised filter taps for every output position along one axis.
fn contributions(src_len: usize, dst_len: usize, filter: Filter) -> Vec<Taps> {
    let scale = src_len as f32 / dst_len as f32;
    let stretch = scale.max(1.0);
    let support = filter.support() * stretch;

    (0..dst_len)
        .map(|i| {
            let center = (i as f32 + 0.5) * scale - 0.5;
            let left = ((center - support).floor() as isize).max(0) as usize;
            let right = ((center + support).ceil().max(0.0) as usize).min(src_len - 1);

            let mut weights: Vec<f32> = (left..=right)
                .map(|s| filter.weight((s as f32 - center) / stretch))
                .collect();
            let sum: f32 = weights.iter().sum();
            if sum.abs() > 1e-8 {
                weights.iter_mut().for_each(|w| *w /= sum);
                Taps { start: left, weights }
            } else {
                // Degenerate window; fall back to the nearest sample.
                let nearest = (center.round().max(0.0) as usize).min(src_len - 1);
                Taps {
                    start: nearest,
                    weights: vec![1.0],
                }
            }
        })
        .collect()
}

/// Resamples `src` to `dst_w` x `dst_h` with `filter`.
///
/// Intended for shrinking; enlarging works but is not what the filter
/// widths are tuned for.
///
/// # Errors
///
/// [`OpsError::InvalidDimensions`] for a zero destination size.
pub fn downscale(src: &Surface, dst_w: u32, dst_h: u32, filter: Filter) -> OpsResult<Surface> {
    if dst_w == 0 || dst_h == 0 {
        return Err(OpsError::InvalidDimensions(
            "destination size must be > 0".into(),
        ));
    }
    let (src_w, src_h) = (src.width() as usize, src.height() as usize);
    let (dst_w, dst_h) = (dst_w as usize, dst_h as usize);

    let temp = resize_horizontal(src, src_w, src_h, dst_w, filter);
    let data = resize_vertical(&temp, dst_w, src_h, dst_h, filter);
    Ok(Surface::from_rgba(dst_w as u32, dst_h as u32, data)?)
}

/// Horizontal pass: straight RGBA8 in, premultiplied f32 out.
fn resize_horizontal(src: &Surface, src_w: usize, src_h: usize, dst_w: usize, filter: Filter) -> Vec<f32> {
    let taps = contributions(src_w, dst_w, filter);
    let bytes = src.as_bytes();
    let mut dst = vec![0.0f32; dst_w * src_h * 4];

    for_each_row(&mut dst, dst_w * 4, |y, row| {
        let line: Vec<[f32; 4]> = bytes[y * src_w * 4..(y + 1) * src_w * 4]
            .chunks_exact(4)
            .map(premultiply)
            .collect();
        for (x, t) in taps.iter().enumerate() {
            let mut sum = [0.0f32; 4];
            for (k, &w) in t.weights.iter().enumerate() {
                let px = line[t.start + k];
                for c in 0..4 {
                    sum[c] += px[c] * w;
                }
            }
            row[x * 4..x * 4 + 4].copy_from_slice(&sum);
        }
    });
    debug_assert_eq!(dst.len(), dst_w * src_h * 4);
    dst
}

/// Vertical pass: premultiplied f32 in, straight RGBA8 out.
fn resize_vertical(src: &[f32], width: usize, src_h: usize, dst_h: usize, filter: Filter) -> Vec<u8> {
    let taps = contributions(src_h, dst_h, filter);
    let mut dst = vec![0u8; width * dst_h * 4];

    for_each_row(&mut dst, width * 4, |y, row| {
        let t = &taps[y];
        for x in 0..width {
            let mut sum = [0.0f32; 4];
            for (k, &w) in t.weights.iter().enumerate() {
                let idx = ((t.start + k) * width + x) * 4;
                for c in 0..4 {
                    sum[c] += src[idx + c] * w;
                }
            }
            row[x * 4..x * 4 + 4].copy_from_slice(&unpremultiply(sum));
        }
    });
    dst
}

/// Straight RGBA8 to premultiplied `[0, 1]` floats.
#[inline]
pub(crate) fn premultiply(px: &[u8]) -> [f32; 4] {
    let a = px[3] as f32 / 255.0;
    [
        px[0] as f32 / 255.0 * a,
        px[1] as f32 / 255.0 * a,
        px[2] as f32 / 255.0 * a,
        a,
    ]
}

/// Premultiplied floats back to straight RGBA8. Filter overshoot is clamped.
#[inline]
pub(crate) fn unpremultiply(px: [f32; 4]) -> [u8; 4] {
    let a = px[3].clamp(0.0, 1.0);
    if a <= 1e-6 {
        return [0, 0, 0, 0];
    }
    let to_u8 = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
    [to_u8(px[0] / a), to_u8(px[1] / a), to_u8(px[2] / a), to_u8(a)]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weights_normalised() {
        for filter in [Filter::Bilinear, Filter::Lanczos3] {
            for t in contributions(100, 7, filter) {
                let sum: f32 = t.weights.iter().sum();
                assert!((sum - 1.0).abs() < 1e-5);
            }
        }
    }

    #[test]
    fn test_constant_color_preserved() {
        let src = Surface::filled(90, 30, [200, 100, 50, 255]).unwrap();
        for filter in [Filter::Bilinear, Filter::Lanczos3] {
            let dst = downscale(&src, 9, 3, filter).unwrap();
            assert_eq!(dst.dimensions(), (9, 3));
            for y in 0..3 {
                for x in 0..9 {
                    assert_eq!(dst.pixel(x, y), [200, 100, 50, 255]);
                }
            }
        }
    }

    #[test]
    fn test_transparent_pixels_do_not_darken() {
        // Left half opaque red, right half fully transparent black.
        let mut src = Surface::new(40, 4).unwrap();
        for y in 0..4 {
            for x in 0..20 {
                src.set_pixel(x, y, [255, 0, 0, 255]);
            }
        }
        let dst = downscale(&src, 4, 1, Filter::Bilinear).unwrap();
        let edge = dst.pixel(1, 0);
        assert_eq!(&edge[..3], &[255, 0, 0]);
        assert_eq!(dst.pixel(3, 0)[3], 0);
    }

    #[test]
    fn test_zero_destination_rejected() {
        let src = Surface::new(4, 4).unwrap();
        assert!(downscale(&src, 0, 2, Filter::Bilinear).is_err());
    }

    #[test]
    fn test_unpremultiply_roundtrip() {
        let px = [120u8, 40, 200, 128];
        let back = unpremultiply(premultiply(&px));
        for c in 0..4 {
            assert!((back[c] as i32 - px[c] as i32).abs() <= 1);
        }
    }
}
